//! Random initial conditions.

use crate::error::CoreError;
use crate::life_grid::{GridBounds, SparseGrid};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Default probability that a cell starts alive.
pub const DEFAULT_DENSITY: f64 = 0.1;

/// Seeds a grid by marking each domain cell alive with probability `density`.
#[derive(Debug, Clone, Copy)]
pub struct InitialConditions {
    bounds: GridBounds,
    density: f64,
}

impl InitialConditions {
    /// # Errors
    /// `CoreError::InvalidDensity` if `density` is NaN or outside `[0, 1]`.
    pub fn new(bounds: GridBounds, density: f64) -> Result<Self, CoreError> {
        if !(0.0..=1.0).contains(&density) {
            return Err(CoreError::InvalidDensity(density));
        }
        Ok(Self { bounds, density })
    }

    pub fn bounds(&self) -> GridBounds {
        self.bounds
    }

    pub fn density(&self) -> f64 {
        self.density
    }

    /// Marks cells alive in `grid`, one independent draw per domain cell.
    ///
    /// Cells are visited x-major, so a given RNG state always yields the
    /// same layout.
    pub fn populate<R: Rng + ?Sized>(&self, grid: &mut SparseGrid, rng: &mut R) {
        for coord in self.bounds.cells() {
            if rng.gen_bool(self.density) {
                grid.insert(coord);
            }
        }
    }

    /// Builds a fresh grid from a 64-bit seed.
    pub fn generate(&self, seed: u64) -> SparseGrid {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut grid = SparseGrid::new();
        self.populate(&mut grid, &mut rng);
        grid
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::life_grid::Coord;

    fn bounds() -> GridBounds {
        GridBounds::new(30).unwrap()
    }

    #[test]
    fn test_zero_density_is_empty() {
        let seeder = InitialConditions::new(bounds(), 0.0).unwrap();
        assert!(seeder.generate(7).is_empty());
    }

    #[test]
    fn test_full_density_fills_domain() {
        let seeder = InitialConditions::new(bounds(), 1.0).unwrap();
        let grid = seeder.generate(7);

        assert_eq!(grid.len() as u64, bounds().area());
        assert!(bounds().cells().all(|c| grid.is_alive(c)));
    }

    #[test]
    fn test_rejects_bad_density() {
        assert_eq!(
            InitialConditions::new(bounds(), 1.5).unwrap_err(),
            CoreError::InvalidDensity(1.5)
        );
        assert!(InitialConditions::new(bounds(), -0.1).is_err());
        assert!(InitialConditions::new(bounds(), f64::NAN).is_err());
    }

    #[test]
    fn test_same_seed_same_layout() {
        let seeder = InitialConditions::new(bounds(), 0.3).unwrap();
        assert_eq!(seeder.generate(42), seeder.generate(42));
        assert_ne!(seeder.generate(42), seeder.generate(43));
    }

    #[test]
    fn test_density_roughly_respected() {
        let seeder = InitialConditions::new(GridBounds::new(100).unwrap(), 0.1).unwrap();
        let live = seeder.generate(1).len();
        // 10_000 Bernoulli(0.1) draws: mean 1000, sd 30
        assert!((850..1150).contains(&live), "live = {}", live);
    }

    #[test]
    fn test_populate_adds_to_existing() {
        let seeder = InitialConditions::new(bounds(), 0.0).unwrap();
        let mut grid = SparseGrid::from_cells([(1, 1)]);
        seeder.populate(&mut grid, &mut ChaCha8Rng::seed_from_u64(0));
        assert!(grid.is_alive(Coord::new(1, 1)));
        assert_eq!(grid.len(), 1);
    }
}
