//! SimWorld - run configuration and the seeded starting state.

use crate::coordinator::{CoordinatorConfig, DEFAULT_WORKERS};
use crate::error::SimError;
use crate::storage::DEFAULT_BUCKET;
use crate::visualizer::{DEFAULT_IMAGE_PATH, DEFAULT_IMAGE_SIZE};

use life_core::{Generation, GridBounds, InitialConditions, DEFAULT_DENSITY, DEFAULT_GRID_SIZE};
use life_env::RunId;
use std::path::PathBuf;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tracing::info;

/// Shapes must occur more often than this before a snapshot is saved.
pub const DEFAULT_PATTERN_THRESHOLD: usize = 10;

/// Configuration for a simulation run.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// Master seed (0 = derive from wall-clock time)
    pub seed: u64,

    /// Domain side length
    pub grid_size: u32,

    /// Initial probability that a cell is alive
    pub density: f64,

    /// Number of concurrent workers
    pub workers: usize,

    /// Time between captured frames
    pub frame_interval: Duration,

    /// Stop after this many frames (None = run until interrupted)
    pub max_frames: Option<u64>,

    /// Stop the workers at this generation (None = never)
    pub max_generations: Option<u64>,

    /// Occurrence count a shape must exceed to trigger a save
    pub pattern_threshold: usize,

    /// Bucket name
    pub bucket: String,

    /// Directory holding buckets
    pub store_root: PathBuf,

    /// Upper bound on a single store call
    pub store_timeout: Duration,

    /// Rendered image (None = rendering disabled)
    pub image_path: Option<PathBuf>,

    /// Rendered image side in pixels
    pub image_size: u32,

    /// JSON export file (None = no export)
    pub export_path: Option<String>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            grid_size: DEFAULT_GRID_SIZE,
            density: DEFAULT_DENSITY,
            workers: DEFAULT_WORKERS,
            frame_interval: Duration::from_secs(1),
            max_frames: None,
            max_generations: None,
            pattern_threshold: DEFAULT_PATTERN_THRESHOLD,
            bucket: DEFAULT_BUCKET.to_string(),
            store_root: PathBuf::from("patterns"),
            store_timeout: Duration::from_secs(10),
            image_path: Some(PathBuf::from(DEFAULT_IMAGE_PATH)),
            image_size: DEFAULT_IMAGE_SIZE,
            export_path: None,
        }
    }
}

/// The validated configuration plus the seeded generation 0.
pub struct SimWorld {
    /// Configuration
    pub config: SimConfig,

    /// Seed actually used (resolved from the clock if configured as 0)
    pub seed: u64,

    /// Run identifier, derived from the seed
    pub run_id: RunId,

    /// Simulated domain
    pub bounds: GridBounds,

    /// Starting generation
    pub initial: Generation,
}

impl SimWorld {
    /// Validates the configuration and seeds the initial grid.
    pub fn new(config: SimConfig) -> Result<Self, SimError> {
        if config.workers == 0 {
            return Err(SimError::NoWorkers);
        }
        let bounds = GridBounds::new(config.grid_size)?;
        let seeder = InitialConditions::new(bounds, config.density)?;

        let seed = resolve_seed(config.seed);
        let run_id = RunId::from_seed(seed);
        let initial = Generation::initial(seeder.generate(seed));

        info!(
            "Seeded {}x{} grid at density {:.2}: {} live cells (seed={}, run={})",
            bounds.size(),
            bounds.size(),
            config.density,
            initial.live_count(),
            seed,
            run_id
        );

        Ok(Self {
            config,
            seed,
            run_id,
            bounds,
            initial,
        })
    }

    /// Worker pool configuration for this world.
    pub fn coordinator_config(&self) -> CoordinatorConfig {
        CoordinatorConfig {
            workers: self.config.workers,
            bounds: self.bounds,
            advance_limit: self.config.max_generations,
        }
    }
}

/// Returns `seed`, or a clock-derived seed when `seed` is 0.
pub fn resolve_seed(seed: u64) -> u64 {
    if seed != 0 {
        return seed;
    }
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use life_core::CoreError;

    #[test]
    fn test_sim_world_creation() {
        let config = SimConfig {
            seed: 42,
            grid_size: 20,
            density: 0.5,
            workers: 3,
            ..Default::default()
        };

        let world = SimWorld::new(config).unwrap();

        assert_eq!(world.seed, 42);
        assert_eq!(world.bounds.size(), 20);
        assert_eq!(world.initial.index, 0);
        assert!(world.initial.live_count() > 0);
        assert_eq!(world.coordinator_config().workers, 3);
    }

    #[test]
    fn test_sim_world_determinism() {
        let config = SimConfig {
            seed: 42,
            ..Default::default()
        };

        let world1 = SimWorld::new(config.clone()).unwrap();
        let world2 = SimWorld::new(config).unwrap();

        assert_eq!(world1.initial, world2.initial);
        assert_eq!(world1.run_id, world2.run_id);
    }

    #[test]
    fn test_sim_world_rejects_bad_config() {
        let bad_density = SimConfig {
            density: 2.0,
            ..Default::default()
        };
        assert!(matches!(
            SimWorld::new(bad_density),
            Err(SimError::Core(CoreError::InvalidDensity(_)))
        ));

        let no_workers = SimConfig {
            workers: 0,
            ..Default::default()
        };
        assert!(matches!(SimWorld::new(no_workers), Err(SimError::NoWorkers)));

        let too_large = SimConfig {
            grid_size: 200_000,
            ..Default::default()
        };
        assert!(matches!(
            SimWorld::new(too_large),
            Err(SimError::Core(CoreError::DomainTooLarge(200_000)))
        ));
    }

    #[test]
    fn test_resolve_seed() {
        assert_eq!(resolve_seed(7), 7);
        assert_ne!(resolve_seed(0), 0);
    }
}
