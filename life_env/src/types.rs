//! Common types exchanged across the environment seam.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for one simulation run.
///
/// Used as the object-key prefix for persisted patterns so that runs
/// sharing a bucket do not overwrite each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunId(pub Uuid);

impl RunId {
    /// Creates a deterministic RunId from a seed.
    pub fn from_seed(seed: u64) -> Self {
        let mut bytes = [0u8; 16];
        bytes[0..8].copy_from_slice(&seed.to_le_bytes());
        bytes[8..16].copy_from_slice(&seed.wrapping_mul(0x517cc1b727220a95).to_le_bytes());
        Self(Uuid::from_bytes(bytes))
    }
}

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // First 8 hex chars are enough to tell runs apart in a bucket listing
        write!(f, "{}", &self.0.simple().to_string()[..8])
    }
}

/// Dense square occupancy array handed to the persistence collaborator.
///
/// Indexed `[x][y]`: the outer axis is x, the inner axis is y, stored
/// row-major. A cell is `1` when alive and `0` when dead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Occupancy {
    size: u32,
    cells: Vec<u8>,
}

impl Occupancy {
    /// Creates an all-dead array of `size × size`.
    pub fn new(size: u32) -> Self {
        let side = size as usize;
        Self {
            size,
            cells: vec![0; side * side],
        }
    }

    /// Side length.
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Marks `(x, y)` alive. Out-of-range coordinates are ignored.
    pub fn set_alive(&mut self, x: u32, y: u32) {
        if let Some(idx) = self.index(x, y) {
            self.cells[idx] = 1;
        }
    }

    /// Returns the cell value at `(x, y)`, or `None` when out of range.
    pub fn get(&self, x: u32, y: u32) -> Option<u8> {
        self.index(x, y).map(|idx| self.cells[idx])
    }

    /// Number of live cells.
    pub fn live_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c == 1).count()
    }

    /// Row-major view of the cells (outer index x).
    pub fn as_slice(&self) -> &[u8] {
        &self.cells
    }

    fn index(&self, x: u32, y: u32) -> Option<usize> {
        (x < self.size && y < self.size).then(|| x as usize * self.size as usize + y as usize)
    }
}

/// A snapshot prepared for the rendering collaborator.
///
/// `points` holds the live coordinates in a stable order; the plot is
/// bounded to `[0, domain_size]` on both axes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScatterFrame {
    /// Generation index the points were captured at
    pub generation: u64,

    /// Side length of the simulated domain
    pub domain_size: u32,

    /// Live cell coordinates
    pub points: Vec<(i32, i32)>,
}

impl ScatterFrame {
    /// Creates a new frame.
    pub fn new(generation: u64, domain_size: u32, points: Vec<(i32, i32)>) -> Self {
        Self {
            generation,
            domain_size,
            points,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_id_from_seed_is_stable() {
        assert_eq!(RunId::from_seed(42), RunId::from_seed(42));
        assert_ne!(RunId::from_seed(42), RunId::from_seed(43));
        assert_eq!(RunId::from_seed(42).to_string().len(), 8);
    }

    #[test]
    fn test_occupancy_indexing() {
        let mut occ = Occupancy::new(4);
        occ.set_alive(1, 2);
        occ.set_alive(9, 9); // ignored

        assert_eq!(occ.get(1, 2), Some(1));
        assert_eq!(occ.get(2, 1), Some(0));
        assert_eq!(occ.get(4, 0), None);
        assert_eq!(occ.live_count(), 1);

        // Row x = 1 starts at offset 4
        assert_eq!(&occ.as_slice()[4..8], &[0, 0, 1, 0]);
    }
}
