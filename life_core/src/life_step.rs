//! The "STEP" Engine - neighbor counting, the B3/S23 rule, and generation stepping.
//!
//! Every function here is pure: the input snapshot is never touched and the
//! output depends only on the input, so a superseded generation stays valid
//! for anyone still holding it.

use crate::life_grid::{Coord, GridBounds, SparseGrid};
use serde::{Deserialize, Serialize};

/// Moore neighborhood offsets.
const NEIGHBOR_OFFSETS: [(i32, i32); 8] = [
    (-1, -1), (-1, 0), (-1, 1),
    (0, -1),           (0, 1),
    (1, -1),  (1, 0),  (1, 1),
];

/// Counts live cells in the Moore neighborhood of `coord`.
///
/// `coord` may lie outside any domain; neighbors that are not in the grid
/// (including those past the `i32` range) are simply dead.
///
/// # Returns
/// A value in `0..=8`.
pub fn count_neighbors(grid: &SparseGrid, coord: Coord) -> u8 {
    NEIGHBOR_OFFSETS
        .iter()
        .filter_map(|&(dx, dy)| coord.offset(dx, dy))
        .filter(|n| grid.is_alive(*n))
        .count() as u8
}

/// Conway's rule: survive on 2 or 3, birth on exactly 3.
pub fn next_state(alive: bool, neighbors: u8) -> bool {
    matches!((alive, neighbors), (true, 2) | (true, 3) | (false, 3))
}

/// Computes the next grid over `bounds`.
///
/// Only cells inside the domain are considered. Live cells outside it are
/// never reconsidered and never feed births inside it on later steps.
pub fn step(grid: &SparseGrid, bounds: &GridBounds) -> SparseGrid {
    bounds
        .cells()
        .filter(|&coord| next_state(grid.is_alive(coord), count_neighbors(grid, coord)))
        .collect()
}

/// An immutable snapshot of the grid at one simulation step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Generation {
    /// Number of transitions since the initial grid
    pub index: u64,

    /// Live cells at this step
    pub grid: SparseGrid,
}

impl Generation {
    /// Wraps an initial grid as generation 0.
    pub fn initial(grid: SparseGrid) -> Self {
        Self { index: 0, grid }
    }

    /// Builds the following generation without touching `self`.
    pub fn next(&self, bounds: &GridBounds) -> Self {
        Self {
            index: self.index + 1,
            grid: step(&self.grid, bounds),
        }
    }

    /// Number of live cells.
    pub fn live_count(&self) -> usize {
        self.grid.len()
    }
}
