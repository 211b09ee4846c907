//! Sparse Life Core - Game of Life over a bounded, sparse grid
//!
//! This library holds the pure half of the simulation:
//! 1. **Grid**: only live cells are stored; absence means dead
//! 2. **Step**: neighbor counting, the survival/birth rule, and whole-domain stepping
//! 3. **Seed**: reproducible random initial conditions at a given density
//! 4. **Census**: clustering live cells and counting recurring shapes
//!
//! Nothing here blocks, allocates shared state, or fails once its inputs
//! are validated. Concurrency lives in `life_sim`.

pub mod error;
pub mod life_census;
pub mod life_grid;
pub mod life_seed;
pub mod life_step;

// Re-export key types for convenience
pub use error::CoreError;
pub use life_census::{Census, Shape};
pub use life_grid::{Coord, GridBounds, SparseGrid, DEFAULT_GRID_SIZE, MAX_GRID_SIZE};
pub use life_seed::{InitialConditions, DEFAULT_DENSITY};
pub use life_step::{count_neighbors, next_state, step, Generation};
