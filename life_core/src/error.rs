//! Error types for grid construction and seeding.
//!
//! Stepping itself is total and has no error path.

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum CoreError {
    #[error("Density must be within [0, 1], got {0}")]
    InvalidDensity(f64),

    #[error("Grid size must be at least 1")]
    EmptyDomain,

    #[error("Grid size {0} exceeds the maximum of {}", crate::life_grid::MAX_GRID_SIZE)]
    DomainTooLarge(u32),
}
