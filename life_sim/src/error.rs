//! Error types for the simulation harness.

use life_core::CoreError;
use life_env::EnvError;
use thiserror::Error;

/// Errors that stop a run.
///
/// Collaborator failures during a run are logged and retried instead; they
/// only surface here when they happen during setup or final export.
#[derive(Debug, Error)]
pub enum SimError {
    /// Invalid grid or seeding parameters
    #[error("Configuration error: {0}")]
    Core(#[from] CoreError),

    /// Collaborator failure outside the frame loop
    #[error("Environment error: {0}")]
    Env(#[from] EnvError),

    /// A worker task panicked or was aborted
    #[error("Worker task failed: {0}")]
    Join(String),

    /// Export file could not be written
    #[error("Export failed: {0}")]
    Export(String),

    /// Worker count must be at least one
    #[error("At least one worker is required")]
    NoWorkers,
}
