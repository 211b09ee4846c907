//! Error types for the Sparse Life environment abstraction.

use thiserror::Error;

/// Errors raised by the collaborators behind the environment seam.
///
/// None of these are fatal to the simulation: the harness logs them and
/// retries or skips the affected frame.
#[derive(Debug, Error)]
pub enum EnvError {
    /// Store endpoint cannot be reached (or refused our credentials)
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    /// The bucket did not exist and could not be created
    #[error("Failed to create bucket '{bucket}': {reason}")]
    BucketCreation { bucket: String, reason: String },

    /// A single object could not be written
    #[error("Failed to write object '{key}': {reason}")]
    ObjectWrite { key: String, reason: String },

    /// Frame could not be rendered or saved
    #[error("Render error: {0}")]
    Render(String),

    /// Operation timed out
    #[error("Timeout after {0}ms")]
    Timeout(u64),
}

impl EnvError {
    /// Creates a storage-unavailable error.
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::StorageUnavailable(msg.into())
    }

    /// Creates a bucket-creation error.
    pub fn bucket(bucket: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Self::BucketCreation {
            bucket: bucket.into(),
            reason: reason.to_string(),
        }
    }

    /// Creates an object-write error.
    pub fn object(key: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Self::ObjectWrite {
            key: key.into(),
            reason: reason.to_string(),
        }
    }

    /// Creates a render error.
    pub fn render(reason: impl std::fmt::Display) -> Self {
        Self::Render(reason.to_string())
    }
}
