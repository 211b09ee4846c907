//! Persistence abstraction for captured patterns.

use async_trait::async_trait;
use crate::error::EnvError;
use crate::types::Occupancy;

/// Abstraction for a bucket-style object store.
///
/// # Implementations
///
/// - **Production**: a directory-backed bucket on the local filesystem
/// - **Testing**: an in-memory bucket with injectable failures
///
/// # Object Flow
///
/// ```text
/// Snapshot loop               Store                      Bucket
///   |                           |                          |
///   |-- ensure_bucket() ------->|-- create if absent ----->|
///   |-- put_pattern(label) ---->|-- write <label>.npy ---->|
/// ```
#[async_trait]
pub trait PatternStore: Send + Sync + 'static {
    /// Creates the bucket if it does not exist yet.
    ///
    /// # Returns
    /// * `Ok(())` - The bucket exists (it may have existed already)
    /// * `Err(EnvError::BucketCreation)` - The bucket is missing and could not be made
    /// * `Err(EnvError::StorageUnavailable)` - The store cannot be reached at all
    async fn ensure_bucket(&self) -> Result<(), EnvError>;

    /// Writes a dense occupancy array under `<label>.npy`.
    ///
    /// Writing the same label twice replaces the earlier object.
    ///
    /// # Returns
    /// The object key that was written.
    async fn put_pattern(&self, label: &str, occupancy: &Occupancy) -> Result<String, EnvError>;

    /// Returns the bucket name.
    fn bucket(&self) -> &str;
}

/// Object key for a pattern label.
pub fn object_key(label: &str) -> String {
    format!("{}.npy", label)
}
