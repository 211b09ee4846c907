//! Pattern stores: a directory-backed bucket and an in-memory one.
//!
//! Objects are NumPy `.npy` files (format 1.0, `<i4`, C order) holding the
//! dense `size × size` occupancy array, so they load directly with
//! `numpy.load`.

use async_trait::async_trait;
use life_env::{object_key, EnvError, Occupancy, PatternStore};
use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use tracing::{debug, info};

/// Default bucket name.
pub const DEFAULT_BUCKET: &str = "game-of-life-patterns";

const NPY_MAGIC: &[u8] = b"\x93NUMPY";

/// Encodes an occupancy array as a `.npy` byte buffer.
pub fn encode_npy(occupancy: &Occupancy) -> Vec<u8> {
    let n = occupancy.size();
    let mut header = format!(
        "{{'descr': '<i4', 'fortran_order': False, 'shape': ({}, {}), }}",
        n, n
    );
    // magic + version + header length + header + '\n' must be 64-byte aligned
    let unpadded = NPY_MAGIC.len() + 2 + 2 + header.len() + 1;
    header.push_str(&" ".repeat((64 - unpadded % 64) % 64));
    header.push('\n');

    let mut out = Vec::with_capacity(unpadded + 64 + occupancy.as_slice().len() * 4);
    out.extend_from_slice(NPY_MAGIC);
    out.extend_from_slice(&[1, 0]);
    out.extend_from_slice(&(header.len() as u16).to_le_bytes());
    out.extend_from_slice(header.as_bytes());
    for &cell in occupancy.as_slice() {
        out.extend_from_slice(&(cell as i32).to_le_bytes());
    }
    out
}

/// Rejects labels that would escape the bucket directory.
fn validate_label(label: &str) -> Result<(), EnvError> {
    let path = Path::new(label);
    let escapes = label.is_empty()
        || path
            .components()
            .any(|c| !matches!(c, Component::Normal(_)));
    if escapes {
        return Err(EnvError::object(object_key(label), "label must be a relative path"));
    }
    Ok(())
}

/// Bucket stored as a directory `<root>/<bucket>/`.
pub struct FsBucketStore {
    root: PathBuf,
    bucket: String,
}

impl FsBucketStore {
    /// Creates a store; nothing touches the disk until `ensure_bucket`.
    pub fn new(root: impl Into<PathBuf>, bucket: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            bucket: bucket.into(),
        }
    }

    /// Directory backing the bucket.
    pub fn bucket_dir(&self) -> PathBuf {
        self.root.join(&self.bucket)
    }
}

#[async_trait]
impl PatternStore for FsBucketStore {
    async fn ensure_bucket(&self) -> Result<(), EnvError> {
        let dir = self.bucket_dir();
        match tokio::fs::metadata(&dir).await {
            Ok(meta) if meta.is_dir() => Ok(()),
            Ok(_) => Err(EnvError::bucket(&self.bucket, "path exists and is not a directory")),
            Err(_) => {
                tokio::fs::create_dir_all(&dir)
                    .await
                    .map_err(|e| EnvError::bucket(&self.bucket, e))?;
                info!("Created bucket {} at {}", self.bucket, dir.display());
                Ok(())
            }
        }
    }

    async fn put_pattern(&self, label: &str, occupancy: &Occupancy) -> Result<String, EnvError> {
        validate_label(label)?;
        let dir = self.bucket_dir();
        if !tokio::fs::try_exists(&dir).await.unwrap_or(false) {
            return Err(EnvError::unavailable(format!(
                "bucket {} does not exist",
                self.bucket
            )));
        }

        let key = object_key(label);
        let path = dir.join(&key);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| EnvError::object(&key, e))?;
        }
        tokio::fs::write(&path, encode_npy(occupancy))
            .await
            .map_err(|e| EnvError::object(&key, e))?;

        debug!("Wrote {}/{}", self.bucket, key);
        Ok(key)
    }

    fn bucket(&self) -> &str {
        &self.bucket
    }
}

/// In-memory bucket with injectable failures.
pub struct MemoryPatternStore {
    bucket: String,
    created: AtomicBool,
    bucket_failures: AtomicUsize,
    fail_writes: AtomicBool,
    objects: Mutex<HashMap<String, Occupancy>>,
}

impl MemoryPatternStore {
    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            created: AtomicBool::new(false),
            bucket_failures: AtomicUsize::new(0),
            fail_writes: AtomicBool::new(false),
            objects: Mutex::new(HashMap::new()),
        }
    }

    /// Makes the next `n` calls to `ensure_bucket` fail.
    pub fn with_bucket_failures(self, n: usize) -> Self {
        self.bucket_failures.store(n, Ordering::SeqCst);
        self
    }

    /// Makes every `ensure_bucket` call fail, as an unreachable endpoint would.
    pub fn unreachable(bucket: impl Into<String>) -> Self {
        Self::new(bucket).with_bucket_failures(usize::MAX)
    }

    /// Toggles failure of every object write.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn bucket_created(&self) -> bool {
        self.created.load(Ordering::SeqCst)
    }

    /// Stored object keys, sorted.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.lock_objects().keys().cloned().collect();
        keys.sort();
        keys
    }

    /// Returns a stored object.
    pub fn get(&self, key: &str) -> Option<Occupancy> {
        self.lock_objects().get(key).cloned()
    }

    fn lock_objects(&self) -> std::sync::MutexGuard<'_, HashMap<String, Occupancy>> {
        self.objects
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl PatternStore for MemoryPatternStore {
    async fn ensure_bucket(&self) -> Result<(), EnvError> {
        let remaining = self.bucket_failures.load(Ordering::SeqCst);
        if remaining > 0 {
            if remaining != usize::MAX {
                self.bucket_failures.store(remaining - 1, Ordering::SeqCst);
            }
            return Err(EnvError::unavailable("connection refused"));
        }
        self.created.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn put_pattern(&self, label: &str, occupancy: &Occupancy) -> Result<String, EnvError> {
        validate_label(label)?;
        let key = object_key(label);
        if !self.bucket_created() {
            return Err(EnvError::unavailable(format!("bucket {} does not exist", self.bucket)));
        }
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(EnvError::object(&key, "injected write failure"));
        }
        self.lock_objects().insert(key.clone(), occupancy.clone());
        Ok(key)
    }

    fn bucket(&self) -> &str {
        &self.bucket
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Occupancy {
        let mut occ = Occupancy::new(3);
        occ.set_alive(0, 1);
        occ.set_alive(2, 2);
        occ
    }

    #[test]
    fn test_npy_layout() {
        let bytes = encode_npy(&sample());

        assert_eq!(&bytes[..6], NPY_MAGIC);
        assert_eq!(&bytes[6..8], &[1, 0]);

        let header_len = u16::from_le_bytes([bytes[8], bytes[9]]) as usize;
        let data_start = 10 + header_len;
        assert_eq!(data_start % 64, 0);

        let header = std::str::from_utf8(&bytes[10..data_start]).unwrap();
        assert!(header.contains("'descr': '<i4'"));
        assert!(header.contains("'shape': (3, 3)"));
        assert!(header.ends_with('\n'));

        let data = &bytes[data_start..];
        assert_eq!(data.len(), 9 * 4);
        let values: Vec<i32> = data
            .chunks(4)
            .map(|c| i32::from_le_bytes([c[0], c[1], c[2], c[3]]))
            .collect();
        assert_eq!(values, vec![0, 1, 0, 0, 0, 0, 0, 0, 1]);
    }

    #[test]
    fn test_label_validation() {
        assert!(validate_label("run/pattern_block").is_ok());
        assert!(validate_label("../escape").is_err());
        assert!(validate_label("/abs").is_err());
        assert!(validate_label("").is_err());
    }

    #[tokio::test]
    async fn test_fs_store_creates_bucket_and_writes() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsBucketStore::new(dir.path(), DEFAULT_BUCKET);

        // Writing before the bucket exists is a connectivity error
        assert!(matches!(
            store.put_pattern("pattern_block", &sample()).await,
            Err(EnvError::StorageUnavailable(_))
        ));

        store.ensure_bucket().await.unwrap();
        store.ensure_bucket().await.unwrap(); // idempotent

        let key = store.put_pattern("abc123/pattern_block", &sample()).await.unwrap();
        assert_eq!(key, "abc123/pattern_block.npy");

        let written = std::fs::read(store.bucket_dir().join(&key)).unwrap();
        assert_eq!(written, encode_npy(&sample()));
    }

    #[tokio::test]
    async fn test_fs_store_bucket_is_a_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("taken"), b"x").unwrap();
        let store = FsBucketStore::new(dir.path(), "taken");

        assert!(matches!(
            store.ensure_bucket().await,
            Err(EnvError::BucketCreation { .. })
        ));
    }

    #[tokio::test]
    async fn test_memory_store_failures() {
        let store = MemoryPatternStore::new("b").with_bucket_failures(2);
        assert!(store.ensure_bucket().await.is_err());
        assert!(store.ensure_bucket().await.is_err());
        store.ensure_bucket().await.unwrap();

        store.put_pattern("p", &sample()).await.unwrap();
        assert_eq!(store.keys(), vec!["p.npy".to_string()]);

        store.set_fail_writes(true);
        assert!(store.put_pattern("q", &sample()).await.is_err());
        assert_eq!(store.get("p.npy"), Some(sample()));
    }
}
