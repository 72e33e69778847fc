use crate::infrastructure::error::StorageError;
use std::path::Path;
use std::time::Duration;

/// Remote object storage. The bucket is fixed when the implementation is built.
#[cfg_attr(test, mockall::automock)]
pub trait ObjectStorage: Send + Sync {
    fn upload(&self, local_path: &Path, key: &str) -> Result<(), StorageError>;

    fn presign_get(&self, key: &str, ttl: Duration) -> Result<String, StorageError>;
}
