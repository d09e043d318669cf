//! Storage backends for persisted drafts

use crate::config::StorageBackend;
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

pub mod filesystem;
pub mod memory;

pub use filesystem::FilesystemStorage;
pub use memory::MemoryStorage;

/// Key-value store holding serialised drafts as raw text.
///
/// Records are kept as text so a corrupted entry can still be read back and
/// rejected by the draft layer instead of failing in the backend.
#[async_trait]
pub trait DraftStorage: Send + Sync {
    /// Get a record by key
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write a record, replacing any previous one
    async fn set(&self, key: &str, record: String) -> Result<()>;

    /// Delete a record; deleting a missing key is not an error
    async fn delete(&self, key: &str) -> Result<()>;

    /// Get storage backend name
    fn name(&self) -> &'static str;
}

/// Create a storage backend from config
pub async fn create_storage(backend: &StorageBackend) -> Result<Arc<dyn DraftStorage>> {
    match backend {
        StorageBackend::Memory => Ok(Arc::new(MemoryStorage::new())),
        StorageBackend::Filesystem(config) => {
            let storage = FilesystemStorage::new(config.clone()).await?;
            Ok(Arc::new(storage))
        }
    }
}
