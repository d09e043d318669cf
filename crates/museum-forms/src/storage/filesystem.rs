//! Filesystem draft storage

use crate::config::FilesystemConfig;
use crate::storage::DraftStorage;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::PathBuf;
use tokio::fs;

/// Filesystem storage backend
///
/// Stores each draft as a JSON file named after its key.
/// Persistent across restarts, suitable for a single kiosk or embedder.
#[derive(Clone)]
pub struct FilesystemStorage {
    config: FilesystemConfig,
}

impl FilesystemStorage {
    /// Create a new filesystem storage backend
    pub async fn new(config: FilesystemConfig) -> Result<Self> {
        fs::create_dir_all(&config.path)
            .await
            .context("Failed to create drafts directory")?;

        Ok(Self { config })
    }

    /// Get the file path for a draft key
    fn key_to_path(&self, key: &str) -> PathBuf {
        // Sanitize key to make it filesystem-safe
        let safe_key = key.replace(['/', '\\', ':'], "_");

        self.config.path.join(format!("{}.json", safe_key))
    }
}

#[async_trait]
impl DraftStorage for FilesystemStorage {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.key_to_path(key);

        if !fs::try_exists(&path).await.unwrap_or(false) {
            return Ok(None);
        }

        let content = fs::read_to_string(&path)
            .await
            .context("Failed to read draft file")?;

        Ok(Some(content))
    }

    async fn set(&self, key: &str, record: String) -> Result<()> {
        let path = self.key_to_path(key);

        fs::write(&path, record)
            .await
            .context("Failed to write draft file")?;

        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let path = self.key_to_path(key);

        if fs::try_exists(&path).await.unwrap_or(false) {
            fs::remove_file(&path)
                .await
                .context("Failed to delete draft file")?;
        }

        Ok(())
    }

    fn name(&self) -> &'static str {
        "filesystem"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn config(temp_dir: &TempDir) -> FilesystemConfig {
        FilesystemConfig {
            path: temp_dir.path().to_path_buf(),
        }
    }

    #[tokio::test]
    async fn test_filesystem_storage_basic() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FilesystemStorage::new(config(&temp_dir)).await.unwrap();

        storage
            .set("museum-contact-draft", r#"{"name":"Ana"}"#.to_string())
            .await
            .unwrap();
        assert!(temp_dir.path().join("museum-contact-draft.json").is_file());
        assert_eq!(
            storage.get("museum-contact-draft").await.unwrap().as_deref(),
            Some(r#"{"name":"Ana"}"#)
        );

        storage.delete("museum-contact-draft").await.unwrap();
        assert!(!temp_dir.path().join("museum-contact-draft.json").exists());
        assert!(storage.get("museum-contact-draft").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_filesystem_storage_persistence() {
        let temp_dir = TempDir::new().unwrap();

        {
            let storage = FilesystemStorage::new(config(&temp_dir)).await.unwrap();
            storage.set("draft", "persistent".to_string()).await.unwrap();
        }

        // New instance, as after a page reload
        {
            let storage = FilesystemStorage::new(config(&temp_dir)).await.unwrap();
            assert_eq!(storage.get("draft").await.unwrap().as_deref(), Some("persistent"));
        }
    }

    #[tokio::test]
    async fn test_key_sanitization() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FilesystemStorage::new(config(&temp_dir)).await.unwrap();

        storage.set("site:booking/draft", "x".to_string()).await.unwrap();
        assert!(temp_dir.path().join("site_booking_draft.json").is_file());
        assert_eq!(storage.get("site:booking/draft").await.unwrap().as_deref(), Some("x"));
    }
}
