// File: src/draft.rs
// Purpose: Debounced persistence and restoration of form drafts

use crate::debounce::Debouncer;
use crate::form::FormSnapshot;
use crate::storage::DraftStorage;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum DraftError {
    #[error("draft storage failed: {0:#}")]
    Storage(#[from] anyhow::Error),

    #[error("malformed draft record: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Draft persistence for one form.
///
/// Every form kind gets its own key, so writes replace the previous draft and
/// two forms never touch each other's record. Clones share the pending save.
#[derive(Clone)]
pub struct DraftStore {
    storage: Arc<dyn DraftStorage>,
    key: Arc<str>,
    debouncer: Arc<Debouncer>,
}

impl DraftStore {
    pub fn new(
        storage: Arc<dyn DraftStorage>,
        key: impl Into<String>,
        debounce: Duration,
    ) -> Self {
        Self {
            storage,
            key: Arc::from(key.into()),
            debouncer: Arc::new(Debouncer::new(debounce)),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Write a snapshot now
    pub async fn save(&self, snapshot: &FormSnapshot) -> Result<(), DraftError> {
        let record = serde_json::to_string(snapshot)?;
        self.storage.set(&self.key, record).await?;
        debug!(key = %self.key, fields = snapshot.len(), "draft saved");
        Ok(())
    }

    /// Write a snapshot once input has been quiet for the debounce window.
    /// A newer call supersedes a pending one.
    pub fn schedule_save(&self, snapshot: FormSnapshot) {
        let store = self.clone();
        self.debouncer.schedule(async move {
            if let Err(err) = store.save(&snapshot).await {
                warn!(key = %store.key, error = %err, "failed to save draft");
            }
        });
    }

    /// Drop a pending save without touching the stored draft.
    /// Returns whether one was still waiting.
    pub fn cancel_pending(&self) -> bool {
        self.debouncer.cancel()
    }

    pub fn has_pending_save(&self) -> bool {
        self.debouncer.is_pending()
    }

    /// Read the stored draft, reporting why it could not be used
    pub async fn try_load(&self) -> Result<Option<FormSnapshot>, DraftError> {
        match self.storage.get(&self.key).await? {
            Some(record) => Ok(Some(serde_json::from_str(&record)?)),
            None => Ok(None),
        }
    }

    /// Read the stored draft. Unreadable or malformed records count as no draft.
    pub async fn load(&self) -> Option<FormSnapshot> {
        match self.try_load().await {
            Ok(snapshot) => snapshot,
            Err(err) => {
                warn!(key = %self.key, error = %err, "ignoring saved draft");
                None
            }
        }
    }

    /// Drop any pending save and delete the stored draft
    pub async fn clear(&self) -> Result<(), DraftError> {
        self.debouncer.cancel();
        self.storage.delete(&self.key).await?;
        debug!(key = %self.key, "draft cleared");
        Ok(())
    }

    /// Delete the stored draft at `deadline`, in the background
    pub fn clear_at(&self, deadline: Instant) -> JoinHandle<()> {
        let store = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;
            match store.storage.delete(&store.key).await {
                Ok(()) => debug!(key = %store.key, "draft cleared"),
                Err(err) => warn!(key = %store.key, error = %err, "failed to clear draft"),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::FieldValue;
    use crate::storage::MemoryStorage;
    use pretty_assertions::assert_eq;

    const KEY: &str = "museum-booking-draft";

    fn store(storage: &MemoryStorage) -> DraftStore {
        DraftStore::new(Arc::new(storage.clone()), KEY, Duration::from_millis(1000))
    }

    fn snapshot(name: &str) -> FormSnapshot {
        FormSnapshot::from_pairs([
            ("name", FieldValue::from(name)),
            ("terms", FieldValue::from(true)),
        ])
    }

    #[tokio::test]
    async fn test_save_load_clear() {
        let storage = MemoryStorage::new();
        let drafts = store(&storage);

        drafts.save(&snapshot("Maria")).await.unwrap();
        assert_eq!(
            storage.get(KEY).await.unwrap().as_deref(),
            Some(r#"{"name":"Maria","terms":true}"#)
        );
        assert_eq!(drafts.load().await, Some(snapshot("Maria")));

        drafts.clear().await.unwrap();
        assert_eq!(drafts.load().await, None);
    }

    #[tokio::test]
    async fn test_malformed_draft_is_ignored() {
        let storage = MemoryStorage::new();
        let drafts = store(&storage);

        for record in ["{not json", r#"["name"]"#, r#"{"visitors":2}"#] {
            storage.set(KEY, record.to_string()).await.unwrap();
            assert!(matches!(drafts.try_load().await, Err(DraftError::Malformed(_))));
            assert_eq!(drafts.load().await, None);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_schedule_save_is_debounced() {
        let storage = MemoryStorage::new();
        let drafts = store(&storage);

        drafts.schedule_save(snapshot("M"));
        tokio::time::sleep(Duration::from_millis(400)).await;
        drafts.schedule_save(snapshot("Ma"));
        tokio::time::sleep(Duration::from_millis(400)).await;
        drafts.schedule_save(snapshot("Maria"));

        tokio::time::sleep(Duration::from_millis(900)).await;
        assert!(drafts.has_pending_save());
        assert!(storage.get(KEY).await.unwrap().is_none());

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(!drafts.has_pending_save());
        assert_eq!(drafts.load().await, Some(snapshot("Maria")));
    }

    #[tokio::test(start_paused = true)]
    async fn test_clear_cancels_pending_save() {
        let storage = MemoryStorage::new();
        let drafts = store(&storage);

        drafts.schedule_save(snapshot("Maria"));
        drafts.clear().await.unwrap();

        tokio::time::sleep(Duration::from_millis(2000)).await;
        assert!(storage.get(KEY).await.unwrap().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_pending_keeps_stored_draft() {
        let storage = MemoryStorage::new();
        let drafts = store(&storage);
        drafts.save(&snapshot("Ana")).await.unwrap();

        drafts.schedule_save(snapshot("Maria"));
        assert!(drafts.cancel_pending());
        assert!(!drafts.cancel_pending());

        tokio::time::sleep(Duration::from_millis(2000)).await;
        assert_eq!(drafts.load().await, Some(snapshot("Ana")));
    }

    #[tokio::test(start_paused = true)]
    async fn test_clear_at_deadline() {
        let storage = MemoryStorage::new();
        let drafts = store(&storage);
        drafts.save(&snapshot("Ana")).await.unwrap();

        let task = drafts.clear_at(Instant::now() + Duration::from_millis(500));
        tokio::time::sleep(Duration::from_millis(499)).await;
        assert!(storage.get(KEY).await.unwrap().is_some());

        task.await.unwrap();
        assert!(storage.get(KEY).await.unwrap().is_none());
    }
}
