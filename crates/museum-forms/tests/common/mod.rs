// Shared fixtures for the form pipeline integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::NaiveDate;
use museum_forms::{
    DraftStorage, FixedClock, FormKind, FormSnapshot, FormsConfig, MemoryStorage, MemorySurface, PipelineDeps,
    SubmitError, Submitter,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// A Wednesday
pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()
}

/// Tuesday three weeks after [`today`]
pub const OPEN_DAY: &str = "2025-01-21";

/// Monday three weeks after [`today`]
pub const CLOSED_DAY: &str = "2025-01-20";

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

/// Storage, surface and config wired together the same way for every test
pub struct Harness {
    pub config: FormsConfig,
    pub storage: MemoryStorage,
    pub surface: Arc<MemorySurface>,
}

impl Harness {
    pub fn new() -> Self {
        init_tracing();
        Self {
            config: FormsConfig::default(),
            storage: MemoryStorage::new(),
            surface: MemorySurface::new(),
        }
    }

    pub fn deps(&self) -> PipelineDeps {
        PipelineDeps::new(Arc::new(self.storage.clone()), self.surface.surfaces(true))
            .with_clock(Arc::new(FixedClock(today())))
    }

    pub async fn has_draft(&self, key: &str) -> bool {
        self.storage.get(key).await.unwrap().is_some()
    }

    pub fn deps_with(&self, submitter: Arc<dyn Submitter>) -> PipelineDeps {
        self.deps().with_submitter(submitter)
    }
}

/// Records calls and always succeeds
#[derive(Default)]
pub struct CountingSubmitter {
    calls: AtomicUsize,
}

impl CountingSubmitter {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Submitter for CountingSubmitter {
    async fn submit(&self, _kind: FormKind, _snapshot: &FormSnapshot) -> Result<(), SubmitError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Always fails as if the network were down
pub struct OfflineSubmitter;

#[async_trait]
impl Submitter for OfflineSubmitter {
    async fn submit(&self, _kind: FormKind, _snapshot: &FormSnapshot) -> Result<(), SubmitError> {
        Err(SubmitError::Transport("offline".to_string()))
    }
}
