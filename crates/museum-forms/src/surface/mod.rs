// File: src/surface/mod.rs
// Purpose: Page collaborators the pipelines talk to

//! The pipelines never reach into a page directly. Everything they show goes
//! through these traits, so a browser binding, a server-rendered view or the
//! in-memory [`MemorySurface`] can sit behind them.

use serde::Serialize;
use std::sync::Arc;

pub mod memory;

pub use memory::MemorySurface;

/// Per-field error slots
pub trait ErrorDisplay: Send + Sync {
    /// Write `message` into the field's slot and flag its group as erroneous
    fn show_error(&self, field: &str, message: &str);

    /// Empty the field's slot and drop the error flag
    fn clear_error(&self, field: &str);
}

/// Modal dialogs addressed by identifier
pub trait ModalDisplay: Send + Sync {
    /// Open a modal, optionally replacing its body
    fn show(&self, id: &str, body: Option<&str>);

    fn hide(&self, id: &str);
}

/// Handle to an on-screen notice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NoticeId(pub u64);

/// Transient informational notices (toasts)
pub trait NoticeDisplay: Send + Sync {
    fn show_notice(&self, message: &str) -> NoticeId;

    fn dismiss_notice(&self, id: NoticeId);
}

/// Fire-and-forget analytics event
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalyticsEvent {
    pub action: String,
    pub category: String,
    pub label: String,
    pub value: i64,
}

/// External analytics hook; optional
pub trait AnalyticsSink: Send + Sync {
    fn track(&self, event: AnalyticsEvent);
}

/// Everything a pipeline can draw on
#[derive(Clone)]
pub struct Surfaces {
    pub errors: Arc<dyn ErrorDisplay>,
    pub modals: Arc<dyn ModalDisplay>,
    pub notices: Arc<dyn NoticeDisplay>,
    pub analytics: Option<Arc<dyn AnalyticsSink>>,
}

impl Surfaces {
    pub fn new(
        errors: Arc<dyn ErrorDisplay>,
        modals: Arc<dyn ModalDisplay>,
        notices: Arc<dyn NoticeDisplay>,
    ) -> Self {
        Self {
            errors,
            modals,
            notices,
            analytics: None,
        }
    }

    pub fn with_analytics(mut self, sink: Arc<dyn AnalyticsSink>) -> Self {
        self.analytics = Some(sink);
        self
    }

    /// Send an event if a sink is attached; a missing sink is not an error.
    pub fn track(&self, event: AnalyticsEvent) {
        if let Some(sink) = &self.analytics {
            sink.track(event);
        }
    }
}
