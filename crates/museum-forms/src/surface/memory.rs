// File: src/surface/memory.rs
// Purpose: In-memory surface that records what the pipelines display

use super::{
    AnalyticsEvent, AnalyticsSink, ErrorDisplay, ModalDisplay, NoticeDisplay, NoticeId, Surfaces,
};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Debug, Default)]
struct SurfaceState {
    errors: BTreeMap<String, String>,
    open_modals: HashMap<String, Option<String>>,
    notices: Vec<(NoticeId, String)>,
    next_notice: u64,
    events: Vec<AnalyticsEvent>,
}

/// In-memory page surface
///
/// Implements every collaborator trait and keeps what it was asked to show,
/// so tests and headless embedders can inspect it.
#[derive(Debug, Default)]
pub struct MemorySurface {
    state: Mutex<SurfaceState>,
}

impl MemorySurface {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn state(&self) -> MutexGuard<'_, SurfaceState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Bundle this surface as every collaborator, analytics included when asked.
    pub fn surfaces(self: &Arc<Self>, with_analytics: bool) -> Surfaces {
        let surfaces = Surfaces::new(self.clone(), self.clone(), self.clone());
        if with_analytics {
            surfaces.with_analytics(self.clone())
        } else {
            surfaces
        }
    }

    /// Message currently shown in a field's slot
    pub fn error(&self, field: &str) -> Option<String> {
        self.state().errors.get(field).cloned()
    }

    /// Every field currently flagged, by key
    pub fn errors(&self) -> BTreeMap<String, String> {
        self.state().errors.clone()
    }

    pub fn is_open(&self, modal: &str) -> bool {
        self.state().open_modals.contains_key(modal)
    }

    pub fn modal_body(&self, modal: &str) -> Option<String> {
        self.state().open_modals.get(modal).cloned().flatten()
    }

    /// Escape key / overlay click: close every open modal
    pub fn close_all(&self) {
        self.state().open_modals.clear();
    }

    /// Messages of notices still on screen, oldest first
    pub fn notices(&self) -> Vec<String> {
        self.state()
            .notices
            .iter()
            .map(|(_, message)| message.clone())
            .collect()
    }

    pub fn events(&self) -> Vec<AnalyticsEvent> {
        self.state().events.clone()
    }
}

impl ErrorDisplay for MemorySurface {
    fn show_error(&self, field: &str, message: &str) {
        self.state()
            .errors
            .insert(field.to_string(), message.to_string());
    }

    fn clear_error(&self, field: &str) {
        self.state().errors.remove(field);
    }
}

impl ModalDisplay for MemorySurface {
    fn show(&self, id: &str, body: Option<&str>) {
        let mut state = self.state();
        let entry = state.open_modals.entry(id.to_string()).or_default();
        if let Some(body) = body {
            *entry = Some(body.to_string());
        }
    }

    fn hide(&self, id: &str) {
        self.state().open_modals.remove(id);
    }
}

impl NoticeDisplay for MemorySurface {
    fn show_notice(&self, message: &str) -> NoticeId {
        let mut state = self.state();
        state.next_notice += 1;
        let id = NoticeId(state.next_notice);
        state.notices.push((id, message.to_string()));
        id
    }

    fn dismiss_notice(&self, id: NoticeId) {
        self.state().notices.retain(|(notice, _)| *notice != id);
    }
}

impl AnalyticsSink for MemorySurface {
    fn track(&self, event: AnalyticsEvent) {
        self.state().events.push(event);
    }
}
