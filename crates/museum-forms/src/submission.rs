// File: src/submission.rs
// Purpose: Submission state machine types and the asynchronous submit seam

use crate::booking::BookingSummary;
use crate::form::{FormKind, FormSnapshot};
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Where a form is in its submit cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmitPhase {
    #[default]
    Idle,
    Validating,
    Submitting,
    Confirmed,
}

/// State of a form's submit button
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmitButton {
    pub disabled: bool,
    pub busy: bool,
    idle_label: &'static str,
}

impl SubmitButton {
    pub const BUSY_LABEL: &'static str = "Enviando...";

    pub fn new(idle_label: &'static str) -> Self {
        Self {
            disabled: false,
            busy: false,
            idle_label,
        }
    }

    /// Visible label: the busy indicator while a submission is in flight
    pub fn label(&self) -> &'static str {
        if self.busy {
            Self::BUSY_LABEL
        } else {
            self.idle_label
        }
    }

    pub(crate) fn set_busy(&mut self, busy: bool) {
        self.disabled = busy;
        self.busy = busy;
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error("submission rejected: {0}")]
    Rejected(String),

    #[error("submission could not be delivered: {0}")]
    Transport(String),
}

/// Delivers a validated snapshot.
///
/// This is where a real implementation performs its network call; the busy,
/// disable and re-enable contract around it stays with the pipeline.
#[async_trait]
pub trait Submitter: Send + Sync {
    async fn submit(&self, kind: FormKind, snapshot: &FormSnapshot) -> Result<(), SubmitError>;
}

/// Waits a fixed delay, then reports success
#[derive(Debug, Clone, Copy)]
pub struct SimulatedSubmitter {
    delay: Duration,
}

impl SimulatedSubmitter {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl Submitter for SimulatedSubmitter {
    async fn submit(&self, kind: FormKind, snapshot: &FormSnapshot) -> Result<(), SubmitError> {
        debug!(
            form = %kind,
            fields = snapshot.len(),
            delay_ms = self.delay.as_millis() as u64,
            "simulating submission"
        );
        tokio::time::sleep(self.delay).await;
        Ok(())
    }
}

/// What the user was shown after a successful submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Confirmation {
    Booking(BookingSummary),
    Contact { subject: String },
}

/// Result of one submit attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// At least one field failed; its error slot says why
    Invalid,
    /// A submission is already in flight
    Busy,
    Confirmed(Confirmation),
    /// The submitter failed; the form and its draft are kept
    Failed(SubmitError),
}

impl SubmitOutcome {
    pub fn is_confirmed(&self) -> bool {
        matches!(self, SubmitOutcome::Confirmed(_))
    }
}
