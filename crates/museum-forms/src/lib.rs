//! # Museum Forms
//!
//! Client-side pipelines for the museum's visit booking and contact forms.
//!
//! ## Features
//!
//! - **Field validation**: per-field rules on blur, full validation on submit
//! - **Draft persistence**: debounced auto-save, restored on the next visit
//! - **Submission control**: busy button, re-entry guard, confirmation and analytics
//! - **Booking helpers**: dependent time slots, closed-day blackout, group advisories
//! - **Contact helpers**: character counter, subject templates, FAQ panel, spam screening
//!
//! ## Example
//!
//! ```rust,no_run
//! use museum_forms::{BookingPipeline, FormsConfig, MemorySurface, PipelineDeps};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = FormsConfig::load_default()?;
//!     let surface = MemorySurface::new();
//!     let deps = PipelineDeps::from_config(&config, surface.surfaces(true)).await?;
//!
//!     let booking = BookingPipeline::init(&config, deps).await;
//!     booking.on_input("name", "Maria Silva").await;
//!     booking.on_blur("name").await;
//!     Ok(())
//! }
//! ```

pub mod booking;
pub mod clock;
pub mod config;
pub mod contact;
pub mod debounce;
pub mod draft;
pub mod form;
pub mod pipeline;
pub mod storage;
pub mod submission;
pub mod surface;
pub mod validation;

pub use booking::{BookingPipeline, BookingSummary, VisitType};
pub use clock::{Clock, FixedClock, LocalClock};
pub use config::{FormsConfig, StorageBackend};
pub use contact::{CharCounter, ContactPipeline, Faq, SubjectChange};
pub use draft::{DraftError, DraftStore};
pub use form::{Field, FieldKind, FieldState, FieldValue, Form, FormKind, FormSnapshot};
pub use pipeline::PipelineDeps;
pub use storage::{DraftStorage, FilesystemStorage, MemoryStorage};
pub use submission::{
    Confirmation, SimulatedSubmitter, SubmitButton, SubmitError, SubmitOutcome, SubmitPhase,
    Submitter,
};
pub use surface::{
    AnalyticsEvent, AnalyticsSink, ErrorDisplay, MemorySurface, ModalDisplay, NoticeDisplay,
    NoticeId, Surfaces,
};
pub use validation::{validate_field, validate_form, ValidationResult};
