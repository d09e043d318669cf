// File: src/pipeline.rs
// Purpose: Form pipeline core shared by the booking and contact forms

use crate::clock::{Clock, LocalClock};
use crate::config::FormsConfig;
use crate::draft::DraftStore;
use crate::form::{FieldKind, FieldState, FieldValue, Form, FormKind, FormSnapshot};
use crate::storage::{create_storage, DraftStorage};
use crate::submission::{SubmitButton, SubmitError, SubmitOutcome, SubmitPhase, Submitter};
use crate::surface::Surfaces;
use crate::validation::{validate_field, validate_form};
use chrono::NaiveDate;
use museum_forms_validation::format_phone;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// Collaborators handed to a pipeline when it is created
#[derive(Clone)]
pub struct PipelineDeps {
    pub storage: Arc<dyn DraftStorage>,
    pub surfaces: Surfaces,
    pub clock: Arc<dyn Clock>,
    /// Defaults to a simulated submitter using the configured delay
    pub submitter: Option<Arc<dyn Submitter>>,
}

impl PipelineDeps {
    pub fn new(storage: Arc<dyn DraftStorage>, surfaces: Surfaces) -> Self {
        Self {
            storage,
            surfaces,
            clock: Arc::new(LocalClock),
            submitter: None,
        }
    }

    /// Build dependencies with the storage backend named in the config
    pub async fn from_config(config: &FormsConfig, surfaces: Surfaces) -> anyhow::Result<Self> {
        let storage = create_storage(&config.drafts.storage).await?;
        Ok(Self::new(storage, surfaces))
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_submitter(mut self, submitter: Arc<dyn Submitter>) -> Self {
        self.submitter = Some(submitter);
        self
    }
}

#[derive(Debug)]
struct ControlState {
    phase: SubmitPhase,
    button: SubmitButton,
}

struct PipelineInner {
    form: Mutex<Form>,
    control: Mutex<ControlState>,
    required: &'static [&'static str],
    consent: &'static str,
    drafts: DraftStore,
    surfaces: Surfaces,
    clock: Arc<dyn Clock>,
    submitter: Arc<dyn Submitter>,
}

/// Validation, draft and submit plumbing for one form.
///
/// Cheap to clone; clones drive the same form.
#[derive(Clone)]
pub(crate) struct FormPipeline {
    inner: Arc<PipelineInner>,
}

/// Parts a pipeline is assembled from
pub(crate) struct PipelineParts {
    pub form: Form,
    pub required: &'static [&'static str],
    pub consent: &'static str,
    pub submit_label: &'static str,
    pub drafts: DraftStore,
    pub submitter: Arc<dyn Submitter>,
}

impl FormPipeline {
    pub fn new(parts: PipelineParts, deps: &PipelineDeps) -> Self {
        Self {
            inner: Arc::new(PipelineInner {
                form: Mutex::new(parts.form),
                control: Mutex::new(ControlState {
                    phase: SubmitPhase::Idle,
                    button: SubmitButton::new(parts.submit_label),
                }),
                required: parts.required,
                consent: parts.consent,
                drafts: parts.drafts,
                surfaces: deps.surfaces.clone(),
                clock: deps.clock.clone(),
                submitter: parts.submitter,
            }),
        }
    }

    pub fn drafts(&self) -> &DraftStore {
        &self.inner.drafts
    }

    pub fn surfaces(&self) -> &Surfaces {
        &self.inner.surfaces
    }

    pub fn today(&self) -> NaiveDate {
        self.inner.clock.today()
    }

    pub async fn form(&self) -> Form {
        self.inner.form.lock().await.clone()
    }

    pub async fn kind(&self) -> FormKind {
        self.inner.form.lock().await.kind()
    }

    pub async fn phase(&self) -> SubmitPhase {
        self.inner.control.lock().await.phase
    }

    pub async fn button(&self) -> SubmitButton {
        self.inner.control.lock().await.button
    }

    pub async fn read<R>(&self, f: impl FnOnce(&Form) -> R) -> R {
        f(&*self.inner.form.lock().await)
    }

    /// Mutate the form without touching the draft
    pub async fn update<R>(&self, f: impl FnOnce(&mut Form) -> R) -> R {
        f(&mut *self.inner.form.lock().await)
    }

    /// Mutate the form and schedule a draft save of the result
    pub async fn edit<R>(&self, f: impl FnOnce(&mut Form) -> R) -> R {
        let mut form = self.inner.form.lock().await;
        let result = f(&mut form);
        self.inner.drafts.schedule_save(form.snapshot());
        result
    }

    /// Restore the saved draft, if any, and hand it back
    pub async fn restore_draft(&self) -> Option<FormSnapshot> {
        let snapshot = self.inner.drafts.load().await?;
        let applied = self.update(|form| form.restore(&snapshot)).await;
        debug!(key = self.inner.drafts.key(), applied, "draft restored");
        Some(snapshot)
    }

    /// Input event: store the value (masking phone numbers), clear the
    /// field's error and schedule a draft save. Returns the stored value.
    pub async fn input(&self, key: &str, value: FieldValue) -> Option<FieldValue> {
        let surfaces = self.inner.surfaces.clone();
        self.edit(|form| {
            let value = match (form.field(key).map(|f| f.kind()), value) {
                (Some(FieldKind::Tel), FieldValue::Text(raw)) => {
                    FieldValue::Text(format_phone(&raw))
                }
                (_, value) => value,
            };

            if !form.set_value(key, value) {
                debug!(form = %form.kind(), field = key, "input ignored");
                return None;
            }
            if let Some(field) = form.field_mut(key) {
                field.set_state(FieldState::Unvalidated);
            }
            surfaces.errors.clear_error(key);
            form.value(key).cloned()
        })
        .await
    }

    /// Blur event: validate the field
    pub async fn blur(&self, key: &str) -> bool {
        let today = self.today();
        let errors = self.inner.surfaces.errors.clone();
        self.update(|form| validate_field(form, key, errors.as_ref(), today))
            .await
    }

    /// Empty a field and flag it with `message`
    pub async fn reject(&self, key: &str, message: &str) {
        let errors = self.inner.surfaces.errors.clone();
        self.edit(|form| {
            form.set_value(key, "");
            if let Some(field) = form.field_mut(key) {
                field.set_state(FieldState::Invalid(message.to_string()));
            }
            errors.show_error(key, message);
        })
        .await;
    }

    /// Run the form validator over the required fields and the consent box
    pub async fn validate(&self) -> bool {
        let today = self.today();
        let errors = self.inner.surfaces.errors.clone();
        let (required, consent) = (self.inner.required, self.inner.consent);
        self.update(|form| validate_form(form, required, consent, errors.as_ref(), today))
            .await
    }

    /// Idle → Validating → (Idle | Submitting).
    ///
    /// On success the button is busy and the captured snapshot is returned.
    pub async fn begin_submit(&self) -> Result<FormSnapshot, SubmitOutcome> {
        {
            let mut control = self.inner.control.lock().await;
            if matches!(control.phase, SubmitPhase::Validating | SubmitPhase::Submitting) {
                return Err(SubmitOutcome::Busy);
            }
            control.phase = SubmitPhase::Validating;
        }

        let valid = self.validate().await;

        let mut control = self.inner.control.lock().await;
        if !valid {
            control.phase = SubmitPhase::Idle;
            return Err(SubmitOutcome::Invalid);
        }

        control.phase = SubmitPhase::Submitting;
        control.button.set_busy(true);
        drop(control);

        Ok(self.read(Form::snapshot).await)
    }

    /// Hand the snapshot to the submitter. On failure the button is restored
    /// and the form returns to idle with its values and draft intact.
    pub async fn deliver(&self, snapshot: &FormSnapshot) -> Result<(), SubmitError> {
        let kind = self.kind().await;
        let result = self.inner.submitter.submit(kind, snapshot).await;

        if let Err(err) = &result {
            warn!(form = %kind, error = %err, "submission failed");
            let mut control = self.inner.control.lock().await;
            control.button.set_busy(false);
            control.phase = SubmitPhase::Idle;
        }

        result
    }

    /// Submitting → Confirmed: reset the form. The button stays busy until
    /// [`FormPipeline::settle`].
    pub async fn complete(&self) {
        self.inner.control.lock().await.phase = SubmitPhase::Confirmed;
        self.update(Form::reset).await;
    }

    /// Confirmed → Idle: restore the button
    pub async fn settle(&self) {
        let mut control = self.inner.control.lock().await;
        control.button.set_busy(false);
        control.phase = SubmitPhase::Idle;
    }
}
