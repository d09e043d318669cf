// File: src/validation/mod.rs
// Purpose: Field and form validation over a live form

use crate::form::{FieldState, Form};
use crate::surface::ErrorDisplay;
use chrono::NaiveDate;
use std::collections::BTreeMap;
use tracing::warn;

/// Result of validation with errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: BTreeMap<String, String>,
}

impl ValidationResult {
    /// Collect the fields currently flagged invalid
    pub fn from_form(form: &Form) -> Self {
        let errors: BTreeMap<String, String> = form
            .fields()
            .iter()
            .filter_map(|f| f.error().map(|e| (f.key().to_string(), e.to_string())))
            .collect();

        Self {
            is_valid: errors.is_empty(),
            errors,
        }
    }

    /// Check if there are any errors
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Get the error for a specific field
    pub fn get_error(&self, field: &str) -> Option<&String> {
        self.errors.get(field)
    }
}

/// Validate one field and update its error slot.
///
/// Fields without a rule are always valid. Returns `false` for unknown keys.
pub fn validate_field(
    form: &mut Form,
    key: &str,
    errors: &dyn ErrorDisplay,
    today: NaiveDate,
) -> bool {
    let kind = form.kind();
    let Some(field) = form.field_mut(key) else {
        warn!(form = %kind, field = key, "validated a field the form does not have");
        return false;
    };

    let outcome = match field.rule() {
        Some(rule) => rule.check(field.value().as_text(), field.value().is_checked(), today),
        None => Ok(()),
    };

    match outcome {
        Ok(()) => {
            field.set_state(FieldState::Valid);
            errors.clear_error(key);
            true
        }
        Err(message) => {
            errors.show_error(key, &message);
            field.set_state(FieldState::Invalid(message));
            false
        }
    }
}

/// Validate every listed field plus the consent box.
///
/// Every field is checked and its slot updated even after an earlier one
/// fails, so one attempt surfaces all problems.
pub fn validate_form(
    form: &mut Form,
    required: &[&str],
    consent: &str,
    errors: &dyn ErrorDisplay,
    today: NaiveDate,
) -> bool {
    let mut is_valid = true;

    for key in required.iter().copied().chain(std::iter::once(consent)) {
        if !validate_field(form, key, errors, today) {
            is_valid = false;
        }
    }

    is_valid
}
