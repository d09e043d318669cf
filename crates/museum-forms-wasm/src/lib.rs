//! Museum Forms WASM
//!
//! WebAssembly bindings for the booking and contact form rules.
//! The page gets the same field messages and phone mask as the native pipelines.

use chrono::NaiveDate;
use museum_forms_validation as core;
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

/// Set panic hook for better error messages in the browser
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Validation error returned to JavaScript
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

/// Picker limits as ISO dates
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct DateBounds {
    pub min: String,
    pub max: String,
}

fn parse_today(today: &str) -> Result<NaiveDate, String> {
    core::parse_iso_date(today).ok_or_else(|| format!("Invalid date for today: {}", today))
}

/// Message for a field value, or `None` when it passes.
/// Fields without a rule always pass.
fn field_error(
    field: &str,
    value: &str,
    checked: bool,
    today: &str,
) -> Result<Option<String>, String> {
    let Some(rule) = core::FieldRule::for_field(field) else {
        return Ok(None);
    };
    Ok(rule.check(value, checked, parse_today(today)?).err())
}

/// Validate a single field by its name
///
/// # Arguments
/// * `field_name` - Field name, e.g. `email` or `date`
/// * `value` - Current text of the control
/// * `checked` - Checkbox state; ignored by text controls
/// * `today` - Local date as `YYYY-MM-DD`
///
/// # Returns
/// Array with at most one validation error (empty if valid)
///
/// # Example (JavaScript)
/// ```javascript
/// const errors = validateField('date', '2025-01-20', false, '2025-01-01');
/// ```
#[wasm_bindgen(js_name = validateField)]
pub fn validate_field(
    field_name: &str,
    value: &str,
    checked: bool,
    today: &str,
) -> Result<JsValue, JsValue> {
    let message =
        field_error(field_name, value, checked, today).map_err(|e| JsValue::from_str(&e))?;

    let errors: Vec<ValidationError> = message
        .map(|message| ValidationError {
            field: field_name.to_string(),
            message,
        })
        .into_iter()
        .collect();

    Ok(serde_wasm_bindgen::to_value(&errors)?)
}

/// Mask a phone number as `(XX) XXXXX-XXXX`
#[wasm_bindgen(js_name = formatPhone)]
pub fn format_phone_js(raw: &str) -> String {
    core::format_phone(raw)
}

/// `YYYY-MM-DD` → `DD/MM/YYYY`
#[wasm_bindgen(js_name = formatDateBr)]
pub fn format_date_br_js(iso: &str) -> String {
    core::format_date_br(iso)
}

/// Quick email validation
#[wasm_bindgen(js_name = isValidEmail)]
pub fn is_valid_email_js(email: &str) -> bool {
    core::is_valid_email(email)
}

/// Whether the museum is closed on an ISO date
#[wasm_bindgen(js_name = isClosedDay)]
pub fn is_closed_day_js(iso: &str) -> bool {
    match core::parse_iso_date(iso) {
        Some(date) => core::is_closed_day(date),
        None => {
            let msg = format!("isClosedDay: invalid date {}", iso);
            web_sys::console::warn_1(&JsValue::from_str(&msg));
            false
        }
    }
}

/// Min and max for the visit date picker
#[wasm_bindgen(js_name = visitDateBounds)]
pub fn visit_date_bounds_js(today: &str, months: u32) -> Result<JsValue, JsValue> {
    let today = parse_today(today).map_err(|e| JsValue::from_str(&e))?;
    let (min, max) = core::visit_date_bounds(today, months);
    let bounds = DateBounds {
        min: min.format("%Y-%m-%d").to_string(),
        max: max.format("%Y-%m-%d").to_string(),
    };
    Ok(serde_wasm_bindgen::to_value(&bounds)?)
}
