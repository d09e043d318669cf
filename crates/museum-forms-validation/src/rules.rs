//! Field identity → rule table
//!
//! Both forms name their controls the same way (`name`, `email`, `phone`, ...),
//! so one table serves the booking and the contact form.

use chrono::NaiveDate;

use crate::date::validate_visit_date;
use crate::email::validate_email;
use crate::phone::validate_phone;
use crate::string::{
    validate_consent, validate_message, validate_name, validate_required, MESSAGE_MAX_CHARS,
    MESSAGE_MIN_CHARS,
};

pub const VISITORS_REQUIRED: &str = "Por favor, selecione o número de visitantes.";
pub const TIME_REQUIRED: &str = "Por favor, selecione um horário.";
pub const SUBJECT_REQUIRED: &str = "Por favor, selecione um assunto.";
pub const TERMS_REQUIRED: &str = "Você deve concordar com os termos de visitação.";
pub const PRIVACY_REQUIRED: &str = "Você deve concordar com a política de privacidade.";

/// What a single field must satisfy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldRule {
    Name,
    Email,
    /// Optional; length-checked when present
    Phone,
    /// Non-empty select, with the message to show when empty
    Required(&'static str),
    /// Booking date: present, in the future, not a closed day
    VisitDate,
    Message { min: usize, max: usize },
    /// Checkbox that must be ticked
    Consent(&'static str),
}

impl FieldRule {
    /// Rule for a field identity, or `None` for fields that are never validated
    /// (visit type, group type, honeypot).
    pub fn for_field(key: &str) -> Option<Self> {
        let rule = match key {
            "name" => Self::Name,
            "email" => Self::Email,
            "phone" => Self::Phone,
            "visitors" => Self::Required(VISITORS_REQUIRED),
            "date" => Self::VisitDate,
            "time" => Self::Required(TIME_REQUIRED),
            "subject" => Self::Required(SUBJECT_REQUIRED),
            "message" => Self::Message {
                min: MESSAGE_MIN_CHARS,
                max: MESSAGE_MAX_CHARS,
            },
            "terms" => Self::Consent(TERMS_REQUIRED),
            "privacy" => Self::Consent(PRIVACY_REQUIRED),
            _ => return None,
        };
        Some(rule)
    }

    /// Applies the rule. `text` is trimmed here; `checked` only matters for
    /// [`FieldRule::Consent`].
    pub fn check(&self, text: &str, checked: bool, today: NaiveDate) -> Result<(), String> {
        let text = text.trim();
        match *self {
            Self::Name => validate_name(text),
            Self::Email => validate_email(text),
            Self::Phone => validate_phone(text),
            Self::Required(message) => validate_required(text, message),
            Self::VisitDate => validate_visit_date(text, today),
            Self::Message { min, max } => validate_message(text, min, max),
            Self::Consent(message) => validate_consent(checked, message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::date::DATE_CLOSED_DAY;
    use crate::string::NAME_TOO_SHORT;
    use pretty_assertions::assert_eq;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()
    }

    #[test]
    fn test_unvalidated_fields() {
        assert_eq!(FieldRule::for_field("visit-type"), None);
        assert_eq!(FieldRule::for_field("group-type"), None);
        assert_eq!(FieldRule::for_field("website"), None);
    }

    #[test]
    fn test_values_are_trimmed() {
        let name = FieldRule::for_field("name").unwrap();
        assert_eq!(name.check("  M  ", false, today()).unwrap_err(), NAME_TOO_SHORT);
        assert!(name.check("  Maria  ", false, today()).is_ok());

        let visitors = FieldRule::for_field("visitors").unwrap();
        assert_eq!(visitors.check("   ", false, today()).unwrap_err(), VISITORS_REQUIRED);
    }

    #[test]
    fn test_consent_uses_checked_state() {
        let terms = FieldRule::for_field("terms").unwrap();
        assert!(terms.check("", true, today()).is_ok());
        assert_eq!(terms.check("on", false, today()).unwrap_err(), TERMS_REQUIRED);
    }

    #[test]
    fn test_date_rule_includes_blackout() {
        let date = FieldRule::for_field("date").unwrap();
        assert_eq!(date.check("2025-01-06", false, today()).unwrap_err(), DATE_CLOSED_DAY);
        assert!(date.check("2025-01-07", false, today()).is_ok());
    }
}
