//! Text field rules: names, required selects, consent boxes and free text

use once_cell::sync::Lazy;
use regex::Regex;

/// Letters from any script (accented Latin included) and whitespace.
static NAME_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\p{L}\s]+$").expect("name pattern is valid"));

pub const NAME_MIN_CHARS: usize = 2;
pub const NAME_TOO_SHORT: &str = "Nome deve ter pelo menos 2 caracteres.";
pub const NAME_INVALID_CHARS: &str = "Nome deve conter apenas letras e espaços.";

pub const MESSAGE_MIN_CHARS: usize = 10;
pub const MESSAGE_MAX_CHARS: usize = 1000;

/// Length in characters, not bytes, so "Zoé" counts as three.
pub fn char_len(s: &str) -> usize {
    s.chars().count()
}

pub fn is_valid_name(name: &str) -> bool {
    validate_name(name).is_ok()
}

/// Name rule: at least two characters, then letters and spaces only.
///
/// The character-set check only runs once the length check has passed, so a
/// one-character name always reports the length message.
pub fn validate_name(value: &str) -> Result<(), String> {
    if char_len(value) < NAME_MIN_CHARS {
        return Err(NAME_TOO_SHORT.to_string());
    }
    if !NAME_REGEX.is_match(value) {
        return Err(NAME_INVALID_CHARS.to_string());
    }
    Ok(())
}

/// Required select: any non-empty choice passes.
pub fn validate_required(value: &str, message: &str) -> Result<(), String> {
    if value.is_empty() {
        Err(message.to_string())
    } else {
        Ok(())
    }
}

/// Consent checkbox: must be checked.
pub fn validate_consent(checked: bool, message: &str) -> Result<(), String> {
    if checked {
        Ok(())
    } else {
        Err(message.to_string())
    }
}

/// Free-text rule with inclusive character bounds.
pub fn validate_message(value: &str, min: usize, max: usize) -> Result<(), String> {
    let len = char_len(value);
    if len < min {
        Err(format!("Mensagem deve ter pelo menos {} caracteres.", min))
    } else if len > max {
        Err(format!("Mensagem deve ter no máximo {} caracteres.", max))
    } else {
        Ok(())
    }
}
