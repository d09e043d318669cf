//! Brazilian phone masking and the phone field rule

/// Shortest fully-masked number: `(##) ####-####`.
pub const PHONE_MIN_MASKED_LEN: usize = 14;
pub const PHONE_MAX_DIGITS: usize = 11;
pub const PHONE_INVALID: &str = "Por favor, insira um telefone válido.";

/// Masks raw input as the user types.
///
/// Non-digits are dropped and at most eleven digits are kept:
/// - 11 digits: `(XX) XXXXX-XXXX`
/// - 7 to 10 digits: `(XX) XXXX-X…`
/// - 3 to 6 digits: `(XX) X…`
/// - fewer: the bare digits
///
/// Formatting an already-masked value yields the same string.
pub fn format_phone(raw: &str) -> String {
    let digits: String = raw
        .chars()
        .filter(char::is_ascii_digit)
        .take(PHONE_MAX_DIGITS)
        .collect();

    match digits.len() {
        11 => format!("({}) {}-{}", &digits[..2], &digits[2..7], &digits[7..]),
        7..=10 => format!("({}) {}-{}", &digits[..2], &digits[2..6], &digits[6..]),
        3..=6 => format!("({}) {}", &digits[..2], &digits[2..]),
        _ => digits,
    }
}

/// Phone is optional: empty passes, anything else must be fully masked.
///
/// Only the length is checked; `(##) ####-####` style punctuation is assumed to
/// come from [`format_phone`].
pub fn validate_phone(value: &str) -> Result<(), String> {
    if !value.is_empty() && value.chars().count() < PHONE_MIN_MASKED_LEN {
        Err(PHONE_INVALID.to_string())
    } else {
        Ok(())
    }
}
