//! Email validation

use once_cell::sync::Lazy;
use regex::Regex;

/// Permissive `local@domain.tld` shape: no whitespace anywhere, a single `@`,
/// and at least one `.` after it.
static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
});

pub const EMAIL_INVALID: &str = "Por favor, insira um e-mail válido.";

/// Validates basic email format
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_REGEX.is_match(email)
}

/// Email field rule. The value is expected to be trimmed already.
pub fn validate_email(value: &str) -> Result<(), String> {
    if is_valid_email(value) {
        Ok(())
    } else {
        Err(EMAIL_INVALID.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("a@b.co")]
    #[case("maria@example.com")]
    #[case("test.user@example.co.uk")]
    #[case("user+tag@museu.sp.gov.br")]
    fn test_valid_emails(#[case] email: &str) {
        assert!(is_valid_email(email));
        assert!(validate_email(email).is_ok());
    }

    #[rstest]
    #[case("")]
    #[case("a@b")]
    #[case("a b@c.com")]
    #[case("user@@example.com")]
    #[case("@example.com")]
    #[case("user@")]
    #[case("user@exa mple.com")]
    fn test_invalid_emails(#[case] email: &str) {
        assert!(!is_valid_email(email));
        assert_eq!(validate_email(email).unwrap_err(), EMAIL_INVALID);
    }
}
