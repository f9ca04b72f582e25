//! Identifier normalization and format checks.

use regex::Regex;

/// Normalize an identifier for lookup/uniqueness checks.
pub(crate) fn normalize_identifier(identifier: &str) -> String {
    identifier.trim().to_lowercase()
}

/// Basic email format check on already-normalized input.
pub(crate) fn valid_identifier(identifier_normalized: &str) -> bool {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$")
        .is_ok_and(|regex| regex.is_match(identifier_normalized))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_identifier_trims_and_lowercases() {
        assert_eq!(
            normalize_identifier(" Alice@Example.COM "),
            "alice@example.com"
        );
    }

    #[test]
    fn valid_identifier_accepts_basic_format() {
        assert!(valid_identifier("a@example.com"));
        assert!(valid_identifier("name.surname@example.co"));
    }

    #[test]
    fn valid_identifier_rejects_missing_parts() {
        assert!(!valid_identifier("not-an-email"));
        assert!(!valid_identifier("missing-at.example.com"));
        assert!(!valid_identifier("missing-domain@"));
        assert!(!valid_identifier(""));
    }
}
