//! Identifier schemes: what counts as a well-formed bare identifier.
//!
//! A scheme pairs a validity predicate with (optionally) a generator.
//! Schemes are zero-sized marker types used as the type parameter of
//! [`PrefixedId`](crate::PrefixedId), so IDs of different schemes are
//! distinct types.

use crate::cuid;

/// Minimum length of a full-length cuid.
///
/// Shorter "slug" forms are rejected even when they start with `c`.
pub const CUID_MIN_LENGTH: usize = 25;

/// A validity predicate for bare identifiers.
pub trait Scheme: Send + Sync + 'static {
    /// Human-readable scheme name used in error messages.
    const NAME: &'static str;

    /// Returns true if `bare` is acceptable for this scheme.
    fn is_valid(bare: &str) -> bool;
}

/// A scheme that can mint fresh bare identifiers on its own.
pub trait Generate: Scheme {
    /// Produces a fresh bare identifier satisfying [`Scheme::is_valid`].
    fn generate() -> String;
}

/// Collision-resistant cuid identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CuidScheme;

impl Scheme for CuidScheme {
    const NAME: &'static str = "cuid";

    fn is_valid(bare: &str) -> bool {
        is_valid_cuid(bare)
    }
}

impl Generate for CuidScheme {
    fn generate() -> String {
        cuid::generate_cuid()
    }
}

/// Opaque character identifiers. Generation is left to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CharScheme;

impl Scheme for CharScheme {
    const NAME: &'static str = "char id";

    fn is_valid(bare: &str) -> bool {
        is_valid_char_id(bare)
    }
}

/// Checks whether a value is likely to be a valid cuid.
///
/// "Likely" because the format has no hard constraints beyond a leading
/// `c`. Full-length cuids are at least 25 characters; no upper bound is
/// enforced so longer future formats are still accepted.
pub fn is_valid_cuid(value: &str) -> bool {
    value.starts_with('c') && value.chars().count() >= CUID_MIN_LENGTH
}

/// Checks whether a value is an acceptable opaque character ID.
pub fn is_valid_char_id(value: &str) -> bool {
    !value.is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cuid_accepts_full_length() {
        assert!(is_valid_cuid("ckodhg53j000001labr7zezao"));
        assert!(is_valid_cuid("ckodhgdkx000101la536o00xg"));
    }

    #[test]
    fn test_cuid_accepts_longer_values() {
        assert!(is_valid_cuid("ckodhg53j000001labr7zezaoextra"));
    }

    #[test]
    fn test_cuid_rejects_wrong_leading_char() {
        assert!(!is_valid_cuid("dkodhg53j000001labr7zezao"));
        assert!(!is_valid_cuid("Ckodhg53j000001labr7zezao"));
        assert!(!is_valid_cuid("us_ckodhg53j000001labr7zezao"));
    }

    #[test]
    fn test_cuid_rejects_short_values() {
        assert!(!is_valid_cuid("short"));
        assert!(!is_valid_cuid("ckodhg53j000001labr7zeza"));
        assert!(!is_valid_cuid(""));
    }

    #[test]
    fn test_char_id_requires_non_empty() {
        assert!(is_valid_char_id("x"));
        assert!(is_valid_char_id("dev_abc"));
        assert!(!is_valid_char_id(""));
    }

    #[test]
    fn test_scheme_dispatch() {
        assert!(CuidScheme::is_valid("ckodhg53j000001labr7zezao"));
        assert!(!CuidScheme::is_valid("abc"));
        assert!(CharScheme::is_valid("abc"));
    }

    #[test]
    fn test_cuid_scheme_generates_valid_values() {
        for _ in 0..100 {
            assert!(CuidScheme::is_valid(&CuidScheme::generate()));
        }
    }
}
