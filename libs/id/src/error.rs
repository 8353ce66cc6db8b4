//! Error types for identifier construction, comparison and mutation.

use thiserror::Error;

/// Errors that can occur when constructing, comparing or mutating IDs.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IdError {
    /// The supplied value is not textual.
    #[error("value must be a string, not {found}")]
    TypeMismatch { found: String },

    /// The value does not start with the required prefix.
    #[error("value '{value}' needs expected prefix '{expected}'")]
    PrefixMismatch { expected: String, value: String },

    /// The bare value fails the scheme's validity predicate.
    #[error("value '{value}' does not contain a valid {scheme}")]
    InvalidIdentifier { scheme: &'static str, value: String },

    /// Ordering was requested between IDs with different prefixes.
    #[error("only IDs with the same prefix can be compared: '{left}' vs '{right}'")]
    IncomparablePrefixes { left: String, right: String },

    /// A write was attempted to an ID's internals outside of `cycle`.
    #[error("'{attribute}' of an ID is immutable")]
    ImmutabilityViolation { attribute: String },
}

impl IdError {
    /// Stable machine-readable code for this error.
    ///
    /// These are the codes surfaced by form validation in the record layer.
    pub fn code(&self) -> &'static str {
        match self {
            IdError::TypeMismatch { .. } => "invalid_type",
            IdError::PrefixMismatch { .. } => "invalid_prefix",
            IdError::InvalidIdentifier { .. } => "invalid_id",
            IdError::IncomparablePrefixes { .. } => "incomparable_prefixes",
            IdError::ImmutabilityViolation { .. } => "immutable",
        }
    }

    /// Returns true if this error indicates a prefix mismatch.
    pub fn is_prefix_error(&self) -> bool {
        matches!(self, IdError::PrefixMismatch { .. })
    }

    /// Returns true if the input was rejected during construction.
    pub fn is_construction_error(&self) -> bool {
        matches!(
            self,
            IdError::TypeMismatch { .. }
                | IdError::PrefixMismatch { .. }
                | IdError::InvalidIdentifier { .. }
        )
    }
}
