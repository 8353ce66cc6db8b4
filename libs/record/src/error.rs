//! Error types for the record layer.

use pfx_id::IdError;
use thiserror::Error;

/// Errors raised while binding, assigning, loading or storing ID fields.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FieldError {
    /// The value was rejected by the ID type.
    #[error("{model}.{field}: {error}")]
    Invalid {
        model: String,
        field: String,
        #[source]
        error: IdError,
    },

    /// A null was assigned or stored for a non-nullable field.
    #[error("{model}.{field} cannot be null")]
    Required { model: String, field: String },

    /// An ID of a different scheme was assigned.
    #[error("{model}.{field} holds {expected} IDs, got a {found}")]
    SchemeMismatch {
        model: String,
        field: String,
        expected: &'static str,
        found: &'static str,
    },

    /// `cycle` was requested on a field without any generator.
    #[error("{model}.{field} has no generator to cycle with")]
    NoGenerator { model: String, field: String },

    /// No such field on the model.
    #[error("unknown field '{0}'")]
    UnknownField(String),

    /// Two fields were registered under the same name.
    #[error("field '{field}' is already registered on {model}")]
    DuplicateField { model: String, field: String },
}

impl FieldError {
    /// The underlying ID error, if any.
    pub fn id_error(&self) -> Option<&IdError> {
        match self {
            FieldError::Invalid { error, .. } => Some(error),
            _ => None,
        }
    }
}

/// A user-facing validation failure, as produced by form cleaning.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ValidationError {
    /// Stable code: `invalid_type`, `invalid_prefix`, `invalid_id` or `required`.
    pub code: &'static str,
    pub message: String,
}

impl ValidationError {
    pub fn required() -> Self {
        Self {
            code: "required",
            message: "This field is required.".to_string(),
        }
    }

    /// Renders an ID error for the submitted `value`.
    pub fn from_id_error(error: &IdError, value: &serde_json::Value) -> Self {
        let shown = match value {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        let message = match error {
            IdError::TypeMismatch { .. } => format!("'{shown}' is not a string."),
            IdError::PrefixMismatch { expected, .. } => {
                format!("'{shown}' requires the prefix '{expected}'.")
            }
            IdError::InvalidIdentifier { scheme, .. } => {
                format!("'{shown}' does not contain a valid {scheme} string.")
            }
            other => other.to_string(),
        };

        Self {
            code: error.code(),
            message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_messages() {
        let err = IdError::PrefixMismatch {
            expected: "dev_".to_string(),
            value: "cus_x".to_string(),
        };
        let v = ValidationError::from_id_error(&err, &serde_json::json!("cus_x"));
        assert_eq!(v.code, "invalid_prefix");
        assert_eq!(v.message, "'cus_x' requires the prefix 'dev_'.");

        let err = IdError::TypeMismatch {
            found: "number".to_string(),
        };
        let v = ValidationError::from_id_error(&err, &serde_json::json!(12));
        assert_eq!(v.code, "invalid_type");
        assert_eq!(v.message, "'12' is not a string.");
    }

    #[test]
    fn test_field_error_exposes_id_error() {
        let err = FieldError::Invalid {
            model: "Customer".to_string(),
            field: "id".to_string(),
            error: IdError::ImmutabilityViolation {
                attribute: "prefix".to_string(),
            },
        };
        assert_eq!(err.id_error().map(IdError::code), Some("immutable"));
        assert_eq!(err.to_string(), "Customer.id: 'prefix' of an ID is immutable");
    }
}
