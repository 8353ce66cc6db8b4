//! # pfx-record
//!
//! The record layer that stores [`pfx_id`] IDs as field values.
//!
//! ## Responsibilities
//!
//! - Resolve each field's prefix once, when the field is bound to a model
//! - Produce fresh prefixed defaults for every new record
//! - Funnel raw assignments through ID construction; pass IDs through
//! - Convert between IDs and their stored strings, failing closed on load
//! - Report form-style validation errors with stable codes
//!
//! The ID types never see a computed prefix: by the time a value reaches
//! `PrefixedId::parse`, its prefix is a plain string.

mod error;
mod field;
mod model;
mod value;

pub use error::{FieldError, ValidationError};
pub use field::{BoundField, DefaultSource, FieldContext, IdField, PrefixSource};
pub use model::{Model, ModelBuilder, Record, Row};
pub use value::{AnyId, FieldInput, FieldScheme};
