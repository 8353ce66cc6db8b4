//! # pfx-id
//!
//! Prefixable identifier value types.
//!
//! ## Design Principles
//!
//! - An ID is a validated bare value plus an optional prefix
//! - The external form is always exactly `prefix + bare`
//! - IDs are immutable; regeneration (`cycle`) is the one explicit write
//! - The prefix is part of identity: equal strings with a different
//!   prefix split are different IDs
//! - Ordering is only defined within a single prefix
//!
//! ## Schemes
//!
//! The scheme type parameter decides what a valid bare value is:
//! - [`CuidScheme`]: starts with `c`, at least 25 chars; generated here
//! - [`CharScheme`]: any non-empty string; callers bring a generator
//!
//! Examples:
//! - `ckodhg53j000001labr7zezao` (cuid, no prefix)
//! - `cus_ckodhg53j000001labr7zezao` (cuid, prefix `cus_`)
//! - `dev_lq2x9k0001` (char ID, prefix `dev_`)

mod cuid;
mod error;
mod macros;
mod prefixed;
mod scheme;

pub use cuid::{generate_cuid, generate_cuid_string};
pub use error::IdError;
pub use prefixed::{sort_ids, CharId, Cuid, PrefixedId};
pub use scheme::{
    is_valid_char_id, is_valid_cuid, CharScheme, CuidScheme, Generate, Scheme, CUID_MIN_LENGTH,
};
