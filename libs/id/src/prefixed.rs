//! The prefixed identifier value type.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

use crate::scheme::{CharScheme, CuidScheme, Generate, Scheme};
use crate::IdError;

/// A prefixed cuid, e.g. `cus_ckodhg53j000001labr7zezao`.
pub type Cuid = PrefixedId<CuidScheme>;

/// A prefixed opaque character ID, e.g. `dev_lq2x9k0001`.
pub type CharId = PrefixedId<CharScheme>;

/// An immutable identifier made of an optional prefix and a bare value
/// that is valid for the scheme `S`.
///
/// The external representation is always exactly `prefix + bare`.
/// Fields are only readable; [`cycle`](Self::cycle) and its variants are
/// the sole way to change an existing ID, and they never touch the prefix.
///
/// `cycle` takes `&mut self`, so concurrent readers and a regenerating
/// writer cannot coexist without the caller arranging exclusive access.
pub struct PrefixedId<S: Scheme> {
    bare: String,
    prefix: String,
    scheme: PhantomData<fn() -> S>,
}

impl<S: Scheme> PrefixedId<S> {
    /// Parses a full value, checking and stripping `prefix`.
    ///
    /// With an empty prefix the whole value is the bare identifier.
    pub fn parse(value: &str, prefix: &str) -> Result<Self, IdError> {
        let Some(bare) = value.strip_prefix(prefix) else {
            return Err(IdError::PrefixMismatch {
                expected: prefix.to_string(),
                value: value.to_string(),
            });
        };

        Self::from_parts(prefix, bare)
    }

    /// Constructs from a dynamically typed value.
    ///
    /// Only JSON strings are accepted; anything else is a
    /// [`IdError::TypeMismatch`].
    pub fn from_json(value: &serde_json::Value, prefix: &str) -> Result<Self, IdError> {
        match value {
            serde_json::Value::String(s) => Self::parse(s, prefix),
            other => Err(IdError::TypeMismatch {
                found: json_kind(other).to_string(),
            }),
        }
    }

    /// Builds an ID from an already separated prefix and bare value.
    pub fn from_parts(prefix: impl Into<String>, bare: impl Into<String>) -> Result<Self, IdError> {
        let bare = bare.into();
        if !S::is_valid(&bare) {
            return Err(IdError::InvalidIdentifier {
                scheme: S::NAME,
                value: bare,
            });
        }

        Ok(Self {
            bare,
            prefix: prefix.into(),
            scheme: PhantomData,
        })
    }

    /// The identifier without its prefix.
    pub fn bare(&self) -> &str {
        &self.bare
    }

    /// The prefix, possibly empty.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Name of the scheme this ID is validated against.
    pub fn scheme(&self) -> &'static str {
        S::NAME
    }

    /// Re-checks the bare value against the scheme.
    ///
    /// Always true for IDs built through `parse`/`from_parts`; may be
    /// false after [`cycle_with`](Self::cycle_with) was handed a
    /// generator producing invalid output.
    pub fn is_valid(&self) -> bool {
        S::is_valid(&self.bare)
    }

    /// Splits into `(prefix, bare)`.
    pub fn into_parts(self) -> (String, String) {
        (self.prefix, self.bare)
    }

    /// Compares two IDs by bare value.
    ///
    /// IDs are only ordered within a single prefix; comparing across
    /// prefixes is an error rather than an arbitrary answer.
    pub fn try_cmp(&self, other: &Self) -> Result<Ordering, IdError> {
        if self.prefix != other.prefix {
            return Err(IdError::IncomparablePrefixes {
                left: self.prefix.clone(),
                right: other.prefix.clone(),
            });
        }

        Ok(self.bare.cmp(&other.bare))
    }

    /// Replaces the bare value with the output of `generator`.
    ///
    /// The generator must return a bare value (no prefix). Its output is
    /// trusted: an invalid value is stored anyway and only logged. Use
    /// [`try_cycle_with`](Self::try_cycle_with) to reject it instead.
    pub fn cycle_with<F>(&mut self, generator: F)
    where
        F: FnOnce() -> String,
    {
        let bare = generator();
        if !S::is_valid(&bare) {
            tracing::warn!(
                scheme = S::NAME,
                prefix = %self.prefix,
                value = %bare,
                "cycled ID holds an invalid bare value"
            );
        }
        self.bare = bare;
    }

    /// Like [`cycle_with`](Self::cycle_with) but validates the new value.
    ///
    /// On failure the ID is left unchanged.
    pub fn try_cycle_with<F>(&mut self, generator: F) -> Result<(), IdError>
    where
        F: FnOnce() -> String,
    {
        let bare = generator();
        if !S::is_valid(&bare) {
            return Err(IdError::InvalidIdentifier {
                scheme: S::NAME,
                value: bare,
            });
        }
        self.bare = bare;
        Ok(())
    }
}

impl<S: Generate> PrefixedId<S> {
    /// Mints a fresh ID with the given prefix.
    pub fn generate(prefix: impl Into<String>) -> Self {
        let bare = S::generate();
        debug_assert!(S::is_valid(&bare), "generator produced invalid {}", S::NAME);
        Self {
            bare,
            prefix: prefix.into(),
            scheme: PhantomData,
        }
    }

    /// Replaces the bare value with a freshly generated one.
    pub fn cycle(&mut self) {
        self.cycle_with(S::generate);
    }
}

/// Sorts IDs by bare value.
///
/// Fails with [`IdError::IncomparablePrefixes`] if the slice mixes
/// prefixes, in which case the slice is left in its original order.
pub fn sort_ids<S: Scheme>(ids: &mut [PrefixedId<S>]) -> Result<(), IdError> {
    if let Some(first) = ids.first() {
        if let Some(odd) = ids.iter().find(|id| id.prefix != first.prefix) {
            return Err(IdError::IncomparablePrefixes {
                left: first.prefix.clone(),
                right: odd.prefix.clone(),
            });
        }
    }

    ids.sort_by(|a, b| a.bare.cmp(&b.bare));
    Ok(())
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

// Manual impls: derives would put bounds on `S`, which is only a marker.

impl<S: Scheme> Clone for PrefixedId<S> {
    fn clone(&self) -> Self {
        Self {
            bare: self.bare.clone(),
            prefix: self.prefix.clone(),
            scheme: PhantomData,
        }
    }
}

impl<S: Scheme> PartialEq for PrefixedId<S> {
    fn eq(&self, other: &Self) -> bool {
        self.prefix == other.prefix && self.bare == other.bare
    }
}

impl<S: Scheme> Eq for PrefixedId<S> {}

impl<S: Scheme> Hash for PrefixedId<S> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.prefix.hash(state);
        self.bare.hash(state);
    }
}

impl<S: Scheme> fmt::Debug for PrefixedId<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrefixedId")
            .field("scheme", &S::NAME)
            .field("prefix", &self.prefix)
            .field("bare", &self.bare)
            .finish()
    }
}

impl<S: Scheme> fmt::Display for PrefixedId<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.prefix, self.bare)
    }
}

impl<S: Scheme> serde::Serialize for PrefixedId<S> {
    fn serialize<Ser>(&self, serializer: Ser) -> Result<Ser::Ok, Ser::Error>
    where
        Ser: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}
