//! Scheme-erased ID values and assignment inputs.

use std::fmt;

use pfx_id::{CharId, CharScheme, Cuid, CuidScheme, PrefixedId, Scheme};

/// An ID of any supported scheme, as held by a record.
///
/// Equality first compares the scheme, so a cuid and a char ID are never
/// equal even when their prefix and bare value match.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AnyId {
    Cuid(Cuid),
    Char(CharId),
}

impl AnyId {
    pub fn prefix(&self) -> &str {
        match self {
            AnyId::Cuid(id) => id.prefix(),
            AnyId::Char(id) => id.prefix(),
        }
    }

    pub fn bare(&self) -> &str {
        match self {
            AnyId::Cuid(id) => id.bare(),
            AnyId::Char(id) => id.bare(),
        }
    }

    pub fn scheme(&self) -> &'static str {
        match self {
            AnyId::Cuid(id) => id.scheme(),
            AnyId::Char(id) => id.scheme(),
        }
    }

    pub fn as_cuid(&self) -> Option<&Cuid> {
        match self {
            AnyId::Cuid(id) => Some(id),
            AnyId::Char(_) => None,
        }
    }

    pub fn as_char(&self) -> Option<&CharId> {
        match self {
            AnyId::Char(id) => Some(id),
            AnyId::Cuid(_) => None,
        }
    }
}

impl fmt::Display for AnyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnyId::Cuid(id) => fmt::Display::fmt(id, f),
            AnyId::Char(id) => fmt::Display::fmt(id, f),
        }
    }
}

impl serde::Serialize for AnyId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl From<Cuid> for AnyId {
    fn from(id: Cuid) -> Self {
        AnyId::Cuid(id)
    }
}

impl From<CharId> for AnyId {
    fn from(id: CharId) -> Self {
        AnyId::Char(id)
    }
}

/// Schemes that can back a record field.
pub trait FieldScheme: Scheme + fmt::Debug + Clone + Sized {
    /// Generator used for defaults and `cycle` when the field has none.
    fn generator() -> Option<fn() -> String>;

    fn wrap(id: PrefixedId<Self>) -> AnyId;

    /// Recovers the typed ID, handing the value back on a scheme mismatch.
    fn unwrap(id: AnyId) -> Result<PrefixedId<Self>, AnyId>;
}

impl FieldScheme for CuidScheme {
    fn generator() -> Option<fn() -> String> {
        Some(pfx_id::generate_cuid)
    }

    fn wrap(id: PrefixedId<Self>) -> AnyId {
        AnyId::Cuid(id)
    }

    fn unwrap(id: AnyId) -> Result<PrefixedId<Self>, AnyId> {
        match id {
            AnyId::Cuid(id) => Ok(id),
            other => Err(other),
        }
    }
}

impl FieldScheme for CharScheme {
    fn generator() -> Option<fn() -> String> {
        None
    }

    fn wrap(id: PrefixedId<Self>) -> AnyId {
        AnyId::Char(id)
    }

    fn unwrap(id: AnyId) -> Result<PrefixedId<Self>, AnyId> {
        match id {
            AnyId::Char(id) => Ok(id),
            other => Err(other),
        }
    }
}

/// A value assigned to an ID field.
///
/// Raw inputs go through construction; `Id` values pass through as-is.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldInput {
    Null,
    Text(String),
    Id(AnyId),
    /// Any other dynamically typed value; always a type mismatch.
    Raw(serde_json::Value),
}

impl FieldInput {
    pub fn is_null(&self) -> bool {
        matches!(self, FieldInput::Null)
    }
}

impl From<&str> for FieldInput {
    fn from(s: &str) -> Self {
        FieldInput::Text(s.to_string())
    }
}

impl From<String> for FieldInput {
    fn from(s: String) -> Self {
        FieldInput::Text(s)
    }
}

impl From<AnyId> for FieldInput {
    fn from(id: AnyId) -> Self {
        FieldInput::Id(id)
    }
}

impl<S: FieldScheme> From<PrefixedId<S>> for FieldInput {
    fn from(id: PrefixedId<S>) -> Self {
        FieldInput::Id(S::wrap(id))
    }
}

impl<T: Into<FieldInput>> From<Option<T>> for FieldInput {
    fn from(value: Option<T>) -> Self {
        value.map_or(FieldInput::Null, Into::into)
    }
}

impl From<serde_json::Value> for FieldInput {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => FieldInput::Null,
            serde_json::Value::String(s) => FieldInput::Text(s),
            other => FieldInput::Raw(other),
        }
    }
}
