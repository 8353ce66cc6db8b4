//! ID field configuration and the conversions a bound field performs.
//!
//! An [`IdField`] is declared without knowing its owner. Binding it to a
//! model resolves the prefix to a plain string, producing a
//! [`BoundField`] which handles defaults, assignment coercion, storage
//! conversion and form cleaning.

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use pfx_id::{IdError, PrefixedId};
use tracing::{debug, warn};

use crate::error::{FieldError, ValidationError};
use crate::value::{AnyId, FieldInput, FieldScheme};

/// Where a field is being registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldContext<'a> {
    pub model: &'a str,
    pub field: &'a str,
}

type PrefixFn = dyn Fn(&FieldContext<'_>) -> String + Send + Sync;
type GeneratorFn = dyn Fn() -> String + Send + Sync;

/// A prefix given literally or computed from the owning model.
#[derive(Clone)]
pub enum PrefixSource {
    Literal(String),
    Computed(Arc<PrefixFn>),
}

impl PrefixSource {
    pub fn computed<F>(f: F) -> Self
    where
        F: Fn(&FieldContext<'_>) -> String + Send + Sync + 'static,
    {
        PrefixSource::Computed(Arc::new(f))
    }

    /// Resolves to the literal prefix for `ctx`.
    pub fn resolve(&self, ctx: &FieldContext<'_>) -> String {
        match self {
            PrefixSource::Literal(prefix) => prefix.clone(),
            PrefixSource::Computed(f) => f(ctx),
        }
    }
}

impl Default for PrefixSource {
    fn default() -> Self {
        PrefixSource::Literal(String::new())
    }
}

impl From<&str> for PrefixSource {
    fn from(prefix: &str) -> Self {
        PrefixSource::Literal(prefix.to_string())
    }
}

impl From<String> for PrefixSource {
    fn from(prefix: String) -> Self {
        PrefixSource::Literal(prefix)
    }
}

impl fmt::Debug for PrefixSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrefixSource::Literal(prefix) => f.debug_tuple("Literal").field(prefix).finish(),
            PrefixSource::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

/// How a field obtains the bare part of its default value.
#[derive(Clone, Default)]
pub enum DefaultSource {
    #[default]
    None,
    Static(String),
    Generator(Arc<GeneratorFn>),
}

impl DefaultSource {
    pub fn generator<F>(f: F) -> Self
    where
        F: Fn() -> String + Send + Sync + 'static,
    {
        DefaultSource::Generator(Arc::new(f))
    }

    fn produce(&self) -> Option<String> {
        match self {
            DefaultSource::None => None,
            DefaultSource::Static(value) => Some(value.clone()),
            DefaultSource::Generator(f) => Some(f()),
        }
    }
}

impl fmt::Debug for DefaultSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DefaultSource::None => f.write_str("None"),
            DefaultSource::Static(value) => f.debug_tuple("Static").field(value).finish(),
            DefaultSource::Generator(_) => f.write_str("Generator(..)"),
        }
    }
}

/// An unbound ID field declaration.
///
/// Fields backed by a generating scheme default to that generator; others
/// start without a default.
#[derive(Debug, Clone)]
pub struct IdField<S: FieldScheme> {
    prefix: PrefixSource,
    default: DefaultSource,
    nullable: bool,
    scheme: PhantomData<fn() -> S>,
}

impl<S: FieldScheme> IdField<S> {
    pub fn new() -> Self {
        let default = match S::generator() {
            Some(generate) => DefaultSource::generator(generate),
            None => DefaultSource::None,
        };

        Self {
            prefix: PrefixSource::default(),
            default,
            nullable: false,
            scheme: PhantomData,
        }
    }

    #[must_use]
    pub fn prefix(mut self, prefix: impl Into<PrefixSource>) -> Self {
        self.prefix = prefix.into();
        self
    }

    #[must_use]
    pub fn with_default(mut self, default: DefaultSource) -> Self {
        self.default = default;
        self
    }

    #[must_use]
    pub fn no_default(self) -> Self {
        self.with_default(DefaultSource::None)
    }

    #[must_use]
    pub fn nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    /// Registers the field against a model, resolving its prefix.
    pub fn bind(self, ctx: &FieldContext<'_>) -> BoundField<S> {
        let prefix = self.prefix.resolve(ctx);
        debug!(model = ctx.model, field = ctx.field, prefix = %prefix, scheme = S::NAME, "bound ID field");

        BoundField {
            model: ctx.model.to_string(),
            name: ctx.field.to_string(),
            prefix,
            default: self.default,
            nullable: self.nullable,
            scheme: PhantomData,
        }
    }
}

impl<S: FieldScheme> Default for IdField<S> {
    fn default() -> Self {
        Self::new()
    }
}

/// An ID field registered on a model, with its prefix resolved.
#[derive(Debug, Clone)]
pub struct BoundField<S: FieldScheme> {
    model: String,
    name: String,
    prefix: String,
    default: DefaultSource,
    nullable: bool,
    scheme: PhantomData<fn() -> S>,
}

impl<S: FieldScheme> BoundField<S> {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    /// A fresh prefixed default string, or `None` without a default.
    ///
    /// Evaluated on every call so each record gets its own value.
    pub fn default_value(&self) -> Option<String> {
        self.default
            .produce()
            .map(|bare| format!("{}{bare}", self.prefix))
    }

    /// The default value, constructed as an ID.
    pub fn default_id(&self) -> Result<Option<PrefixedId<S>>, FieldError> {
        self.default_value()
            .map(|value| PrefixedId::parse(&value, &self.prefix).map_err(|e| self.invalid(e)))
            .transpose()
    }

    /// Constructs an ID from a stored value. Fails closed.
    pub fn from_db_value(&self, raw: Option<&str>) -> Result<Option<PrefixedId<S>>, FieldError> {
        let Some(raw) = raw else {
            return self.null();
        };

        PrefixedId::parse(raw, &self.prefix)
            .map(Some)
            .map_err(|e| {
                warn!(model = %self.model, field = %self.name, value = raw, error = %e, "stored ID rejected");
                self.invalid(e)
            })
    }

    /// The string to store for `value`.
    pub fn to_db_value(&self, value: Option<&PrefixedId<S>>) -> Option<String> {
        value.map(ToString::to_string)
    }

    /// Prepares a value for use as a query parameter.
    ///
    /// Null and the empty string map to `None`; IDs of this field's scheme
    /// are stringified as-is; anything else must construct successfully
    /// with this field's prefix.
    pub fn prep_value(&self, input: FieldInput) -> Result<Option<String>, FieldError> {
        match input {
            FieldInput::Null => Ok(None),
            FieldInput::Text(s) if s.is_empty() => Ok(None),
            FieldInput::Id(id) => Ok(Some(self.unwrap_id(id)?.to_string())),
            other => Ok(self.coerce(other)?.map(|id| id.to_string())),
        }
    }

    /// Turns an assigned value into the ID the field holds.
    ///
    /// Existing IDs are passed through unchanged; raw values are
    /// constructed with this field's prefix.
    pub fn coerce(&self, input: FieldInput) -> Result<Option<PrefixedId<S>>, FieldError> {
        let id = match input {
            FieldInput::Null => return self.null(),
            FieldInput::Id(id) => self.unwrap_id(id)?,
            FieldInput::Text(s) => PrefixedId::parse(&s, &self.prefix).map_err(|e| self.invalid(e))?,
            FieldInput::Raw(value) => {
                PrefixedId::from_json(&value, &self.prefix).map_err(|e| self.invalid(e))?
            }
        };

        debug!(model = %self.model, field = %self.name, id = %id, "coerced ID");
        Ok(Some(id))
    }

    /// Validates submitted form data for this field.
    pub fn clean(&self, value: &serde_json::Value) -> Result<Option<PrefixedId<S>>, ValidationError> {
        let blank = match value {
            serde_json::Value::Null => true,
            serde_json::Value::String(s) => s.is_empty(),
            _ => false,
        };
        if blank {
            return if self.nullable {
                Ok(None)
            } else {
                Err(ValidationError::required())
            };
        }

        PrefixedId::from_json(value, &self.prefix)
            .map(Some)
            .map_err(|e| ValidationError::from_id_error(&e, value))
    }

    /// Regenerates `id` in place with the scheme's or the field's generator.
    pub fn cycle(&self, id: &mut PrefixedId<S>) -> Result<(), FieldError> {
        if let Some(generate) = S::generator() {
            id.cycle_with(generate);
            return Ok(());
        }

        match &self.default {
            DefaultSource::Generator(generate) => {
                id.cycle_with(|| generate());
                Ok(())
            }
            _ => Err(FieldError::NoGenerator {
                model: self.model.clone(),
                field: self.name.clone(),
            }),
        }
    }

    fn unwrap_id(&self, id: AnyId) -> Result<PrefixedId<S>, FieldError> {
        S::unwrap(id).map_err(|other| FieldError::SchemeMismatch {
            model: self.model.clone(),
            field: self.name.clone(),
            expected: S::NAME,
            found: other.scheme(),
        })
    }

    fn null<T>(&self) -> Result<Option<T>, FieldError> {
        if self.nullable {
            Ok(None)
        } else {
            Err(FieldError::Required {
                model: self.model.clone(),
                field: self.name.clone(),
            })
        }
    }

    fn invalid(&self, error: IdError) -> FieldError {
        FieldError::Invalid {
            model: self.model.clone(),
            field: self.name.clone(),
            error,
        }
    }
}

/// Object-safe view of a bound field, used by [`Model`](crate::Model) to
/// hold fields of different schemes side by side.
pub(crate) trait Column: fmt::Debug + Send + Sync {
    fn name(&self) -> &str;
    fn prefix(&self) -> &str;
    fn scheme(&self) -> &'static str;
    fn nullable(&self) -> bool;
    fn default_any(&self) -> Result<Option<AnyId>, FieldError>;
    fn coerce_any(&self, input: FieldInput) -> Result<Option<AnyId>, FieldError>;
    fn from_db_any(&self, raw: Option<&str>) -> Result<Option<AnyId>, FieldError>;
    fn cycle_any(&self, id: AnyId) -> Result<AnyId, FieldError>;
}

impl<S: FieldScheme> Column for BoundField<S> {
    fn name(&self) -> &str {
        &self.name
    }

    fn prefix(&self) -> &str {
        &self.prefix
    }

    fn scheme(&self) -> &'static str {
        S::NAME
    }

    fn nullable(&self) -> bool {
        self.nullable
    }

    fn default_any(&self) -> Result<Option<AnyId>, FieldError> {
        Ok(self.default_id()?.map(S::wrap))
    }

    fn coerce_any(&self, input: FieldInput) -> Result<Option<AnyId>, FieldError> {
        Ok(self.coerce(input)?.map(S::wrap))
    }

    fn from_db_any(&self, raw: Option<&str>) -> Result<Option<AnyId>, FieldError> {
        Ok(self.from_db_value(raw)?.map(S::wrap))
    }

    fn cycle_any(&self, id: AnyId) -> Result<AnyId, FieldError> {
        let mut id = self.unwrap_id(id)?;
        self.cycle(&mut id)?;
        Ok(S::wrap(id))
    }
}

#[cfg(test)]
mod tests {
    use pfx_id::{is_valid_cuid, CharId, CharScheme, Cuid, CuidScheme};

    use super::*;

    const CTX: FieldContext<'static> = FieldContext {
        model: "Customer",
        field: "id",
    };

    fn test_uid() -> String {
        use std::sync::atomic::{AtomicU32, Ordering};
        static COUNTER: AtomicU32 = AtomicU32::new(0);
        format!("uid{:05}", COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    #[test]
    fn test_literal_prefix_resolves() {
        let field = IdField::<CuidScheme>::new().prefix("cus_").bind(&CTX);
        assert_eq!(field.prefix(), "cus_");
        assert_eq!(field.name(), "id");
        assert_eq!(field.model(), "Customer");
    }

    #[test]
    fn test_computed_prefix_resolves_against_model() {
        let field = IdField::<CuidScheme>::new()
            .prefix(PrefixSource::computed(|ctx| {
                format!("{}_", ctx.model.to_lowercase())
            }))
            .bind(&CTX);
        assert_eq!(field.prefix(), "customer_");
    }

    #[test]
    fn test_cuid_default_is_fresh_each_time() {
        let field = IdField::<CuidScheme>::new().prefix("cus_").bind(&CTX);
        let a = field.default_value().unwrap();
        let b = field.default_value().unwrap();
        assert_ne!(a, b);
        assert!(a.starts_with("cus_"));
        assert!(is_valid_cuid(a.strip_prefix("cus_").unwrap()));
    }

    #[test]
    fn test_char_field_has_no_default() {
        let field = IdField::<CharScheme>::new().bind(&CTX);
        assert_eq!(field.default_value(), None);
        assert_eq!(field.default_id().unwrap(), None);
    }

    #[test]
    fn test_static_default_is_prefixed() {
        let field = IdField::<CharScheme>::new()
            .prefix("test_")
            .with_default(DefaultSource::Static("abcde".to_string()))
            .bind(&CTX);
        assert_eq!(field.default_value().as_deref(), Some("test_abcde"));
        assert_eq!(field.default_id().unwrap().unwrap().bare(), "abcde");
    }

    #[test]
    fn test_generator_default_is_prefixed() {
        let field = IdField::<CharScheme>::new()
            .prefix("dev_")
            .with_default(DefaultSource::generator(test_uid))
            .bind(&CTX);
        let value = field.default_value().unwrap();
        assert!(value.starts_with("dev_uid"));
    }

    #[test]
    fn test_from_db_value_fails_closed() {
        let field = IdField::<CuidScheme>::new().prefix("cus_").bind(&CTX);
        let err = field.from_db_value(Some("ckodhg53j000001labr7zezao")).unwrap_err();
        assert!(err.id_error().unwrap().is_prefix_error());

        let id = field
            .from_db_value(Some("cus_ckodhg53j000001labr7zezao"))
            .unwrap()
            .unwrap();
        assert_eq!(field.to_db_value(Some(&id)).as_deref(), Some("cus_ckodhg53j000001labr7zezao"));
    }

    #[test]
    fn test_from_db_null() {
        let nullable = IdField::<CuidScheme>::new().nullable(true).bind(&CTX);
        assert_eq!(nullable.from_db_value(None).unwrap(), None);

        let required = IdField::<CuidScheme>::new().bind(&CTX);
        assert!(matches!(
            required.from_db_value(None).unwrap_err(),
            FieldError::Required { .. }
        ));
    }

    #[test]
    fn test_coerce_passes_ids_through() {
        let field = IdField::<CuidScheme>::new().prefix("cus_").bind(&CTX);
        // A foreign prefix is kept: existing instances are not re-validated.
        let id = Cuid::parse("bus_ckodhg53j000001labr7zezao", "bus_").unwrap();
        let coerced = field.coerce(id.clone().into()).unwrap().unwrap();
        assert_eq!(coerced, id);
    }

    #[test]
    fn test_coerce_constructs_raw_strings() {
        let field = IdField::<CuidScheme>::new().prefix("cus_").bind(&CTX);
        let id = field
            .coerce("cus_ckodhg53j000001labr7zezao".into())
            .unwrap()
            .unwrap();
        assert_eq!(id.prefix(), "cus_");
    }

    #[test]
    fn test_coerce_rejects_non_strings() {
        let field = IdField::<CuidScheme>::new().bind(&CTX);
        for value in [serde_json::json!(1), serde_json::json!(-1), serde_json::json!(true)] {
            let err = field.coerce(value.into()).unwrap_err();
            assert_eq!(err.id_error().unwrap().code(), "invalid_type");
        }
    }

    #[test]
    fn test_coerce_rejects_other_scheme() {
        let field = IdField::<CuidScheme>::new().bind(&CTX);
        let char_id = CharId::parse("abc", "").unwrap();
        assert!(matches!(
            field.coerce(char_id.into()).unwrap_err(),
            FieldError::SchemeMismatch { expected: "cuid", found: "char id", .. }
        ));
    }

    #[test]
    fn test_prep_value_rejects_other_scheme() {
        let field = IdField::<CuidScheme>::new().prefix("cus_").bind(&CTX);
        let char_id = CharId::parse("x", "").unwrap();
        assert!(matches!(
            field.prep_value(char_id.into()).unwrap_err(),
            FieldError::SchemeMismatch { expected: "cuid", found: "char id", .. }
        ));

        let cuid = Cuid::parse("cus_ckodhg53j000001labr7zezao", "cus_").unwrap();
        assert_eq!(
            field.prep_value(cuid.into()).unwrap().as_deref(),
            Some("cus_ckodhg53j000001labr7zezao")
        );
    }

    #[test]
    fn test_prep_value() {
        let field = IdField::<CuidScheme>::new().prefix("cus_").bind(&CTX);
        assert_eq!(field.prep_value(FieldInput::Null).unwrap(), None);
        assert_eq!(field.prep_value("".into()).unwrap(), None);
        assert_eq!(
            field.prep_value("cus_ckodhg53j000001labr7zezao".into()).unwrap().as_deref(),
            Some("cus_ckodhg53j000001labr7zezao")
        );
        assert!(field.prep_value("cus_nope".into()).is_err());
    }

    #[test]
    fn test_clean_error_codes() {
        let field = IdField::<CuidScheme>::new().prefix("dev_").bind(&CTX);

        let err = field.clean(&serde_json::json!("cus_ckp6tebm500001k685ppzonod")).unwrap_err();
        assert_eq!(err.code, "invalid_prefix");

        let err = field.clean(&serde_json::json!("dev_nope")).unwrap_err();
        assert_eq!(err.code, "invalid_id");
        assert_eq!(err.message, "'dev_nope' does not contain a valid cuid string.");

        let err = field.clean(&serde_json::json!(5)).unwrap_err();
        assert_eq!(err.code, "invalid_type");

        let err = field.clean(&serde_json::json!(null)).unwrap_err();
        assert_eq!(err.code, "required");

        let id = field.clean(&serde_json::json!("dev_ckp6tebm500001k685ppzonod")).unwrap();
        assert_eq!(id.unwrap().bare(), "ckp6tebm500001k685ppzonod");
    }

    #[test]
    fn test_clean_blank_on_nullable() {
        let field = IdField::<CharScheme>::new().nullable(true).bind(&CTX);
        assert_eq!(field.clean(&serde_json::json!("")).unwrap(), None);
        assert_eq!(field.clean(&serde_json::json!(null)).unwrap(), None);
    }

    #[test]
    fn test_cycle_char_without_generator() {
        let field = IdField::<CharScheme>::new().bind(&CTX);
        let mut id = CharId::parse("abc", "").unwrap();
        assert!(matches!(
            field.cycle(&mut id).unwrap_err(),
            FieldError::NoGenerator { .. }
        ));
    }

    #[test]
    fn test_cycle_char_with_field_generator() {
        let field = IdField::<CharScheme>::new()
            .prefix("dev_")
            .with_default(DefaultSource::generator(test_uid))
            .bind(&CTX);
        let mut id = field.default_id().unwrap().unwrap();
        let before = id.clone();
        field.cycle(&mut id).unwrap();
        assert_ne!(id, before);
        assert_eq!(id.prefix(), "dev_");
    }
}
