//! Models (named sets of ID fields) and the records built from them.

use std::collections::BTreeMap;

use pfx_id::IdError;
use tracing::debug;

use crate::error::FieldError;
use crate::field::{Column, FieldContext, IdField};
use crate::value::{AnyId, FieldInput, FieldScheme};

/// Attributes of an ID that may be read but never written through a record.
const ID_ATTRIBUTES: &[&str] = &["bare", "cuid", "prefix"];

/// A stored row: field name to raw string (or null).
pub type Row = BTreeMap<String, Option<String>>;

/// A named set of bound ID fields.
#[derive(Debug)]
pub struct Model {
    name: String,
    columns: Vec<Box<dyn Column>>,
}

impl Model {
    pub fn builder(name: impl Into<String>) -> ModelBuilder {
        ModelBuilder {
            name: name.into(),
            columns: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Field names in registration order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name())
    }

    /// The resolved prefix of a field.
    pub fn prefix_of(&self, field: &str) -> Result<&str, FieldError> {
        Ok(self.column(field)?.prefix())
    }

    /// The scheme name of a field.
    pub fn scheme_of(&self, field: &str) -> Result<&'static str, FieldError> {
        Ok(self.column(field)?.scheme())
    }

    fn column(&self, field: &str) -> Result<&dyn Column, FieldError> {
        self.columns
            .iter()
            .find(|c| c.name() == field)
            .map(|c| c.as_ref())
            .ok_or_else(|| FieldError::UnknownField(field.to_string()))
    }
}

/// Registers fields on a [`Model`].
#[derive(Debug)]
pub struct ModelBuilder {
    name: String,
    columns: Vec<Box<dyn Column>>,
}

impl ModelBuilder {
    /// Adds a field; its prefix is resolved here, against this model.
    #[must_use]
    pub fn field<S: FieldScheme>(mut self, name: &str, field: IdField<S>) -> Self {
        let ctx = FieldContext {
            model: &self.name,
            field: name,
        };
        let bound = field.bind(&ctx);
        self.columns.push(Box::new(bound));
        self
    }

    pub fn build(self) -> Result<Model, FieldError> {
        for (i, column) in self.columns.iter().enumerate() {
            if self.columns[..i].iter().any(|c| c.name() == column.name()) {
                return Err(FieldError::DuplicateField {
                    model: self.name,
                    field: column.name().to_string(),
                });
            }
        }

        Ok(Model {
            name: self.name,
            columns: self.columns,
        })
    }
}

/// The ID values of one entity.
///
/// Values are only changed through [`set`](Self::set) (which funnels raw
/// input through construction) or [`cycle`](Self::cycle).
#[derive(Debug, Clone)]
pub struct Record<'m> {
    model: &'m Model,
    values: BTreeMap<String, Option<AnyId>>,
}

impl<'m> Record<'m> {
    /// Creates a record, filling every field from its default.
    pub fn new(model: &'m Model) -> Result<Self, FieldError> {
        let mut values = BTreeMap::new();
        for column in &model.columns {
            let value = column.default_any()?;
            if value.is_none() && !column.nullable() {
                return Err(FieldError::Required {
                    model: model.name.clone(),
                    field: column.name().to_string(),
                });
            }
            values.insert(column.name().to_string(), value);
        }

        debug!(model = %model.name, "created record");
        Ok(Self { model, values })
    }

    /// Loads a record from a stored row. Missing columns load as null.
    pub fn from_row(model: &'m Model, row: &Row) -> Result<Self, FieldError> {
        let mut values = BTreeMap::new();
        for column in &model.columns {
            let raw = row.get(column.name()).and_then(|v| v.as_deref());
            values.insert(column.name().to_string(), column.from_db_any(raw)?);
        }

        Ok(Self { model, values })
    }

    /// The row to store for this record.
    pub fn to_row(&self) -> Row {
        self.values
            .iter()
            .map(|(name, value)| (name.clone(), value.as_ref().map(ToString::to_string)))
            .collect()
    }

    pub fn model(&self) -> &Model {
        self.model
    }

    pub fn get(&self, field: &str) -> Result<Option<&AnyId>, FieldError> {
        self.values
            .get(field)
            .map(Option::as_ref)
            .ok_or_else(|| FieldError::UnknownField(field.to_string()))
    }

    /// Assigns a field. Raw values are constructed with the field's
    /// prefix; IDs are stored as given.
    pub fn set(&mut self, field: &str, value: impl Into<FieldInput>) -> Result<(), FieldError> {
        let model = self.model;
        let id = model.column(field)?.coerce_any(value.into())?;
        self.values.insert(field.to_string(), id);
        Ok(())
    }

    /// Assigns through a dotted attribute path such as `id` or `id.prefix`.
    ///
    /// Plain field names behave like [`set`](Self::set). Paths into an ID
    /// are rejected: an ID's internals are never writable.
    pub fn set_path(&mut self, path: &str, value: impl Into<FieldInput>) -> Result<(), FieldError> {
        let Some((field, attribute)) = path.split_once('.') else {
            return self.set(path, value);
        };

        self.model.column(field)?;
        if ID_ATTRIBUTES.contains(&attribute) {
            return Err(FieldError::Invalid {
                model: self.model.name.clone(),
                field: field.to_string(),
                error: IdError::ImmutabilityViolation {
                    attribute: attribute.to_string(),
                },
            });
        }

        Err(FieldError::UnknownField(path.to_string()))
    }

    /// Regenerates a field's ID in place, keeping its prefix.
    ///
    /// A null field stays null.
    pub fn cycle(&mut self, field: &str) -> Result<(), FieldError> {
        let model = self.model;
        let column = model.column(field)?;
        let Some(slot) = self.values.get_mut(field) else {
            return Err(FieldError::UnknownField(field.to_string()));
        };

        if let Some(id) = slot.take() {
            match column.cycle_any(id.clone()) {
                Ok(cycled) => *slot = Some(cycled),
                Err(e) => {
                    *slot = Some(id);
                    return Err(e);
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pfx_id::{CharScheme, CuidScheme};

    use super::*;
    use crate::field::DefaultSource;

    fn customer() -> Model {
        Model::builder("Customer")
            .field("id", IdField::<CuidScheme>::new().prefix("cus_"))
            .field("legacy_ref", IdField::<CharScheme>::new().nullable(true))
            .build()
            .unwrap()
    }

    #[test]
    fn test_new_record_applies_defaults() {
        let model = customer();
        let record = Record::new(&model).unwrap();
        let id = record.get("id").unwrap().unwrap();
        assert_eq!(id.prefix(), "cus_");
        assert_eq!(record.get("legacy_ref").unwrap(), None);
    }

    #[test]
    fn test_required_field_without_default_fails() {
        let model = Model::builder("Tag")
            .field("code", IdField::<CharScheme>::new())
            .build()
            .unwrap();
        assert!(matches!(
            Record::new(&model).unwrap_err(),
            FieldError::Required { .. }
        ));
    }

    #[test]
    fn test_duplicate_field_rejected() {
        let err = Model::builder("Customer")
            .field("id", IdField::<CuidScheme>::new())
            .field("id", IdField::<CharScheme>::new())
            .build()
            .unwrap_err();
        assert!(matches!(err, FieldError::DuplicateField { .. }));
    }

    #[test]
    fn test_unknown_field() {
        let model = customer();
        let mut record = Record::new(&model).unwrap();
        assert!(matches!(
            record.set("nope", "x").unwrap_err(),
            FieldError::UnknownField(_)
        ));
        assert!(record.get("nope").is_err());
        assert!(model.prefix_of("nope").is_err());
    }

    #[test]
    fn test_set_path_rejects_internal_writes() {
        let model = customer();
        let mut record = Record::new(&model).unwrap();
        for path in ["id.cuid", "id.bare", "id.prefix"] {
            let err = record.set_path(path, "fail").unwrap_err();
            assert_eq!(err.id_error().map(IdError::code), Some("immutable"));
        }
        assert!(matches!(
            record.set_path("id.other", "x").unwrap_err(),
            FieldError::UnknownField(_)
        ));
    }

    #[test]
    fn test_set_path_plain_field() {
        let model = customer();
        let mut record = Record::new(&model).unwrap();
        record.set_path("legacy_ref", "abc").unwrap();
        assert_eq!(record.get("legacy_ref").unwrap().unwrap().bare(), "abc");
    }

    #[test]
    fn test_failed_cycle_keeps_value() {
        let model = Model::builder("Tag")
            .field(
                "code",
                IdField::<CharScheme>::new().with_default(DefaultSource::Static("abc".to_string())),
            )
            .build()
            .unwrap();
        let mut record = Record::new(&model).unwrap();
        assert!(matches!(
            record.cycle("code").unwrap_err(),
            FieldError::NoGenerator { .. }
        ));
        assert_eq!(record.get("code").unwrap().unwrap().bare(), "abc");
    }

    #[test]
    fn test_cycle_null_stays_null() {
        let model = customer();
        let mut record = Record::new(&model).unwrap();
        record.cycle("legacy_ref").unwrap();
        assert_eq!(record.get("legacy_ref").unwrap(), None);
    }
}
