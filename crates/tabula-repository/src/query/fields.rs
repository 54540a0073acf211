//! Field sets for inserts and updates.

use crate::schema::TableSchema;
use tabula_core::{TabulaError, TabulaResult, Value};

/// Ordered column to value assignments.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fields {
    values: Vec<(String, Value)>,
}

impl Fields {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`set`](Self::set).
    #[must_use]
    pub fn with(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(column, value);
        self
    }

    /// Assigns a value, replacing any earlier assignment to the column.
    pub fn set(&mut self, column: impl Into<String>, value: impl Into<Value>) {
        let column = column.into();
        let value = value.into();
        match self.values.iter_mut().find(|(name, _)| *name == column) {
            Some(entry) => entry.1 = value,
            None => self.values.push((column, value)),
        }
    }

    /// Parses a flat JSON object of scalars.
    pub fn from_json(json: &serde_json::Value) -> TabulaResult<Self> {
        let object = json
            .as_object()
            .ok_or_else(|| TabulaError::validation(format!("Fields must be a JSON object, got {}", json)))?;
        object.iter().try_fold(Self::new(), |fields, (column, raw)| {
            Ok(fields.with(column.clone(), Value::from_json(raw)?))
        })
    }

    #[must_use]
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.values.iter().find(|(name, _)| name == column).map(|(_, v)| v)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(c, v)| (c.as_str(), v))
    }

    /// Assignments for an insert: unknown columns dropped.
    #[must_use]
    pub fn insertable(self, schema: &TableSchema) -> Vec<(String, Value)> {
        self.values
            .into_iter()
            .filter(|(column, _)| schema.has_column(column))
            .collect()
    }

    /// Assignments for an update: unknown columns and `Null` values dropped.
    #[must_use]
    pub fn assignable(self, schema: &TableSchema) -> Vec<(String, Value)> {
        self.values
            .into_iter()
            .filter(|(column, value)| schema.has_column(column) && !value.is_null())
            .collect()
    }
}

impl<C: Into<String>, V: Into<Value>> FromIterator<(C, V)> for Fields {
    fn from_iter<I: IntoIterator<Item = (C, V)>>(iter: I) -> Self {
        iter.into_iter().fold(Self::new(), |f, (c, v)| f.with(c, v))
    }
}
