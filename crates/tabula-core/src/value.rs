//! Scalar values and result rows.

use crate::{TabulaError, TabulaResult};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use std::fmt;

/// Canonical text form for temporal values returned to callers.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A single column value.
///
/// `Null` doubles as the "absent" sentinel: update operations drop fields
/// whose value is `Null` instead of writing them.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Boolean(bool),
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
    DateTime(NaiveDateTime),
}

impl Value {
    /// Returns true for the null sentinel.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub const fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(v) => Some(*v),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(v) => Some(*v),
            Self::Integer(0) => Some(false),
            Self::Integer(1) => Some(true),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(v) => Some(v.as_str()),
            _ => None,
        }
    }

    /// Converts temporal values to their canonical text form.
    ///
    /// Every other variant is returned unchanged.
    #[must_use]
    pub fn normalized(self) -> Self {
        match self {
            Self::DateTime(dt) => Self::Text(dt.format(TIMESTAMP_FORMAT).to_string()),
            other => other,
        }
    }

    /// Converts a JSON scalar into a value.
    ///
    /// Arrays and objects are not scalars and are rejected.
    pub fn from_json(json: &serde_json::Value) -> TabulaResult<Self> {
        match json {
            serde_json::Value::Null => Ok(Self::Null),
            serde_json::Value::Bool(b) => Ok(Self::Boolean(*b)),
            serde_json::Value::Number(n) => n
                .as_i64()
                .map(Self::Integer)
                .or_else(|| n.as_f64().map(Self::Real))
                .ok_or_else(|| TabulaError::validation(format!("Unsupported number: {}", n))),
            serde_json::Value::String(s) => Ok(Self::Text(s.clone())),
            serde_json::Value::Array(_) | serde_json::Value::Object(_) => Err(TabulaError::validation(
                format!("Expected a scalar value, got {}", json),
            )),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "NULL"),
            Self::Boolean(v) => write!(f, "{}", v),
            Self::Integer(v) => write!(f, "{}", v),
            Self::Real(v) => write!(f, "{}", v),
            Self::Text(v) => write!(f, "'{}'", v),
            Self::Blob(v) => write!(f, "<{} bytes>", v.len()),
            Self::DateTime(v) => write!(f, "'{}'", v.format(TIMESTAMP_FORMAT)),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_none(),
            Self::Boolean(v) => serializer.serialize_bool(*v),
            Self::Integer(v) => serializer.serialize_i64(*v),
            Self::Real(v) => serializer.serialize_f64(*v),
            Self::Text(v) => serializer.serialize_str(v),
            Self::Blob(v) => serializer.serialize_bytes(v),
            Self::DateTime(v) => serializer.collect_str(&v.format(TIMESTAMP_FORMAT)),
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Boolean(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Integer(i64::from(v))
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Self::Integer(i64::from(v))
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Integer(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Real(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Self::Blob(v)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(v: NaiveDateTime) -> Self {
        Self::DateTime(v)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(v: DateTime<Utc>) -> Self {
        Self::DateTime(v.naive_utc())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

/// One result row: column names mapped to values, in projection order.
///
/// Temporal values are normalized to [`TIMESTAMP_FORMAT`] text as they are
/// pushed, so a row never carries a raw [`Value::DateTime`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    entries: Vec<(String, Value)>,
}

impl Row {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    /// Appends a column, replacing any earlier value under the same name.
    pub fn push(&mut self, column: impl Into<String>, value: impl Into<Value>) {
        let column = column.into();
        let value = value.into().normalized();
        match self.entries.iter_mut().find(|(name, _)| *name == column) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((column, value)),
        }
    }

    /// Builder-style [`push`](Self::push).
    #[must_use]
    pub fn with(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.push(column, value);
        self
    }

    #[must_use]
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    #[must_use]
    pub fn contains(&self, column: &str) -> bool {
        self.get(column).is_some()
    }

    /// Column names in projection order.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Converts the row to a JSON object.
    pub fn to_json(&self) -> TabulaResult<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }
}

impl IntoIterator for Row {
    type Item = (String, Value);
    type IntoIter = std::vec::IntoIter<(String, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut row = Self::new();
        for (column, value) in iter {
            row.push(column, value);
        }
        row
    }
}

impl Serialize for Row {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in &self.entries {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample_datetime() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_opt(14, 5, 30)
            .unwrap()
    }

    #[test]
    fn test_datetime_normalized_to_canonical_text() {
        let value = Value::from(sample_datetime()).normalized();
        assert_eq!(value, Value::Text("2024-03-09 14:05:30".to_string()));
    }

    #[test]
    fn test_normalized_keeps_other_variants() {
        assert_eq!(Value::Integer(7).normalized(), Value::Integer(7));
        assert_eq!(Value::Null.normalized(), Value::Null);
    }

    #[test]
    fn test_option_into_value() {
        assert_eq!(Value::from(None::<String>), Value::Null);
        assert_eq!(Value::from(Some(5_i64)), Value::Integer(5));
    }

    #[test]
    fn test_from_json_scalars() {
        assert_eq!(Value::from_json(&serde_json::json!(3)).unwrap(), Value::Integer(3));
        assert_eq!(Value::from_json(&serde_json::json!(1.5)).unwrap(), Value::Real(1.5));
        assert_eq!(Value::from_json(&serde_json::json!("x")).unwrap(), Value::Text("x".into()));
        assert_eq!(Value::from_json(&serde_json::json!(null)).unwrap(), Value::Null);
    }

    #[test]
    fn test_from_json_rejects_compound_values() {
        assert!(matches!(
            Value::from_json(&serde_json::json!({"a": 1})),
            Err(TabulaError::Validation(_))
        ));
        assert!(Value::from_json(&serde_json::json!([1, 2])).is_err());
    }

    #[test]
    fn test_row_keeps_insertion_order() {
        let row = Row::new().with("b", 2).with("a", 1).with("c", 3);
        let columns: Vec<&str> = row.columns().collect();
        assert_eq!(columns, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_row_push_replaces_existing_column() {
        let row = Row::new().with("a", 1).with("a", 2);
        assert_eq!(row.len(), 1);
        assert_eq!(row.get("a"), Some(&Value::Integer(2)));
    }

    #[test]
    fn test_row_normalizes_temporal_values() {
        let row = Row::new().with("created_at", sample_datetime());
        assert_eq!(row.get("created_at").and_then(Value::as_str), Some("2024-03-09 14:05:30"));
    }

    #[test]
    fn test_row_serializes_as_ordered_object() {
        let row = Row::new()
            .with("id", 1)
            .with("name", "alpha")
            .with("deleted", false)
            .with("note", None::<String>);
        let json = serde_json::to_string(&row).unwrap();
        assert_eq!(json, r#"{"id":1,"name":"alpha","deleted":false,"note":null}"#);
    }
}
