//! Filter specifications and the clause builder.

use super::statement::{Clause, Comparator, Filterable};
use crate::schema::TableSchema;
use tabula_core::{TabulaError, TabulaResult, Value};
use tracing::trace;

/// Condition applied to one column.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    Eq(Value),
    Range(Comparator, Value),
}

/// Ordered column to condition mapping.
///
/// One condition per column: setting a column again replaces the earlier
/// condition in place, keeping its position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    conditions: Vec<(String, Condition)>,
}

impl Filter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Equality on `column`.
    #[must_use]
    pub fn eq(self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.with(column, Condition::Eq(value.into()))
    }

    /// `column <= value`.
    #[must_use]
    pub fn le(self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.with(column, Condition::Range(Comparator::Le, value.into()))
    }

    /// `column >= value`.
    #[must_use]
    pub fn ge(self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.with(column, Condition::Range(Comparator::Ge, value.into()))
    }

    #[must_use]
    pub fn with(mut self, column: impl Into<String>, condition: Condition) -> Self {
        self.set(column, condition);
        self
    }

    pub fn set(&mut self, column: impl Into<String>, condition: Condition) {
        let column = column.into();
        match self.conditions.iter_mut().find(|(name, _)| *name == column) {
            Some(entry) => entry.1 = condition,
            None => self.conditions.push((column, condition)),
        }
    }

    /// Parses a JSON object such as `{"id": ["<=", 5], "name": "x"}`.
    ///
    /// A two-element array tagged `"<="` or `">="` is a range bound; any
    /// scalar is an equality. Other arrays and nested objects are rejected.
    pub fn from_json(json: &serde_json::Value) -> TabulaResult<Self> {
        let object = json
            .as_object()
            .ok_or_else(|| TabulaError::validation(format!("Filter must be a JSON object, got {}", json)))?;

        let mut filter = Self::new();
        for (column, raw) in object {
            let condition = match raw {
                serde_json::Value::Array(items) => match items.as_slice() {
                    [serde_json::Value::String(tag), bound] => {
                        let comparator = Comparator::from_tag(tag).ok_or_else(|| {
                            TabulaError::validation(format!(
                                "Unsupported comparator '{}' for column '{}'",
                                tag, column
                            ))
                        })?;
                        Condition::Range(comparator, Value::from_json(bound)?)
                    }
                    _ => {
                        return Err(TabulaError::validation(format!(
                            "Malformed condition for column '{}': {}",
                            column, raw
                        )))
                    }
                },
                other => Condition::Eq(Value::from_json(other)?),
            };
            filter.set(column.clone(), condition);
        }
        Ok(filter)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Condition)> {
        self.conditions.iter().map(|(c, cond)| (c.as_str(), cond))
    }
}

/// Appends one predicate per known filter column to `statement`.
///
/// Unknown columns are skipped.
#[must_use]
pub fn build_filter<S: Filterable>(statement: S, filter: &Filter, schema: &TableSchema) -> S {
    filter.iter().fold(statement, |stmt, (column, condition)| {
        if !schema.has_column(column) {
            trace!(table = schema.name(), column, "Ignoring unknown filter column");
            return stmt;
        }
        let clause = match condition {
            Condition::Eq(value) => Clause::Eq {
                column: column.to_string(),
                value: value.clone(),
            },
            Condition::Range(comparator, value) => Clause::Range {
                column: column.to_string(),
                comparator: *comparator,
                value: value.clone(),
            },
        };
        stmt.clause(clause)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::SelectStatement;
    use crate::schema::{ColumnDef, ColumnType};
    use serde_json::json;

    fn schema() -> TableSchema {
        TableSchema::new("model")
            .column(ColumnDef::new("id", ColumnType::Integer))
            .column(ColumnDef::new("name", ColumnType::Text))
    }

    #[test]
    fn test_later_condition_replaces_earlier() {
        let filter = Filter::new().eq("id", 1).eq("name", "a").ge("id", 5);
        let items: Vec<_> = filter.iter().collect();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0], ("id", &Condition::Range(Comparator::Ge, Value::Integer(5))));
    }

    #[test]
    fn test_build_filter_skips_unknown_columns() {
        let filter = Filter::new().eq("ghost", 1).eq("name", "a");
        let stmt = build_filter(SelectStatement::new("model", vec![]), &filter, &schema());
        assert_eq!(
            stmt.clauses(),
            &[Clause::Eq { column: "name".into(), value: Value::from("a") }]
        );
    }

    #[test]
    fn test_build_filter_keeps_both_range_directions() {
        let filter = Filter::new().le("id", 9).ge("name", "b");
        let stmt = build_filter(SelectStatement::new("model", vec![]), &filter, &schema());
        let comparators: Vec<_> = stmt
            .clauses()
            .iter()
            .filter_map(|c| match c {
                Clause::Range { comparator, .. } => Some(*comparator),
                _ => None,
            })
            .collect();
        assert_eq!(comparators, vec![Comparator::Le, Comparator::Ge]);
    }

    #[test]
    fn test_from_json() {
        let filter = Filter::from_json(&json!({"id": ["<=", 5], "name": "x"})).unwrap();
        assert_eq!(filter.len(), 2);
        let conditions: Vec<_> = filter.iter().map(|(_, c)| c.clone()).collect();
        assert!(conditions.contains(&Condition::Range(Comparator::Le, Value::Integer(5))));
        assert!(conditions.contains(&Condition::Eq(Value::from("x"))));
    }

    #[test]
    fn test_from_json_rejects_malformed_conditions() {
        for bad in [
            json!({"id": [1, 2, 3]}),
            json!({"id": ["<", 3]}),
            json!({"id": {"nested": true}}),
            json!(["id", 1]),
        ] {
            let err = Filter::from_json(&bad).unwrap_err();
            assert!(matches!(err, TabulaError::Validation(_)), "{bad}");
        }
    }
}
