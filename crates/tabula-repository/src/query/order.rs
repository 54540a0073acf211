//! Ordering specifications and the ordering builder.

use super::statement::{Clause, Filterable, SelectStatement};
use crate::schema::TableSchema;

/// Sort tokens, each a column name optionally prefixed with `-` for
/// descending order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderBy {
    tokens: Vec<String>,
}

impl OrderBy {
    #[must_use]
    pub fn new<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tokens: tokens.into_iter().map(Into::into).collect(),
        }
    }

    /// Appends an ascending key.
    #[must_use]
    pub fn asc(mut self, column: impl Into<String>) -> Self {
        self.tokens.push(column.into());
        self
    }

    /// Appends a descending key.
    #[must_use]
    pub fn desc(mut self, column: impl AsRef<str>) -> Self {
        self.tokens.push(format!("-{}", column.as_ref()));
        self
    }

    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().map(String::as_str)
    }

    /// Tokens parsed as `(column, descending)`.
    pub fn keys(&self) -> impl Iterator<Item = (&str, bool)> {
        self.tokens().map(|token| match token.strip_prefix('-') {
            Some(column) => (column, true),
            None => (token, false),
        })
    }
}

impl From<&str> for OrderBy {
    fn from(token: &str) -> Self {
        Self::new([token])
    }
}

impl From<String> for OrderBy {
    fn from(token: String) -> Self {
        Self::new([token])
    }
}

impl From<Vec<&str>> for OrderBy {
    fn from(tokens: Vec<&str>) -> Self {
        Self::new(tokens)
    }
}

impl From<Vec<String>> for OrderBy {
    fn from(tokens: Vec<String>) -> Self {
        Self::new(tokens)
    }
}

impl<const N: usize> From<[&str; N]> for OrderBy {
    fn from(tokens: [&str; N]) -> Self {
        Self::new(tokens)
    }
}

/// Appends one sort key per known column, in token order.
#[must_use]
pub fn build_order(statement: SelectStatement, order_by: &OrderBy, schema: &TableSchema) -> SelectStatement {
    order_by
        .keys()
        .filter(|(column, _)| schema.has_column(column))
        .fold(statement, |stmt, (column, descending)| {
            stmt.clause(Clause::Sort {
                column: column.to_string(),
                descending,
            })
        })
}
