//! Table schema descriptors.
//!
//! A [`TableSchema`] is the static description of one table: its columns,
//! their types, and the default projection used when a read does not name
//! its columns. The DAO only introspects it; unknown column names in
//! filters, orderings, projections and field sets are looked up here and
//! dropped.

use std::collections::{HashMap, HashSet};
use tabula_core::{TabulaError, TabulaResult};

/// Value type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnType {
    Text,
    Integer,
    BigInteger,
    Boolean,
    DateTime,
}

impl ColumnType {
    /// Declared SQL type.
    #[must_use]
    pub const fn sql_type(self) -> &'static str {
        match self {
            Self::Text => "TEXT",
            Self::Integer => "INTEGER",
            Self::BigInteger => "BIGINT",
            Self::Boolean => "BOOLEAN",
            Self::DateTime => "DATETIME",
        }
    }
}

/// One column definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDef {
    pub name: String,
    pub column_type: ColumnType,
    pub nullable: bool,
    pub primary_key: bool,
    pub autoincrement: bool,
    pub unique: bool,
}

impl ColumnDef {
    /// Creates a nullable column.
    #[must_use]
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
            nullable: true,
            primary_key: false,
            autoincrement: false,
            unique: false,
        }
    }

    #[must_use]
    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    #[must_use]
    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self.nullable = false;
        self
    }

    /// Marks an integer primary key as auto-assigned.
    #[must_use]
    pub fn autoincrement(mut self) -> Self {
        self.autoincrement = true;
        self
    }

    #[must_use]
    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }
}

/// Static description of one table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSchema {
    name: String,
    columns: Vec<ColumnDef>,
    index: HashMap<String, usize>,
    default_projection: Vec<String>,
}

impl TableSchema {
    /// Creates an empty schema for the named table.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
            index: HashMap::new(),
            default_projection: Vec::new(),
        }
    }

    /// Appends a column definition.
    #[must_use]
    pub fn column(mut self, column: ColumnDef) -> Self {
        self.index.entry(column.name.clone()).or_insert(self.columns.len());
        self.columns.push(column);
        self
    }

    /// Sets the columns returned by full-entity reads.
    ///
    /// Left empty, every column is returned in declaration order.
    #[must_use]
    pub fn default_projection<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.default_projection = columns.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn columns(&self) -> &[ColumnDef] {
        &self.columns
    }

    /// Looks up a column by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ColumnDef> {
        self.index.get(name).map(|&i| &self.columns[i])
    }

    #[must_use]
    pub fn has_column(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Columns returned when a read does not name its projection.
    #[must_use]
    pub fn projection(&self) -> Vec<String> {
        if self.default_projection.is_empty() {
            self.columns.iter().map(|c| c.name.clone()).collect()
        } else {
            self.default_projection.clone()
        }
    }

    /// Checks the descriptor invariants.
    ///
    /// The table must be named and have at least one column, column names
    /// must be unique, and the default projection may only name declared
    /// columns.
    pub fn validate(&self) -> TabulaResult<()> {
        if self.name.trim().is_empty() {
            return Err(TabulaError::schema("Table name cannot be empty"));
        }

        if self.columns.is_empty() {
            return Err(TabulaError::schema(format!("Table '{}' has no columns", self.name)));
        }

        let mut seen = HashSet::new();
        for column in &self.columns {
            if column.name.trim().is_empty() {
                return Err(TabulaError::schema(format!(
                    "Table '{}' has a column with an empty name",
                    self.name
                )));
            }
            if !seen.insert(column.name.as_str()) {
                return Err(TabulaError::schema(format!(
                    "Duplicate column '{}' in table '{}'",
                    column.name, self.name
                )));
            }
        }

        if let Some(unknown) = self.default_projection.iter().find(|c| !self.has_column(c)) {
            return Err(TabulaError::schema(format!(
                "Default projection of '{}' names unknown column '{}'",
                self.name, unknown
            )));
        }

        Ok(())
    }
}

/// A type that describes a table.
///
/// Implemented once per entity; the DAO is parameterized over it.
///
/// ```
/// use tabula_repository::{ColumnDef, ColumnType, Table, TableSchema};
///
/// struct Article;
///
/// impl Table for Article {
///     fn schema() -> TableSchema {
///         TableSchema::new("article")
///             .column(ColumnDef::new("id", ColumnType::Integer).primary_key().autoincrement())
///             .column(ColumnDef::new("title", ColumnType::Text))
///             .default_projection(["title"])
///     }
/// }
///
/// assert!(Article::schema().validate().is_ok());
/// ```
pub trait Table: Send + Sync + 'static {
    fn schema() -> TableSchema;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> TableSchema {
        TableSchema::new("model")
            .column(ColumnDef::new("id", ColumnType::Integer).primary_key().autoincrement())
            .column(ColumnDef::new("name", ColumnType::Text))
            .column(ColumnDef::new("deleted", ColumnType::Boolean))
    }

    #[test]
    fn test_column_lookup() {
        let schema = sample();
        assert!(schema.has_column("name"));
        assert!(!schema.has_column("missing"));
        assert_eq!(schema.get("deleted").map(|c| c.column_type), Some(ColumnType::Boolean));
    }

    #[test]
    fn test_projection_defaults_to_all_columns() {
        assert_eq!(sample().projection(), vec!["id", "name", "deleted"]);
    }

    #[test]
    fn test_explicit_default_projection() {
        let schema = sample().default_projection(["name", "deleted"]);
        assert_eq!(schema.projection(), vec!["name", "deleted"]);
    }

    #[test]
    fn test_primary_key_is_not_null() {
        let column = ColumnDef::new("id", ColumnType::Integer).primary_key();
        assert!(!column.nullable);
    }

    #[test]
    fn test_validate_accepts_valid_schema() {
        assert!(sample().default_projection(["name"]).validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_duplicate_columns() {
        let schema = sample().column(ColumnDef::new("name", ColumnType::Text));
        let err = schema.validate().unwrap_err();
        assert!(matches!(err, TabulaError::Schema(_)));
        assert!(err.to_string().contains("Duplicate column 'name'"));
    }

    #[test]
    fn test_validate_rejects_unknown_projection_column() {
        let schema = sample().default_projection(["name", "ghost"]);
        assert!(schema.validate().unwrap_err().to_string().contains("ghost"));
    }

    #[test]
    fn test_validate_rejects_empty_table() {
        assert!(TableSchema::new("empty").validate().is_err());
        assert!(TableSchema::new("").column(ColumnDef::new("a", ColumnType::Text)).validate().is_err());
    }
}
