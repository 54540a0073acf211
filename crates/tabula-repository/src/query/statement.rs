//! Backend-neutral statement representation.
//!
//! Builders append [`Clause`]s to a statement; the SQLite translator lowers
//! the result to SQL text and bind parameters. Clauses are stored in the
//! order they were applied.

use tabula_core::Value;

/// Range comparator for a bound predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparator {
    /// `column <= value`
    Le,
    /// `column >= value`
    Ge,
}

impl Comparator {
    /// Parses the `"<="` / `">="` tags.
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "<=" => Some(Self::Le),
            ">=" => Some(Self::Ge),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::Le => "<=",
            Self::Ge => ">=",
        }
    }
}

/// One element of a statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Clause {
    /// Equality predicate (`IS NULL` for [`Value::Null`]).
    Eq { column: String, value: Value },
    /// Range-bound predicate.
    Range {
        column: String,
        comparator: Comparator,
        value: Value,
    },
    /// Sort key; the first one applied is the primary key.
    Sort { column: String, descending: bool },
    /// Offset/limit window; the last one applied wins.
    Window { offset: u64, limit: u64 },
}

impl Clause {
    /// Returns true for `Eq` and `Range` clauses.
    #[must_use]
    pub const fn is_predicate(&self) -> bool {
        matches!(self, Self::Eq { .. } | Self::Range { .. })
    }

    /// Column referenced by the clause, if any.
    #[must_use]
    pub fn column(&self) -> Option<&str> {
        match self {
            Self::Eq { column, .. } | Self::Range { column, .. } | Self::Sort { column, .. } => {
                Some(column.as_str())
            }
            Self::Window { .. } => None,
        }
    }
}

/// Statements that accept clauses.
pub trait Filterable: Sized {
    /// Returns the statement with `clause` appended.
    #[must_use]
    fn clause(self, clause: Clause) -> Self;

    /// Clauses in application order.
    fn clauses(&self) -> &[Clause];

    /// Target table.
    fn table(&self) -> &str;

    /// Predicate clauses in application order.
    fn predicates(&self) -> Vec<&Clause> {
        self.clauses().iter().filter(|c| c.is_predicate()).collect()
    }
}

macro_rules! impl_filterable {
    ($ty:ty) => {
        impl Filterable for $ty {
            fn clause(mut self, clause: Clause) -> Self {
                self.clauses.push(clause);
                self
            }

            fn clauses(&self) -> &[Clause] {
                &self.clauses
            }

            fn table(&self) -> &str {
                &self.table
            }
        }
    };
}

/// `SELECT` over an explicit projection.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectStatement {
    table: String,
    projection: Vec<String>,
    clauses: Vec<Clause>,
}

impl SelectStatement {
    #[must_use]
    pub fn new(table: impl Into<String>, projection: Vec<String>) -> Self {
        Self {
            table: table.into(),
            projection,
            clauses: Vec::new(),
        }
    }

    #[must_use]
    pub fn projection(&self) -> &[String] {
        &self.projection
    }

    /// Sort keys as `(column, descending)` in priority order.
    pub fn sort_keys(&self) -> impl Iterator<Item = (&str, bool)> {
        self.clauses.iter().filter_map(|c| match c {
            Clause::Sort { column, descending } => Some((column.as_str(), *descending)),
            _ => None,
        })
    }

    /// The effective `(offset, limit)` window.
    #[must_use]
    pub fn window(&self) -> Option<(u64, u64)> {
        self.clauses.iter().rev().find_map(|c| match c {
            Clause::Window { offset, limit } => Some((*offset, *limit)),
            _ => None,
        })
    }
}

/// `UPDATE ... SET`.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateStatement {
    table: String,
    assignments: Vec<(String, Value)>,
    clauses: Vec<Clause>,
}

impl UpdateStatement {
    #[must_use]
    pub fn new(table: impl Into<String>, assignments: Vec<(String, Value)>) -> Self {
        Self {
            table: table.into(),
            assignments,
            clauses: Vec::new(),
        }
    }

    #[must_use]
    pub fn assignments(&self) -> &[(String, Value)] {
        &self.assignments
    }
}

/// `DELETE`.
#[derive(Debug, Clone, PartialEq)]
pub struct DeleteStatement {
    table: String,
    clauses: Vec<Clause>,
}

impl DeleteStatement {
    #[must_use]
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            clauses: Vec::new(),
        }
    }
}

impl_filterable!(SelectStatement);
impl_filterable!(UpdateStatement);
impl_filterable!(DeleteStatement);

/// `INSERT` of a single row.
#[derive(Debug, Clone, PartialEq)]
pub struct InsertStatement {
    table: String,
    values: Vec<(String, Value)>,
}

impl InsertStatement {
    #[must_use]
    pub fn new(table: impl Into<String>, values: Vec<(String, Value)>) -> Self {
        Self {
            table: table.into(),
            values,
        }
    }

    #[must_use]
    pub fn table(&self) -> &str {
        &self.table
    }

    #[must_use]
    pub fn values(&self) -> &[(String, Value)] {
        &self.values
    }
}

/// A caller-built statement accepted by `execute`.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Select(SelectStatement),
    Update(UpdateStatement),
    Delete(DeleteStatement),
}

impl Statement {
    /// Returns true if executing the statement produces rows.
    #[must_use]
    pub const fn is_read(&self) -> bool {
        matches!(self, Self::Select(_))
    }

    #[must_use]
    pub fn table(&self) -> &str {
        match self {
            Self::Select(s) => s.table(),
            Self::Update(s) => s.table(),
            Self::Delete(s) => s.table(),
        }
    }

    #[must_use]
    pub fn clauses(&self) -> &[Clause] {
        match self {
            Self::Select(s) => s.clauses(),
            Self::Update(s) => s.clauses(),
            Self::Delete(s) => s.clauses(),
        }
    }

    /// Every column the statement names, including projection and SET targets.
    #[must_use]
    pub fn referenced_columns(&self) -> Vec<&str> {
        let mut columns: Vec<&str> = self.clauses().iter().filter_map(Clause::column).collect();
        match self {
            Self::Select(s) => columns.extend(s.projection().iter().map(String::as_str)),
            Self::Update(s) => columns.extend(s.assignments().iter().map(|(c, _)| c.as_str())),
            Self::Delete(_) => {}
        }
        columns
    }
}

impl From<SelectStatement> for Statement {
    fn from(s: SelectStatement) -> Self {
        Self::Select(s)
    }
}

impl From<UpdateStatement> for Statement {
    fn from(s: UpdateStatement) -> Self {
        Self::Update(s)
    }
}

impl From<DeleteStatement> for Statement {
    fn from(s: DeleteStatement) -> Self {
        Self::Delete(s)
    }
}
