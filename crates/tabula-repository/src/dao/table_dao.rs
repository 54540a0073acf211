//! TableDao trait: generic data access over one described table.
//!
//! Implementations validate every column name against the table's
//! [`TableSchema`] and silently drop the unknown ones, so callers can pass
//! loosely-shaped field sets and filters.

use crate::query::{Fields, Filter, OrderBy, Statement};
use crate::schema::TableSchema;
use async_trait::async_trait;
use tabula_core::{Paging, Row, TabulaResult};

/// Column set to `true` by a soft delete.
pub const SOFT_DELETE_COLUMN: &str = "deleted";

/// Generic data access object for a single table.
#[async_trait]
pub trait TableDao: Send + Sync {
    /// Returns the table description.
    fn schema(&self) -> &TableSchema;

    /// Inserts one row. Unknown fields are ignored.
    async fn insert(&self, fields: Fields) -> TabulaResult<()>;

    /// Updates matching rows and returns the affected count.
    ///
    /// Unknown and `Null` fields are ignored; with nothing left to assign
    /// the call does nothing and returns 0.
    async fn update(&self, fields: Fields, filter: &Filter) -> TabulaResult<u64>;

    /// Deletes matching rows and returns the affected count.
    ///
    /// A soft delete sets [`SOFT_DELETE_COLUMN`] to `true` instead of
    /// removing the rows.
    async fn delete(&self, filter: &Filter, soft: bool) -> TabulaResult<u64>;

    /// Soft-deletes matching rows, the default deletion mode.
    async fn soft_delete(&self, filter: &Filter) -> TabulaResult<u64> {
        self.delete(filter, true).await
    }

    /// Counts matching rows.
    async fn count(&self, filter: &Filter) -> TabulaResult<u64>;

    /// Reads matching rows.
    ///
    /// `columns` selects the projection; an empty slice, or one naming no
    /// known column, falls back to the default projection.
    async fn select(
        &self,
        columns: &[&str],
        filter: &Filter,
        order_by: Option<&OrderBy>,
        paging: Option<Paging>,
    ) -> TabulaResult<Vec<Row>>;

    /// Runs a caller-built statement against this table.
    ///
    /// Returns `Some(rows)` for a select and `None` otherwise.
    async fn execute(&self, statement: Statement) -> TabulaResult<Option<Vec<Row>>>;
}
