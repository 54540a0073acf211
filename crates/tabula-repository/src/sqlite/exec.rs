//! Statement runners bound to a single connection.
//!
//! Each runner translates its statement, executes it on the given
//! connection and converts the result. They are the units of work handed
//! to the transactional executor, so they take owned arguments and may run
//! more than once.

use super::decode::decode_row;
use super::translator::{self, SqliteQuery};
use crate::query::{DeleteStatement, InsertStatement, SelectStatement, Statement, UpdateStatement};
use crate::schema::TableSchema;
use sqlx::SqliteConnection;
use std::sync::Arc;
use tabula_core::{Row, TabulaError, TabulaResult};
use tracing::debug;

pub async fn create_table(conn: &mut SqliteConnection, schema: Arc<TableSchema>) -> TabulaResult<()> {
    let sql = translator::create_table(&schema);
    debug!(sql = %sql, "Executing statement");
    sqlx::query(&sql).execute(conn).await?;
    Ok(())
}

pub async fn select(
    conn: &mut SqliteConnection,
    statement: SelectStatement,
    schema: Arc<TableSchema>,
) -> TabulaResult<Vec<Row>> {
    let mut qb = translator::select(&statement)?;
    debug!(sql = qb.sql(), "Executing statement");
    let rows = qb.build().fetch_all(conn).await?;
    rows.iter().map(|row| decode_row(row, &schema)).collect()
}

pub async fn count(conn: &mut SqliteConnection, statement: SelectStatement) -> TabulaResult<u64> {
    let mut qb = translator::count(&statement);
    debug!(sql = qb.sql(), "Executing statement");
    let total: i64 = qb.build_query_scalar().fetch_one(conn).await?;
    u64::try_from(total).map_err(|_| TabulaError::internal(format!("Negative row count {}", total)))
}

pub async fn insert(conn: &mut SqliteConnection, statement: InsertStatement) -> TabulaResult<u64> {
    write(conn, translator::insert(&statement)?).await
}

pub async fn update(conn: &mut SqliteConnection, statement: UpdateStatement) -> TabulaResult<u64> {
    write(conn, translator::update(&statement)?).await
}

pub async fn delete(conn: &mut SqliteConnection, statement: DeleteStatement) -> TabulaResult<u64> {
    write(conn, translator::delete(&statement)?).await
}

/// Runs a caller-built statement; only a select yields rows.
pub async fn execute(
    conn: &mut SqliteConnection,
    statement: Statement,
    schema: Arc<TableSchema>,
) -> TabulaResult<Option<Vec<Row>>> {
    match statement {
        Statement::Select(s) => select(conn, s, schema).await.map(Some),
        Statement::Update(s) => update(conn, s).await.map(|_| None),
        Statement::Delete(s) => delete(conn, s).await.map(|_| None),
    }
}

async fn write(conn: &mut SqliteConnection, mut qb: SqliteQuery) -> TabulaResult<u64> {
    debug!(sql = qb.sql(), "Executing statement");
    let result = qb.build().execute(conn).await?;
    Ok(result.rows_affected())
}
