//! Converts SQLite rows into [`Row`]s.

use crate::schema::{ColumnType, TableSchema};
use chrono::NaiveDateTime;
use sqlx::sqlite::SqliteRow;
use sqlx::{Column, Row as _, TypeInfo, ValueRef};
use tabula_core::{Row, TabulaResult, Value};

/// Decodes one result row.
///
/// Columns declared in the schema decode by their declared type; any other
/// column (an expression or alias) decodes by its storage class.
pub fn decode_row(row: &SqliteRow, schema: &TableSchema) -> TabulaResult<Row> {
    let mut out = Row::with_capacity(row.len());
    for (index, column) in row.columns().iter().enumerate() {
        let name = column.name();
        let value: Value = match schema.get(name).map(|c| c.column_type) {
            Some(ColumnType::Boolean) => row.try_get::<Option<bool>, _>(index)?.into(),
            Some(ColumnType::DateTime) => decode_datetime(row, index)?,
            _ => decode_dynamic(row, index)?,
        };
        out.push(name, value);
    }
    Ok(out)
}

fn decode_datetime(row: &SqliteRow, index: usize) -> TabulaResult<Value> {
    // Integer or free-form text stored in a temporal column falls back to
    // its storage class.
    match row.try_get::<Option<NaiveDateTime>, _>(index) {
        Ok(value) => Ok(value.into()),
        Err(_) => decode_dynamic(row, index),
    }
}

fn decode_dynamic(row: &SqliteRow, index: usize) -> TabulaResult<Value> {
    let raw = row.try_get_raw(index)?;
    if raw.is_null() {
        return Ok(Value::Null);
    }
    let storage = raw.type_info().name().to_string();

    let value = match storage.as_str() {
        "INTEGER" | "BOOLEAN" => Value::Integer(row.try_get::<i64, _>(index)?),
        "REAL" | "NUMERIC" => Value::Real(row.try_get::<f64, _>(index)?),
        "BLOB" => Value::Blob(row.try_get::<Vec<u8>, _>(index)?),
        _ => Value::Text(row.try_get::<String, _>(index)?),
    };
    Ok(value)
}
