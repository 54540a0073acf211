//! Lowers statements to SQLite SQL.
//!
//! Every value is bound as a parameter; identifiers are double-quoted.
//! Temporal values are bound in their canonical whole-second text form, so
//! a value read back from a row compares equal to the stored one.

use crate::query::{Clause, DeleteStatement, Filterable, InsertStatement, SelectStatement, UpdateStatement};
use crate::schema::TableSchema;
use sqlx::{QueryBuilder, Sqlite};
use tabula_core::{TabulaError, TabulaResult, Value, TIMESTAMP_FORMAT};

/// Query builder carrying owned bind arguments.
pub type SqliteQuery = QueryBuilder<'static, Sqlite>;

/// Quotes an identifier.
#[must_use]
pub fn quote(identifier: &str) -> String {
    format!("\"{}\"", identifier.replace('"', "\"\""))
}

/// `CREATE TABLE IF NOT EXISTS` for a schema.
#[must_use]
pub fn create_table(schema: &TableSchema) -> String {
    let columns: Vec<String> = schema
        .columns()
        .iter()
        .map(|column| {
            let mut def = format!("{} {}", quote(&column.name), column.column_type.sql_type());
            if column.primary_key {
                def.push_str(" PRIMARY KEY");
                if column.autoincrement {
                    def.push_str(" AUTOINCREMENT");
                }
            } else if !column.nullable {
                def.push_str(" NOT NULL");
            }
            if column.unique && !column.primary_key {
                def.push_str(" UNIQUE");
            }
            def
        })
        .collect();

    format!(
        "CREATE TABLE IF NOT EXISTS {} ({})",
        quote(schema.name()),
        columns.join(", ")
    )
}

pub fn select(statement: &SelectStatement) -> TabulaResult<SqliteQuery> {
    if statement.projection().is_empty() {
        return Err(TabulaError::validation(format!(
            "Select on '{}' has an empty projection",
            statement.table()
        )));
    }

    let columns: Vec<String> = statement.projection().iter().map(|c| quote(c)).collect();
    let mut qb = QueryBuilder::new(format!(
        "SELECT {} FROM {}",
        columns.join(", "),
        quote(statement.table())
    ));
    push_where(&mut qb, statement.clauses());

    let mut sort_keys = statement.sort_keys().peekable();
    if sort_keys.peek().is_some() {
        let keys: Vec<String> = sort_keys
            .map(|(column, descending)| format!("{} {}", quote(column), if descending { "DESC" } else { "ASC" }))
            .collect();
        qb.push(" ORDER BY ").push(keys.join(", "));
    }

    if let Some((offset, limit)) = statement.window() {
        qb.push(" LIMIT ")
            .push_bind(to_i64(limit)?)
            .push(" OFFSET ")
            .push_bind(to_i64(offset)?);
    }

    Ok(qb)
}

/// `SELECT COUNT(*)` over the statement's predicates.
///
/// Sort keys and windows do not change a count and are ignored.
#[must_use]
pub fn count(statement: &SelectStatement) -> SqliteQuery {
    let mut qb = QueryBuilder::new(format!("SELECT COUNT(*) FROM {}", quote(statement.table())));
    push_where(&mut qb, statement.clauses());
    qb
}

pub fn update(statement: &UpdateStatement) -> TabulaResult<SqliteQuery> {
    reject_read_clauses("UPDATE", statement)?;
    if statement.assignments().is_empty() {
        return Err(TabulaError::validation(format!(
            "Update on '{}' has no assignments",
            statement.table()
        )));
    }

    let mut qb = QueryBuilder::new(format!("UPDATE {} SET ", quote(statement.table())));
    for (i, (column, value)) in statement.assignments().iter().enumerate() {
        if i > 0 {
            qb.push(", ");
        }
        qb.push(quote(column)).push(" = ");
        push_value(&mut qb, value);
    }
    push_where(&mut qb, statement.clauses());
    Ok(qb)
}

pub fn delete(statement: &DeleteStatement) -> TabulaResult<SqliteQuery> {
    reject_read_clauses("DELETE", statement)?;
    let mut qb = QueryBuilder::new(format!("DELETE FROM {}", quote(statement.table())));
    push_where(&mut qb, statement.clauses());
    Ok(qb)
}

pub fn insert(statement: &InsertStatement) -> TabulaResult<SqliteQuery> {
    if statement.values().is_empty() {
        return Ok(QueryBuilder::new(format!(
            "INSERT INTO {} DEFAULT VALUES",
            quote(statement.table())
        )));
    }

    let columns: Vec<String> = statement.values().iter().map(|(c, _)| quote(c)).collect();
    let mut qb = QueryBuilder::new(format!(
        "INSERT INTO {} ({}) VALUES (",
        quote(statement.table()),
        columns.join(", ")
    ));
    for (i, (_, value)) in statement.values().iter().enumerate() {
        if i > 0 {
            qb.push(", ");
        }
        push_value(&mut qb, value);
    }
    qb.push(")");
    Ok(qb)
}

fn push_where(qb: &mut SqliteQuery, clauses: &[Clause]) {
    let mut first = true;
    for clause in clauses.iter().filter(|c| c.is_predicate()) {
        qb.push(if first { " WHERE " } else { " AND " });
        first = false;
        match clause {
            Clause::Eq { column, value: Value::Null } => {
                qb.push(quote(column)).push(" IS NULL");
            }
            Clause::Eq { column, value } => {
                qb.push(quote(column)).push(" = ");
                push_value(qb, value);
            }
            Clause::Range { column, comparator, value } => {
                qb.push(quote(column))
                    .push(" ")
                    .push(comparator.as_sql())
                    .push(" ");
                push_value(qb, value);
            }
            Clause::Sort { .. } | Clause::Window { .. } => {}
        }
    }
}

fn push_value(qb: &mut SqliteQuery, value: &Value) {
    match value {
        Value::Null => qb.push_bind(None::<String>),
        Value::Boolean(v) => qb.push_bind(*v),
        Value::Integer(v) => qb.push_bind(*v),
        Value::Real(v) => qb.push_bind(*v),
        Value::Text(v) => qb.push_bind(v.clone()),
        Value::Blob(v) => qb.push_bind(v.clone()),
        Value::DateTime(v) => qb.push_bind(v.format(TIMESTAMP_FORMAT).to_string()),
    };
}

fn reject_read_clauses<S: Filterable>(kind: &str, statement: &S) -> TabulaResult<()> {
    match statement.clauses().iter().find(|c| !c.is_predicate()) {
        Some(clause) => Err(TabulaError::validation(format!(
            "{} on '{}' cannot carry {:?}",
            kind,
            statement.table(),
            clause
        ))),
        None => Ok(()),
    }
}

fn to_i64(n: u64) -> TabulaResult<i64> {
    i64::try_from(n).map_err(|_| TabulaError::validation(format!("Window bound {} is out of range", n)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::Comparator;
    use crate::schema::{ColumnDef, ColumnType};

    #[test]
    fn test_quote_escapes_double_quotes() {
        assert_eq!(quote("name"), "\"name\"");
        assert_eq!(quote("we\"ird"), "\"we\"\"ird\"");
    }

    #[test]
    fn test_create_table() {
        let schema = TableSchema::new("model")
            .column(ColumnDef::new("id", ColumnType::Integer).primary_key().autoincrement())
            .column(ColumnDef::new("model_id", ColumnType::Text).not_null().unique())
            .column(ColumnDef::new("deleted", ColumnType::Boolean));
        assert_eq!(
            create_table(&schema),
            "CREATE TABLE IF NOT EXISTS \"model\" (\"id\" INTEGER PRIMARY KEY AUTOINCREMENT, \
             \"model_id\" TEXT NOT NULL UNIQUE, \"deleted\" BOOLEAN)"
        );
    }

    #[test]
    fn test_select_sql() {
        let stmt = SelectStatement::new("model", vec!["id".into(), "name".into()])
            .clause(Clause::Eq { column: "name".into(), value: Value::from("a") })
            .clause(Clause::Range { column: "id".into(), comparator: Comparator::Ge, value: Value::Integer(2) })
            .clause(Clause::Eq { column: "note".into(), value: Value::Null })
            .clause(Clause::Sort { column: "id".into(), descending: true })
            .clause(Clause::Window { offset: 3, limit: 3 });
        let qb = select(&stmt).unwrap();
        assert_eq!(
            qb.sql(),
            "SELECT \"id\", \"name\" FROM \"model\" WHERE \"name\" = ? AND \"id\" >= ? \
             AND \"note\" IS NULL ORDER BY \"id\" DESC LIMIT ? OFFSET ?"
        );
    }

    #[test]
    fn test_select_rejects_empty_projection() {
        assert!(select(&SelectStatement::new("model", vec![])).is_err());
    }

    #[test]
    fn test_count_ignores_window() {
        let stmt = SelectStatement::new("model", vec!["id".into()])
            .clause(Clause::Range { column: "id".into(), comparator: Comparator::Le, value: Value::Integer(5) })
            .clause(Clause::Window { offset: 0, limit: 1 });
        assert_eq!(count(&stmt).sql(), "SELECT COUNT(*) FROM \"model\" WHERE \"id\" <= ?");
    }

    #[test]
    fn test_update_sql() {
        let stmt = UpdateStatement::new("model", vec![("deleted".into(), Value::Boolean(true))])
            .clause(Clause::Eq { column: "id".into(), value: Value::Integer(1) });
        assert_eq!(
            update(&stmt).unwrap().sql(),
            "UPDATE \"model\" SET \"deleted\" = ? WHERE \"id\" = ?"
        );
    }

    #[test]
    fn test_update_rejects_sort_keys() {
        let stmt = UpdateStatement::new("model", vec![("a".into(), Value::Integer(1))])
            .clause(Clause::Sort { column: "a".into(), descending: false });
        assert!(matches!(update(&stmt), Err(TabulaError::Validation(_))));
    }

    #[test]
    fn test_delete_and_insert_sql() {
        assert_eq!(delete(&DeleteStatement::new("model")).unwrap().sql(), "DELETE FROM \"model\"");

        let stmt = InsertStatement::new(
            "model",
            vec![("name".into(), Value::from("a")), ("size".into(), Value::Integer(2))],
        );
        assert_eq!(
            insert(&stmt).unwrap().sql(),
            "INSERT INTO \"model\" (\"name\", \"size\") VALUES (?, ?)"
        );
    }
}
