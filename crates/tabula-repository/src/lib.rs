//! # Tabula Repository
//!
//! Generic data access over SQLite tables:
//!
//! ```text
//! Caller
//!   ↓  Fields / Filter / OrderBy / Paging   (loosely-shaped requests)
//! SqliteTableDao<T: Table>                  (schema checks, statement building)
//!   ↓  SelectStatement / UpdateStatement / DeleteStatement
//! TransactionalExecutor                     (one transaction per attempt, retry)
//!   ↓  sqlx::QueryBuilder
//! SQLite
//! ```
//!
//! ## Structure
//!
//! ```text
//! src/
//!   schema.rs                  ← Table trait, TableSchema
//!   query/                     ← statement IR and builders
//!   sqlite/                    ← SQL translation, row decoding, runners
//!   executor.rs                ← TransactionalExecutor
//!   pool.rs                    ← DatabasePool
//!   dao/
//!     table_dao.rs             ← TableDao trait
//!     impl/
//!       sqlite_table_dao.rs    ← SqliteTableDao
//! ```

pub mod dao;
pub mod executor;
pub mod pool;
pub mod query;
pub mod schema;
pub mod sqlite;

pub use dao::{Dao, SqliteTableDao, TableDao, SOFT_DELETE_COLUMN};
pub use executor::{retry_policy_from_config, TransactionalExecutor};
pub use pool::*;
pub use query::{
    apply_paging, build_filter, build_order, Clause, Comparator, Condition, DeleteStatement, Fields,
    Filter, Filterable, InsertStatement, OrderBy, SelectStatement, Statement, UpdateStatement,
};
pub use schema::{ColumnDef, ColumnType, Table, TableSchema};
