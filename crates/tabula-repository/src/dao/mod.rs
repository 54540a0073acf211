//! DAO (Data Access Object) layer.
//!
//! A DAO provides generic reads and writes for one table described by a
//! [`Table`](crate::Table) implementation.
//!
//! Hierarchy:
//! ```text
//! Caller → TableDao (interface) → SqliteTableDao (impl) → TransactionalExecutor → SQLite
//! ```

pub mod table_dao;
pub mod r#impl;

pub use r#impl::{Dao, SqliteTableDao};
pub use table_dao::{TableDao, SOFT_DELETE_COLUMN};
