//! DAO implementations.
//!
//! The trait lives in the parent `dao/` module (`table_dao.rs`).
//! Implementations are organized by backend.

pub mod sqlite_table_dao;

pub use sqlite_table_dao::{Dao, SqliteTableDao};
