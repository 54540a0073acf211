//! Common test infrastructure for database integration tests.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;
use tabula_config::DatabaseConfig;
use tabula_repository::{ColumnDef, ColumnType, DatabasePool, Table, TableSchema};
use tabula_resilience::retry::RetryPolicy;
use tempfile::TempDir;

/// Throwaway SQLite database.
///
/// The file lives in a temporary data directory that is removed on drop.
pub struct TestDatabase {
    _dir: TempDir,
    pool: Arc<DatabasePool>,
}

impl TestDatabase {
    /// Creates a fresh database file under a new temporary directory.
    pub async fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let config = DatabaseConfig {
            path: "sqlite/test.db".to_string(),
            ..DatabaseConfig::default()
        };

        let pool = DatabasePool::new(&config, dir.path())
            .await
            .expect("Failed to open SQLite database");

        Self {
            _dir: dir,
            pool: Arc::new(pool),
        }
    }

    /// Returns a reference to the database pool.
    pub fn pool(&self) -> Arc<DatabasePool> {
        Arc::clone(&self.pool)
    }
}

/// Retry policy with the default budget and a 1 ms pause.
pub fn fast_policy() -> RetryPolicy {
    RetryPolicy::fixed(3, Duration::from_millis(1))
}

/// Published model metadata.
pub struct Model;

impl Table for Model {
    fn schema() -> TableSchema {
        TableSchema::new("model")
            .column(ColumnDef::new("id", ColumnType::Integer).primary_key().autoincrement())
            .column(ColumnDef::new("model_id", ColumnType::Text).not_null().unique())
            .column(ColumnDef::new("model_name", ColumnType::Text))
            .column(ColumnDef::new("model_version", ColumnType::Text))
            .column(ColumnDef::new("publish_time", ColumnType::DateTime))
            .column(ColumnDef::new("deploy_count", ColumnType::BigInteger))
            .column(ColumnDef::new("deleted", ColumnType::Boolean))
            .default_projection([
                "model_id",
                "model_name",
                "model_version",
                "publish_time",
                "deploy_count",
                "deleted",
            ])
    }
}

/// A table without a soft-delete flag.
pub struct Note;

impl Table for Note {
    fn schema() -> TableSchema {
        TableSchema::new("note")
            .column(ColumnDef::new("id", ColumnType::Integer).primary_key().autoincrement())
            .column(ColumnDef::new("body", ColumnType::Text))
    }
}
