//! Application configuration structures.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tabula_core::{LoggingConfig, TabulaError, TabulaResult};

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application name and metadata.
    #[serde(default)]
    pub app: AppMetadata,

    /// Filesystem locations.
    #[serde(default)]
    pub path: PathConfig,

    /// Database configuration.
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Retry policy for DAO operations.
    #[serde(default)]
    pub retry: RetryConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            app: AppMetadata::default(),
            path: PathConfig::default(),
            database: DatabaseConfig::default(),
            retry: RetryConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl AppConfig {
    /// Resolves the data directory, creating it when `auto_create` is set.
    ///
    /// Relative paths are resolved against the current working directory.
    pub fn data_dir(&self, auto_create: bool) -> TabulaResult<PathBuf> {
        let configured = Path::new(&self.path.data);
        let data_dir = if configured.is_absolute() {
            configured.to_path_buf()
        } else {
            std::env::current_dir()
                .map_err(|e| TabulaError::Configuration(format!("Cannot resolve working directory: {}", e)))?
                .join(configured)
        };

        if auto_create && !data_dir.exists() {
            std::fs::create_dir_all(&data_dir).map_err(|e| {
                TabulaError::Configuration(format!(
                    "Cannot create data directory {}: {}",
                    data_dir.display(),
                    e
                ))
            })?;
        }

        Ok(data_dir)
    }
}

/// Application metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppMetadata {
    /// Application name.
    pub name: String,
    /// Application version.
    pub version: String,
    /// Environment (development, staging, production).
    pub environment: String,
}

impl Default for AppMetadata {
    fn default() -> Self {
        Self {
            name: "tabula".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            environment: "development".to_string(),
        }
    }
}

/// Filesystem locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathConfig {
    /// Data directory; relative paths resolve against the working directory.
    pub data: String,
}

impl Default for PathConfig {
    fn default() -> Self {
        Self {
            data: "data".to_string(),
        }
    }
}

/// Database configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Backend type. Only `local` (SQLite) is supported; other values fall
    /// back to `local` with a warning.
    #[serde(rename = "type")]
    pub kind: String,
    /// SQLite file path; relative paths resolve under the data directory.
    pub path: String,
    /// Minimum connection pool size.
    pub min_connections: u32,
    /// Maximum connection pool size.
    pub max_connections: u32,
    /// Connection timeout in seconds.
    pub connect_timeout_secs: u64,
    /// Idle timeout in seconds.
    pub idle_timeout_secs: u64,
    /// How long SQLite waits on a locked database, in seconds.
    pub busy_timeout_secs: u64,
    /// Enable SQL statement logging.
    pub log_queries: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            kind: "local".to_string(),
            path: "sqlite/model.db".to_string(),
            min_connections: 1,
            max_connections: 5,
            connect_timeout_secs: 30,
            idle_timeout_secs: 600,
            busy_timeout_secs: 5,
            log_queries: false,
        }
    }
}

impl DatabaseConfig {
    /// Returns true if the configured backend is the local SQLite file.
    #[must_use]
    pub fn is_local(&self) -> bool {
        self.kind.eq_ignore_ascii_case("local")
    }

    /// Returns the connect timeout as a Duration.
    #[must_use]
    pub const fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// Returns the idle timeout as a Duration.
    #[must_use]
    pub const fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }

    /// Returns the busy timeout as a Duration.
    #[must_use]
    pub const fn busy_timeout(&self) -> Duration {
        Duration::from_secs(self.busy_timeout_secs)
    }

    /// Resolves the database file against the data directory.
    #[must_use]
    pub fn resolve_path(&self, data_dir: &Path) -> PathBuf {
        let path = Path::new(&self.path);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            data_dir.join(path)
        }
    }
}

/// Retry configuration for DAO operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Maximum number of attempts, including the first one.
    pub max_attempts: u32,
    /// Delay before the first retry, in milliseconds.
    pub delay_ms: u64,
    /// Multiplier applied per retry (`1.0` keeps the delay fixed).
    pub multiplier: f64,
    /// Maximum delay between retries, in milliseconds.
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay_ms: 100,
            multiplier: 1.0,
            max_delay_ms: 10_000,
        }
    }
}

impl RetryConfig {
    /// Returns the initial delay as a Duration.
    #[must_use]
    pub const fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    /// Returns the maximum delay as a Duration.
    #[must_use]
    pub const fn max_delay(&self) -> Duration {
        Duration::from_millis(self.max_delay_ms)
    }
}
