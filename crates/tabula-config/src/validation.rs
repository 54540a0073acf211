//! Configuration validation module.
//!
//! Collects every invalid value in one pass, failing fast at load time
//! rather than on the first DAO call.

use crate::AppConfig;
use std::fmt;

/// Configuration validation error variants.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValidationError {
    /// Pool size configuration is invalid (min must be <= max).
    InvalidPoolSize { min: u32, max: u32 },
    /// Pool must allow at least one connection.
    EmptyPool,
    /// Database path is empty.
    EmptyDatabasePath,
    /// Retry budget must allow at least one attempt.
    NoRetryAttempts,
    /// Retry multiplier must be finite and at least 1.0.
    InvalidRetryMultiplier { value: f64 },
    /// Timeout value must be positive.
    NonPositiveTimeout { name: String, value: u64 },
    /// Log filter is empty.
    EmptyLogLevel,
}

impl fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidPoolSize { min, max } => {
                write!(
                    f,
                    "Invalid pool size: min ({}) cannot be greater than max ({})",
                    min, max
                )
            }
            Self::EmptyPool => write!(f, "max_connections must be at least 1"),
            Self::EmptyDatabasePath => write!(f, "Database path cannot be empty"),
            Self::NoRetryAttempts => write!(f, "retry.max_attempts must be at least 1"),
            Self::InvalidRetryMultiplier { value } => {
                write!(f, "Invalid retry multiplier: {} (must be >= 1.0)", value)
            }
            Self::NonPositiveTimeout { name, value } => {
                write!(f, "Timeout '{}' must be positive, got {}", name, value)
            }
            Self::EmptyLogLevel => write!(f, "logging.level cannot be empty"),
        }
    }
}

impl std::error::Error for ConfigValidationError {}

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validates the entire application configuration.
    ///
    /// Returns Ok(()) if valid, or Err with all validation errors found.
    pub fn validate(config: &AppConfig) -> Result<(), Vec<ConfigValidationError>> {
        let mut errors = Vec::new();

        Self::validate_database(&config.database, &mut errors);
        Self::validate_retry(&config.retry, &mut errors);

        if config.logging.level.trim().is_empty() {
            errors.push(ConfigValidationError::EmptyLogLevel);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn validate_database(config: &crate::DatabaseConfig, errors: &mut Vec<ConfigValidationError>) {
        if config.path.trim().is_empty() {
            errors.push(ConfigValidationError::EmptyDatabasePath);
        }

        if config.max_connections == 0 {
            errors.push(ConfigValidationError::EmptyPool);
        }

        if config.min_connections > config.max_connections {
            errors.push(ConfigValidationError::InvalidPoolSize {
                min: config.min_connections,
                max: config.max_connections,
            });
        }

        if config.connect_timeout_secs == 0 {
            errors.push(ConfigValidationError::NonPositiveTimeout {
                name: "connect_timeout_secs".to_string(),
                value: 0,
            });
        }
    }

    fn validate_retry(config: &crate::RetryConfig, errors: &mut Vec<ConfigValidationError>) {
        if config.max_attempts == 0 {
            errors.push(ConfigValidationError::NoRetryAttempts);
        }

        if !config.multiplier.is_finite() || config.multiplier < 1.0 {
            errors.push(ConfigValidationError::InvalidRetryMultiplier {
                value: config.multiplier,
            });
        }
    }
}
