//! Unified error type for the Tabula crates.

use std::fmt::Debug;
use thiserror::Error;

/// Unified error type for all Tabula layers.
///
/// Variants are split between errors that may succeed when the same
/// statement is tried again (see [`TabulaError::is_retriable`]) and errors
/// that are a property of the request itself and are surfaced immediately.
#[derive(Error, Debug)]
pub enum TabulaError {
    // ============ Request Errors ============
    /// Malformed filter, field or statement input
    #[error("Validation error: {0}")]
    Validation(String),

    /// Invalid table schema descriptor
    #[error("Schema error: {0}")]
    Schema(String),

    /// Constraint violation reported by the backend (unique, not-null, ...)
    #[error("Conflict: {0}")]
    Conflict(String),

    // ============ Infrastructure Errors ============
    /// Transient backend error (connection lost, pool timeout, busy/locked)
    #[error("Database error: {0}")]
    Database(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    // ============ Internal Errors ============
    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// Generic error wrapper
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl TabulaError {
    /// Returns a machine-readable error code.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Schema(_) => "SCHEMA_ERROR",
            Self::Conflict(_) => "CONFLICT",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Configuration(_) => "CONFIGURATION_ERROR",
            Self::Internal(_) | Self::Other(_) => "INTERNAL_ERROR",
        }
    }

    /// Creates a validation error.
    #[must_use]
    pub fn validation<T: Into<String>>(message: T) -> Self {
        Self::Validation(message.into())
    }

    /// Creates a schema error.
    #[must_use]
    pub fn schema<T: Into<String>>(message: T) -> Self {
        Self::Schema(message.into())
    }

    /// Creates a database error.
    #[must_use]
    pub fn database<T: Into<String>>(message: T) -> Self {
        Self::Database(message.into())
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal<T: Into<String>>(message: T) -> Self {
        Self::Internal(message.into())
    }

    /// Checks if this error is retriable.
    #[must_use]
    pub const fn is_retriable(&self) -> bool {
        matches!(self, Self::Database(_))
    }
}

#[cfg(feature = "sqlx")]
impl From<sqlx::Error> for TabulaError {
    fn from(err: sqlx::Error) -> Self {
        use sqlx::error::ErrorKind;

        match &err {
            sqlx::Error::Database(db_err) => match db_err.kind() {
                ErrorKind::UniqueViolation
                | ErrorKind::ForeignKeyViolation
                | ErrorKind::NotNullViolation
                | ErrorKind::CheckViolation => Self::Conflict(db_err.message().to_string()),
                _ => Self::Database(err.to_string()),
            },
            sqlx::Error::Configuration(_) => Self::Configuration(err.to_string()),
            sqlx::Error::ColumnNotFound(_)
            | sqlx::Error::ColumnIndexOutOfBounds { .. }
            | sqlx::Error::ColumnDecode { .. }
            | sqlx::Error::Decode(_)
            | sqlx::Error::TypeNotFound { .. }
            | sqlx::Error::RowNotFound => Self::Internal(err.to_string()),
            _ => Self::Database(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for TabulaError {
    fn from(err: serde_json::Error) -> Self {
        Self::Internal(format!("JSON serialization error: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(TabulaError::validation("bad filter").error_code(), "VALIDATION_ERROR");
        assert_eq!(TabulaError::schema("dup column").error_code(), "SCHEMA_ERROR");
        assert_eq!(TabulaError::Conflict("unique".to_string()).error_code(), "CONFLICT");
        assert_eq!(TabulaError::database("locked").error_code(), "DATABASE_ERROR");
        assert_eq!(TabulaError::Configuration("x".to_string()).error_code(), "CONFIGURATION_ERROR");
        assert_eq!(TabulaError::internal("oops").error_code(), "INTERNAL_ERROR");
    }

    #[test]
    fn test_retriable_errors() {
        assert!(TabulaError::database("connection lost").is_retriable());
    }

    #[test]
    fn test_non_retriable_errors() {
        assert!(!TabulaError::validation("bad input").is_retriable());
        assert!(!TabulaError::schema("bad schema").is_retriable());
        assert!(!TabulaError::Conflict("dup".to_string()).is_retriable());
        assert!(!TabulaError::Configuration("cfg".to_string()).is_retriable());
        assert!(!TabulaError::internal("decode").is_retriable());
    }

    #[test]
    fn test_error_display() {
        let err = TabulaError::validation("malformed condition for column 'id'");
        assert!(err.to_string().contains("malformed condition"));
        assert!(err.to_string().starts_with("Validation error"));
    }

    #[cfg(feature = "sqlx")]
    #[test]
    fn test_from_sqlx_pool_timeout_is_retriable() {
        let err: TabulaError = sqlx::Error::PoolTimedOut.into();
        assert!(err.is_retriable());
    }

    #[cfg(feature = "sqlx")]
    #[test]
    fn test_from_sqlx_column_not_found_is_internal() {
        let err: TabulaError = sqlx::Error::ColumnNotFound("missing".to_string()).into();
        assert!(matches!(err, TabulaError::Internal(_)));
        assert!(!err.is_retriable());
    }
}
