//! Result type aliases for Tabula.

use crate::TabulaError;

/// A specialized `Result` type for Tabula operations.
pub type TabulaResult<T> = Result<T, TabulaError>;
