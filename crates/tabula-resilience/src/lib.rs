//! # Tabula Resilience
//!
//! Retry policies used by the transactional executor.

pub mod retry;

pub use retry::*;
