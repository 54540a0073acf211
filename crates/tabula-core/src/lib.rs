//! # Tabula Core
//!
//! Core types and error definitions for Tabula.
//! This crate provides the value model shared by the configuration,
//! resilience and repository layers: scalar [`Value`]s, result [`Row`]s,
//! [`Paging`] requests and the unified [`TabulaError`].

pub mod error;
pub mod pagination;
pub mod result;
pub mod telemetry;
pub mod value;

pub use error::*;
pub use pagination::*;
pub use result::*;
pub use telemetry::*;
pub use value::*;
