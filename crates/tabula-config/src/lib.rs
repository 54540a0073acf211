//! # Tabula Config
//!
//! Configuration management for Tabula.
//! Supports layered configuration from files, include directories,
//! environment variables, command-line overrides and runtime refresh.

mod app_config;
mod loader;
mod validation;

pub use app_config::*;
pub use loader::*;
pub use validation::*;
