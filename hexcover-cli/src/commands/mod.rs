//! CLI command implementations.
//!
//! - [`generate`] - Generate global coverage and print statistics
//! - [`query`] - Cache-through viewport query
//! - [`config`] - Configuration file management (path, show, init)

pub mod config;
pub mod generate;
pub mod query;
