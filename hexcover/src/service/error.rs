//! Service error types.

use std::fmt;

use crate::cache::CacheError;
use crate::coverage::CoverageError;

/// Errors that can occur during service operations.
#[derive(Debug)]
pub enum ServiceError {
    /// Coverage generation failed or was cancelled
    Coverage(CoverageError),
    /// Cache rejected the result
    Cache(CacheError),
    /// Background generation task failed to complete
    Task(String),
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Coverage(e) => write!(f, "Coverage error: {}", e),
            Self::Cache(e) => write!(f, "Cache error: {}", e),
            Self::Task(msg) => write!(f, "Generation task failed: {}", msg),
        }
    }
}

impl std::error::Error for ServiceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Coverage(e) => Some(e),
            Self::Cache(e) => Some(e),
            Self::Task(_) => None,
        }
    }
}

impl From<CoverageError> for ServiceError {
    fn from(e: CoverageError) -> Self {
        Self::Coverage(e)
    }
}

impl From<CacheError> for ServiceError {
    fn from(e: CacheError) -> Self {
        Self::Cache(e)
    }
}
