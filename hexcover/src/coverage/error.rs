//! Coverage generation errors.

use thiserror::Error;

use crate::hex::HexError;

/// Errors returned by the coverage generator.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoverageError {
    /// Configuration rejected before any work was done
    #[error("Invalid coverage configuration: {0}")]
    InvalidConfig(String),

    /// The pass was cancelled between region sweeps
    #[error("Coverage generation cancelled")]
    Cancelled,

    /// A resolution could not be mapped onto the hex grid
    #[error("Hex grid error: {0}")]
    Hex(#[from] HexError),
}
