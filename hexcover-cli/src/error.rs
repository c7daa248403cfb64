//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and appropriate exit codes.

use std::fmt;
use std::path::PathBuf;
use std::process;

use hexcover::cache::CacheError;
use hexcover::config::ConfigFileError;
use hexcover::coverage::CoverageError;
use hexcover::service::ServiceError;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Configuration file could not be read, written or converted
    Config(ConfigFileError),
    /// Command-line arguments describe an invalid run
    InvalidArguments(String),
    /// Coverage generation failed
    Coverage(CoverageError),
    /// Cache could not be created
    Cache(CacheError),
    /// Cache-through query failed
    Service(ServiceError),
    /// Async runtime could not be started
    Runtime(std::io::Error),
    /// Failed to write output file
    FileWrite { path: PathBuf, error: std::io::Error },
    /// Failed to serialize output
    Serialize(serde_json::Error),
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        match self {
            CliError::Config(ConfigFileError::InvalidValue { .. }) => {
                eprintln!();
                eprintln!("Check the value in your config file, or regenerate it with:");
                eprintln!("  hexcover config init --force");
            }
            CliError::Coverage(CoverageError::InvalidConfig(_))
            | CliError::InvalidArguments(_) => {
                eprintln!();
                eprintln!("Run 'hexcover generate --help' for valid options.");
            }
            _ => {}
        }

        process::exit(self.exit_code())
    }

    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Config(_) | CliError::InvalidArguments(_) => 2,
            CliError::Coverage(CoverageError::Cancelled) => 130,
            _ => 1,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Config(e) => write!(f, "Configuration error: {}", e),
            CliError::InvalidArguments(msg) => write!(f, "Invalid arguments: {}", msg),
            CliError::Coverage(e) => write!(f, "Coverage generation failed: {}", e),
            CliError::Cache(e) => write!(f, "Failed to create cache: {}", e),
            CliError::Service(e) => write!(f, "Coverage query failed: {}", e),
            CliError::Runtime(e) => write!(f, "Failed to start async runtime: {}", e),
            CliError::FileWrite { path, error } => {
                write!(f, "Failed to write file '{}': {}", path.display(), error)
            }
            CliError::Serialize(e) => write!(f, "Failed to serialize output: {}", e),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Config(e) => Some(e),
            CliError::Coverage(e) => Some(e),
            CliError::Cache(e) => Some(e),
            CliError::Service(e) => Some(e),
            CliError::Runtime(e) => Some(e),
            CliError::FileWrite { error, .. } => Some(error),
            CliError::Serialize(e) => Some(e),
            CliError::LoggingInit(_) | CliError::InvalidArguments(_) => None,
        }
    }
}

impl From<ConfigFileError> for CliError {
    fn from(e: ConfigFileError) -> Self {
        CliError::Config(e)
    }
}

impl From<CoverageError> for CliError {
    fn from(e: CoverageError) -> Self {
        CliError::Coverage(e)
    }
}

impl From<CacheError> for CliError {
    fn from(e: CacheError) -> Self {
        CliError::Cache(e)
    }
}

impl From<ServiceError> for CliError {
    fn from(e: ServiceError) -> Self {
        CliError::Service(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(CliError::InvalidArguments("x".into()).exit_code(), 2);
        assert_eq!(CliError::Coverage(CoverageError::Cancelled).exit_code(), 130);
        assert_eq!(CliError::LoggingInit("x".into()).exit_code(), 1);
    }

    #[test]
    fn test_display_includes_cause() {
        let err = CliError::from(CoverageError::InvalidConfig("no resolutions".into()));
        assert!(err.to_string().contains("no resolutions"));
    }
}
