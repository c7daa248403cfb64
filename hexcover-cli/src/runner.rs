//! CLI runner for common setup and operations.
//!
//! Encapsulates config loading, logging initialization, cache and service
//! creation, and output writing shared by the command handlers.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use hexcover::cache::HexCache;
use hexcover::config::ConfigFile;
use hexcover::coverage::{RandomJitter, ScoreJitter, SeededJitter};
use hexcover::logging::{init_logging, LoggingGuard};
use hexcover::oracle::{LandOracle, LandmassOracle};
use hexcover::service::CoverageService;

use crate::error::CliError;

/// Load the config file from an explicit path or the default location.
pub fn load_config(path: Option<&Path>) -> Result<ConfigFile, CliError> {
    match path {
        Some(path) => Ok(ConfigFile::load_from(path)?),
        None => Ok(ConfigFile::load()?),
    }
}

/// Jitter source for opportunity scores: seeded when a seed is given.
pub fn jitter_for(seed: Option<u64>) -> Arc<dyn ScoreJitter> {
    match seed {
        Some(seed) => Arc::new(SeededJitter::new(seed)),
        None => Arc::new(RandomJitter),
    }
}

/// Runner that manages CLI lifecycle and common operations.
pub struct CliRunner {
    /// Logging guard - keeps logging active while runner exists
    _logging_guard: LoggingGuard,
    /// Loaded configuration file
    config: ConfigFile,
    oracle: Arc<dyn LandOracle>,
}

impl CliRunner {
    /// Create a new CLI runner, loading config and initializing logging.
    ///
    /// `debug` forces debug-level logging for hexcover when RUST_LOG is unset.
    pub fn new(config_path: Option<&Path>, debug: bool) -> Result<Self, CliError> {
        let config = load_config(config_path)?;
        let logging = &config.logging;

        let logging_guard = init_logging(
            &logging.directory,
            &logging.file,
            logging.stdout,
            debug || logging.debug,
        )
        .map_err(|e| CliError::LoggingInit(e.to_string()))?;

        Ok(Self {
            _logging_guard: logging_guard,
            config,
            oracle: Arc::new(LandmassOracle::new()),
        })
    }

    /// Get the loaded configuration.
    pub fn config(&self) -> &ConfigFile {
        &self.config
    }

    pub fn oracle(&self) -> Arc<dyn LandOracle> {
        Arc::clone(&self.oracle)
    }

    /// Log startup information for a command.
    pub fn log_startup(&self, command: &str) {
        info!(version = hexcover::VERSION, command, "hexcover starting");
    }

    /// Create the coverage service over a cache built from `[cache]`.
    pub fn create_service(&self, seed: Option<u64>) -> Result<Arc<CoverageService>, CliError> {
        let cache_config = self.config.cache_config()?;
        let cache = Arc::new(HexCache::new(cache_config)?.with_oracle(self.oracle()));

        let service = CoverageService::new(self.oracle(), cache).with_jitter(jitter_for(seed));
        info!("Coverage service created");
        Ok(Arc::new(service))
    }

    /// Write a value as pretty JSON.
    pub fn write_json<T: Serialize>(&self, path: &Path, value: &T) -> Result<(), CliError> {
        write_json(path, value)?;
        info!(path = %path.display(), "Wrote JSON output");
        Ok(())
    }
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), CliError> {
    let file_error = |error| CliError::FileWrite {
        path: PathBuf::from(path),
        error,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(file_error)?;
    }
    let file = File::create(path).map_err(file_error)?;
    serde_json::to_writer_pretty(BufWriter::new(file), value).map_err(CliError::Serialize)
}
