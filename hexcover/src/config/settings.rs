//! Settings structs for all configuration sections.
//!
//! Each struct represents one `[section]` of the INI config file.
//! Conversion into runtime configuration validates the values.

use std::path::PathBuf;
use std::time::Duration;

use super::file::ConfigFileError;
use crate::cache::{HexCacheConfig, OverrunPolicy};
use crate::coverage::CoverageConfig;

/// Complete application configuration loaded from config.ini.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigFile {
    /// Coverage generation defaults
    pub coverage: CoverageSettings,
    /// Performance cache settings
    pub cache: CacheSettings,
    /// Logging settings
    pub logging: LoggingSettings,
}

/// Coverage generation defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct CoverageSettings {
    /// Resolutions generated when none are given on the command line
    pub resolutions: Vec<u8>,
    pub include_ocean: bool,
    pub include_antarctica: bool,
    /// Minimum land percentage for a land hexagon
    pub min_land_coverage: f64,
    pub verify_completeness: bool,
    pub max_hexagons_per_resolution: usize,
    pub adaptive_detail: bool,
    /// Seed for score jitter; `None` draws fresh jitter every run
    pub seed: Option<u64>,
}

/// Performance cache configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheSettings {
    /// Memory ceiling in bytes
    pub max_memory: usize,
    pub max_entries: usize,
    pub ttl_minutes: u64,
    /// Spatial index bucket size in degrees
    pub spatial_grid_size: u32,
    pub preload_radius: u32,
    pub compression: bool,
    pub cleanup_interval_secs: u64,
    pub metrics_interval_secs: u64,
    pub overrun_policy: OverrunPolicy,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingSettings {
    /// Directory holding the log file
    pub directory: PathBuf,
    /// Log file name
    pub file: String,
    /// Mirror log events to stdout
    pub stdout: bool,
    /// Debug level for hexcover when RUST_LOG is unset
    pub debug: bool,
}

impl ConfigFile {
    /// Validated coverage configuration built from `[coverage]`.
    pub fn coverage_config(&self) -> Result<CoverageConfig, ConfigFileError> {
        let s = &self.coverage;
        let config = CoverageConfig::default()
            .with_resolutions(s.resolutions.clone())
            .with_ocean(s.include_ocean)
            .with_antarctica(s.include_antarctica)
            .with_min_land_coverage(s.min_land_coverage)
            .with_verification(s.verify_completeness)
            .with_max_hexagons(s.max_hexagons_per_resolution)
            .with_adaptive_detail(s.adaptive_detail);
        config.validate()?;
        Ok(config)
    }

    /// Validated cache configuration built from `[cache]`.
    pub fn cache_config(&self) -> Result<HexCacheConfig, ConfigFileError> {
        let s = &self.cache;
        let config = HexCacheConfig::default()
            .with_max_memory(s.max_memory)
            .with_max_entries(s.max_entries)
            .with_ttl(Duration::from_secs(s.ttl_minutes.saturating_mul(60)))
            .with_spatial_grid_size(s.spatial_grid_size)
            .with_preload_radius(s.preload_radius)
            .with_compression(s.compression)
            .with_cleanup_interval(Duration::from_secs(s.cleanup_interval_secs))
            .with_metrics_interval(Duration::from_secs(s.metrics_interval_secs))
            .with_overrun_policy(s.overrun_policy);
        config.validate()?;
        Ok(config)
    }
}
