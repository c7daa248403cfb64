//! Default values for all configuration settings.

use std::path::PathBuf;

use super::settings::*;
use crate::cache::{
    OverrunPolicy, DEFAULT_CLEANUP_INTERVAL, DEFAULT_MAX_ENTRIES, DEFAULT_MAX_MEMORY_BYTES,
    DEFAULT_METRICS_INTERVAL, DEFAULT_PRELOAD_RADIUS, DEFAULT_SPATIAL_GRID_SIZE, DEFAULT_TTL,
};
use crate::coverage::{
    DEFAULT_MAX_HEXAGONS_PER_RESOLUTION, DEFAULT_MIN_LAND_COVERAGE, DEFAULT_RESOLUTIONS,
};

/// Name of the per-user configuration directory under `$HOME`.
pub const CONFIG_DIR_NAME: &str = ".hexcover";

/// Name of the configuration file.
pub const CONFIG_FILE_NAME: &str = "config.ini";

/// Default cache TTL in minutes.
pub const DEFAULT_TTL_MINUTES: u64 = DEFAULT_TTL.as_secs() / 60;

/// Default log directory: `~/.hexcover/logs`.
pub fn default_log_directory() -> PathBuf {
    super::file::config_directory().join("logs")
}

impl Default for CoverageSettings {
    fn default() -> Self {
        Self {
            resolutions: DEFAULT_RESOLUTIONS.to_vec(),
            include_ocean: false,
            include_antarctica: false,
            min_land_coverage: DEFAULT_MIN_LAND_COVERAGE,
            verify_completeness: true,
            max_hexagons_per_resolution: DEFAULT_MAX_HEXAGONS_PER_RESOLUTION,
            adaptive_detail: true,
            seed: None,
        }
    }
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            max_memory: DEFAULT_MAX_MEMORY_BYTES,
            max_entries: DEFAULT_MAX_ENTRIES,
            ttl_minutes: DEFAULT_TTL_MINUTES,
            spatial_grid_size: DEFAULT_SPATIAL_GRID_SIZE,
            preload_radius: DEFAULT_PRELOAD_RADIUS,
            compression: true,
            cleanup_interval_secs: DEFAULT_CLEANUP_INTERVAL.as_secs(),
            metrics_interval_secs: DEFAULT_METRICS_INTERVAL.as_secs(),
            overrun_policy: OverrunPolicy::default(),
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            directory: default_log_directory(),
            file: crate::logging::default_log_file().to_string(),
            stdout: true,
            debug: false,
        }
    }
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            coverage: CoverageSettings::default(),
            cache: CacheSettings::default(),
            logging: LoggingSettings::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::HexCacheConfig;
    use crate::coverage::CoverageConfig;

    #[test]
    fn test_defaults_match_runtime_defaults() {
        let config = ConfigFile::default();

        assert_eq!(config.coverage_config().unwrap(), CoverageConfig::default());
        assert_eq!(config.cache_config().unwrap(), HexCacheConfig::default());
    }

    #[test]
    fn test_default_ttl_minutes() {
        assert_eq!(DEFAULT_TTL_MINUTES, 30);
    }

    #[test]
    fn test_default_log_directory() {
        let dir = default_log_directory();
        assert!(dir.ends_with("logs"));
        assert!(dir.to_string_lossy().contains(CONFIG_DIR_NAME));
    }
}
