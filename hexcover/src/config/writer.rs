//! INI serialization logic for converting `ConfigFile` → INI string.
//!
//! Produces the commented representation written to `config.ini`.

use std::path::Path;

use super::settings::ConfigFile;
use super::size::format_size;

/// Convert a `ConfigFile` to a commented INI string for saving.
pub(super) fn to_config_string(config: &ConfigFile) -> String {
    let coverage = &config.coverage;
    let cache = &config.cache;
    let logging = &config.logging;

    let resolutions = coverage
        .resolutions
        .iter()
        .map(u8::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    let seed = coverage.seed.map(|s| s.to_string()).unwrap_or_default();

    format!(
        r#"[coverage]
; H3 resolutions generated by default, comma separated (0-7, default: 2, 3, 4)
resolutions = {}
; Add open-ocean hexagons after the land sweep (default: false)
include_ocean = {}
; Sweep Antarctica (default: false)
include_antarctica = {}
; Minimum percentage of land samples for a land hexagon (default: 10)
min_land_coverage = {}
; Check land hexagons for uncovered neighbours after each pass (default: true)
verify_completeness = {}
; Cap on hexagons kept per resolution (default: 50000)
max_hexagons_per_resolution = {}
; Sweep island regions at double density (default: true)
adaptive_detail = {}
; Seed for opportunity score jitter; empty draws fresh jitter every run
seed = {}

[cache]
; Memory ceiling for cached coverage (default: 100MB)
; Supports: KB, MB, GB suffixes (e.g., 512KB, 100MB, 1GB)
max_memory = {}
; Maximum number of cached coverage sets (default: 50)
max_entries = {}
; Minutes before the maintenance sweep drops an entry (default: 30)
ttl_minutes = {}
; Spatial index bucket size in degrees (default: 10)
spatial_grid_size = {}
; Neighbouring viewports to preload on each side (default: 2)
preload_radius = {}
; Store cached coverage gzip-compressed (default: true)
compression = {}
; Seconds between expiry sweeps (default: 300)
cleanup_interval_secs = {}
; Seconds between metrics refreshes (default: 30)
metrics_interval_secs = {}
; When eviction cannot make room (default: best_effort)
;   best_effort - store anyway and log a warning
;   reject      - refuse the store
overrun_policy = {}

[logging]
; Directory for log files (default: ~/.hexcover/logs)
directory = {}
; Log file name, cleared at startup (default: hexcover.log)
file = {}
; Mirror log output to the terminal (default: true)
stdout = {}
; Debug logging when RUST_LOG is not set (default: false)
debug = {}
"#,
        resolutions,
        coverage.include_ocean,
        coverage.include_antarctica,
        coverage.min_land_coverage,
        coverage.verify_completeness,
        coverage.max_hexagons_per_resolution,
        coverage.adaptive_detail,
        seed,
        format_size(cache.max_memory),
        cache.max_entries,
        cache.ttl_minutes,
        cache.spatial_grid_size,
        cache.preload_radius,
        cache.compression,
        cache.cleanup_interval_secs,
        cache.metrics_interval_secs,
        cache.overrun_policy.as_str(),
        path_to_string(&logging.directory),
        logging.file,
        logging.stdout,
        logging.debug,
    )
}

/// Render a path, abbreviating the home directory to `~`.
fn path_to_string(path: &Path) -> String {
    if let Some(home) = dirs::home_dir() {
        if let Ok(stripped) = path.strip_prefix(&home) {
            return format!("~/{}", stripped.display());
        }
    }
    path.display().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ini::Ini;

    #[test]
    fn test_output_is_valid_ini() {
        let content = to_config_string(&ConfigFile::default());
        let ini = Ini::load_from_str(&content).unwrap();

        for section in ["coverage", "cache", "logging"] {
            assert!(ini.section(Some(section)).is_some(), "missing [{}]", section);
        }
        let cache = ini.section(Some("cache")).unwrap();
        assert_eq!(cache.get("max_memory"), Some("100MB"));
        assert_eq!(cache.get("overrun_policy"), Some("best_effort"));
    }

    #[test]
    fn test_resolutions_are_comma_separated() {
        let mut config = ConfigFile::default();
        config.coverage.resolutions = vec![1, 4, 6];

        let content = to_config_string(&config);
        assert!(content.contains("resolutions = 1, 4, 6"));
    }

    #[test]
    fn test_unseeded_writes_empty_seed() {
        let content = to_config_string(&ConfigFile::default());
        assert!(content.contains("seed = \n"));
    }

    #[test]
    fn test_path_to_string_abbreviates_home() {
        if let Some(home) = dirs::home_dir() {
            assert_eq!(path_to_string(&home.join("logs")), "~/logs");
        }
        assert_eq!(path_to_string(Path::new("/tmp/x")), "/tmp/x");
    }
}
