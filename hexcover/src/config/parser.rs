//! INI parsing logic for converting `Ini` → `ConfigFile`.
//!
//! This is the single place where INI key names are mapped to struct fields.

use ini::{Ini, Properties};
use std::path::PathBuf;
use std::str::FromStr;

use super::file::ConfigFileError;
use super::settings::ConfigFile;
use super::size::parse_size;

/// Parse an `Ini` object into a `ConfigFile`.
///
/// Starts from `ConfigFile::default()` and overlays any values found in the INI.
pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    // [coverage] section
    if let Some(section) = ini.section(Some("coverage")) {
        let s = Section::new("coverage", section);
        if let Some(v) = section.get("resolutions") {
            config.coverage.resolutions = parse_resolutions(v)?;
        }
        s.set(&mut config.coverage.include_ocean, "include_ocean", parse_bool, BOOL_REASON)?;
        s.set(
            &mut config.coverage.include_antarctica,
            "include_antarctica",
            parse_bool,
            BOOL_REASON,
        )?;
        s.set(
            &mut config.coverage.min_land_coverage,
            "min_land_coverage",
            parse_from_str,
            "must be a number between 0 and 100",
        )?;
        s.set(
            &mut config.coverage.verify_completeness,
            "verify_completeness",
            parse_bool,
            BOOL_REASON,
        )?;
        s.set(
            &mut config.coverage.max_hexagons_per_resolution,
            "max_hexagons_per_resolution",
            parse_from_str,
            "must be a positive integer",
        )?;
        s.set(&mut config.coverage.adaptive_detail, "adaptive_detail", parse_bool, BOOL_REASON)?;
        if let Some(v) = section.get("seed") {
            let v = v.trim();
            config.coverage.seed = if v.is_empty() {
                None
            } else {
                Some(v.parse().map_err(|_| {
                    invalid("coverage", "seed", v, "must be an unsigned integer or empty")
                })?)
            };
        }
    }

    // [cache] section
    if let Some(section) = ini.section(Some("cache")) {
        let s = Section::new("cache", section);
        s.set(
            &mut config.cache.max_memory,
            "max_memory",
            |v| parse_size(v).ok(),
            "expected format like '100MB', '2GB', or '512KB'",
        )?;
        s.set(
            &mut config.cache.max_entries,
            "max_entries",
            parse_from_str,
            "must be a positive integer",
        )?;
        s.set(
            &mut config.cache.ttl_minutes,
            "ttl_minutes",
            parse_from_str,
            "must be a positive integer (minutes)",
        )?;
        s.set(
            &mut config.cache.spatial_grid_size,
            "spatial_grid_size",
            parse_from_str,
            "must be a positive integer (degrees)",
        )?;
        s.set(
            &mut config.cache.preload_radius,
            "preload_radius",
            parse_from_str,
            "must be a non-negative integer",
        )?;
        s.set(&mut config.cache.compression, "compression", parse_bool, BOOL_REASON)?;
        s.set(
            &mut config.cache.cleanup_interval_secs,
            "cleanup_interval_secs",
            parse_from_str,
            "must be a positive integer (seconds)",
        )?;
        s.set(
            &mut config.cache.metrics_interval_secs,
            "metrics_interval_secs",
            parse_from_str,
            "must be a positive integer (seconds)",
        )?;
        s.set(
            &mut config.cache.overrun_policy,
            "overrun_policy",
            parse_from_str,
            "must be 'best_effort' or 'reject'",
        )?;
    }

    // [logging] section
    if let Some(section) = ini.section(Some("logging")) {
        let s = Section::new("logging", section);
        if let Some(v) = section.get("directory") {
            let v = v.trim();
            if !v.is_empty() {
                config.logging.directory = expand_tilde(v);
            }
        }
        if let Some(v) = section.get("file") {
            let v = v.trim();
            if v.is_empty() || v.contains(['/', '\\']) {
                return Err(invalid("logging", "file", v, "must be a plain file name"));
            }
            config.logging.file = v.to_string();
        }
        s.set(&mut config.logging.stdout, "stdout", parse_bool, BOOL_REASON)?;
        s.set(&mut config.logging.debug, "debug", parse_bool, BOOL_REASON)?;
    }

    Ok(config)
}

const BOOL_REASON: &str = "must be 'true' or 'false'";

/// One INI section, for uniform parse-or-report of its keys.
struct Section<'a> {
    name: &'static str,
    props: &'a Properties,
}

impl<'a> Section<'a> {
    fn new(name: &'static str, props: &'a Properties) -> Self {
        Self { name, props }
    }

    /// Overwrite `field` if `key` is present, failing with `reason` if the
    /// value does not parse.
    fn set<T>(
        &self,
        field: &mut T,
        key: &str,
        parse: impl Fn(&str) -> Option<T>,
        reason: &str,
    ) -> Result<(), ConfigFileError> {
        if let Some(v) = self.props.get(key) {
            *field = parse(v.trim()).ok_or_else(|| invalid(self.name, key, v, reason))?;
        }
        Ok(())
    }
}

fn invalid(section: &str, key: &str, value: &str, reason: &str) -> ConfigFileError {
    ConfigFileError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn parse_from_str<T: FromStr>(v: &str) -> Option<T> {
    v.parse().ok()
}

fn parse_bool(v: &str) -> Option<bool> {
    match v.to_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Some(true),
        "false" | "no" | "off" | "0" => Some(false),
        _ => None,
    }
}

/// Comma-separated resolution list, e.g. `2, 3, 4`.
fn parse_resolutions(v: &str) -> Result<Vec<u8>, ConfigFileError> {
    v.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.parse::<u8>().map_err(|_| {
                invalid(
                    "coverage",
                    "resolutions",
                    v,
                    "expected a comma-separated list like '2, 3, 4'",
                )
            })
        })
        .collect()
}

/// Expand `~/` to the user's home directory.
pub(super) fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::OverrunPolicy;
    use tempfile::TempDir;

    fn load(content: &str) -> Result<ConfigFile, ConfigFileError> {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.ini");
        std::fs::write(&config_path, content).unwrap();
        ConfigFile::load_from(&config_path)
    }

    // =========================================================================
    // [coverage]
    // =========================================================================

    #[test]
    fn test_coverage_section() {
        let config = load(
            r#"
[coverage]
resolutions = 3, 5
include_ocean = true
min_land_coverage = 50
max_hexagons_per_resolution = 1000
adaptive_detail = no
seed = 42
"#,
        )
        .unwrap();

        assert_eq!(config.coverage.resolutions, vec![3, 5]);
        assert!(config.coverage.include_ocean);
        assert!(!config.coverage.include_antarctica);
        assert_eq!(config.coverage.min_land_coverage, 50.0);
        assert_eq!(config.coverage.max_hexagons_per_resolution, 1000);
        assert!(!config.coverage.adaptive_detail);
        assert_eq!(config.coverage.seed, Some(42));
    }

    #[test]
    fn test_empty_seed_means_unseeded() {
        let config = load("[coverage]\nseed =\n").unwrap();
        assert_eq!(config.coverage.seed, None);
    }

    #[test]
    fn test_invalid_resolutions() {
        let err = load("[coverage]\nresolutions = 2, x\n").unwrap_err();
        assert!(err.to_string().contains("coverage.resolutions"));
    }

    #[test]
    fn test_invalid_bool() {
        let err = load("[coverage]\ninclude_ocean = maybe\n").unwrap_err();
        assert!(matches!(err, ConfigFileError::InvalidValue { ref key, .. } if key == "include_ocean"));
    }

    #[test]
    fn test_out_of_range_values_fail_on_conversion() {
        // Parses fine, rejected when turned into a runtime configuration
        let config = load("[coverage]\nresolutions = 9\n").unwrap();
        assert!(matches!(
            config.coverage_config(),
            Err(ConfigFileError::Coverage(_))
        ));
    }

    // =========================================================================
    // [cache]
    // =========================================================================

    #[test]
    fn test_cache_section() {
        let config = load(
            r#"
[cache]
max_memory = 64MB
max_entries = 10
ttl_minutes = 5
spatial_grid_size = 15
compression = false
overrun_policy = reject
"#,
        )
        .unwrap();

        assert_eq!(config.cache.max_memory, 64 * 1024 * 1024);
        assert_eq!(config.cache.max_entries, 10);
        assert_eq!(config.cache.ttl_minutes, 5);
        assert_eq!(config.cache.spatial_grid_size, 15);
        assert!(!config.cache.compression);
        assert_eq!(config.cache.overrun_policy, OverrunPolicy::Reject);

        let cache = config.cache_config().unwrap();
        assert_eq!(cache.ttl, std::time::Duration::from_secs(300));
    }

    #[test]
    fn test_invalid_cache_size() {
        let err = load("[cache]\nmax_memory = 2TB\n").unwrap_err();
        assert!(err.to_string().contains("cache.max_memory"));
        assert!(err.to_string().contains("100MB"));
    }

    #[test]
    fn test_zero_entries_fail_on_conversion() {
        let config = load("[cache]\nmax_entries = 0\n").unwrap();
        assert!(matches!(config.cache_config(), Err(ConfigFileError::Cache(_))));
    }

    #[test]
    fn test_invalid_overrun_policy() {
        let err = load("[cache]\noverrun_policy = panic\n").unwrap_err();
        assert!(err.to_string().contains("best_effort"));
    }

    // =========================================================================
    // [logging]
    // =========================================================================

    #[test]
    fn test_logging_section() {
        let config = load(
            r#"
[logging]
directory = /var/log/hexcover
file = run.log
stdout = off
debug = on
"#,
        )
        .unwrap();

        assert_eq!(config.logging.directory, PathBuf::from("/var/log/hexcover"));
        assert_eq!(config.logging.file, "run.log");
        assert!(!config.logging.stdout);
        assert!(config.logging.debug);
    }

    #[test]
    fn test_logging_file_must_be_plain_name() {
        assert!(load("[logging]\nfile = sub/run.log\n").is_err());
    }

    #[test]
    fn test_expand_tilde() {
        assert_eq!(expand_tilde("/abs/path"), PathBuf::from("/abs/path"));
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_tilde("~/logs"), home.join("logs"));
        }
    }

    #[test]
    fn test_unknown_sections_are_ignored() {
        let config = load("[provider]\ntype = bing\n").unwrap();
        assert_eq!(config, ConfigFile::default());
    }
}
