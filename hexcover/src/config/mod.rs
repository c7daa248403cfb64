//! Configuration file for hexcover.
//!
//! User settings live in `~/.hexcover/config.ini`, one `[section]` per
//! concern:
//!
//! - `[coverage]` - defaults for coverage generation
//! - `[cache]` - performance cache limits and maintenance intervals
//! - `[logging]` - log file location and verbosity
//!
//! A missing file yields defaults. Settings convert into the validated
//! runtime configurations [`CoverageConfig`](crate::coverage::CoverageConfig)
//! and [`HexCacheConfig`](crate::cache::HexCacheConfig).
//!
//! # Example
//!
//! ```
//! use hexcover::config::ConfigFile;
//!
//! let config = ConfigFile::default();
//! let cache = config.cache_config().unwrap();
//! assert_eq!(cache.max_entries, 50);
//! ```

mod defaults;
mod file;
mod parser;
mod settings;
mod size;
mod writer;

pub use defaults::*;
pub use file::{config_directory, config_file_path, ConfigFileError};
pub use settings::{CacheSettings, ConfigFile, CoverageSettings, LoggingSettings};
pub use size::{format_size, parse_size, SizeParseError};
