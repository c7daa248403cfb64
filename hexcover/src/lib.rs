//! hexcover - global H3 hexagon land coverage with a viewport cache
//!
//! This library generates land (and optionally ocean) coverage of the globe
//! as H3 hexagons at several resolutions, classifies and scores each
//! hexagon, and keeps generated coverage in a memory-bounded cache that
//! serves viewport-culled subsets.
//!
//! # High-Level API
//!
//! For most use cases, the [`service`] module provides a cache-through facade:
//!
//! ```no_run
//! use std::sync::Arc;
//! use hexcover::cache::{HexCache, HexCacheConfig, Viewport};
//! use hexcover::coverage::CoverageConfig;
//! use hexcover::oracle::LandmassOracle;
//! use hexcover::service::CoverageService;
//! use tokio_util::sync::CancellationToken;
//!
//! let cache = Arc::new(HexCache::new(HexCacheConfig::default())?);
//! let service = CoverageService::new(Arc::new(LandmassOracle::new()), cache);
//!
//! let viewport = Viewport::new(48.0, 2.0, 4.0);
//! let response = service.coverage(
//!     &CoverageConfig::default(),
//!     Some(&viewport),
//!     &CancellationToken::new(),
//! )?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod cache;
pub mod config;
pub mod coord;
pub mod coverage;
pub mod hex;
pub mod logging;
pub mod oracle;
pub mod region;
pub mod service;

/// Version of the hexcover library and CLI.
///
/// This is synchronized across all components in the workspace.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
