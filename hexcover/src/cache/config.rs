//! Performance cache configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::CacheError;

/// Default memory ceiling (100 MB).
pub const DEFAULT_MAX_MEMORY_BYTES: usize = 100 * 1024 * 1024;

/// Default maximum number of entries.
pub const DEFAULT_MAX_ENTRIES: usize = 50;

/// Default entry time-to-live (30 minutes).
pub const DEFAULT_TTL: Duration = Duration::from_secs(30 * 60);

/// Default spatial index bucket size in degrees.
pub const DEFAULT_SPATIAL_GRID_SIZE: u32 = 10;

/// Default number of neighbouring viewports to preload on each side.
pub const DEFAULT_PRELOAD_RADIUS: u32 = 2;

/// Default interval between TTL sweeps (5 minutes).
pub const DEFAULT_CLEANUP_INTERVAL: Duration = Duration::from_secs(5 * 60);

/// Default interval between metrics refreshes (30 seconds).
pub const DEFAULT_METRICS_INTERVAL: Duration = Duration::from_secs(30);

/// What to do when eviction cannot make room for a new entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverrunPolicy {
    /// Insert anyway and log the overrun
    #[default]
    BestEffort,
    /// Refuse the insert with [`CacheError::CapacityExceeded`]
    Reject,
}

impl OverrunPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            OverrunPolicy::BestEffort => "best_effort",
            OverrunPolicy::Reject => "reject",
        }
    }
}

impl std::str::FromStr for OverrunPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "best_effort" | "besteffort" => Ok(OverrunPolicy::BestEffort),
            "reject" => Ok(OverrunPolicy::Reject),
            other => Err(format!("unknown overrun policy '{}'", other)),
        }
    }
}

/// Performance cache configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct HexCacheConfig {
    /// Memory ceiling in bytes (default: 100 MB)
    pub max_memory_bytes: usize,
    /// Maximum number of entries (default: 50)
    pub max_entries: usize,
    /// Age after which the maintenance sweep drops an entry (default: 30 min)
    pub ttl: Duration,
    /// Spatial index bucket size in degrees (default: 10)
    pub spatial_grid_size: u32,
    /// Neighbouring viewports preloaded per side (default: 2)
    pub preload_radius: u32,
    /// Store entries compressed (default: true)
    pub compression_enabled: bool,
    /// Interval between TTL sweeps (default: 5 min)
    pub cleanup_interval: Duration,
    /// Interval between metrics refreshes (default: 30 s)
    pub metrics_interval: Duration,
    /// Behaviour when eviction cannot free enough room
    pub overrun_policy: OverrunPolicy,
}

impl Default for HexCacheConfig {
    fn default() -> Self {
        Self {
            max_memory_bytes: DEFAULT_MAX_MEMORY_BYTES,
            max_entries: DEFAULT_MAX_ENTRIES,
            ttl: DEFAULT_TTL,
            spatial_grid_size: DEFAULT_SPATIAL_GRID_SIZE,
            preload_radius: DEFAULT_PRELOAD_RADIUS,
            compression_enabled: true,
            cleanup_interval: DEFAULT_CLEANUP_INTERVAL,
            metrics_interval: DEFAULT_METRICS_INTERVAL,
            overrun_policy: OverrunPolicy::BestEffort,
        }
    }
}

impl HexCacheConfig {
    /// Set the memory ceiling in bytes.
    pub fn with_max_memory(mut self, bytes: usize) -> Self {
        self.max_memory_bytes = bytes;
        self
    }

    /// Set the maximum entry count.
    pub fn with_max_entries(mut self, entries: usize) -> Self {
        self.max_entries = entries;
        self
    }

    /// Set the entry time-to-live.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Set the spatial index bucket size in degrees.
    pub fn with_spatial_grid_size(mut self, degrees: u32) -> Self {
        self.spatial_grid_size = degrees;
        self
    }

    /// Set the preload radius.
    pub fn with_preload_radius(mut self, radius: u32) -> Self {
        self.preload_radius = radius;
        self
    }

    /// Enable or disable compression.
    pub fn with_compression(mut self, enabled: bool) -> Self {
        self.compression_enabled = enabled;
        self
    }

    /// Set the TTL sweep interval.
    pub fn with_cleanup_interval(mut self, interval: Duration) -> Self {
        self.cleanup_interval = interval;
        self
    }

    /// Set the metrics refresh interval.
    pub fn with_metrics_interval(mut self, interval: Duration) -> Self {
        self.metrics_interval = interval;
        self
    }

    /// Set the overrun policy.
    pub fn with_overrun_policy(mut self, policy: OverrunPolicy) -> Self {
        self.overrun_policy = policy;
        self
    }

    /// Memory ceiling in megabytes.
    pub fn max_memory_mb(&self) -> f64 {
        self.max_memory_bytes as f64 / (1024.0 * 1024.0)
    }

    /// Check the configuration.
    pub fn validate(&self) -> Result<(), CacheError> {
        if self.max_memory_bytes == 0 {
            return Err(CacheError::InvalidConfig(
                "max_memory_bytes must be greater than zero".to_string(),
            ));
        }
        if self.max_entries == 0 {
            return Err(CacheError::InvalidConfig(
                "max_entries must be greater than zero".to_string(),
            ));
        }
        if !(1..=90).contains(&self.spatial_grid_size) {
            return Err(CacheError::InvalidConfig(format!(
                "spatial_grid_size {} outside 1..=90",
                self.spatial_grid_size
            )));
        }
        if self.ttl.is_zero() {
            return Err(CacheError::InvalidConfig(
                "ttl must be greater than zero".to_string(),
            ));
        }
        if self.cleanup_interval.is_zero() || self.metrics_interval.is_zero() {
            return Err(CacheError::InvalidConfig(
                "maintenance intervals must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
