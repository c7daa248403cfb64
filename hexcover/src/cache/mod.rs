//! Performance cache for generated hexagon coverage.
//!
//! Holds hexagon maps under caller-chosen keys within a memory ceiling,
//! evicting by a weighted priority/popularity/recency score, expiring by TTL
//! and culling retrievals to a viewport through a spatial bucket index.

mod compress;
mod config;
mod daemon;
mod entry;
mod eviction;
mod memory;
mod spatial_index;
mod stats;
mod types;
mod viewport;

pub use compress::{
    compress, decompress, estimate_raw_size, hexagon_count, CACHED_REGION,
    FALLBACK_BYTES_PER_RECORD,
};
pub use config::{
    HexCacheConfig, OverrunPolicy, DEFAULT_CLEANUP_INTERVAL, DEFAULT_MAX_ENTRIES,
    DEFAULT_MAX_MEMORY_BYTES, DEFAULT_METRICS_INTERVAL, DEFAULT_PRELOAD_RADIUS,
    DEFAULT_SPATIAL_GRID_SIZE, DEFAULT_TTL,
};
pub use daemon::CacheMaintenanceDaemon;
pub use eviction::eviction_score;
pub use memory::HexCache;
pub use spatial_index::{BucketKey, SpatialCell, SpatialIndex};
pub use stats::{CacheStatistics, CacheStats, PerformanceMetrics, HIT_RATE_SMOOTHING};
pub use types::{CacheError, StoreOutcome, DEFAULT_PRIORITY, MAX_PRIORITY, WARM_PRIORITY};
pub use viewport::{Viewport, VIEWPORT_MARGIN_DEGREES};
