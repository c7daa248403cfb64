//! Background maintenance for the hexagon cache.
//!
//! The daemon runs two timers on one tokio task:
//! 1. TTL sweep (default: every 5 minutes) drops entries older than the TTL
//! 2. Metrics refresh (default: every 30 seconds) recomputes memory usage
//!
//! Both take the cache's entry lock, so they never interleave with a store.
//!
//! # Example
//!
//! ```ignore
//! use hexcover::cache::{CacheMaintenanceDaemon, HexCache};
//!
//! let daemon = CacheMaintenanceDaemon::new(Arc::clone(&cache));
//! tokio::spawn(daemon.run(shutdown_token));
//! ```

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::config::{DEFAULT_CLEANUP_INTERVAL, DEFAULT_METRICS_INTERVAL};
use super::HexCache;

/// Background daemon for TTL expiry and metrics refresh.
pub struct CacheMaintenanceDaemon {
    /// Cache being maintained.
    cache: Arc<HexCache>,

    /// Interval between TTL sweeps.
    cleanup_interval: Duration,

    /// Interval between metrics refreshes.
    metrics_interval: Duration,
}

impl CacheMaintenanceDaemon {
    /// Creates a daemon with the default intervals.
    pub fn new(cache: Arc<HexCache>) -> Self {
        Self {
            cache,
            cleanup_interval: DEFAULT_CLEANUP_INTERVAL,
            metrics_interval: DEFAULT_METRICS_INTERVAL,
        }
    }

    /// Sets a custom TTL sweep interval.
    pub fn with_cleanup_interval(mut self, interval: Duration) -> Self {
        self.cleanup_interval = interval;
        self
    }

    /// Sets a custom metrics refresh interval.
    pub fn with_metrics_interval(mut self, interval: Duration) -> Self {
        self.metrics_interval = interval;
        self
    }

    /// Runs one TTL sweep, returning the number of expired entries.
    pub fn sweep(&self) -> usize {
        let expired = self.cache.evict_expired();
        if expired == 0 {
            debug!(entries = self.cache.len(), "TTL sweep found nothing to expire");
        }
        expired
    }

    /// Runs the daemon until shutdown is signalled.
    pub async fn run(self, shutdown: CancellationToken) {
        info!(
            cleanup_interval_secs = self.cleanup_interval.as_secs(),
            metrics_interval_secs = self.metrics_interval.as_secs(),
            ttl_secs = self.cache.config().ttl.as_secs(),
            "Cache maintenance daemon starting"
        );

        let mut cleanup = tokio::time::interval(self.cleanup_interval);
        let mut metrics = tokio::time::interval(self.metrics_interval);
        // Skip the first immediate ticks
        cleanup.tick().await;
        metrics.tick().await;

        loop {
            tokio::select! {
                biased;

                _ = shutdown.cancelled() => {
                    info!("Cache maintenance daemon shutting down");
                    break;
                }

                _ = cleanup.tick() => {
                    self.sweep();
                }

                _ = metrics.tick() => {
                    self.cache.refresh_metrics();
                    debug!(
                        size_bytes = self.cache.size_bytes(),
                        entries = self.cache.len(),
                        "Cache metrics refreshed"
                    );
                }
            }
        }
    }
}
