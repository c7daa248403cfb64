//! Cache statistics and performance metrics.

use std::time::{Duration, Instant};

use serde::Serialize;

/// Smoothing factor of the hit-rate moving average.
pub const HIT_RATE_SMOOTHING: f64 = 0.1;

/// Cumulative cache counters for monitoring and debugging.
#[derive(Debug, Clone)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub stores: u64,
    pub evictions: u64,
    pub expirations: u64,
    /// Inserts that went over the memory ceiling
    pub overruns: u64,
    /// Stores that fell back to raw storage after a compression failure
    pub compression_fallbacks: u64,
    pub size_bytes: usize,
    pub entry_count: usize,

    // Timing
    pub created_at: Instant,
}

impl Default for CacheStats {
    fn default() -> Self {
        Self::new()
    }
}

impl CacheStats {
    /// Create a new statistics tracker.
    pub fn new() -> Self {
        Self {
            hits: 0,
            misses: 0,
            stores: 0,
            evictions: 0,
            expirations: 0,
            overruns: 0,
            compression_fallbacks: 0,
            size_bytes: 0,
            entry_count: 0,
            created_at: Instant::now(),
        }
    }

    /// Cumulative hit rate (0.0 to 1.0).
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    /// Get the uptime duration since statistics started.
    pub fn uptime(&self) -> Duration {
        self.created_at.elapsed()
    }

    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_store(&mut self) {
        self.stores += 1;
    }

    pub fn record_eviction(&mut self, count: u64) {
        self.evictions += count;
    }

    pub fn record_expiration(&mut self, count: u64) {
        self.expirations += count;
    }

    pub fn record_overrun(&mut self) {
        self.overruns += 1;
    }

    pub fn record_compression_fallback(&mut self) {
        self.compression_fallbacks += 1;
    }

    /// Update size metrics.
    pub fn update_size(&mut self, size_bytes: usize, entry_count: usize) {
        self.size_bytes = size_bytes;
        self.entry_count = entry_count;
    }
}

/// Performance summary exposed to the rendering layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PerformanceMetrics {
    /// Exponential moving average of hits (0.0 to 1.0)
    pub cache_hit_rate: f64,
    pub memory_usage_mb: f64,
    pub max_memory_mb: f64,
    /// Hexagons returned by the last retrieve
    pub active_hexagons: usize,
    /// Hexagons dropped by the last viewport cull
    pub culled_hexagons: usize,
    /// Duration of the last retrieve in milliseconds
    pub loading_time_ms: f64,
    /// Reported by the rendering layer
    pub rendering_fps: f64,
}

impl PerformanceMetrics {
    /// Fold one retrieve outcome into the hit-rate average.
    pub fn record_attempt(&mut self, hit: bool) {
        let sample = if hit { 1.0 } else { 0.0 };
        self.cache_hit_rate =
            HIT_RATE_SMOOTHING * sample + (1.0 - HIT_RATE_SMOOTHING) * self.cache_hit_rate;
    }

    /// Record the outcome of a viewport retrieve.
    pub fn record_load(&mut self, active: usize, culled: usize, elapsed: Duration) {
        self.active_hexagons = active;
        self.culled_hexagons = culled;
        self.loading_time_ms = elapsed.as_secs_f64() * 1000.0;
    }

    pub fn update_memory(&mut self, size_bytes: usize) {
        self.memory_usage_mb = size_bytes as f64 / (1024.0 * 1024.0);
    }
}

/// Snapshot of cache statistics for reporting.
#[derive(Debug, Clone)]
pub struct CacheStatistics {
    pub stats: CacheStats,
    pub metrics: PerformanceMetrics,
    pub hit_rate_percent: f64,
    pub uptime_secs: u64,
}

impl CacheStatistics {
    /// Create a statistics snapshot.
    pub fn new(stats: &CacheStats, metrics: &PerformanceMetrics) -> Self {
        Self {
            stats: stats.clone(),
            metrics: metrics.clone(),
            hit_rate_percent: stats.hit_rate() * 100.0,
            uptime_secs: stats.uptime().as_secs(),
        }
    }

    /// Format statistics as a human-readable string.
    pub fn format(&self) -> String {
        let stats = &self.stats;
        let metrics = &self.metrics;

        format!(
            r#"Hexagon Cache Statistics

ENTRIES
  Entries:     {}
  Size:        {:.2} MB / {:.2} MB
  Stores:      {}
  Evictions:   {}
  Expired:     {}
  Overruns:    {}

RETRIEVAL
  Hits:        {}
  Misses:      {}
  Hit Rate:    {:.1}% (moving avg {:.1}%)
  Active:      {}
  Culled:      {}
  Load Time:   {:.2} ms

Uptime:        {}s
"#,
            stats.entry_count,
            metrics.memory_usage_mb,
            metrics.max_memory_mb,
            stats.stores,
            stats.evictions,
            stats.expirations,
            stats.overruns,
            stats.hits,
            stats.misses,
            self.hit_rate_percent,
            metrics.cache_hit_rate * 100.0,
            metrics.active_hexagons,
            metrics.culled_hexagons,
            metrics.loading_time_ms,
            self.uptime_secs,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_stats_default() {
        let stats = CacheStats::default();
        assert_eq!(stats.hits, 0);
        assert_eq!(stats.misses, 0);
        assert_eq!(stats.evictions, 0);
        assert_eq!(stats.hit_rate(), 0.0);
    }

    #[test]
    fn test_hit_rate_mixed() {
        let mut stats = CacheStats::new();
        stats.hits = 75;
        stats.misses = 25;
        assert_eq!(stats.hit_rate(), 0.75);
    }

    #[test]
    fn test_record_counters() {
        let mut stats = CacheStats::new();
        stats.record_hit();
        stats.record_miss();
        stats.record_store();
        stats.record_eviction(3);
        stats.record_expiration(2);
        stats.record_overrun();
        stats.record_compression_fallback();

        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.stores, 1);
        assert_eq!(stats.evictions, 3);
        assert_eq!(stats.expirations, 2);
        assert_eq!(stats.overruns, 1);
        assert_eq!(stats.compression_fallbacks, 1);
    }

    #[test]
    fn test_ema_hit_rate() {
        let mut metrics = PerformanceMetrics::default();
        metrics.record_attempt(true);
        assert!((metrics.cache_hit_rate - 0.1).abs() < 1e-12);
        metrics.record_attempt(true);
        assert!((metrics.cache_hit_rate - 0.19).abs() < 1e-12);
        metrics.record_attempt(false);
        assert!((metrics.cache_hit_rate - 0.171).abs() < 1e-12);
    }

    #[test]
    fn test_ema_converges_towards_one() {
        let mut metrics = PerformanceMetrics::default();
        for _ in 0..200 {
            metrics.record_attempt(true);
        }
        assert!(metrics.cache_hit_rate > 0.99);
        assert!(metrics.cache_hit_rate <= 1.0);
    }

    #[test]
    fn test_record_load() {
        let mut metrics = PerformanceMetrics::default();
        metrics.record_load(10, 5, Duration::from_millis(3));
        assert_eq!(metrics.active_hexagons, 10);
        assert_eq!(metrics.culled_hexagons, 5);
        assert!((metrics.loading_time_ms - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_update_memory() {
        let mut metrics = PerformanceMetrics::default();
        metrics.update_memory(2 * 1024 * 1024);
        assert_eq!(metrics.memory_usage_mb, 2.0);
    }

    #[test]
    fn test_statistics_format() {
        let mut stats = CacheStats::new();
        stats.hits = 9;
        stats.misses = 1;
        let snapshot = CacheStatistics::new(&stats, &PerformanceMetrics::default());
        assert_eq!(snapshot.hit_rate_percent, 90.0);
        let text = snapshot.format();
        assert!(text.contains("Hexagon Cache Statistics"));
        assert!(text.contains("Hits:        9"));
    }
}
