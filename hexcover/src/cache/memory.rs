//! In-memory hexagon cache with score-based eviction.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::compress::{compress, decompress, estimate_raw_size, hexagon_count};
use super::daemon::CacheMaintenanceDaemon;
use super::entry::{CacheEntry, Payload};
use super::spatial_index::SpatialIndex;
use super::stats::{CacheStatistics, CacheStats, PerformanceMetrics};
use super::types::{CacheError, StoreOutcome, MAX_PRIORITY};
use super::viewport::Viewport;
use super::HexCacheConfig;
use super::OverrunPolicy;
use crate::coverage::HexagonMap;
use crate::oracle::LandOracle;

/// Mutable cache state, guarded by a single lock.
struct CacheState {
    entries: HashMap<String, CacheEntry>,
    total_size: usize,
    stats: CacheStats,
    metrics: PerformanceMetrics,
}

/// Memory-bounded cache of generated hexagon maps.
///
/// Entries are keyed by a caller-chosen string. When the memory ceiling or
/// the entry limit would be exceeded, the entries with the lowest
/// [`eviction_score`](super::eviction_score) are dropped first.
///
/// The cache is an ordinary value: share it with `Arc` and call
/// [`dispose`](Self::dispose) when done.
///
/// # Example
///
/// ```
/// use hexcover::cache::{HexCache, HexCacheConfig, DEFAULT_PRIORITY};
/// use hexcover::coverage::HexagonMap;
///
/// let cache = HexCache::new(HexCacheConfig::default()).unwrap();
/// cache.store("empty", HexagonMap::new(), DEFAULT_PRIORITY).unwrap();
/// assert!(cache.get("empty", None).is_some());
/// assert!(cache.get("other", None).is_none());
/// ```
pub struct HexCache {
    config: HexCacheConfig,
    state: Mutex<CacheState>,
    index: SpatialIndex,
    /// Re-derives coastal flags when decompressing
    oracle: Option<Arc<dyn LandOracle>>,
    shutdown: CancellationToken,
}

impl HexCache {
    /// Create a cache, validating the configuration.
    pub fn new(config: HexCacheConfig) -> Result<Self, CacheError> {
        config.validate()?;

        let metrics = PerformanceMetrics {
            max_memory_mb: config.max_memory_mb(),
            ..PerformanceMetrics::default()
        };

        Ok(Self {
            index: SpatialIndex::new(config.spatial_grid_size),
            config,
            state: Mutex::new(CacheState {
                entries: HashMap::new(),
                total_size: 0,
                stats: CacheStats::new(),
                metrics,
            }),
            oracle: None,
            shutdown: CancellationToken::new(),
        })
    }

    /// Use an oracle to restore coastal flags of compressed entries.
    pub fn with_oracle(mut self, oracle: Arc<dyn LandOracle>) -> Self {
        self.oracle = Some(oracle);
        self
    }

    pub fn config(&self) -> &HexCacheConfig {
        &self.config
    }

    pub fn spatial_index(&self) -> &SpatialIndex {
        &self.index
    }

    fn lock(&self) -> MutexGuard<'_, CacheState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Store a hexagon map under `key`.
    ///
    /// Replaces any existing entry for the key. Priority is clamped to 0–100.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::CapacityExceeded`] only under
    /// [`OverrunPolicy::Reject`] when the entry alone exceeds the ceiling.
    pub fn store(
        &self,
        key: impl Into<String>,
        hexagons: HexagonMap,
        priority: u8,
    ) -> Result<StoreOutcome, CacheError> {
        let key = key.into();
        let priority = priority.min(MAX_PRIORITY);
        let record_count = hexagon_count(&hexagons);

        // Index data is taken before the map is moved into the payload
        let centers: Vec<(String, f64, f64)> = hexagons
            .values()
            .flatten()
            .map(|r| (r.id.to_string(), r.center.lat, r.center.lon))
            .collect();

        let mut compression_failed = false;
        let (payload, size) = if self.config.compression_enabled {
            match compress(&hexagons) {
                Ok(bytes) => {
                    let size = bytes.len();
                    (Payload::Compressed(bytes), size)
                }
                Err(e) => {
                    warn!(key = %key, error = %e, "Compression failed, storing raw");
                    compression_failed = true;
                    let size = estimate_raw_size(&hexagons);
                    (Payload::Raw(hexagons), size)
                }
            }
        } else {
            let size = estimate_raw_size(&hexagons);
            (Payload::Raw(hexagons), size)
        };
        let compressed = payload.is_compressed();
        let limit = self.config.max_memory_bytes;

        let mut state = self.lock();

        if size > limit && self.config.overrun_policy == OverrunPolicy::Reject {
            warn!(key = %key, size, limit, "Rejecting entry larger than cache");
            return Err(CacheError::CapacityExceeded {
                required: size,
                limit,
            });
        }

        if self.remove_locked(&mut state, &key).is_some() {
            debug!(key = %key, "Replacing existing cache entry");
        }

        let mut evicted = Vec::new();
        while !state.entries.is_empty()
            && (state.total_size + size > limit
                || state.entries.len() + 1 > self.config.max_entries)
        {
            let Some(victim) = lowest_scoring(&state.entries, Instant::now()) else {
                break;
            };
            self.remove_locked(&mut state, &victim);
            evicted.push(victim);
        }

        if !evicted.is_empty() {
            state.stats.record_eviction(evicted.len() as u64);
            debug!(count = evicted.len(), "Evicted cache entries");
        }

        let overrun = state.total_size + size > limit;
        if overrun {
            state.stats.record_overrun();
            warn!(
                key = %key,
                size,
                limit,
                "Cache overrun: entry stored above memory ceiling"
            );
        }

        let mut entry = CacheEntry::new(payload, size, priority);
        let mut seen = HashSet::new();
        for (id, lat, lon) in centers {
            if seen.insert(id.clone()) {
                let bucket = self.index.insert(&id, lat, lon);
                entry.indexed_ids.push((id, bucket));
            }
        }

        state.entries.insert(key.clone(), entry);
        state.total_size += size;
        if compression_failed {
            state.stats.record_compression_fallback();
        }
        state.stats.record_store();
        let (total, count) = (state.total_size, state.entries.len());
        state.stats.update_size(total, count);
        state.metrics.update_memory(total);

        info!(
            key = %key,
            hexagons = record_count,
            size_bytes = size,
            compressed,
            priority,
            evicted = evicted.len(),
            "Cached hexagon map"
        );

        Ok(StoreOutcome {
            size_bytes: size,
            compressed,
            evicted,
            overrun,
        })
    }

    /// Retrieve a hexagon map, optionally culled to a viewport.
    ///
    /// Returns `None` on a miss or when the stored payload cannot be decoded.
    /// Every call feeds the hit-rate moving average.
    pub fn get(&self, key: &str, viewport: Option<&Viewport>) -> Option<HexagonMap> {
        let started = Instant::now();
        let bounds = viewport.map(Viewport::culling_bounds);

        // Candidates are read under the lock so a concurrent removal cannot
        // strip this entry's ids from the index mid-read.
        let (payload, candidates) = {
            let mut state = self.lock();
            let payload = state.entries.get_mut(key).map(|entry| {
                entry.touch();
                entry.payload.clone()
            });
            let Some(payload) = payload else {
                state.stats.record_miss();
                state.metrics.record_attempt(false);
                debug!(key, "Cache miss");
                return None;
            };
            let candidates = bounds.as_ref().map(|b| self.index.candidates(b));
            (payload, candidates)
        };

        let decoded = match payload {
            Payload::Raw(map) => Ok(map),
            Payload::Compressed(bytes) => decompress(&bytes, self.oracle.as_deref()),
        };
        let mut hexagons = match decoded {
            Ok(map) => map,
            Err(e) => {
                warn!(key, error = %e, "Dropping unreadable cache entry");
                let mut state = self.lock();
                self.remove_locked(&mut state, key);
                state.stats.record_miss();
                state.metrics.record_attempt(false);
                let (total, count) = (state.total_size, state.entries.len());
                state.stats.update_size(total, count);
                state.metrics.update_memory(total);
                return None;
            }
        };

        let mut culled = 0;
        if let (Some(bounds), Some(candidates)) = (bounds, candidates) {
            for records in hexagons.values_mut() {
                let before = records.len();
                records.retain(|r| {
                    bounds.contains(r.center.lat, r.center.lon)
                        && candidates.contains(&r.id.to_string())
                });
                culled += before - records.len();
            }
        }

        let active = hexagon_count(&hexagons);
        {
            let mut state = self.lock();
            state.stats.record_hit();
            state.metrics.record_attempt(true);
            state.metrics.record_load(active, culled, started.elapsed());
        }

        debug!(key, active, culled, "Cache hit");
        Some(hexagons)
    }

    /// Check if a key exists in the cache.
    pub fn contains(&self, key: &str) -> bool {
        self.lock().entries.contains_key(key)
    }

    /// Remove an entry, returning whether it existed.
    pub fn remove(&self, key: &str) -> bool {
        let mut state = self.lock();
        let removed = self.remove_locked(&mut state, key).is_some();
        let (total, count) = (state.total_size, state.entries.len());
        state.stats.update_size(total, count);
        state.metrics.update_memory(total);
        removed
    }

    /// Get the current number of entries in the cache.
    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get the current estimated size of the cache in bytes.
    pub fn size_bytes(&self) -> usize {
        self.lock().total_size
    }

    /// Eviction scores of all entries, lowest first.
    pub fn entry_scores(&self) -> Vec<(String, f64)> {
        let now = Instant::now();
        let state = self.lock();
        let mut scores: Vec<(String, f64)> = state
            .entries
            .iter()
            .map(|(k, e)| (k.clone(), e.score_at(now)))
            .collect();
        scores.sort_by(|a, b| a.1.total_cmp(&b.1).then_with(|| a.0.cmp(&b.0)));
        scores
    }

    /// Get cache statistics.
    pub fn stats(&self) -> CacheStats {
        self.lock().stats.clone()
    }

    /// Get the performance metrics.
    pub fn metrics(&self) -> PerformanceMetrics {
        self.lock().metrics.clone()
    }

    /// Snapshot of statistics and metrics for reporting.
    pub fn statistics(&self) -> CacheStatistics {
        let state = self.lock();
        CacheStatistics::new(&state.stats, &state.metrics)
    }

    /// Record the frame rate observed by the rendering layer.
    pub fn record_frame_rate(&self, fps: f64) {
        self.lock().metrics.rendering_fps = fps;
    }

    /// Drop every entry older than the configured TTL, regardless of score.
    ///
    /// Returns the number of entries removed.
    pub fn evict_expired(&self) -> usize {
        let now = Instant::now();
        let mut state = self.lock();

        let expired: Vec<String> = state
            .entries
            .iter()
            .filter(|(_, e)| e.is_expired(now, self.config.ttl))
            .map(|(k, _)| k.clone())
            .collect();

        for key in &expired {
            self.remove_locked(&mut state, key);
        }

        if !expired.is_empty() {
            state.stats.record_expiration(expired.len() as u64);
            let (total, count) = (state.total_size, state.entries.len());
            state.stats.update_size(total, count);
            state.metrics.update_memory(total);
            info!(count = expired.len(), "Expired cache entries");
        }

        expired.len()
    }

    /// Recompute memory usage from live entry sizes.
    pub fn refresh_metrics(&self) {
        let mut state = self.lock();
        let total: usize = state.entries.values().map(|e| e.size).sum();
        let count = state.entries.len();
        state.total_size = total;
        state.stats.update_size(total, count);
        state.metrics.update_memory(total);
        state.metrics.max_memory_mb = self.config.max_memory_mb();
    }

    /// Remove every entry and spatial index bucket.
    pub fn clear(&self) {
        let mut state = self.lock();
        state.entries.clear();
        state.total_size = 0;
        state.stats.update_size(0, 0);
        state.metrics.update_memory(0);
        self.index.clear();
    }

    /// Clear the cache, reset metrics and stop background maintenance.
    pub fn dispose(&self) {
        self.shutdown.cancel();
        self.clear();
        let mut state = self.lock();
        state.stats = CacheStats::new();
        state.metrics = PerformanceMetrics {
            max_memory_mb: self.config.max_memory_mb(),
            ..PerformanceMetrics::default()
        };
        info!("Hexagon cache disposed");
    }

    /// True once [`dispose`](Self::dispose) has been called.
    pub fn is_disposed(&self) -> bool {
        self.shutdown.is_cancelled()
    }

    /// Spawn the TTL sweep and metrics refresh on the current tokio runtime.
    ///
    /// The task stops when `shutdown` is cancelled or the cache is disposed.
    pub fn start_maintenance(self: &Arc<Self>, shutdown: CancellationToken) -> JoinHandle<()> {
        let daemon = CacheMaintenanceDaemon::new(Arc::clone(self))
            .with_cleanup_interval(self.config.cleanup_interval)
            .with_metrics_interval(self.config.metrics_interval);
        // Disposing the cache cancels the daemon through the child token
        let token = self.shutdown.child_token();

        tokio::spawn(async move {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    debug!("Cache maintenance stopped by shutdown");
                }
                _ = daemon.run(token) => {}
            }
        })
    }

    fn remove_locked(&self, state: &mut CacheState, key: &str) -> Option<CacheEntry> {
        let entry = state.entries.remove(key)?;
        state.total_size = state.total_size.saturating_sub(entry.size);
        for (id, bucket) in &entry.indexed_ids {
            self.index.remove(id, *bucket);
        }
        Some(entry)
    }
}

impl Drop for HexCache {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

/// Key of the entry with the lowest eviction score (ties by key).
fn lowest_scoring(entries: &HashMap<String, CacheEntry>, now: Instant) -> Option<String> {
    entries
        .iter()
        .map(|(k, e)| (k, e.score_at(now)))
        .min_by(|a, b| a.1.total_cmp(&b.1).then_with(|| a.0.cmp(b.0)))
        .map(|(k, _)| k.clone())
}
