//! Cache entries.

use std::time::Instant;

use super::eviction::eviction_score;
use crate::coverage::HexagonMap;

const SECS_PER_HOUR: f64 = 3600.0;

/// Stored form of a hexagon map.
#[derive(Debug, Clone)]
pub(crate) enum Payload {
    Raw(HexagonMap),
    Compressed(Vec<u8>),
}

impl Payload {
    pub(crate) fn is_compressed(&self) -> bool {
        matches!(self, Payload::Compressed(_))
    }
}

/// Entry in the performance cache.
#[derive(Debug, Clone)]
pub(crate) struct CacheEntry {
    pub(crate) payload: Payload,
    /// Insertion time
    pub(crate) timestamp: Instant,
    pub(crate) access_count: u64,
    pub(crate) last_access: Instant,
    /// Estimated size in bytes
    pub(crate) size: usize,
    pub(crate) priority: u8,
    /// Ids indexed in the spatial index for this entry
    pub(crate) indexed_ids: Vec<(String, (i32, i32))>,
}

impl CacheEntry {
    /// Create an entry as freshly stored: one access, timestamps now.
    pub(crate) fn new(payload: Payload, size: usize, priority: u8) -> Self {
        let now = Instant::now();
        Self {
            payload,
            timestamp: now,
            access_count: 1,
            last_access: now,
            size,
            priority,
            indexed_ids: Vec::new(),
        }
    }

    /// Update access time and increment access count.
    pub(crate) fn touch(&mut self) {
        self.last_access = Instant::now();
        self.access_count += 1;
    }

    /// Eviction score as of `now`.
    pub(crate) fn score_at(&self, now: Instant) -> f64 {
        let since_access = now.saturating_duration_since(self.last_access).as_secs_f64();
        let since_created = now.saturating_duration_since(self.timestamp).as_secs_f64();
        eviction_score(
            self.priority,
            self.access_count,
            since_access / SECS_PER_HOUR,
            since_created / SECS_PER_HOUR,
        )
    }

    /// True if the entry is older than `ttl` as of `now`.
    pub(crate) fn is_expired(&self, now: Instant, ttl: std::time::Duration) -> bool {
        now.saturating_duration_since(self.timestamp) > ttl
    }
}
