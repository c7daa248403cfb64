//! Core types for the performance cache.

use thiserror::Error;

/// Priority used when the caller has no preference.
pub const DEFAULT_PRIORITY: u8 = 50;

/// Priority for precomputed entries that should outlive ad-hoc ones.
pub const WARM_PRIORITY: u8 = 90;

/// Highest accepted priority; larger values are clamped.
pub const MAX_PRIORITY: u8 = 100;

/// Cache-related errors.
#[derive(Debug, Error)]
pub enum CacheError {
    /// Invalid cache configuration
    #[error("Invalid cache configuration: {0}")]
    InvalidConfig(String),

    /// Entry does not fit even after evicting everything
    #[error("Cache capacity exceeded: entry of {required} bytes, limit {limit} bytes")]
    CapacityExceeded { required: usize, limit: usize },

    /// Hexagon map could not be serialized or compressed
    #[error("Compression failed: {0}")]
    Compression(String),

    /// Stored bytes could not be decompressed or decoded
    #[error("Decompression failed: {0}")]
    Decompression(String),
}

/// Result of a successful store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreOutcome {
    /// Estimated size of the stored entry in bytes
    pub size_bytes: usize,
    /// Whether the entry was stored compressed
    pub compressed: bool,
    /// Keys evicted to make room, lowest score first
    pub evicted: Vec<String>,
    /// True if the entry was inserted over the memory ceiling
    pub overrun: bool,
}
