//! Eviction scoring.
//!
//! Entries are ranked by a weighted blend of caller priority, popularity and
//! recency; the lowest score is evicted first.

/// Weighted eviction score of an entry. Higher scores survive longer.
///
/// ```text
/// 0.4·priority
///   + 0.3·min(100, access_count·10)
///   + 0.2·max(0, 100 − hours_since_access·2)
///   + 0.1·max(0, 100 − hours_since_creation)
/// ```
pub fn eviction_score(
    priority: u8,
    access_count: u64,
    hours_since_access: f64,
    hours_since_creation: f64,
) -> f64 {
    let priority = f64::from(priority);
    let popularity = (access_count as f64 * 10.0).min(100.0);
    let recency = (100.0 - hours_since_access * 2.0).max(0.0);
    let freshness = (100.0 - hours_since_creation).max(0.0);

    0.4 * priority + 0.3 * popularity + 0.2 * recency + 0.1 * freshness
}
