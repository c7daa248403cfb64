//! Integration tests for the performance cache.
//!
//! These tests store real generated coverage in [`HexCache`] and verify:
//! - Round trips with and without compression
//! - Viewport culling returns a subset of the stored map
//! - Eviction prefers low-scoring entries
//! - TTL expiry through the maintenance task
//!
//! Run with: `cargo test --test cache_integration`

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use proptest::prelude::*;
use tokio_util::sync::CancellationToken;

use hexcover::cache::{
    estimate_raw_size, eviction_score, HexCache, HexCacheConfig, Viewport, DEFAULT_PRIORITY,
    VIEWPORT_MARGIN_DEGREES,
};
use hexcover::coord::GeoBounds;
use hexcover::coverage::{CoverageConfig, CoverageGenerator, HexagonMap, NoJitter};
use hexcover::oracle::{FnOracle, LandOracle};
use hexcover::region::{Region, RegionCatalog, RegionKind};

// ============================================================================
// Test Helpers
// ============================================================================

fn coast_oracle() -> Arc<dyn LandOracle> {
    Arc::new(FnOracle::new(|_lat, lon| lon < 15.0))
}

/// Generated coverage over a small box straddling the coast.
fn create_test_map(bounds: GeoBounds, resolutions: &[u8]) -> HexagonMap {
    CoverageGenerator::new(
        CoverageConfig::default().with_resolutions(resolutions.to_vec()),
        coast_oracle(),
    )
    .unwrap()
    .with_catalog(RegionCatalog::new(vec![Region::new(
        "Test Coast",
        RegionKind::Continental,
        bounds,
    )]))
    .with_jitter(Arc::new(NoJitter))
    .generate(&CancellationToken::new())
    .unwrap()
    .hexagons
}

fn default_map() -> HexagonMap {
    create_test_map(GeoBounds::new(40.0, 50.0, 0.0, 20.0), &[2, 3])
}

fn ids(map: &HexagonMap) -> HashSet<String> {
    map.values().flatten().map(|r| r.id.to_string()).collect()
}

// ============================================================================
// Round trips
// ============================================================================

#[test]
fn test_round_trip_uncompressed_is_exact() {
    let cache = HexCache::new(HexCacheConfig::default().with_compression(false)).unwrap();
    let map = default_map();

    let outcome = cache.store("plain", map.clone(), DEFAULT_PRIORITY).unwrap();
    assert!(!outcome.compressed);
    assert_eq!(cache.get("plain", None), Some(map));
}

#[test]
fn test_round_trip_compressed_keeps_compact_fields() {
    let cache = HexCache::new(HexCacheConfig::default())
        .unwrap()
        .with_oracle(coast_oracle());
    let map = default_map();

    let outcome = cache.store("packed", map.clone(), DEFAULT_PRIORITY).unwrap();
    assert!(outcome.compressed);
    assert!(outcome.size_bytes < estimate_raw_size(&map));

    let restored = cache.get("packed", None).unwrap();
    assert_eq!(ids(&restored), ids(&map));

    for (resolution, records) in &map {
        let restored = &restored[resolution];
        assert_eq!(restored.len(), records.len());
        for (orig, back) in records.iter().zip(restored) {
            assert_eq!(back.id, orig.id);
            assert_eq!(back.center, orig.center);
            assert_eq!(back.land_coverage_pct, orig.land_coverage_pct);
            assert_eq!(back.land_type, orig.land_type);
            assert_eq!(back.base_color, orig.base_color);
            assert_eq!(back.opportunity_score, orig.opportunity_score);
            assert_eq!(back.opportunity_color, orig.opportunity_color);
            // Recomputed from the cell id and the oracle
            assert_eq!(back.boundary, orig.boundary);
            assert_eq!(back.neighbors, orig.neighbors);
            assert_eq!(back.is_coastal, orig.is_coastal);
        }
    }
}

// ============================================================================
// Viewport culling
// ============================================================================

#[test]
fn test_viewport_result_is_subset() {
    let cache = HexCache::new(HexCacheConfig::default()).unwrap();
    let map = create_test_map(GeoBounds::new(20.0, 60.0, -20.0, 40.0), &[2]);
    cache.store("wide", map.clone(), DEFAULT_PRIORITY).unwrap();

    let viewport = Viewport::new(45.0, 10.0, 0.0).with_bounds(GeoBounds::new(40.0, 50.0, 5.0, 15.0));
    let culled = cache.get("wide", Some(&viewport)).unwrap();

    let all = ids(&map);
    let visible = ids(&culled);
    assert!(!visible.is_empty());
    assert!(visible.len() < all.len());
    assert!(visible.is_subset(&all));

    let bounds = viewport.bounds().expand(VIEWPORT_MARGIN_DEGREES);
    for record in culled.values().flatten() {
        assert!(bounds.contains(record.center.lat, record.center.lon));
    }

    let metrics = cache.metrics();
    assert_eq!(metrics.active_hexagons, visible.len());
    assert_eq!(metrics.culled_hexagons, all.len() - visible.len());
}

#[test]
fn test_viewport_get_racing_remove_is_all_or_nothing() {
    let cache = HexCache::new(HexCacheConfig::default()).unwrap();
    let map = create_test_map(GeoBounds::new(20.0, 60.0, -20.0, 40.0), &[3, 4]);
    let viewport = Viewport::new(45.0, 10.0, 0.0).with_bounds(GeoBounds::new(30.0, 55.0, -10.0, 30.0));

    cache.store("k", map.clone(), DEFAULT_PRIORITY).unwrap();
    let expected = ids(&cache.get("k", Some(&viewport)).unwrap());
    assert!(!expected.is_empty());

    for round in 0..40u64 {
        cache.store("k", map.clone(), DEFAULT_PRIORITY).unwrap();

        let result = std::thread::scope(|scope| {
            let reader = scope.spawn(|| cache.get("k", Some(&viewport)));
            std::thread::sleep(Duration::from_micros(100 * round));
            cache.remove("k");
            reader.join().unwrap()
        });

        if let Some(culled) = result {
            assert_eq!(ids(&culled), expected, "round {round} returned a partial map");
        }
        assert_eq!(cache.spatial_index().id_count(), 0);
    }
}

// ============================================================================
// Eviction
// ============================================================================

#[test]
fn test_low_priority_entry_evicted_by_second_store() {
    let map = create_test_map(GeoBounds::new(44.0, 45.0, 14.0, 16.0), &[2]);
    let three: HexagonMap = map
        .into_iter()
        .map(|(res, records)| (res, records.into_iter().take(3).collect()))
        .collect();
    assert_eq!(three.values().map(Vec::len).sum::<usize>(), 3);

    // Room for one entry of this size, not two
    let size = estimate_raw_size(&three);
    let cache = HexCache::new(
        HexCacheConfig::default()
            .with_compression(false)
            .with_max_memory(size * 3 / 2),
    )
    .unwrap();

    cache.store("test", three.clone(), 10).unwrap();
    assert!(cache.get("test", None).is_some());

    let outcome = cache.store("other", three, DEFAULT_PRIORITY).unwrap();
    assert_eq!(outcome.evicted, vec!["test".to_string()]);
    assert!(!outcome.overrun);

    assert_eq!(cache.get("test", None), None);
    assert!(cache.get("other", None).is_some());
}

#[test]
fn test_entry_limit_keeps_high_priority() {
    let cache = HexCache::new(HexCacheConfig::default().with_max_entries(3)).unwrap();
    let map = create_test_map(GeoBounds::new(44.0, 45.0, 14.0, 16.0), &[1]);

    cache.store("warm", map.clone(), 90).unwrap();
    for i in 0..5 {
        cache.store(format!("cold-{}", i), map.clone(), 20).unwrap();
    }

    assert_eq!(cache.len(), 3);
    assert!(cache.contains("warm"));
    assert_eq!(cache.stats().evictions, 3);
}

proptest! {
    /// Property: higher priority never lowers the eviction score.
    #[test]
    fn prop_score_monotonic_in_priority(
        p in 0u8..100,
        accesses in 1u64..1000,
        idle in 0.0f64..48.0,
        age in 0.0f64..48.0,
    ) {
        let low = eviction_score(p, accesses, idle, age);
        let high = eviction_score(p + 1, accesses, idle, age);
        prop_assert!(high >= low);
    }

    /// Property: more accesses never lower the eviction score.
    #[test]
    fn prop_score_monotonic_in_accesses(
        p in 0u8..=100,
        accesses in 1u64..1000,
        idle in 0.0f64..48.0,
        age in 0.0f64..48.0,
    ) {
        let fewer = eviction_score(p, accesses, idle, age);
        let more = eviction_score(p, accesses + 1, idle, age);
        prop_assert!(more >= fewer);
    }

    /// Property: longer idle time never raises the eviction score.
    #[test]
    fn prop_score_decreases_with_idle_time(
        p in 0u8..=100,
        accesses in 1u64..1000,
        idle in 0.0f64..48.0,
        extra in 0.0f64..48.0,
    ) {
        let fresh = eviction_score(p, accesses, idle, idle);
        let stale = eviction_score(p, accesses, idle + extra, idle + extra);
        prop_assert!(stale <= fresh);
    }
}

// ============================================================================
// TTL and maintenance
// ============================================================================

#[tokio::test]
async fn test_maintenance_expires_entries() {
    let cache = Arc::new(
        HexCache::new(
            HexCacheConfig::default()
                .with_ttl(Duration::from_millis(50))
                .with_cleanup_interval(Duration::from_millis(20))
                .with_metrics_interval(Duration::from_millis(20)),
        )
        .unwrap(),
    );
    cache
        .store("short-lived", default_map(), DEFAULT_PRIORITY)
        .unwrap();

    let shutdown = CancellationToken::new();
    let handle = cache.start_maintenance(shutdown.clone());

    tokio::time::sleep(Duration::from_millis(250)).await;
    assert!(!cache.contains("short-lived"));
    assert_eq!(cache.stats().expirations, 1);
    assert_eq!(cache.size_bytes(), 0);

    shutdown.cancel();
    tokio::time::timeout(Duration::from_secs(1), handle)
        .await
        .expect("maintenance stops on shutdown")
        .unwrap();
}

#[test]
fn test_statistics_report() {
    let cache = HexCache::new(HexCacheConfig::default()).unwrap();
    cache.store("a", default_map(), DEFAULT_PRIORITY).unwrap();
    cache.get("a", None);
    cache.get("missing", None);

    let stats = cache.stats();
    assert_eq!(stats.hits, 1);
    assert_eq!(stats.misses, 1);

    let report = cache.statistics().format();
    assert!(!report.is_empty());
}
