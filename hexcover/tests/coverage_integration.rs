//! Integration tests for coverage generation.
//!
//! These tests drive [`CoverageGenerator`] end to end through the public API
//! and check the properties every generated coverage set must hold:
//! - Unique ids within a resolution
//! - Land classification consistent with the coverage threshold
//! - Opportunity score and colour present together or not at all
//! - Truncation keeps the best-ranked records
//!
//! Run with: `cargo test --test coverage_integration`

use std::collections::HashSet;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use hexcover::coord::GeoBounds;
use hexcover::coverage::{
    CoverageConfig, CoverageGenerator, GlobalCoverage, HexagonRecord, NoJitter, SeededJitter,
};
use hexcover::oracle::{FnOracle, LandOracle, LandmassOracle};
use hexcover::region::{LandType, Region, RegionCatalog, RegionKind};

// ============================================================================
// Test Helpers
// ============================================================================

/// Land west of a diagonal coastline, giving a spread of partial coverages.
fn diagonal_coast() -> Arc<dyn LandOracle> {
    Arc::new(FnOracle::new(|lat, lon| lon < 10.0 + (lat - 40.0)))
}

fn single_region(name: &'static str, kind: RegionKind, bounds: GeoBounds) -> RegionCatalog {
    RegionCatalog::new(vec![Region::new(name, kind, bounds)])
}

fn generate(
    config: CoverageConfig,
    oracle: Arc<dyn LandOracle>,
    catalog: RegionCatalog,
) -> GlobalCoverage {
    CoverageGenerator::new(config, oracle)
        .expect("valid config")
        .with_catalog(catalog)
        .with_jitter(Arc::new(NoJitter))
        .generate(&CancellationToken::new())
        .expect("generation succeeds")
}

fn coast_coverage(config: CoverageConfig) -> GlobalCoverage {
    generate(
        config,
        diagonal_coast(),
        single_region(
            "Coast",
            RegionKind::Continental,
            GeoBounds::new(35.0, 45.0, 0.0, 20.0),
        ),
    )
}

fn all_records(coverage: &GlobalCoverage) -> impl Iterator<Item = &HexagonRecord> {
    coverage.hexagons.values().flatten()
}

// ============================================================================
// Record invariants
// ============================================================================

#[test]
fn test_ids_unique_per_resolution() {
    let coverage = coast_coverage(
        CoverageConfig::default()
            .with_resolutions([2, 3])
            .with_ocean(true),
    );

    for (resolution, records) in &coverage.hexagons {
        let ids: HashSet<_> = records.iter().map(|r| r.id).collect();
        assert_eq!(ids.len(), records.len(), "duplicate id at resolution {}", resolution);
        assert!(records.iter().all(|r| r.resolution == *resolution));
    }
}

#[test]
fn test_land_flag_matches_threshold() {
    let min = 40.0;
    let coverage = coast_coverage(
        CoverageConfig::default()
            .with_resolutions([3])
            .with_min_land_coverage(min)
            .with_ocean(true),
    );

    assert!(coverage.stats.land_hexagons > 0);
    for record in all_records(&coverage) {
        let expected = record.land_coverage_pct > 0.0 && record.land_coverage_pct >= min;
        assert_eq!(record.is_land, expected, "record {}", record.id);
        assert_eq!(record.land_type.is_some(), record.is_land);
    }
}

#[test]
fn test_opportunity_fields_paired() {
    let coverage = generate(
        CoverageConfig::default().with_resolutions([3]).with_ocean(true),
        diagonal_coast(),
        single_region(
            "Coast",
            RegionKind::Continental,
            GeoBounds::new(35.0, 45.0, 0.0, 20.0),
        ),
    );

    let mut scored = 0;
    for record in all_records(&coverage) {
        assert_eq!(
            record.opportunity_score.is_some(),
            record.opportunity_color.is_some(),
            "record {}",
            record.id
        );
        if let Some(score) = record.opportunity_score {
            scored += 1;
            assert!(record.is_land);
            assert!((0.0..=100.0).contains(&score));
        }
    }
    assert!(scored > 0, "fully inland cells must be scored");
}

#[test]
fn test_seeded_jitter_is_reproducible() {
    let run = || {
        CoverageGenerator::new(CoverageConfig::default().with_resolutions([2]), diagonal_coast())
            .unwrap()
            .with_catalog(single_region(
                "Coast",
                RegionKind::Continental,
                GeoBounds::new(35.0, 45.0, 0.0, 20.0),
            ))
            .with_jitter(Arc::new(SeededJitter::new(99)))
            .generate(&CancellationToken::new())
            .unwrap()
    };

    let a = run();
    let b = run();
    let scores = |c: &GlobalCoverage| {
        all_records(c)
            .map(|r| (r.id, r.opportunity_score))
            .collect::<Vec<_>>()
    };
    assert_eq!(scores(&a), scores(&b));
}

// ============================================================================
// Truncation
// ============================================================================

#[test]
fn test_truncation_keeps_best_ranked() {
    let base = CoverageConfig::default()
        .with_resolutions([3])
        .with_ocean(true)
        .with_verification(false);

    let full = coast_coverage(base.clone());
    let limit = 12;
    assert!(full.at(3).len() > limit, "fixture must exceed the limit");

    let truncated = coast_coverage(base.with_max_hexagons(limit));
    let kept = truncated.at(3);
    assert_eq!(kept.len(), limit);

    let expected: Vec<_> = full.at(3).iter().take(limit).map(|r| r.id).collect();
    let actual: Vec<_> = kept.iter().map(|r| r.id).collect();
    assert_eq!(actual, expected);

    for pair in kept.windows(2) {
        let (a, b) = (&pair[0], &pair[1]);
        assert!(a.is_land >= b.is_land, "land must precede ocean");
        if a.is_land == b.is_land {
            assert!(a.land_coverage_pct >= b.land_coverage_pct);
        }
    }
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn test_single_continental_region_at_resolution_five() {
    // Interior of North America, far from any coast in the landmass table
    let catalog = single_region(
        "Great Plains",
        RegionKind::Continental,
        GeoBounds::new(38.0, 39.5, -100.0, -98.0),
    );
    let config = CoverageConfig::default()
        .with_resolutions([5])
        .with_min_land_coverage(50.0)
        .with_ocean(false);

    let coverage = generate(config, Arc::new(LandmassOracle::new()), catalog);
    let records = coverage.at(5);

    assert!(!records.is_empty());
    assert!(records.iter().all(|r| r.is_land));
    assert!(records
        .iter()
        .all(|r| r.land_type == Some(LandType::Continental)));
    assert!(records.iter().all(|r| r.region == "Great Plains"));

    let ids: HashSet<_> = records.iter().map(|r| r.id).collect();
    assert_eq!(ids.len(), records.len());
    assert_eq!(coverage.stats.ocean_hexagons, 0);
}

#[test]
fn test_verification_flags_every_land_record() {
    let coverage = coast_coverage(CoverageConfig::default().with_resolutions([2]));

    for record in coverage.at(2) {
        assert!(record.verified != record.has_gaps, "record {}", record.id);
        assert_eq!(record.verified, record.last_verified.is_some());
    }
    let gaps = coverage.gaps.get(&2).map(Vec::len).unwrap_or(0);
    assert_eq!(coverage.stats.gap_counts, vec![gaps]);
    assert_eq!(coverage.stats.verified_complete, vec![gaps == 0]);
}

#[test]
fn test_parallel_matches_sequential() {
    let config = CoverageConfig::default().with_resolutions([1, 2]);
    let generator = CoverageGenerator::new(config, diagonal_coast())
        .unwrap()
        .with_catalog(single_region(
            "Coast",
            RegionKind::Continental,
            GeoBounds::new(35.0, 45.0, 0.0, 20.0),
        ))
        .with_jitter(Arc::new(NoJitter));
    let cancel = CancellationToken::new();

    let sequential = generator.generate(&cancel).unwrap();
    let parallel = generator.generate_parallel(&cancel).unwrap();

    for resolution in [1, 2] {
        let ids = |c: &GlobalCoverage| c.at(resolution).iter().map(|r| r.id).collect::<Vec<_>>();
        assert_eq!(ids(&sequential), ids(&parallel));
    }
    assert_eq!(sequential.stats.total_hexagons, parallel.stats.total_hexagons);
}
