//! Global coverage generator.
//!
//! A pass sweeps every catalog region on a regular lat/lon grid, resolves
//! each sample to a cell, classifies new cells against the land oracle and
//! collects the qualifying ones. Passes are independent per resolution, so
//! [`CoverageGenerator::generate_parallel`] can fan them out over rayon.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use hexcover::coverage::{CoverageConfig, CoverageGenerator, NoJitter};
//! use hexcover::oracle::LandmassOracle;
//! use tokio_util::sync::CancellationToken;
//!
//! let config = CoverageConfig::default().with_resolutions([1]);
//! let generator = CoverageGenerator::new(config, Arc::new(LandmassOracle::new()))
//!     .unwrap()
//!     .with_jitter(Arc::new(NoJitter));
//!
//! let coverage = generator.generate(&CancellationToken::new()).unwrap();
//! assert!(coverage.stats.land_hexagons > 0);
//! ```

use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Instant;

use h3o::CellIndex;
use rayon::prelude::*;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::jitter::{RandomJitter, ScoreJitter};
use super::score::{base_color, opportunity_color, opportunity_score, qualifies_for_opportunity};
use super::types::{now_millis, CoverageGap, CoverageStats, GlobalCoverage, HexagonRecord};
use super::verify::verify_completeness;
use super::{CoverageConfig, CoverageError};
use crate::coord::{normalize_lon, GeoBounds};
use crate::hex::{
    boundary_bounds, cell_area_km2, cell_at, cell_boundary, cell_center, parse_resolution,
    ring_one, sweep_step_degrees,
};
use crate::oracle::LandOracle;
use crate::region::{Region, RegionCatalog, RegionKind};

/// Side length of the sample grid used to estimate a cell's land coverage.
pub const LAND_SAMPLE_DENSITY: usize = 5;

/// Ocean sweeps use this multiple of the land sweep step.
pub const OCEAN_STEP_MULTIPLIER: f64 = 4.0;

/// Region label for cells found by the ocean sweep.
pub const OCEAN_REGION: &str = "Open Ocean";

/// Generates classified hexagon coverage of the globe.
pub struct CoverageGenerator {
    config: CoverageConfig,
    oracle: Arc<dyn LandOracle>,
    catalog: RegionCatalog,
    jitter: Arc<dyn ScoreJitter>,
}

/// Output of one resolution pass.
struct PassOutput {
    resolution: u8,
    records: Vec<HexagonRecord>,
    gaps: Vec<CoverageGap>,
    skipped_samples: usize,
}

/// Call-local state of a pass.
struct PassState {
    resolution: u8,
    generated_at: u64,
    /// Land coverage of every cell classified so far, kept or not
    processed: HashMap<CellIndex, f64>,
    records: Vec<HexagonRecord>,
    skipped_samples: usize,
}

impl CoverageGenerator {
    /// Create a generator over the built-in region catalog.
    ///
    /// Fails if the configuration does not validate. Jitter defaults to
    /// [`RandomJitter`]; use [`with_jitter`](Self::with_jitter) for
    /// reproducible scores.
    pub fn new(config: CoverageConfig, oracle: Arc<dyn LandOracle>) -> Result<Self, CoverageError> {
        config.validate()?;
        let catalog = RegionCatalog::for_config(&config);
        Ok(Self {
            config,
            oracle,
            catalog,
            jitter: Arc::new(RandomJitter),
        })
    }

    /// Replace the region catalog.
    pub fn with_catalog(mut self, catalog: RegionCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// Replace the opportunity score jitter source.
    pub fn with_jitter(mut self, jitter: Arc<dyn ScoreJitter>) -> Self {
        self.jitter = jitter;
        self
    }

    pub fn config(&self) -> &CoverageConfig {
        &self.config
    }

    pub fn catalog(&self) -> &RegionCatalog {
        &self.catalog
    }

    /// Run one pass per configured resolution, in order.
    pub fn generate(&self, cancel: &CancellationToken) -> Result<GlobalCoverage, CoverageError> {
        let started = Instant::now();
        let mut passes = Vec::with_capacity(self.config.resolutions.len());
        for &resolution in &self.config.resolutions {
            passes.push(self.run_pass(resolution, cancel)?);
        }
        Ok(self.assemble(passes, started))
    }

    /// Run all resolution passes concurrently on the rayon pool.
    ///
    /// Output is identical to [`generate`](Self::generate) when the jitter
    /// source is deterministic.
    pub fn generate_parallel(
        &self,
        cancel: &CancellationToken,
    ) -> Result<GlobalCoverage, CoverageError> {
        let started = Instant::now();
        let passes = self
            .config
            .resolutions
            .par_iter()
            .map(|&resolution| self.run_pass(resolution, cancel))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(self.assemble(passes, started))
    }

    fn assemble(&self, passes: Vec<PassOutput>, started: Instant) -> GlobalCoverage {
        let mut coverage = GlobalCoverage::default();
        let mut stats = CoverageStats::default();

        for pass in passes {
            for record in &pass.records {
                stats.total_hexagons += 1;
                if record.is_land {
                    stats.land_hexagons += 1;
                } else {
                    stats.ocean_hexagons += 1;
                }
                if record.is_coastal {
                    stats.coastal_hexagons += 1;
                }
            }
            stats.verified_complete.push(pass.gaps.is_empty());
            stats.gap_counts.push(pass.gaps.len());
            stats.skipped_samples += pass.skipped_samples;

            coverage.gaps.insert(pass.resolution, pass.gaps);
            coverage.hexagons.insert(pass.resolution, pass.records);
        }

        info!(
            total = stats.total_hexagons,
            land = stats.land_hexagons,
            ocean = stats.ocean_hexagons,
            coastal = stats.coastal_hexagons,
            skipped = stats.skipped_samples,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Coverage generation complete"
        );

        coverage.stats = stats;
        coverage
    }

    fn run_pass(
        &self,
        resolution: u8,
        cancel: &CancellationToken,
    ) -> Result<PassOutput, CoverageError> {
        let step = sweep_step_degrees(parse_resolution(resolution)?);
        let mut state = PassState {
            resolution,
            generated_at: now_millis(),
            processed: HashMap::new(),
            records: Vec::new(),
            skipped_samples: 0,
        };

        debug!(resolution, step_degrees = step, "Starting coverage pass");

        for region in self.catalog.regions() {
            if cancel.is_cancelled() {
                info!(resolution, region = region.name, "Coverage pass cancelled");
                return Err(CoverageError::Cancelled);
            }
            self.sweep_region(region, step, &mut state);
        }

        if self.config.include_ocean {
            if cancel.is_cancelled() {
                return Err(CoverageError::Cancelled);
            }
            self.sweep_ocean(step * OCEAN_STEP_MULTIPLIER, &mut state);
        }

        let mut records = state.records;
        sort_records(&mut records);
        if records.len() > self.config.max_hexagons_per_resolution {
            debug!(
                resolution,
                generated = records.len(),
                kept = self.config.max_hexagons_per_resolution,
                "Truncating coverage pass"
            );
            records.truncate(self.config.max_hexagons_per_resolution);
        }

        let gaps = if self.config.verify_completeness {
            verify_completeness(&mut records, &state.processed, now_millis())
        } else {
            Vec::new()
        };

        if !gaps.is_empty() {
            warn!(resolution, gaps = gaps.len(), "Coverage pass has gaps");
        }

        info!(
            resolution,
            hexagons = records.len(),
            classified = state.processed.len(),
            skipped = state.skipped_samples,
            "Coverage pass complete"
        );

        Ok(PassOutput {
            resolution,
            records,
            gaps,
            skipped_samples: state.skipped_samples,
        })
    }

    fn sweep_region(&self, region: &Region, step: f64, state: &mut PassState) {
        let region_step = if self.config.use_adaptive_detail && region.kind.is_insular() {
            step / 2.0
        } else {
            step
        };

        let mut expansion = Vec::new();
        for (lat, lon) in sweep_points(&region.bounds, region_step) {
            let cell = match cell_at(lat, lon, state.resolution) {
                Ok(cell) => cell,
                Err(e) => {
                    debug!(lat, lon, error = %e, "Skipping sample point");
                    state.skipped_samples += 1;
                    continue;
                }
            };
            if state.processed.contains_key(&cell) {
                continue;
            }
            if let Some(record) = self.classify_sample(cell, region, state) {
                if self.qualifies(&record) {
                    if self.config.use_adaptive_detail && record.is_coastal {
                        expansion.extend(record.neighbors.iter().copied());
                    }
                    state.records.push(record);
                }
            }
        }

        // One level deep: neighbors of neighbors are left to the sweep.
        for cell in expansion {
            if state.processed.contains_key(&cell) {
                continue;
            }
            if let Some(record) = self.classify_sample(cell, region, state) {
                if self.qualifies(&record) {
                    state.records.push(record);
                }
            }
        }
    }

    fn sweep_ocean(&self, step: f64, state: &mut PassState) {
        let ocean = Region::new(OCEAN_REGION, RegionKind::Continental, GeoBounds::GLOBAL);
        for (lat, lon) in sweep_points(&GeoBounds::GLOBAL, step) {
            let cell = match cell_at(lat, lon, state.resolution) {
                Ok(cell) => cell,
                Err(_) => {
                    state.skipped_samples += 1;
                    continue;
                }
            };
            if state.processed.contains_key(&cell) {
                continue;
            }
            if let Some(record) = self.classify_sample(cell, &ocean, state) {
                if !record.is_land {
                    state.records.push(record);
                }
            }
        }
    }

    fn qualifies(&self, record: &HexagonRecord) -> bool {
        record.is_land || self.config.include_ocean
    }

    /// Classify a cell, recording it as processed.
    ///
    /// Returns `None` when the oracle panicked; the sample is counted as
    /// skipped and the cell stays unprocessed.
    fn classify_sample(
        &self,
        cell: CellIndex,
        region: &Region,
        state: &mut PassState,
    ) -> Option<HexagonRecord> {
        let generated_at = state.generated_at;
        let outcome =
            panic::catch_unwind(AssertUnwindSafe(|| self.classify(cell, region, generated_at)));
        match outcome {
            Ok(record) => {
                state.processed.insert(cell, record.land_coverage_pct);
                Some(record)
            }
            Err(_) => {
                debug!(cell = %cell, region = region.name, "Classification failed, skipping");
                state.skipped_samples += 1;
                None
            }
        }
    }

    fn classify(&self, cell: CellIndex, region: &Region, generated_at: u64) -> HexagonRecord {
        let center = cell_center(cell);
        let bounds = boundary_bounds(cell);

        let land_coverage_pct = self.oracle.land_coverage(&bounds, LAND_SAMPLE_DENSITY);
        let is_land = land_coverage_pct > 0.0 && land_coverage_pct >= self.config.min_land_coverage;
        let is_coastal = self.oracle.is_coastal(center.lat, center.lon);
        let land_type = is_land.then(|| region.land_type_at(center.lat, center.lon));

        let (opportunity_score, opportunity_color) =
            if qualifies_for_opportunity(is_land, land_coverage_pct) {
                let score = opportunity_score(center.lat, is_coastal, self.jitter.sample(cell));
                (Some(score), Some(opportunity_color(score)))
            } else {
                (None, None)
            };

        HexagonRecord {
            id: cell,
            resolution: u8::from(cell.resolution()),
            center,
            boundary: cell_boundary(cell),
            area_km2: cell_area_km2(cell),
            land_coverage_pct,
            is_land,
            is_coastal,
            land_type,
            region: region.name.to_string(),
            base_color: base_color(is_land, land_type),
            opportunity_color,
            opportunity_score,
            neighbors: ring_one(cell),
            has_gaps: false,
            verified: false,
            generated_at,
            last_verified: None,
        }
    }
}

/// Order records land first, then by descending land coverage, then by id.
pub fn sort_records(records: &mut [HexagonRecord]) {
    records.sort_by(|a, b| {
        b.is_land
            .cmp(&a.is_land)
            .then_with(|| b.land_coverage_pct.total_cmp(&a.land_coverage_pct))
            .then_with(|| u64::from(a.id).cmp(&u64::from(b.id)))
    });
}

/// Regular sample grid over a box, edges included.
fn sweep_points(bounds: &GeoBounds, step: f64) -> impl Iterator<Item = (f64, f64)> {
    let height = bounds.height();
    let width = bounds.width();
    let rows = (height / step).ceil().max(0.0) as usize;
    let cols = (width / step).ceil().max(0.0) as usize;
    let min_lat = bounds.min_lat;
    let min_lon = bounds.min_lon;

    (0..=rows).flat_map(move |row| {
        let lat = (min_lat + row as f64 * step).min(min_lat + height);
        (0..=cols).map(move |col| {
            let offset = (col as f64 * step).min(width);
            (lat, normalize_lon(min_lon + offset))
        })
    })
}
