//! Coverage output types.

use std::collections::BTreeMap;
use std::time::{SystemTime, UNIX_EPOCH};

use h3o::CellIndex;
use serde::{Deserialize, Serialize};

use crate::coord::GeoPoint;
use crate::region::LandType;

/// Hexagon records per resolution, in output order.
pub type HexagonMap = BTreeMap<u8, Vec<HexagonRecord>>;

/// An RGBA colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

/// One classified hexagon cell.
///
/// Records are created once by a coverage pass and only the verification
/// fields (`has_gaps`, `verified`, `last_verified`) change afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HexagonRecord {
    #[serde(with = "crate::hex::cell_serde")]
    pub id: CellIndex,
    pub resolution: u8,
    pub center: GeoPoint,
    pub boundary: Vec<GeoPoint>,
    pub area_km2: f64,
    /// Percentage (0–100) of the cell's sample grid on land
    pub land_coverage_pct: f64,
    pub is_land: bool,
    pub is_coastal: bool,
    /// `None` for ocean cells
    pub land_type: Option<LandType>,
    /// Name of the region whose sweep produced the cell
    pub region: String,
    pub base_color: Rgba,
    pub opportunity_color: Option<Rgba>,
    pub opportunity_score: Option<f64>,
    #[serde(with = "crate::hex::cell_vec_serde")]
    pub neighbors: Vec<CellIndex>,
    pub has_gaps: bool,
    pub verified: bool,
    /// Unix epoch milliseconds
    pub generated_at: u64,
    /// Unix epoch milliseconds of the last successful verification
    pub last_verified: Option<u64>,
}

/// A land cell whose neighbor is missing from, or misclassified in, the
/// generated set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageGap {
    #[serde(with = "crate::hex::cell_serde")]
    pub cell: CellIndex,
    #[serde(with = "crate::hex::cell_serde")]
    pub missing_neighbor: CellIndex,
}

/// Aggregate statistics over a coverage run.
///
/// The per-resolution vectors follow the order of the requested resolutions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CoverageStats {
    pub total_hexagons: usize,
    pub land_hexagons: usize,
    pub ocean_hexagons: usize,
    pub coastal_hexagons: usize,
    pub verified_complete: Vec<bool>,
    pub gap_counts: Vec<usize>,
    /// Sample points dropped because classification failed
    pub skipped_samples: usize,
}

/// Result of a full coverage run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GlobalCoverage {
    pub hexagons: HexagonMap,
    pub stats: CoverageStats,
    pub gaps: BTreeMap<u8, Vec<CoverageGap>>,
}

impl GlobalCoverage {
    /// Records at one resolution, empty if it was not generated.
    pub fn at(&self, resolution: u8) -> &[HexagonRecord] {
        self.hexagons
            .get(&resolution)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

/// Current time as Unix epoch milliseconds.
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
