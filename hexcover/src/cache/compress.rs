//! Compact, compressed storage form of a hexagon map.
//!
//! Only the fields that cannot be recomputed from the cell id are kept:
//! boundary, area and neighbors come back from the hex grid on decode.

use std::collections::BTreeMap;
use std::io::{Read, Write};

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use h3o::CellIndex;
use serde::{Deserialize, Serialize};

use super::CacheError;
use crate::coord::GeoPoint;
use crate::coverage::{HexagonMap, HexagonRecord, Rgba};
use crate::hex::{cell_area_km2, cell_boundary, ring_one};
use crate::oracle::LandOracle;
use crate::region::LandType;

/// Region label given to records rebuilt from compressed storage.
pub const CACHED_REGION: &str = "cached";

/// Size assumed per record when no encoding is available.
pub const FALLBACK_BYTES_PER_RECORD: usize = 512;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CompactHexagon {
    #[serde(with = "crate::hex::cell_serde")]
    id: CellIndex,
    #[serde(rename = "r")]
    resolution: u8,
    lat: f64,
    lon: f64,
    #[serde(rename = "c")]
    land_coverage_pct: f64,
    #[serde(rename = "s", default, skip_serializing_if = "Option::is_none")]
    opportunity_score: Option<f64>,
    #[serde(rename = "t", default, skip_serializing_if = "Option::is_none")]
    land_type: Option<LandType>,
    #[serde(rename = "bc")]
    base_color: Rgba,
    #[serde(rename = "oc", default, skip_serializing_if = "Option::is_none")]
    opportunity_color: Option<Rgba>,
}

impl From<&HexagonRecord> for CompactHexagon {
    fn from(record: &HexagonRecord) -> Self {
        Self {
            id: record.id,
            resolution: record.resolution,
            lat: record.center.lat,
            lon: record.center.lon,
            land_coverage_pct: record.land_coverage_pct,
            opportunity_score: record.opportunity_score,
            land_type: record.land_type,
            base_color: record.base_color,
            opportunity_color: record.opportunity_color,
        }
    }
}

impl CompactHexagon {
    fn expand(self, oracle: Option<&dyn LandOracle>) -> HexagonRecord {
        let is_coastal = oracle.is_some_and(|o| o.is_coastal(self.lat, self.lon));
        HexagonRecord {
            id: self.id,
            resolution: self.resolution,
            center: GeoPoint {
                lat: self.lat,
                lon: self.lon,
            },
            boundary: cell_boundary(self.id),
            area_km2: cell_area_km2(self.id),
            land_coverage_pct: self.land_coverage_pct,
            is_land: self.land_type.is_some(),
            is_coastal,
            land_type: self.land_type,
            region: CACHED_REGION.to_string(),
            base_color: self.base_color,
            opportunity_color: self.opportunity_color,
            opportunity_score: self.opportunity_score,
            neighbors: ring_one(self.id),
            has_gaps: false,
            verified: false,
            generated_at: 0,
            last_verified: None,
        }
    }
}

/// Encode a hexagon map into gzip-compressed compact JSON.
pub fn compress(hexagons: &HexagonMap) -> Result<Vec<u8>, CacheError> {
    let compact: BTreeMap<u8, Vec<CompactHexagon>> = hexagons
        .iter()
        .map(|(&res, records)| (res, records.iter().map(CompactHexagon::from).collect()))
        .collect();

    let json = serde_json::to_vec(&compact).map_err(|e| CacheError::Compression(e.to_string()))?;

    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(&json)
        .map_err(|e| CacheError::Compression(e.to_string()))?;
    encoder
        .finish()
        .map_err(|e| CacheError::Compression(e.to_string()))
}

/// Decode bytes produced by [`compress`].
///
/// Fields dropped at compression time are recomputed from the cell id; the
/// coastal flag is re-derived only when an oracle is supplied.
pub fn decompress(bytes: &[u8], oracle: Option<&dyn LandOracle>) -> Result<HexagonMap, CacheError> {
    let mut json = Vec::new();
    GzDecoder::new(bytes)
        .read_to_end(&mut json)
        .map_err(|e| CacheError::Decompression(e.to_string()))?;

    let compact: BTreeMap<u8, Vec<CompactHexagon>> =
        serde_json::from_slice(&json).map_err(|e| CacheError::Decompression(e.to_string()))?;

    Ok(compact
        .into_iter()
        .map(|(res, records)| {
            (
                res,
                records.into_iter().map(|c| c.expand(oracle)).collect(),
            )
        })
        .collect())
}

/// Estimated in-memory size of an uncompressed hexagon map.
///
/// Uses the JSON encoding length, falling back to a per-record constant.
pub fn estimate_raw_size(hexagons: &HexagonMap) -> usize {
    match serde_json::to_vec(hexagons) {
        Ok(json) => json.len(),
        Err(_) => hexagon_count(hexagons) * FALLBACK_BYTES_PER_RECORD,
    }
}

/// Total number of records across resolutions.
pub fn hexagon_count(hexagons: &HexagonMap) -> usize {
    hexagons.values().map(Vec::len).sum()
}
