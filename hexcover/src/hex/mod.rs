//! Hexagonal index primitives.
//!
//! Thin adapter over [`h3o`] so the rest of the crate works in plain
//! degrees and [`GeoPoint`]/[`GeoBounds`] instead of H3 types. Everything
//! the coverage generator and cache need from the hex grid goes through here:
//! point-to-cell resolution, centers, boundaries, areas and the ring-1
//! neighborhood.
//!
//! # Example
//!
//! ```
//! use hexcover::hex::{cell_at, cell_center, ring_one};
//!
//! let cell = cell_at(48.85, 2.35, 4).unwrap();
//! let center = cell_center(cell);
//! assert!((center.lat - 48.85).abs() < 1.0);
//! assert_eq!(ring_one(cell).len(), 6);
//! ```

use h3o::{CellIndex, LatLng, Resolution};
use thiserror::Error;

use crate::coord::{km_to_degrees, GeoBounds, GeoPoint};

/// Coarsest resolution accepted for coverage passes.
pub const MIN_COVERAGE_RESOLUTION: u8 = 0;

/// Finest resolution accepted for coverage passes.
///
/// Global cell counts grow sevenfold per level; beyond this the sweep is
/// no longer tractable in memory.
pub const MAX_COVERAGE_RESOLUTION: u8 = 7;

/// Errors from the hex grid adapter.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum HexError {
    /// Resolution outside the supported coverage range
    #[error(
        "Invalid resolution {0} (must be between {min} and {max})",
        min = MIN_COVERAGE_RESOLUTION,
        max = MAX_COVERAGE_RESOLUTION
    )]
    InvalidResolution(u8),

    /// Coordinates could not be converted to a grid position
    #[error("Invalid coordinates: lat={lat}, lon={lon}")]
    InvalidCoordinates { lat: f64, lon: f64 },
}

/// Convert a coverage resolution number to an H3 resolution.
pub fn parse_resolution(resolution: u8) -> Result<Resolution, HexError> {
    if resolution > MAX_COVERAGE_RESOLUTION {
        return Err(HexError::InvalidResolution(resolution));
    }
    Resolution::try_from(resolution).map_err(|_| HexError::InvalidResolution(resolution))
}

/// Resolve a point to the cell containing it.
pub fn cell_at(lat: f64, lon: f64, resolution: u8) -> Result<CellIndex, HexError> {
    let resolution = parse_resolution(resolution)?;
    let latlng = LatLng::new(lat, lon).map_err(|_| HexError::InvalidCoordinates { lat, lon })?;
    Ok(latlng.to_cell(resolution))
}

/// Resolution number of a cell.
#[inline]
pub fn cell_resolution(cell: CellIndex) -> u8 {
    u8::from(cell.resolution())
}

/// Center of a cell.
pub fn cell_center(cell: CellIndex) -> GeoPoint {
    let latlng = LatLng::from(cell);
    GeoPoint {
        lat: latlng.lat(),
        lon: latlng.lng(),
    }
}

/// Boundary ring of a cell (5 vertices for pentagons, otherwise 6+).
pub fn cell_boundary(cell: CellIndex) -> Vec<GeoPoint> {
    cell.boundary()
        .iter()
        .map(|latlng| GeoPoint {
            lat: latlng.lat(),
            lon: latlng.lng(),
        })
        .collect()
}

/// Exact area of a cell in square kilometres.
#[inline]
pub fn cell_area_km2(cell: CellIndex) -> f64 {
    cell.area_km2()
}

/// The ring-1 neighbors of a cell, excluding the cell itself.
///
/// Pentagons yield five neighbors instead of six.
pub fn ring_one(cell: CellIndex) -> Vec<CellIndex> {
    cell.grid_disk::<Vec<_>>(1)
        .into_iter()
        .filter(|&neighbor| neighbor != cell)
        .collect()
}

/// Bounding box of a cell's boundary ring, antimeridian-aware.
pub fn boundary_bounds(cell: CellIndex) -> GeoBounds {
    let boundary = cell_boundary(cell);
    GeoBounds::from_points(boundary.iter().copied()).unwrap_or_else(|| {
        let center = cell_center(cell);
        GeoBounds::new(center.lat, center.lat, center.lon, center.lon)
    })
}

/// Sweep step in degrees for a resolution.
///
/// The average edge length converted at the equator, so consecutive sample
/// points land in adjacent cells at worst.
pub fn sweep_step_degrees(resolution: Resolution) -> f64 {
    km_to_degrees(resolution.edge_length_km())
}

/// Serde adapter that stores a [`CellIndex`] as its hex string.
pub mod cell_serde {
    use h3o::CellIndex;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(cell: &CellIndex, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(cell)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<CellIndex, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

/// Serde adapter for a list of cells stored as hex strings.
pub mod cell_vec_serde {
    use h3o::CellIndex;
    use serde::ser::SerializeSeq;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(cells: &[CellIndex], serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(cells.len()))?;
        for cell in cells {
            seq.serialize_element(&cell.to_string())?;
        }
        seq.end()
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<CellIndex>, D::Error> {
        let raw = Vec::<String>::deserialize(deserializer)?;
        raw.iter()
            .map(|s| s.parse().map_err(de::Error::custom))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_resolution_range() {
        assert!(parse_resolution(0).is_ok());
        assert!(parse_resolution(7).is_ok());
        assert_eq!(parse_resolution(8), Err(HexError::InvalidResolution(8)));
    }

    #[test]
    fn test_cell_at_rejects_bad_coordinates() {
        let result = cell_at(f64::NAN, 0.0, 3);
        assert!(matches!(result, Err(HexError::InvalidCoordinates { .. })));
    }

    #[test]
    fn test_cell_at_resolution_matches() {
        let cell = cell_at(40.0, -100.0, 5).unwrap();
        assert_eq!(cell_resolution(cell), 5);
    }

    #[test]
    fn test_cell_center_is_near_sample() {
        let cell = cell_at(40.0, -100.0, 5).unwrap();
        let center = cell_center(cell);
        assert!((center.lat - 40.0).abs() < 0.5);
        assert!((center.lon + 100.0).abs() < 0.5);
    }

    #[test]
    fn test_ring_one_excludes_self() {
        let cell = cell_at(10.0, 20.0, 3).unwrap();
        let ring = ring_one(cell);
        assert_eq!(ring.len(), 6);
        assert!(!ring.contains(&cell));
    }

    #[test]
    fn test_boundary_bounds_contains_center() {
        let cell = cell_at(-33.0, 151.0, 2).unwrap();
        let bounds = boundary_bounds(cell);
        let center = cell_center(cell);
        assert!(bounds.contains(center.lat, center.lon));
    }

    #[test]
    fn test_boundary_bounds_near_antimeridian() {
        let cell = cell_at(0.0, 179.99, 2).unwrap();
        let bounds = boundary_bounds(cell);
        assert!(bounds.width() < 20.0, "cell box must not span the globe");
    }

    #[test]
    fn test_sweep_step_shrinks_with_resolution() {
        let coarse = sweep_step_degrees(parse_resolution(2).unwrap());
        let fine = sweep_step_degrees(parse_resolution(5).unwrap());
        assert!(fine < coarse);
        assert!(fine > 0.0);
    }

    #[test]
    fn test_cell_area_positive() {
        let cell = cell_at(0.0, 0.0, 3).unwrap();
        assert!(cell_area_km2(cell) > 0.0);
    }
}
