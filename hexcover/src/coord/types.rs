//! Coordinate type definitions

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Valid latitude range
pub const MIN_LAT: f64 = -90.0;
pub const MAX_LAT: f64 = 90.0;

/// Valid longitude range
pub const MIN_LON: f64 = -180.0;
pub const MAX_LON: f64 = 180.0;

/// A geographic position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Latitude, positive north
    pub lat: f64,
    /// Longitude, positive east
    pub lon: f64,
}

impl GeoPoint {
    /// Create a point, validating both components.
    pub fn new(lat: f64, lon: f64) -> Result<Self, CoordError> {
        if !lat.is_finite() || !(MIN_LAT..=MAX_LAT).contains(&lat) {
            return Err(CoordError::InvalidLatitude(lat));
        }
        if !lon.is_finite() {
            return Err(CoordError::InvalidLongitude(lon));
        }
        Ok(Self {
            lat,
            lon: normalize_lon(lon),
        })
    }
}

/// Latitude/longitude bounding box.
///
/// When `min_lon > max_lon` the box crosses the antimeridian: it covers
/// `[min_lon, 180]` and `[-180, max_lon]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoBounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl GeoBounds {
    /// Bounds covering the whole globe.
    pub const GLOBAL: GeoBounds = GeoBounds {
        min_lat: MIN_LAT,
        max_lat: MAX_LAT,
        min_lon: MIN_LON,
        max_lon: MAX_LON,
    };

    /// Create bounds from raw edges.
    ///
    /// Edges are taken as given so callers can express antimeridian-crossing
    /// boxes with `min_lon > max_lon`.
    pub const fn new(min_lat: f64, max_lat: f64, min_lon: f64, max_lon: f64) -> Self {
        Self {
            min_lat,
            max_lat,
            min_lon,
            max_lon,
        }
    }

    /// Bounds centered on a point with the given half-extents in degrees.
    ///
    /// A longitude half-extent of 180° or more yields a full longitude band.
    pub fn centered(lat: f64, lon: f64, half_lat: f64, half_lon: f64) -> Self {
        let min_lat = clamp_lat(lat - half_lat);
        let max_lat = clamp_lat(lat + half_lat);

        if half_lon >= 180.0 {
            return Self::new(min_lat, max_lat, MIN_LON, MAX_LON);
        }

        Self::new(
            min_lat,
            max_lat,
            normalize_lon(lon - half_lon),
            normalize_max_lon(lon + half_lon),
        )
    }

    /// Smallest bounds containing every point.
    ///
    /// A point set whose longitudes spread more than 180° is treated as
    /// straddling the antimeridian. Returns `None` for an empty input.
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = GeoPoint>,
    {
        let mut min_lat = f64::INFINITY;
        let mut max_lat = f64::NEG_INFINITY;
        let mut min_lon = f64::INFINITY;
        let mut max_lon = f64::NEG_INFINITY;
        // Extremes of each hemisphere, used for the antimeridian case
        let mut min_east = f64::INFINITY;
        let mut max_west = f64::NEG_INFINITY;
        let mut count = 0usize;

        for p in points {
            count += 1;
            min_lat = min_lat.min(p.lat);
            max_lat = max_lat.max(p.lat);
            min_lon = min_lon.min(p.lon);
            max_lon = max_lon.max(p.lon);
            if p.lon >= 0.0 {
                min_east = min_east.min(p.lon);
            } else {
                max_west = max_west.max(p.lon);
            }
        }

        if count == 0 {
            return None;
        }

        if max_lon - min_lon > 180.0 && min_east.is_finite() && max_west.is_finite() {
            return Some(Self::new(min_lat, max_lat, min_east, max_west));
        }

        Some(Self::new(min_lat, max_lat, min_lon, max_lon))
    }

    /// True if the box wraps across the antimeridian.
    #[inline]
    pub fn crosses_antimeridian(&self) -> bool {
        self.min_lon > self.max_lon
    }

    /// Longitude span in degrees.
    pub fn width(&self) -> f64 {
        if self.crosses_antimeridian() {
            (MAX_LON - self.min_lon) + (self.max_lon - MIN_LON)
        } else {
            self.max_lon - self.min_lon
        }
    }

    /// Latitude span in degrees.
    pub fn height(&self) -> f64 {
        self.max_lat - self.min_lat
    }

    /// Geometric center of the box.
    pub fn center(&self) -> GeoPoint {
        let lat = (self.min_lat + self.max_lat) / 2.0;
        let lon = normalize_lon(self.min_lon + self.width() / 2.0);
        GeoPoint { lat, lon }
    }

    /// Check whether a point lies within the box (edges inclusive).
    #[inline]
    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        if lat < self.min_lat || lat > self.max_lat {
            return false;
        }

        if self.width() >= 360.0 {
            return true;
        }

        let lon = normalize_lon(lon);
        if self.crosses_antimeridian() {
            lon >= self.min_lon || lon <= self.max_lon
        } else {
            // normalize_lon maps +180 onto -180
            (lon >= self.min_lon && lon <= self.max_lon)
                || (lon == MIN_LON && self.max_lon == MAX_LON)
        }
    }

    /// Grow the box by `margin` degrees on every side.
    pub fn expand(&self, margin: f64) -> Self {
        let min_lat = clamp_lat(self.min_lat - margin);
        let max_lat = clamp_lat(self.max_lat + margin);

        if self.width() + 2.0 * margin >= 360.0 {
            return Self::new(min_lat, max_lat, MIN_LON, MAX_LON);
        }

        Self::new(
            min_lat,
            max_lat,
            normalize_lon(self.min_lon - margin),
            normalize_max_lon(self.max_lon + margin),
        )
    }

    /// Check whether two boxes overlap (edges inclusive).
    pub fn intersects(&self, other: &GeoBounds) -> bool {
        if self.max_lat < other.min_lat || other.max_lat < self.min_lat {
            return false;
        }

        // Ranges touching opposite sides of the antimeridian share that edge
        let touch = |a_max: f64, b_min: f64| a_max >= MAX_LON && b_min <= MIN_LON;

        self.lon_ranges().iter().any(|&(a_min, a_max)| {
            other.lon_ranges().iter().any(|&(b_min, b_max)| {
                (a_min <= b_max && b_min <= a_max) || touch(a_max, b_min) || touch(b_max, a_min)
            })
        })
    }

    /// Non-wrapping longitude ranges covered by the box.
    pub fn lon_ranges(&self) -> Vec<(f64, f64)> {
        if self.crosses_antimeridian() {
            vec![(self.min_lon, MAX_LON), (MIN_LON, self.max_lon)]
        } else {
            vec![(self.min_lon, self.max_lon)]
        }
    }
}

/// Normalize a longitude into `[-180, 180)`.
#[inline]
pub fn normalize_lon(lon: f64) -> f64 {
    let wrapped = (lon + 180.0).rem_euclid(360.0) - 180.0;
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if wrapped >= MAX_LON {
        MIN_LON
    } else {
        wrapped
    }
}

/// Normalize a longitude into `(-180, 180]`.
///
/// Used for eastern box edges so that a box ending exactly on the
/// antimeridian keeps `max_lon = 180`.
#[inline]
pub fn normalize_max_lon(lon: f64) -> f64 {
    MAX_LON - (MAX_LON - lon).rem_euclid(360.0)
}

/// Clamp a latitude into `[-90, 90]`.
#[inline]
pub fn clamp_lat(lat: f64) -> f64 {
    lat.clamp(MIN_LAT, MAX_LAT)
}

/// Errors that can occur when building coordinates.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoordError {
    /// Latitude is outside -90..=90 or not finite
    #[error("Invalid latitude: {0} (must be between {min} and {max})", min = MIN_LAT, max = MAX_LAT)]
    InvalidLatitude(f64),
    /// Longitude is not finite
    #[error("Invalid longitude: {0}")]
    InvalidLongitude(f64),
}
