//! Geographic coordinate primitives
//!
//! Points, bounding boxes with antimeridian wraparound, and the longitude /
//! latitude normalization helpers shared by the generator and the cache.

mod types;

pub use types::{
    clamp_lat, normalize_lon, normalize_max_lon, CoordError, GeoBounds, GeoPoint, MAX_LAT,
    MAX_LON, MIN_LAT, MIN_LON,
};

/// Approximate kilometres per degree of latitude.
pub const KM_PER_DEGREE: f64 = 111.32;

/// Convert a distance in kilometres to degrees of latitude.
#[inline]
pub fn km_to_degrees(km: f64) -> f64 {
    km / KM_PER_DEGREE
}
