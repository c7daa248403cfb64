//! Land/water classification.
//!
//! The coverage generator never decides on its own what is land: it asks a
//! [`LandOracle`]. Implementations only need to answer point queries; the
//! coastal probe and the area coverage estimate are derived from those.
//!
//! Two implementations ship with the crate:
//! - [`LandmassOracle`]: coarse built-in landmass boxes, used by the CLI
//! - [`FnOracle`]: wraps any closure, handy for tests and custom masks

mod landmass;

pub use landmass::{Landmass, LandmassOracle, LANDMASSES};

use crate::coord::{normalize_lon, GeoBounds};

/// Distance in degrees probed around a point by the coastal check.
pub const COASTAL_PROBE_DEGREES: f64 = 0.5;

/// Compass directions used by the coastal probe (N, NE, E, SE, S, SW, W, NW).
const PROBE_DIRECTIONS: [(f64, f64); 8] = [
    (1.0, 0.0),
    (1.0, 1.0),
    (0.0, 1.0),
    (-1.0, 1.0),
    (-1.0, 0.0),
    (-1.0, -1.0),
    (0.0, -1.0),
    (1.0, -1.0),
];

/// Answers land/water questions about the globe.
///
/// Implementations must be pure: the same point always gets the same answer.
pub trait LandOracle: Send + Sync {
    /// True if the point is on land.
    fn is_land(&self, lat: f64, lon: f64) -> bool;

    /// True if the land/water state changes within
    /// [`COASTAL_PROBE_DEGREES`] of the point in any compass direction.
    fn is_coastal(&self, lat: f64, lon: f64) -> bool {
        let here = self.is_land(lat, lon);
        PROBE_DIRECTIONS.iter().any(|&(dlat, dlon)| {
            let probe_lat = (lat + dlat * COASTAL_PROBE_DEGREES).clamp(-90.0, 90.0);
            let probe_lon = normalize_lon(lon + dlon * COASTAL_PROBE_DEGREES);
            self.is_land(probe_lat, probe_lon) != here
        })
    }

    /// Percentage (0–100) of a `density × density` sample grid over the
    /// bounds that falls on land.
    fn land_coverage(&self, bounds: &GeoBounds, sample_density: usize) -> f64 {
        let density = sample_density.max(1);
        let lat_step = bounds.height() / density as f64;
        let lon_step = bounds.width() / density as f64;

        let mut land = 0usize;
        for row in 0..density {
            let lat = bounds.min_lat + (row as f64 + 0.5) * lat_step;
            for col in 0..density {
                let lon = normalize_lon(bounds.min_lon + (col as f64 + 0.5) * lon_step);
                if self.is_land(lat, lon) {
                    land += 1;
                }
            }
        }

        land as f64 * 100.0 / (density * density) as f64
    }
}

/// Oracle backed by a closure.
///
/// # Example
///
/// ```
/// use hexcover::oracle::{FnOracle, LandOracle};
///
/// let northern = FnOracle::new(|lat, _lon| lat > 0.0);
/// assert!(northern.is_land(10.0, 0.0));
/// assert!(!northern.is_land(-10.0, 0.0));
/// ```
pub struct FnOracle<F> {
    f: F,
}

impl<F> FnOracle<F>
where
    F: Fn(f64, f64) -> bool + Send + Sync,
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> LandOracle for FnOracle<F>
where
    F: Fn(f64, f64) -> bool + Send + Sync,
{
    fn is_land(&self, lat: f64, lon: f64) -> bool {
        (self.f)(lat, lon)
    }
}
