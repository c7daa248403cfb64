//! Built-in coarse landmass oracle.
//!
//! Landmasses are approximated by a handful of lat/lon boxes each. This is
//! nowhere near a coastline dataset but is enough to drive the generator end
//! to end without external data.

use super::LandOracle;
use crate::coord::GeoBounds;

/// A named landmass made of one or more boxes.
#[derive(Debug, Clone, Copy)]
pub struct Landmass {
    pub name: &'static str,
    pub parts: &'static [GeoBounds],
}

const fn b(min_lat: f64, max_lat: f64, min_lon: f64, max_lon: f64) -> GeoBounds {
    GeoBounds::new(min_lat, max_lat, min_lon, max_lon)
}

/// Built-in landmass table.
pub const LANDMASSES: &[Landmass] = &[
    Landmass {
        name: "North America",
        parts: &[
            b(25.0, 50.0, -125.0, -67.0),
            b(50.0, 60.0, -135.0, -60.0),
            b(60.0, 71.0, -168.0, -95.0),
            b(15.0, 25.0, -110.0, -97.0),
            b(8.0, 15.0, -92.0, -83.0),
        ],
    },
    Landmass {
        name: "Greenland",
        parts: &[b(60.0, 83.0, -55.0, -20.0)],
    },
    Landmass {
        name: "South America",
        parts: &[
            b(-20.0, 10.0, -80.0, -35.0),
            b(-40.0, -20.0, -72.0, -48.0),
            b(-55.0, -40.0, -75.0, -63.0),
        ],
    },
    Landmass {
        name: "Europe",
        parts: &[
            b(36.0, 44.0, -9.5, 3.0),
            b(43.0, 55.0, -5.0, 30.0),
            b(55.0, 71.0, 5.0, 40.0),
            b(50.0, 58.5, -6.0, 2.0),
        ],
    },
    Landmass {
        name: "Africa",
        parts: &[
            b(5.0, 35.0, -17.0, 35.0),
            b(-35.0, 5.0, 10.0, 41.0),
            b(-25.0, -12.0, 43.0, 50.5),
        ],
    },
    Landmass {
        name: "Asia",
        parts: &[
            b(10.0, 55.0, 35.0, 120.0),
            b(55.0, 75.0, 40.0, 180.0),
            b(20.0, 45.0, 120.0, 130.0),
            b(31.0, 45.0, 130.0, 145.0),
        ],
    },
    Landmass {
        name: "Maritime Southeast Asia",
        parts: &[
            b(-8.0, 6.0, 95.0, 119.0),
            b(-9.0, -1.0, 119.0, 141.0),
            b(5.0, 19.0, 117.0, 126.0),
        ],
    },
    Landmass {
        name: "Australia",
        parts: &[b(-39.0, -11.0, 113.0, 153.5)],
    },
    Landmass {
        name: "New Zealand",
        parts: &[b(-47.0, -34.5, 166.5, 178.5)],
    },
    Landmass {
        name: "Pacific Islands",
        parts: &[
            b(-19.0, -16.0, 177.0, -179.0),
            b(18.9, 22.3, -160.3, -154.8),
        ],
    },
    Landmass {
        name: "Caribbean",
        parts: &[b(18.0, 23.0, -85.0, -68.0)],
    },
    Landmass {
        name: "Iceland",
        parts: &[b(63.3, 66.6, -24.5, -13.5)],
    },
    Landmass {
        name: "Antarctica",
        parts: &[b(-90.0, -66.0, -180.0, 180.0)],
    },
];

/// Oracle answering from [`LANDMASSES`].
#[derive(Debug, Clone, Copy)]
pub struct LandmassOracle {
    landmasses: &'static [Landmass],
}

impl LandmassOracle {
    /// Create an oracle over the built-in table.
    pub fn new() -> Self {
        Self {
            landmasses: LANDMASSES,
        }
    }

    /// Name of the landmass containing the point, if any.
    pub fn landmass_at(&self, lat: f64, lon: f64) -> Option<&'static str> {
        self.landmasses
            .iter()
            .find(|mass| mass.parts.iter().any(|part| part.contains(lat, lon)))
            .map(|mass| mass.name)
    }
}

impl Default for LandmassOracle {
    fn default() -> Self {
        Self::new()
    }
}

impl LandOracle for LandmassOracle {
    fn is_land(&self, lat: f64, lon: f64) -> bool {
        self.landmass_at(lat, lon).is_some()
    }
}
