//! Geographic region catalog.
//!
//! The coverage sweep walks a fixed list of named regions rather than the
//! whole globe. Each region carries a [`RegionKind`] which, together with
//! latitude, decides the [`LandType`] of the cells found inside it.

use serde::{Deserialize, Serialize};

use crate::coord::GeoBounds;
use crate::coverage::CoverageConfig;

/// Latitude beyond which land is classified as polar.
pub const POLAR_LATITUDE: f64 = 66.5;

/// Kind of terrain a region is mostly made of.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RegionKind {
    Continental,
    IslandChain,
    /// Island group whose `core` box holds the main archipelago.
    Archipelago { core: GeoBounds },
    Arctic,
    Antarctic,
}

impl RegionKind {
    /// True for island chains and archipelagos, which get a finer sweep.
    pub fn is_insular(&self) -> bool {
        matches!(self, RegionKind::IslandChain | RegionKind::Archipelago { .. })
    }
}

/// Classification of a land cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LandType {
    Continental,
    Island,
    Archipelago,
    Arctic,
    Antarctic,
}

impl LandType {
    pub fn as_str(&self) -> &'static str {
        match self {
            LandType::Continental => "continental",
            LandType::Island => "island",
            LandType::Archipelago => "archipelago",
            LandType::Arctic => "arctic",
            LandType::Antarctic => "antarctic",
        }
    }
}

impl std::fmt::Display for LandType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named sweep region.
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    pub name: &'static str,
    pub kind: RegionKind,
    pub bounds: GeoBounds,
}

impl Region {
    pub const fn new(name: &'static str, kind: RegionKind, bounds: GeoBounds) -> Self {
        Self { name, kind, bounds }
    }

    /// Land type of a land cell centered at the given point.
    ///
    /// Polar latitude wins over the region kind.
    pub fn land_type_at(&self, lat: f64, lon: f64) -> LandType {
        if lat > POLAR_LATITUDE {
            return LandType::Arctic;
        }
        if lat < -POLAR_LATITUDE {
            return LandType::Antarctic;
        }
        match self.kind {
            RegionKind::IslandChain => LandType::Island,
            RegionKind::Archipelago { core } => {
                if core.contains(lat, lon) {
                    LandType::Archipelago
                } else {
                    LandType::Island
                }
            }
            RegionKind::Continental | RegionKind::Arctic | RegionKind::Antarctic => {
                LandType::Continental
            }
        }
    }
}

const fn b(min_lat: f64, max_lat: f64, min_lon: f64, max_lon: f64) -> GeoBounds {
    GeoBounds::new(min_lat, max_lat, min_lon, max_lon)
}

/// Built-in catalog of sweep regions.
pub const REGIONS: &[Region] = &[
    Region::new("North America", RegionKind::Continental, b(7.0, 72.0, -170.0, -52.0)),
    Region::new("South America", RegionKind::Continental, b(-56.0, 13.0, -82.0, -34.0)),
    Region::new("Europe", RegionKind::Continental, b(35.0, 72.0, -11.0, 41.0)),
    Region::new("Africa", RegionKind::Continental, b(-36.0, 38.0, -18.0, 52.0)),
    Region::new("Asia", RegionKind::Continental, b(5.0, 78.0, 41.0, 180.0)),
    Region::new("Australia", RegionKind::Continental, b(-40.0, -10.0, 112.0, 154.0)),
    Region::new(
        "Maritime Southeast Asia",
        RegionKind::Archipelago {
            core: b(-9.0, 7.0, 95.0, 141.0),
        },
        b(-11.0, 20.0, 94.0, 142.0),
    ),
    Region::new(
        "Caribbean",
        RegionKind::Archipelago {
            core: b(17.5, 23.5, -85.5, -67.5),
        },
        b(10.0, 27.0, -86.0, -59.0),
    ),
    Region::new("Pacific Islands", RegionKind::IslandChain, b(-25.0, 23.0, 165.0, -150.0)),
    Region::new("New Zealand", RegionKind::IslandChain, b(-48.0, -34.0, 166.0, 179.0)),
    Region::new("Iceland", RegionKind::IslandChain, b(63.0, 67.0, -25.0, -13.0)),
    Region::new("Greenland", RegionKind::Arctic, b(59.0, 84.0, -74.0, -11.0)),
    Region::new("Arctic Archipelago", RegionKind::Arctic, b(66.0, 84.0, -125.0, -60.0)),
    Region::new("Antarctica", RegionKind::Antarctic, b(-90.0, -60.0, -180.0, 180.0)),
];

/// The set of regions swept by a coverage pass.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionCatalog {
    regions: Vec<Region>,
}

impl RegionCatalog {
    /// Catalog over an explicit region list.
    pub fn new(regions: Vec<Region>) -> Self {
        Self { regions }
    }

    /// Built-in regions, with Antarctica only when requested.
    pub fn builtin(include_antarctica: bool) -> Self {
        let regions = REGIONS
            .iter()
            .filter(|r| include_antarctica || r.kind != RegionKind::Antarctic)
            .cloned()
            .collect();
        Self { regions }
    }

    /// Built-in regions selected by a coverage configuration.
    pub fn for_config(config: &CoverageConfig) -> Self {
        Self::builtin(config.include_antarctica)
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}
