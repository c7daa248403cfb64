//! Viewport description and bounds derivation.

use serde::{Deserialize, Serialize};

use crate::coord::{normalize_lon, GeoBounds};

/// Margin added around a viewport before culling, in degrees.
pub const VIEWPORT_MARGIN_DEGREES: f64 = 5.0;

/// What the rendering layer is currently looking at.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub center_lon: f64,
    pub center_lat: f64,
    pub zoom: f64,
    /// Explicit bounds; derived from center and zoom when absent
    pub bounds: Option<GeoBounds>,
}

impl Viewport {
    /// Viewport from a center and zoom level.
    pub fn new(center_lat: f64, center_lon: f64, zoom: f64) -> Self {
        Self {
            center_lon: normalize_lon(center_lon),
            center_lat,
            zoom,
            bounds: None,
        }
    }

    /// Use explicit bounds instead of the zoom approximation.
    pub fn with_bounds(mut self, bounds: GeoBounds) -> Self {
        self.bounds = Some(bounds);
        self
    }

    /// Half-extents `(lat, lon)` in degrees at this zoom level.
    ///
    /// The visible extent halves with every zoom step.
    pub fn half_extents(&self) -> (f64, f64) {
        let scale = 2f64.powf(self.zoom);
        (180.0 / scale, 360.0 / scale)
    }

    /// Bounds of the viewport, explicit or derived.
    pub fn bounds(&self) -> GeoBounds {
        if let Some(bounds) = self.bounds {
            return bounds;
        }
        let (half_lat, half_lon) = self.half_extents();
        GeoBounds::centered(self.center_lat, self.center_lon, half_lat, half_lon)
    }

    /// Bounds expanded by [`VIEWPORT_MARGIN_DEGREES`].
    pub fn culling_bounds(&self) -> GeoBounds {
        self.bounds().expand(VIEWPORT_MARGIN_DEGREES)
    }

    /// Same zoom, center moved by whole viewport widths.
    pub fn shifted(&self, lat_steps: i32, lon_steps: i32) -> Self {
        let (half_lat, half_lon) = self.half_extents();
        Self::new(
            (self.center_lat + f64::from(lat_steps) * 2.0 * half_lat).clamp(-90.0, 90.0),
            self.center_lon + f64::from(lon_steps) * 2.0 * half_lon,
            self.zoom,
        )
    }
}
