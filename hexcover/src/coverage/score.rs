//! Cell colouring and opportunity scoring.

use super::types::Rgba;
use crate::region::LandType;

/// Minimum land coverage for a cell to receive an opportunity score.
pub const OPPORTUNITY_MIN_COVERAGE: f64 = 75.0;

/// Largest absolute jitter added to an opportunity score.
pub const MAX_SCORE_JITTER: f64 = 10.0;

const BASE_SCORE: f64 = 50.0;
const COASTAL_BONUS: f64 = 20.0;

pub const OCEAN_COLOR: Rgba = Rgba::new(28, 78, 138, 180);
pub const CONTINENTAL_COLOR: Rgba = Rgba::new(86, 140, 62, 220);
pub const ISLAND_COLOR: Rgba = Rgba::new(46, 160, 120, 220);
pub const ARCHIPELAGO_COLOR: Rgba = Rgba::new(40, 150, 170, 220);
pub const ARCTIC_COLOR: Rgba = Rgba::new(214, 226, 236, 220);
pub const ANTARCTIC_COLOR: Rgba = Rgba::new(236, 242, 248, 220);

/// Opportunity colour ramp, lowest bucket first.
pub const OPPORTUNITY_RAMP: [Rgba; 4] = [
    Rgba::new(200, 56, 48, 230),
    Rgba::new(232, 140, 40, 230),
    Rgba::new(232, 208, 64, 230),
    Rgba::new(64, 188, 96, 230),
];

/// Base colour of a cell.
///
/// Land with no recorded type is drawn as continental.
pub fn base_color(is_land: bool, land_type: Option<LandType>) -> Rgba {
    if !is_land {
        return OCEAN_COLOR;
    }
    match land_type.unwrap_or(LandType::Continental) {
        LandType::Continental => CONTINENTAL_COLOR,
        LandType::Island => ISLAND_COLOR,
        LandType::Archipelago => ARCHIPELAGO_COLOR,
        LandType::Arctic => ARCTIC_COLOR,
        LandType::Antarctic => ANTARCTIC_COLOR,
    }
}

/// True if a cell qualifies for an opportunity score.
#[inline]
pub fn qualifies_for_opportunity(is_land: bool, land_coverage_pct: f64) -> bool {
    is_land && land_coverage_pct >= OPPORTUNITY_MIN_COVERAGE
}

/// Opportunity score in 0–100.
///
/// `jitter` is clamped to ±[`MAX_SCORE_JITTER`].
pub fn opportunity_score(lat: f64, is_coastal: bool, jitter: f64) -> f64 {
    let mut score = BASE_SCORE;
    if is_coastal {
        score += COASTAL_BONUS;
    }

    let abs_lat = lat.abs();
    if abs_lat > 70.0 {
        score -= 30.0;
    } else if abs_lat >= 50.0 {
        score -= 15.0;
    } else if abs_lat >= 30.0 {
        score += 10.0;
    }

    let jitter = if jitter.is_finite() {
        jitter.clamp(-MAX_SCORE_JITTER, MAX_SCORE_JITTER)
    } else {
        0.0
    };

    (score + jitter).clamp(0.0, 100.0)
}

/// Colour bucket of an opportunity score.
pub fn opportunity_color(score: f64) -> Rgba {
    let bucket = if score < 25.0 {
        0
    } else if score < 50.0 {
        1
    } else if score < 75.0 {
        2
    } else {
        3
    };
    OPPORTUNITY_RAMP[bucket]
}
