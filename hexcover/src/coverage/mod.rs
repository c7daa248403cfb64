//! Global hexagon coverage generation.
//!
//! [`CoverageGenerator`] produces a [`GlobalCoverage`]: per resolution, the
//! list of classified hexagon cells covering the world's land (and
//! optionally ocean), a completeness report and aggregate statistics.

mod config;
mod error;
mod generator;
mod jitter;
mod score;
mod types;
mod verify;

pub use config::{
    CoverageConfig, DEFAULT_MAX_HEXAGONS_PER_RESOLUTION, DEFAULT_MIN_LAND_COVERAGE,
    DEFAULT_RESOLUTIONS,
};
pub use error::CoverageError;
pub use generator::{
    sort_records, CoverageGenerator, LAND_SAMPLE_DENSITY, OCEAN_REGION, OCEAN_STEP_MULTIPLIER,
};
pub use jitter::{NoJitter, RandomJitter, ScoreJitter, SeededJitter};
pub use score::{
    base_color, opportunity_color, opportunity_score, qualifies_for_opportunity,
    MAX_SCORE_JITTER, OPPORTUNITY_MIN_COVERAGE, OPPORTUNITY_RAMP,
};
pub use types::{
    now_millis, CoverageGap, CoverageStats, GlobalCoverage, HexagonMap, HexagonRecord, Rgba,
};
pub use verify::{verify_completeness, GAP_TOLERANCE_PCT};

pub use crate::region::LandType;
