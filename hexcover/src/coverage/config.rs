//! Coverage generator configuration.

use serde::{Deserialize, Serialize};

use super::CoverageError;
use crate::hex::{MAX_COVERAGE_RESOLUTION, MIN_COVERAGE_RESOLUTION};

/// Default resolutions swept by a coverage pass.
pub const DEFAULT_RESOLUTIONS: [u8; 3] = [2, 3, 4];

/// Default minimum land percentage for a cell to count as land.
pub const DEFAULT_MIN_LAND_COVERAGE: f64 = 10.0;

/// Default per-resolution output cap.
pub const DEFAULT_MAX_HEXAGONS_PER_RESOLUTION: usize = 50_000;

/// Configuration of one coverage run.
///
/// Construct with [`CoverageConfig::default`] and the `with_*` setters, then
/// call [`validate`](Self::validate) (the generator does this for you).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverageConfig {
    /// Resolutions to generate, in output order
    pub resolutions: Vec<u8>,
    /// Also sweep open ocean and keep water cells
    pub include_ocean: bool,
    /// Sweep the Antarctic region
    pub include_antarctica: bool,
    /// Minimum land percentage (0–100) for a cell to be land
    pub min_land_coverage: f64,
    /// Run the neighbor completeness check after each pass
    pub verify_completeness: bool,
    /// Output cap per resolution
    pub max_hexagons_per_resolution: usize,
    /// Finer sweeps over islands and coastal neighbor expansion
    pub use_adaptive_detail: bool,
}

impl Default for CoverageConfig {
    fn default() -> Self {
        Self {
            resolutions: DEFAULT_RESOLUTIONS.to_vec(),
            include_ocean: false,
            include_antarctica: false,
            min_land_coverage: DEFAULT_MIN_LAND_COVERAGE,
            verify_completeness: true,
            max_hexagons_per_resolution: DEFAULT_MAX_HEXAGONS_PER_RESOLUTION,
            use_adaptive_detail: true,
        }
    }
}

impl CoverageConfig {
    /// Set the resolutions to generate.
    pub fn with_resolutions(mut self, resolutions: impl Into<Vec<u8>>) -> Self {
        self.resolutions = resolutions.into();
        self
    }

    /// Keep ocean cells in the output.
    pub fn with_ocean(mut self, include: bool) -> Self {
        self.include_ocean = include;
        self
    }

    /// Sweep Antarctica.
    pub fn with_antarctica(mut self, include: bool) -> Self {
        self.include_antarctica = include;
        self
    }

    /// Set the land percentage threshold.
    pub fn with_min_land_coverage(mut self, pct: f64) -> Self {
        self.min_land_coverage = pct;
        self
    }

    /// Enable or disable completeness verification.
    pub fn with_verification(mut self, verify: bool) -> Self {
        self.verify_completeness = verify;
        self
    }

    /// Set the per-resolution output cap.
    pub fn with_max_hexagons(mut self, max: usize) -> Self {
        self.max_hexagons_per_resolution = max;
        self
    }

    /// Enable or disable adaptive detail.
    pub fn with_adaptive_detail(mut self, adaptive: bool) -> Self {
        self.use_adaptive_detail = adaptive;
        self
    }

    /// Check the configuration, failing on the first invalid field.
    pub fn validate(&self) -> Result<(), CoverageError> {
        if self.resolutions.is_empty() {
            return Err(CoverageError::InvalidConfig(
                "at least one resolution is required".to_string(),
            ));
        }

        if let Some(&bad) = self
            .resolutions
            .iter()
            .find(|&&r| !(MIN_COVERAGE_RESOLUTION..=MAX_COVERAGE_RESOLUTION).contains(&r))
        {
            return Err(CoverageError::InvalidConfig(format!(
                "resolution {} outside {}..={}",
                bad, MIN_COVERAGE_RESOLUTION, MAX_COVERAGE_RESOLUTION
            )));
        }

        if !self.min_land_coverage.is_finite() || !(0.0..=100.0).contains(&self.min_land_coverage)
        {
            return Err(CoverageError::InvalidConfig(format!(
                "min_land_coverage {} outside 0..=100",
                self.min_land_coverage
            )));
        }

        if self.max_hexagons_per_resolution == 0 {
            return Err(CoverageError::InvalidConfig(
                "max_hexagons_per_resolution must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CoverageConfig::default();
        assert_eq!(config.resolutions, vec![2, 3, 4]);
        assert!(!config.include_ocean);
        assert!(!config.include_antarctica);
        assert_eq!(config.min_land_coverage, 10.0);
        assert!(config.verify_completeness);
        assert_eq!(config.max_hexagons_per_resolution, 50_000);
        assert!(config.use_adaptive_detail);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_empty_resolutions() {
        let config = CoverageConfig::default().with_resolutions(Vec::new());
        assert!(matches!(
            config.validate(),
            Err(CoverageError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_rejects_out_of_range_resolution() {
        let config = CoverageConfig::default().with_resolutions(vec![3, 9]);
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("resolution 9"));
    }

    #[test]
    fn test_rejects_bad_threshold() {
        for pct in [-1.0, 100.5, f64::NAN] {
            let config = CoverageConfig::default().with_min_land_coverage(pct);
            assert!(config.validate().is_err(), "threshold {pct} accepted");
        }
    }

    #[test]
    fn test_rejects_zero_cap() {
        let config = CoverageConfig::default().with_max_hexagons(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_builder_chain() {
        let config = CoverageConfig::default()
            .with_resolutions([5])
            .with_ocean(true)
            .with_antarctica(true)
            .with_min_land_coverage(50.0)
            .with_verification(false)
            .with_max_hexagons(100)
            .with_adaptive_detail(false);

        assert_eq!(config.resolutions, vec![5]);
        assert!(config.include_ocean);
        assert!(config.include_antarctica);
        assert_eq!(config.min_land_coverage, 50.0);
        assert!(!config.verify_completeness);
        assert_eq!(config.max_hexagons_per_resolution, 100);
        assert!(!config.use_adaptive_detail);
    }
}
