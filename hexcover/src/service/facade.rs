//! Cache-through coverage service.

use std::sync::Arc;

use sha2::{Digest, Sha256};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::error::ServiceError;
use crate::cache::{HexCache, Viewport, DEFAULT_PRIORITY, WARM_PRIORITY};
use crate::coverage::{
    CoverageConfig, CoverageGenerator, CoverageStats, HexagonMap, RandomJitter, ScoreJitter,
};
use crate::oracle::LandOracle;
use crate::region::RegionCatalog;

/// Prefix of every coverage cache key.
pub const FINGERPRINT_PREFIX: &str = "coverage:";

/// Number of hex digits of the SHA-256 digest kept in a key.
const FINGERPRINT_HEX_LEN: usize = 16;

/// Cache key of a coverage configuration.
///
/// Equal configurations always map to the same key. The key is a SHA-256
/// over the canonical JSON form of the configuration.
pub fn fingerprint(config: &CoverageConfig) -> String {
    let canonical = serde_json::to_string(config).unwrap_or_else(|_| format!("{:?}", config));
    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    let digest = format!("{:x}", hasher.finalize());
    format!("{}{}", FINGERPRINT_PREFIX, &digest[..FINGERPRINT_HEX_LEN])
}

/// Result of a coverage request.
#[derive(Debug, Clone)]
pub struct CoverageResponse {
    /// Cache key of the configuration
    pub key: String,
    /// Hexagons, culled to the viewport when one was given
    pub hexagons: HexagonMap,
    /// True if served from the cache
    pub cache_hit: bool,
    /// Generation statistics, only on a miss
    pub stats: Option<CoverageStats>,
}

/// Composes the coverage generator and the performance cache.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use hexcover::cache::{HexCache, HexCacheConfig};
/// use hexcover::coverage::{CoverageConfig, NoJitter};
/// use hexcover::oracle::LandmassOracle;
/// use hexcover::service::CoverageService;
/// use tokio_util::sync::CancellationToken;
///
/// let cache = Arc::new(HexCache::new(HexCacheConfig::default()).unwrap());
/// let service = CoverageService::new(Arc::new(LandmassOracle::new()), cache)
///     .with_jitter(Arc::new(NoJitter));
///
/// let config = CoverageConfig::default().with_resolutions([0]);
/// let cancel = CancellationToken::new();
/// let first = service.coverage(&config, None, &cancel).unwrap();
/// let second = service.coverage(&config, None, &cancel).unwrap();
/// assert!(!first.cache_hit);
/// assert!(second.cache_hit);
/// ```
pub struct CoverageService {
    oracle: Arc<dyn LandOracle>,
    cache: Arc<HexCache>,
    jitter: Arc<dyn ScoreJitter>,
    catalog: Option<RegionCatalog>,
}

impl CoverageService {
    /// Create a service over an oracle and a shared cache.
    pub fn new(oracle: Arc<dyn LandOracle>, cache: Arc<HexCache>) -> Self {
        Self {
            oracle,
            cache,
            jitter: Arc::new(RandomJitter),
            catalog: None,
        }
    }

    /// Jitter source handed to every generator.
    pub fn with_jitter(mut self, jitter: Arc<dyn ScoreJitter>) -> Self {
        self.jitter = jitter;
        self
    }

    /// Sweep this catalog instead of the built-in regions.
    pub fn with_catalog(mut self, catalog: RegionCatalog) -> Self {
        self.catalog = Some(catalog);
        self
    }

    pub fn cache(&self) -> &Arc<HexCache> {
        &self.cache
    }

    fn generator(&self, config: &CoverageConfig) -> Result<CoverageGenerator, ServiceError> {
        let mut generator = CoverageGenerator::new(config.clone(), Arc::clone(&self.oracle))?
            .with_jitter(Arc::clone(&self.jitter));
        if let Some(catalog) = &self.catalog {
            generator = generator.with_catalog(catalog.clone());
        }
        Ok(generator)
    }

    /// Cached coverage for a configuration, generating it on a miss.
    ///
    /// A freshly generated result is stored at [`DEFAULT_PRIORITY`]. If the
    /// cache refuses it the result is still returned, just not cached.
    pub fn coverage(
        &self,
        config: &CoverageConfig,
        viewport: Option<&Viewport>,
        cancel: &CancellationToken,
    ) -> Result<CoverageResponse, ServiceError> {
        let key = fingerprint(config);

        if let Some(hexagons) = self.cache.get(&key, viewport) {
            debug!(key = %key, "Serving coverage from cache");
            return Ok(CoverageResponse {
                key,
                hexagons,
                cache_hit: true,
                stats: None,
            });
        }

        info!(key = %key, resolutions = ?config.resolutions, "Generating coverage");
        let coverage = self.generator(config)?.generate_parallel(cancel)?;

        if let Err(e) = self
            .cache
            .store(key.clone(), coverage.hexagons.clone(), DEFAULT_PRIORITY)
        {
            warn!(key = %key, error = %e, "Coverage not cached");
        }

        let mut hexagons = coverage.hexagons;
        if let Some(viewport) = viewport {
            let bounds = viewport.culling_bounds();
            for records in hexagons.values_mut() {
                records.retain(|r| bounds.contains(r.center.lat, r.center.lon));
            }
        }

        Ok(CoverageResponse {
            key,
            hexagons,
            cache_hit: false,
            stats: Some(coverage.stats),
        })
    }

    /// Generate and store coverage for each configuration at
    /// [`WARM_PRIORITY`], returning the keys stored.
    pub fn warm(
        &self,
        configs: &[CoverageConfig],
        cancel: &CancellationToken,
    ) -> Result<Vec<String>, ServiceError> {
        let mut keys = Vec::with_capacity(configs.len());
        for config in configs {
            let key = fingerprint(config);
            let coverage = self.generator(config)?.generate_parallel(cancel)?;
            self.cache
                .store(key.clone(), coverage.hexagons, WARM_PRIORITY)?;
            info!(key = %key, hexagons = coverage.stats.total_hexagons, "Warmed coverage");
            keys.push(key);
        }
        Ok(keys)
    }

    /// Async form of [`coverage`](Self::coverage) that runs generation on
    /// the blocking pool.
    pub async fn coverage_async(
        self: &Arc<Self>,
        config: CoverageConfig,
        viewport: Option<Viewport>,
        cancel: CancellationToken,
    ) -> Result<CoverageResponse, ServiceError> {
        let service = Arc::clone(self);
        tokio::task::spawn_blocking(move || service.coverage(&config, viewport.as_ref(), &cancel))
            .await
            .map_err(|e| ServiceError::Task(e.to_string()))?
    }

    /// Viewports surrounding `center` within the cache's preload radius.
    ///
    /// Neighbours are whole viewport widths apart; the center itself is not
    /// included.
    pub fn preload_viewports(&self, center: &Viewport) -> Vec<Viewport> {
        let radius = self.cache.config().preload_radius as i32;
        let mut viewports = Vec::new();
        for dy in -radius..=radius {
            for dx in -radius..=radius {
                if dx == 0 && dy == 0 {
                    continue;
                }
                viewports.push(center.shifted(dy, dx));
            }
        }
        viewports
    }
}
