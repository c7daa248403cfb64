//! Cache-through viewport query command.

use clap::Args;
use tokio_util::sync::CancellationToken;
use tracing::info;

use hexcover::cache::Viewport;
use hexcover::coord::GeoPoint;
use hexcover::coverage::HexagonMap;
use hexcover::service::CoverageResponse;

use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for `hexcover query`.
#[derive(Debug, Clone, Args)]
pub struct QueryArgs {
    /// Viewport center latitude
    #[arg(long, allow_hyphen_values = true)]
    pub lat: f64,

    /// Viewport center longitude
    #[arg(long, allow_hyphen_values = true)]
    pub lon: f64,

    /// Zoom level; each step halves the visible extent
    #[arg(long, default_value = "3")]
    pub zoom: f64,

    /// Resolution to query (0-7); repeat for several
    #[arg(long = "resolution", short = 'r', value_name = "N")]
    pub resolutions: Vec<u8>,

    /// Number of times to issue the query
    #[arg(long, default_value = "1", value_parser = clap::value_parser!(u32).range(1..))]
    pub repeat: u32,

    /// Also fetch the surrounding viewports within the preload radius
    #[arg(long)]
    pub preload: bool,

    /// Generate and cache the coverage at warm priority before querying
    #[arg(long)]
    pub warm: bool,

    /// Seed for reproducible opportunity scores
    #[arg(long)]
    pub seed: Option<u64>,
}

impl QueryArgs {
    /// Validated viewport for the query.
    pub fn viewport(&self) -> Result<Viewport, CliError> {
        let center = GeoPoint::new(self.lat, self.lon)
            .map_err(|e| CliError::InvalidArguments(e.to_string()))?;
        if !self.zoom.is_finite() || self.zoom < 0.0 {
            return Err(CliError::InvalidArguments(format!(
                "zoom must be a non-negative number, got {}",
                self.zoom
            )));
        }
        Ok(Viewport::new(center.lat, center.lon, self.zoom))
    }
}

/// Run `hexcover query`.
pub fn run(runner: &CliRunner, args: QueryArgs) -> Result<(), CliError> {
    runner.log_startup("query");

    let viewport = args.viewport()?;
    let mut config = runner.config().coverage_config()?;
    if !args.resolutions.is_empty() {
        config = config.with_resolutions(args.resolutions.clone());
        config.validate()?;
    }
    let service = runner.create_service(args.seed.or(runner.config().coverage.seed))?;

    if args.warm {
        let keys = service.warm(std::slice::from_ref(&config), &CancellationToken::new())?;
        for key in keys {
            println!("Warmed {}", key);
        }
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(CliError::Runtime)?;

    runtime.block_on(async {
        let shutdown = CancellationToken::new();
        let maintenance = service.cache().start_maintenance(shutdown.clone());

        let result = async {
            for attempt in 1..=args.repeat {
                let response = service
                    .coverage_async(config.clone(), Some(viewport), shutdown.child_token())
                    .await?;
                info!(attempt, cache_hit = response.cache_hit, "Query answered");
                print_response(attempt, &response);
            }

            if args.preload {
                let neighbours = service.preload_viewports(&viewport);
                println!("Preloading {} surrounding viewports...", neighbours.len());
                for neighbour in neighbours {
                    let response = service
                        .coverage_async(config.clone(), Some(neighbour), shutdown.child_token())
                        .await?;
                    println!(
                        "  ({:>7.2}, {:>8.2}): {} hexagons",
                        neighbour.center_lat,
                        neighbour.center_lon,
                        count(&response.hexagons)
                    );
                }
            }
            Ok::<(), CliError>(())
        }
        .await;

        shutdown.cancel();
        let _ = maintenance.await;
        result
    })?;

    println!();
    println!("{}", service.cache().statistics().format());

    let metrics = serde_json::to_string_pretty(&service.cache().metrics())
        .map_err(CliError::Serialize)?;
    println!("Performance metrics:");
    println!("{}", metrics);

    Ok(())
}

fn count(hexagons: &HexagonMap) -> usize {
    hexagons.values().map(Vec::len).sum()
}

fn print_response(attempt: u32, response: &CoverageResponse) {
    let source = if response.cache_hit { "cache" } else { "generated" };
    println!(
        "Query {} [{}] key={}: {} hexagons in viewport",
        attempt,
        source,
        response.key,
        count(&response.hexagons)
    );
    for (resolution, records) in &response.hexagons {
        println!("  Resolution {}: {}", resolution, records.len());
    }
}
