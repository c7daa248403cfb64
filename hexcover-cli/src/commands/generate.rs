//! Coverage generation command.

use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use tokio_util::sync::CancellationToken;
use tracing::info;

use hexcover::config::ConfigFile;
use hexcover::coverage::{CoverageConfig, CoverageGenerator, GlobalCoverage};

use crate::error::CliError;
use crate::runner::{jitter_for, CliRunner};

/// Arguments for `hexcover generate`.
///
/// Anything not given on the command line comes from `[coverage]` in the
/// config file.
#[derive(Debug, Clone, Default, Args)]
pub struct GenerateArgs {
    /// Resolution to generate (0-7); repeat for several
    #[arg(long = "resolution", short = 'r', value_name = "N")]
    pub resolutions: Vec<u8>,

    /// Add open-ocean hexagons
    #[arg(long)]
    pub include_ocean: bool,

    /// Sweep Antarctica
    #[arg(long)]
    pub include_antarctica: bool,

    /// Minimum land percentage for a land hexagon
    #[arg(long, value_name = "PCT")]
    pub min_land_coverage: Option<f64>,

    /// Cap on hexagons kept per resolution
    #[arg(long, value_name = "N")]
    pub max_hexagons: Option<usize>,

    /// Skip the completeness check
    #[arg(long)]
    pub no_verify: bool,

    /// Sweep island regions at the normal density
    #[arg(long)]
    pub no_adaptive: bool,

    /// Seed for reproducible opportunity scores
    #[arg(long)]
    pub seed: Option<u64>,

    /// Write the full coverage as JSON
    #[arg(long, short = 'o', value_name = "FILE")]
    pub output: Option<PathBuf>,
}

impl GenerateArgs {
    /// Coverage configuration from the config file with flags applied.
    pub fn coverage_config(&self, file: &ConfigFile) -> Result<CoverageConfig, CliError> {
        let mut config = file.coverage_config()?;

        if !self.resolutions.is_empty() {
            config = config.with_resolutions(self.resolutions.clone());
        }
        if self.include_ocean {
            config = config.with_ocean(true);
        }
        if self.include_antarctica {
            config = config.with_antarctica(true);
        }
        if let Some(pct) = self.min_land_coverage {
            config = config.with_min_land_coverage(pct);
        }
        if let Some(max) = self.max_hexagons {
            config = config.with_max_hexagons(max);
        }
        if self.no_verify {
            config = config.with_verification(false);
        }
        if self.no_adaptive {
            config = config.with_adaptive_detail(false);
        }

        config.validate()?;
        Ok(config)
    }

    /// Seed from the flag, else from the config file.
    pub fn seed(&self, file: &ConfigFile) -> Option<u64> {
        self.seed.or(file.coverage.seed)
    }
}

/// Run `hexcover generate`.
pub fn run(runner: &CliRunner, args: GenerateArgs) -> Result<(), CliError> {
    runner.log_startup("generate");

    let config = args.coverage_config(runner.config())?;
    let seed = args.seed(runner.config());

    println!("Generating coverage for resolutions {:?}...", config.resolutions);
    let started = Instant::now();

    let generator = CoverageGenerator::new(config, runner.oracle())?.with_jitter(jitter_for(seed));
    let coverage = generator.generate_parallel(&CancellationToken::new())?;

    let elapsed = started.elapsed();
    info!(elapsed_ms = elapsed.as_millis() as u64, "Generate command complete");

    print!("{}", format_report(&coverage, generator.config()));
    println!("Elapsed: {:.2}s", elapsed.as_secs_f64());

    if let Some(path) = &args.output {
        runner.write_json(path, &coverage)?;
        println!("Wrote {}", path.display());
    }

    Ok(())
}

/// Human-readable summary of a coverage run.
pub fn format_report(coverage: &GlobalCoverage, config: &CoverageConfig) -> String {
    let stats = &coverage.stats;
    let mut out = String::new();

    out.push_str("Coverage\n");
    out.push_str("========\n");
    out.push_str(&format!("  Total:    {}\n", stats.total_hexagons));
    out.push_str(&format!("  Land:     {}\n", stats.land_hexagons));
    out.push_str(&format!("  Ocean:    {}\n", stats.ocean_hexagons));
    out.push_str(&format!("  Coastal:  {}\n", stats.coastal_hexagons));
    if stats.skipped_samples > 0 {
        out.push_str(&format!("  Skipped:  {} samples\n", stats.skipped_samples));
    }
    out.push('\n');

    for (i, resolution) in config.resolutions.iter().enumerate() {
        let count = coverage.at(*resolution).len();
        let status = if !config.verify_completeness {
            "not verified".to_string()
        } else if stats.verified_complete.get(i).copied().unwrap_or(false) {
            "complete".to_string()
        } else {
            format!("{} gaps", stats.gap_counts.get(i).copied().unwrap_or(0))
        };
        out.push_str(&format!(
            "  Resolution {}: {} hexagons ({})\n",
            resolution, count, status
        ));
    }

    out
}
