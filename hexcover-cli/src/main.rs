//! hexcover CLI - Command-line interface
//!
//! Generates global hexagon coverage, runs cache-through viewport queries and
//! manages the configuration file.

mod commands;
mod error;
mod runner;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use commands::config::ConfigCommands;
use commands::generate::GenerateArgs;
use commands::query::QueryArgs;
use error::CliError;
use runner::CliRunner;

#[derive(Debug, Parser)]
#[command(name = "hexcover")]
#[command(version = hexcover::VERSION)]
#[command(about = "Global H3 hexagon land coverage with a viewport cache", long_about = None)]
struct Cli {
    /// Config file to use instead of ~/.hexcover/config.ini
    #[arg(long, global = true, env = "HEXCOVER_CONFIG", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Generate coverage and print statistics
    Generate(GenerateArgs),

    /// Query coverage for a viewport through the cache
    Query(QueryArgs),

    /// Manage the configuration file
    #[command(subcommand)]
    Config(ConfigCommands),
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        e.exit();
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Generate(args) => {
            let runner = CliRunner::new(config_path, cli.debug)?;
            commands::generate::run(&runner, args)
        }
        Commands::Query(args) => {
            let runner = CliRunner::new(config_path, cli.debug)?;
            commands::query::run(&runner, args)
        }
        Commands::Config(command) => commands::config::run(command, config_path),
    }
}
