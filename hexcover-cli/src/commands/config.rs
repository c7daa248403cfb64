//! Configuration management CLI commands.
//!
//! Provides `config path`, `config show` and `config init`.

use std::path::{Path, PathBuf};

use clap::Subcommand;

use hexcover::config::{config_file_path, ConfigFile};

use crate::error::CliError;
use crate::runner::load_config;

/// Config subcommands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Show the configuration file path
    Path,

    /// Print the effective configuration (file values over defaults)
    Show,

    /// Write a configuration file with default values
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Run a config subcommand against `path`, or the default location.
pub fn run(command: ConfigCommands, path: Option<&Path>) -> Result<(), CliError> {
    let target = path.map(PathBuf::from).unwrap_or_else(config_file_path);

    match command {
        ConfigCommands::Path => {
            println!("{}", target.display());
            Ok(())
        }
        ConfigCommands::Show => {
            let config = load_config(Some(&target))?;
            // Conversion errors surface here rather than at generate time
            config.coverage_config()?;
            config.cache_config()?;
            print!("{}", config.to_ini_string());
            Ok(())
        }
        ConfigCommands::Init { force } => {
            if init(&target, force)? {
                println!("Wrote default configuration to {}", target.display());
            } else {
                println!(
                    "Configuration already exists at {} (use --force to overwrite)",
                    target.display()
                );
            }
            Ok(())
        }
    }
}

/// Write defaults to `path`. Returns false if the file exists and `force`
/// is not set.
fn init(path: &Path, force: bool) -> Result<bool, CliError> {
    if force {
        ConfigFile::default().save_to(path)?;
        return Ok(true);
    }
    Ok(ConfigFile::ensure_exists(path)?)
}
