//! Logging infrastructure for hexcover.
//!
//! Provides structured logging with file output and optional console output:
//! - Writes to `<log_dir>/hexcover.log` (cleared on session start)
//! - Optionally mirrors to stdout for CLI tailing
//! - Configurable via RUST_LOG environment variable

use std::fs;
use std::io;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Guard that must be kept alive for the duration of logging.
///
/// Dropping this guard will flush and close the log file writer.
pub struct LoggingGuard {
    _file_guard: WorkerGuard,
}

/// Filter used when RUST_LOG is not set.
pub fn default_filter(debug: bool) -> &'static str {
    if debug {
        "hexcover=debug,info"
    } else {
        "info"
    }
}

/// Initialize logging system.
///
/// Creates the log directory if needed, clears the previous log file and
/// installs the global subscriber.
///
/// # Arguments
///
/// * `log_dir` - Directory for log files
/// * `log_file` - Log filename (e.g., "hexcover.log")
/// * `stdout_enabled` - Also print events to stdout
/// * `debug` - Default to debug level for this crate when RUST_LOG is unset
///
/// # Errors
///
/// Returns error if log directory cannot be created or log file cannot be cleared
pub fn init_logging(
    log_dir: &Path,
    log_file: &str,
    stdout_enabled: bool,
    debug: bool,
) -> Result<LoggingGuard, io::Error> {
    fs::create_dir_all(log_dir)?;
    fs::write(log_dir.join(log_file), "")?;

    let file_appender = tracing_appender::rolling::never(log_dir, log_file);
    let (non_blocking_file, file_guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false)
        .with_span_events(FmtSpan::CLOSE);

    // Option<Layer> is itself a layer, so a disabled stdout costs nothing
    let stdout_layer = stdout_enabled.then(|| {
        tracing_subscriber::fmt::layer()
            .with_writer(io::stdout)
            .with_ansi(true)
            .compact()
    });

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(debug)));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(stdout_layer)
        .init();

    Ok(LoggingGuard {
        _file_guard: file_guard,
    })
}

/// Get default log directory path (`~/.hexcover/logs`, else `./logs`).
pub fn default_log_dir() -> std::path::PathBuf {
    dirs::home_dir()
        .map(|home| home.join(".hexcover").join("logs"))
        .unwrap_or_else(|| std::path::PathBuf::from("logs"))
}

/// Get default log file name.
pub fn default_log_file() -> &'static str {
    "hexcover.log"
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_paths() {
        assert_eq!(default_log_file(), "hexcover.log");
        assert!(default_log_dir().ends_with("logs"));
    }

    #[test]
    fn test_default_filter() {
        assert_eq!(default_filter(false), "info");
        assert!(default_filter(true).contains("hexcover=debug"));
        assert!(EnvFilter::try_new(default_filter(true)).is_ok());
    }

    #[test]
    fn test_clears_existing_file() {
        // init_logging installs a global subscriber, so only the file
        // preparation is exercised here
        let temp = TempDir::new().unwrap();
        let log_path = temp.path().join("hexcover.log");
        fs::write(&log_path, "old log data").unwrap();

        fs::create_dir_all(temp.path()).unwrap();
        fs::write(&log_path, "").unwrap();

        assert_eq!(fs::read_to_string(&log_path).unwrap(), "");
    }

    #[test]
    fn test_guard_structure() {
        use tracing_appender::non_blocking::NonBlocking;

        let (non_blocking, guard) = NonBlocking::new(std::io::sink());
        drop(non_blocking);

        let _logging_guard = LoggingGuard { _file_guard: guard };
    }
}
