//! Logging configuration using the tracing framework
//!
//! Logs can be controlled via the RUST_LOG environment variable. Console
//! output goes to stderr so reports printed on stdout stay machine-readable.

use std::path::PathBuf;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_FILTER: &str = "aptprogress=info,warn";
const VERBOSE_FILTER: &str = "aptprogress=debug,warn";

fn env_filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if verbose {
            VERBOSE_FILTER
        } else {
            DEFAULT_FILTER
        })
    })
}

/// Initialize console logging
///
/// # Environment Variables
///
/// - `RUST_LOG`: Controls log level and takes precedence over `verbose`
///   - Default: "aptprogress=info,warn" ("aptprogress=debug,warn" with `-v`)
///   - Examples:
///     - `RUST_LOG=aptprogress::loader=debug` - Show every skipped row
///     - `RUST_LOG=error` - Errors only
pub fn init(verbose: bool) {
    tracing_subscriber::registry()
        .with(env_filter(verbose))
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_thread_ids(false)
                .with_thread_names(false)
                .with_line_number(true)
                .with_file(false),
        )
        .try_init()
        .ok();
}

/// Directory for rolling log files
pub fn log_dir() -> std::io::Result<PathBuf> {
    let log_path = match directories::ProjectDirs::from("com", "itower", "aptprogress") {
        Some(proj_dirs) => proj_dirs.data_dir().join("logs"),
        None => std::env::current_dir()?.join("logs"),
    };
    std::fs::create_dir_all(&log_path)?;
    Ok(log_path)
}

/// Initialize logging to a daily rolling file only
///
/// Used while the terminal UI owns the screen, where console output would
/// corrupt the alternate screen.
pub fn init_with_file(log_file_name: &str, verbose: bool) -> std::io::Result<PathBuf> {
    use tracing_appender::rolling::{RollingFileAppender, Rotation};

    let log_dir = log_dir()?;
    let file_appender = RollingFileAppender::new(Rotation::DAILY, &log_dir, log_file_name);

    tracing_subscriber::registry()
        .with(env_filter(verbose))
        .with(fmt::layer().with_writer(file_appender).with_ansi(false))
        .try_init()
        .ok();

    Ok(log_dir)
}

/// Initialize logging for tests
///
/// Only errors are shown by default.
#[cfg(test)]
pub(crate) fn init_test() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("error"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_test_writer())
        .try_init()
        .ok(); // Ignore errors if already initialized
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_does_not_panic() {
        init_test();
        // A second initialization must be a no-op
        init(true);
    }

    #[test]
    fn test_structured_logging() {
        init_test();
        tracing::info!(apartment = 101, overall = 0.38, "Structured log message");
        tracing::warn!(column = "Ceiling", "Mixed scale column");
    }
}
