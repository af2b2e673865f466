//! Structured logging setup using tracing.
//!
//! The library only emits `tracing` events; installing a subscriber is left
//! to the binary (or the embedding application).
//!
//! ```no_run
//! use scormkit::config::LoggingConfig;
//! use scormkit::logging::init_logging;
//!
//! init_logging(&LoggingConfig::default()).expect("Failed to initialize logging");
//! tracing::info!(formation_id = "f1", "export started");
//! ```

use tracing::Level;
use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;
use crate::error::{Error, Result};

/// Install the global subscriber.
///
/// `RUST_LOG` takes precedence over the configured level. Output goes to
/// stderr so package bytes can be piped from stdout.
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let level = parse_log_level(&config.level)?;
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("scormkit={level}")));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr);

    let installed = if config.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    installed.map_err(|e| Error::Config(format!("Failed to initialize logging: {e}")))
}

/// Parse a level name, case-insensitively.
pub fn parse_log_level(level: &str) -> Result<Level> {
    match level.to_ascii_lowercase().as_str() {
        "trace" => Ok(Level::TRACE),
        "debug" => Ok(Level::DEBUG),
        "info" => Ok(Level::INFO),
        "warn" => Ok(Level::WARN),
        "error" => Ok(Level::ERROR),
        other => Err(Error::Config(format!("Invalid log level: {other}"))),
    }
}
