//! Logging setup using tracing.
//!
//! Logs go to stderr so that redacted output written to stdout stays clean.
//! `RUST_LOG` takes precedence over the configured level.

use crate::error::{RedactorError, RedactorResult};
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Parses a log level name.
pub fn parse_log_level(level_str: &str) -> RedactorResult<Level> {
    match level_str.to_lowercase().as_str() {
        "trace" => Ok(Level::TRACE),
        "debug" => Ok(Level::DEBUG),
        "info" => Ok(Level::INFO),
        "warn" => Ok(Level::WARN),
        "error" => Ok(Level::ERROR),
        _ => Err(RedactorError::InvalidInput {
            parameter: "log level".to_string(),
            reason: format!(
                "'{}' must be one of: trace, debug, info, warn, error",
                level_str
            ),
        }),
    }
}

/// Installs the global subscriber.
///
/// `verbose` raises the level to at least debug.
pub fn init_logging(level_str: &str, verbose: bool) -> RedactorResult<()> {
    let mut level = parse_log_level(level_str)?;
    if verbose && level < Level::DEBUG {
        level = Level::DEBUG;
    }

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("pii_redactor={}", level)));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| RedactorError::BackendError {
            backend: "tracing".to_string(),
            message: format!("Failed to initialize logging: {}", e),
            source: None,
        })
}
