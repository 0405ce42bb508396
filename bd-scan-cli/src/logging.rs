//! Logging initialization for bd-scan-yocto.
//!
//! Log lines go to stderr so that stdout carries only prompts and the
//! final configuration report.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::cli::LogFormat;
use crate::error::CliError;

/// Initialize the global tracing subscriber.
///
/// Must be called exactly once, before any tracing macros are used.
/// `force_debug` wins over everything; otherwise `RUST_LOG` takes
/// precedence over `level`.
///
/// # Formats
///
/// * [`LogFormat::Text`] - compact human-readable lines
/// * [`LogFormat::Json`] - machine-parseable JSON lines
pub fn init_tracing(level: &str, force_debug: bool, format: LogFormat) -> Result<(), CliError> {
    let env_filter = build_filter(level, force_debug)?;

    let result = match format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(env_filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .try_init(),
        LogFormat::Text => tracing_subscriber::registry()
            .with(env_filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .compact()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .try_init(),
    };

    result.map_err(|e| CliError::Config(format!("failed to initialize tracing subscriber: {e}")))
}

fn build_filter(level: &str, force_debug: bool) -> Result<EnvFilter, CliError> {
    if force_debug {
        return parse_level("debug");
    }
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => parse_level(level),
    }
}

fn parse_level(level: &str) -> Result<EnvFilter, CliError> {
    EnvFilter::try_new(level)
        .map_err(|e| CliError::Config(format!("invalid log level '{level}': {e}")))
}
