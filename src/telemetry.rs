//! Tracing subscriber setup for binaries.

use thiserror::Error;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::ParseError;

/// Errors raised while installing the tracing subscriber.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// The fallback filter directive is malformed.
    #[error("invalid log level directive: {0}")]
    InvalidDirective(#[from] ParseError),
    /// A global subscriber was already installed.
    #[error("failed to install tracing subscriber: {0}")]
    Install(String),
}

/// Installs a formatting subscriber filtered by `RUST_LOG`, or by
/// `default_directive` when `RUST_LOG` is unset or invalid.
///
/// # Errors
///
/// Returns [`TelemetryError`] when the fallback directive is malformed or a
/// subscriber is already installed.
pub fn init_tracing(default_directive: &str) -> Result<(), TelemetryError> {
    let filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(default_directive))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .map_err(|err| TelemetryError::Install(err.to_string()))
}
