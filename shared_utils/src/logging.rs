//! Tracing subscriber setup for the workspace binaries.
//!
//! Library crates only emit `tracing` events; binaries call [`init_tracing`]
//! once at startup. `RUST_LOG` wins over the default directive when set.

use thiserror::Error;
use tracing_subscriber::{EnvFilter, fmt};

/// Errors raised while installing the global subscriber.
#[derive(Debug, Error)]
pub enum LoggingError {
    /// The fallback directive could not be parsed.
    #[error("Invalid log directive '{directive}': {message}")]
    InvalidDirective { directive: String, message: String },

    /// A global subscriber was already installed.
    #[error("Failed to install tracing subscriber: {0}")]
    Install(String),
}

/// Builds the filter: `RUST_LOG` if present and valid, otherwise `default_directive`.
pub fn env_filter(default_directive: &str) -> Result<EnvFilter, LoggingError> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(default_directive).map_err(|e| {
            LoggingError::InvalidDirective {
                directive: default_directive.to_string(),
                message: e.to_string(),
            }
        }),
    }
}

/// Installs a compact stderr `fmt` subscriber as the global default.
///
/// Diagnostics go to stderr so stdout stays clean for `--format json` output.
pub fn init_tracing(default_directive: &str) -> Result<(), LoggingError> {
    let filter = env_filter(default_directive)?;
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .try_init()
        .map_err(|e| LoggingError::Install(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn falls_back_to_default_directive() {
        unsafe { std::env::remove_var("RUST_LOG") };
        let filter = env_filter("earnings_analysis=debug").unwrap();
        assert!(filter.to_string().contains("earnings_analysis=debug"));
    }

    #[test]
    #[serial]
    fn rejects_garbage_default_directive() {
        unsafe { std::env::remove_var("RUST_LOG") };
        let err = env_filter("foo=notalevel").unwrap_err();
        assert!(matches!(err, LoggingError::InvalidDirective { .. }));
    }
}
