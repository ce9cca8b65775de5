use std::time::Duration;

use anyhow::{anyhow, Result};
use studentportal_domain::{LogFormat, LoggingConfig};
use tracing::{info, warn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use crate::cli::CliError;

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins over the configured level. Logs go to stderr so command
/// output on stdout stays machine-readable.
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed.
pub fn init_tracing(config: &LoggingConfig) -> Result<()> {
    let registry = tracing_subscriber::registry().with(build_env_filter(&config.level));

    match config.format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_target(false).with_writer(std::io::stderr))
            .try_init(),
        LogFormat::Pretty => registry
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .try_init(),
    }
    .map_err(|err| anyhow!("failed to install tracing subscriber: {err}"))
}

fn build_env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
}

/// Log the outcome of a CLI command with structured fields.
///
/// `command` must be a stable identifier without user data.
#[inline]
pub fn log_command_execution(command: &str, elapsed: Duration, outcome: Result<(), &CliError>) {
    let duration_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);

    match outcome {
        Ok(()) => info!(command, duration_ms, "command_execution_success"),
        Err(err) => warn!(
            command,
            duration_ms,
            error_category = err.category(),
            status = err.status(),
            "command_execution_failure"
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configured_level_used_without_rust_log() {
        if std::env::var_os("RUST_LOG").is_some() {
            return;
        }
        let filter = build_env_filter("studentportal=debug");
        assert_eq!(filter.to_string(), "studentportal=debug");
    }
}
