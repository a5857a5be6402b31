//! Tracing subscriber setup for binaries and examples.
//!
//! The filter comes from `RUST_LOG` when set, otherwise
//! `info,syncro=debug` style defaults are used.

use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_FILTER: &str = "info,syncro=debug,syncro_rate_limit=debug";

/// Install a global subscriber writing to stderr.
///
/// `json` switches the output to one JSON object per event.
///
/// # Errors
///
/// Fails if a global subscriber is already installed.
pub fn init_telemetry(default_filter: &str, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let registry = tracing_subscriber::registry().with(env_filter);

    if json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .try_init()?;
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .try_init()?;
    }

    info!(json, "Telemetry initialized");
    Ok(())
}

/// Human-readable console logging with the default filter.
///
/// # Errors
///
/// Fails if a global subscriber is already installed.
pub fn init_console_telemetry() -> Result<(), Box<dyn std::error::Error>> {
    init_telemetry(DEFAULT_FILTER, false)
}
