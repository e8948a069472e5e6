//! Tracing subscriber setup.

use mediaref_error::{ConfigError, MediaResult};
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_FILTER: &str = "info,mediaref=debug";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install a console subscriber for the resolver's `tracing` output.
///
/// `RUST_LOG` overrides the default filter `info,mediaref=debug`.
///
/// # Errors
///
/// Fails when a global subscriber is already installed.
pub fn init_telemetry() -> MediaResult<()> {
    tracing_subscriber::registry()
        .with(env_filter())
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .map_err(|e| ConfigError::new(format!("Failed to install subscriber: {}", e)))?;

    info!("Telemetry initialized (console)");
    Ok(())
}

/// Like [`init_telemetry`], but emits one JSON object per event.
pub fn init_json_telemetry() -> MediaResult<()> {
    tracing_subscriber::registry()
        .with(env_filter())
        .with(tracing_subscriber::fmt::layer().json())
        .try_init()
        .map_err(|e| ConfigError::new(format!("Failed to install subscriber: {}", e)))?;

    info!("Telemetry initialized (json)");
    Ok(())
}
