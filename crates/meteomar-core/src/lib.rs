//! Shared foundation for Meteomar: configuration, error types and logging setup.

pub mod config;
pub mod error;

pub use config::{
    Config, SettingsUpdate, UiConfig, Units, ValidationResult, WeatherConfig,
    DEFAULT_LOCATION_ID,
};
pub use error::{AppError, ConfigError, NetworkError, ReqwestErrorExt, StorageError};

use anyhow::Result;

/// Initialize logging. `RUST_LOG` overrides the default `info` filter.
pub fn init() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to install tracing subscriber: {}", e))?;

    tracing::info!("Meteomar core initialized");
    Ok(())
}
