pub mod config;
pub mod error;

pub use config::{
    Config, IdentifyConfig, IdentifyMode, RelayConfig, StorageConfig, ValidationResult,
    WeatherConfig,
};
pub use error::{AppError, ConfigError, NetworkError, ReqwestErrorExt, StorageError};

use anyhow::Result;

/// Initialize logging for the interactive tracker.
///
/// Honors `RUST_LOG`; defaults to `info`.
pub fn init() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    tracing::info!("PlantCare core initialized");
    Ok(())
}
