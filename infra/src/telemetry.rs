//! Tracing subscriber setup

use tracing_subscriber::EnvFilter;

use mv_shared::config::{LogFormat, LoggingConfig};

use crate::InfrastructureError;

/// Build the level filter: `RUST_LOG` wins over the configured level
pub fn env_filter(config: &LoggingConfig) -> Result<EnvFilter, InfrastructureError> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(&config.level).map_err(|e| {
            InfrastructureError::Config(format!("Invalid log level '{}': {}", config.level, e))
        }),
    }
}

/// Install the global fmt subscriber described by `config`
///
/// Fails if a global subscriber is already set.
pub fn init_tracing(config: &LoggingConfig) -> Result<(), InfrastructureError> {
    let filter = env_filter(config)?;
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(config.colored)
        .with_file(config.source_location)
        .with_line_number(config.source_location);

    let result = match config.format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Compact => builder.compact().try_init(),
    };

    result.map_err(|e| InfrastructureError::Config(format!("Tracing already initialised: {}", e)))
}
