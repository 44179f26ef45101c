//! Logging setup
//!
//! The crate only emits `tracing` events. Applications that want to see them
//! can install a subscriber themselves or call [`init_logging`].

use std::str::FromStr;
use tracing_subscriber::EnvFilter;

use crate::core::providers::unified_provider::ProviderError;

/// Output format of the installed subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Plain,
    Json,
}

impl FromStr for LogFormat {
    type Err = ProviderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "plain" | "text" | "pretty" => Ok(Self::Plain),
            "json" => Ok(Self::Json),
            other => Err(ProviderError::configuration(
                "bedrock",
                format!("Unknown log format: {}", other),
            )),
        }
    }
}

/// Build the filter from `RUST_LOG`, falling back to `default_directive`
pub fn env_filter(default_directive: &str) -> Result<EnvFilter, ProviderError> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(default_directive).map_err(|e| {
            ProviderError::configuration(
                "bedrock",
                format!("Invalid log directive '{}': {}", default_directive, e),
            )
        }),
    }
}

/// Install a global `tracing` subscriber.
///
/// Fails if the directive is invalid or a global subscriber is already set.
pub fn init_logging(default_directive: &str, format: LogFormat) -> Result<(), ProviderError> {
    let filter = env_filter(default_directive)?;
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    let result = match format {
        LogFormat::Plain => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };

    result.map_err(|e| {
        ProviderError::configuration("bedrock", format!("Failed to initialize logging: {}", e))
    })
}
