//! Bedrock Provider Configuration
//!
//! Settings a [`BedrockLlm`](super::BedrockLlm) is built from. Loadable from
//! environment variables or a YAML file, or assembled in code.

use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

use crate::core::providers::unified_provider::ProviderError;

/// Model used when none is configured
pub const DEFAULT_MODEL: &str = "amazon.titan-tg1-large";
/// Default transport timeout in seconds
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 60;

/// AWS Bedrock text-completion configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BedrockConfig {
    /// Model identifier, `<provider>.<model-name>`
    pub model: String,
    /// AWS region; falls back to `AWS_DEFAULT_REGION` when unset
    pub region: Option<String>,
    /// Sampling temperature. Kept for callers, not sent to the model
    pub temperature: Option<f64>,
    /// Maximum tokens to generate. Kept for callers, not sent to the model
    pub max_tokens: Option<u32>,
    /// Use `invoke-with-response-stream` and report fragments as they arrive
    pub streaming: bool,
    /// Replaces the scheme and host of the regional endpoint
    pub endpoint_url: Option<String>,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
}

impl Default for BedrockConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            region: None,
            temperature: None,
            max_tokens: None,
            streaming: false,
            endpoint_url: None,
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
        }
    }
}

impl BedrockConfig {
    /// Create a configuration for `model` with defaults elsewhere
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            ..Self::default()
        }
    }

    /// Load configuration from environment variables
    ///
    /// Reads `BEDROCK_MODEL`, `AWS_REGION` (then `AWS_DEFAULT_REGION`),
    /// `BEDROCK_STREAMING`, `BEDROCK_ENDPOINT_URL` and `BEDROCK_TIMEOUT_SECONDS`.
    pub fn from_env() -> Result<Self, ProviderError> {
        info!("Loading Bedrock configuration from environment variables");
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub(crate) fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ProviderError> {
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        let mut config = Self::default();

        if let Some(model) = var("BEDROCK_MODEL") {
            config.model = model;
        }
        config.region = var("AWS_REGION").or_else(|| var("AWS_DEFAULT_REGION"));
        if let Some(streaming) = var("BEDROCK_STREAMING") {
            config.streaming = parse_bool(&streaming).ok_or_else(|| {
                ProviderError::configuration(
                    "bedrock",
                    format!("Invalid BEDROCK_STREAMING value: {}", streaming),
                )
            })?;
        }
        config.endpoint_url = var("BEDROCK_ENDPOINT_URL");
        if let Some(timeout) = var("BEDROCK_TIMEOUT_SECONDS") {
            config.timeout_seconds = timeout.trim().parse().map_err(|e| {
                ProviderError::configuration("bedrock", format!("Invalid timeout: {}", e))
            })?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a YAML file
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ProviderError> {
        let path = path.as_ref();
        info!("Loading Bedrock configuration from: {:?}", path);

        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            ProviderError::configuration("bedrock", format!("Failed to read config file: {}", e))
        })?;

        let config: Self = serde_yaml::from_str(&content).map_err(|e| {
            ProviderError::configuration("bedrock", format!("Failed to parse config: {}", e))
        })?;

        config.validate()?;
        debug!(model = %config.model, "Bedrock configuration loaded");
        Ok(config)
    }

    /// Check values that make no sense regardless of environment.
    ///
    /// Model and region are checked when the client is built.
    pub fn validate(&self) -> Result<(), ProviderError> {
        if self.model.trim().is_empty() {
            return Err(ProviderError::configuration(
                "bedrock",
                "Model identifier cannot be empty",
            ));
        }
        if self.timeout_seconds == 0 {
            return Err(ProviderError::configuration(
                "bedrock",
                "Timeout must be greater than 0",
            ));
        }
        if let Some(temperature) = self.temperature {
            if !temperature.is_finite() || temperature < 0.0 {
                return Err(ProviderError::configuration(
                    "bedrock",
                    format!("Invalid temperature: {}", temperature),
                ));
            }
        }
        Ok(())
    }

    /// Transport timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn with_streaming(mut self, streaming: bool) -> Self {
        self.streaming = streaming;
        self
    }

    pub fn with_endpoint_url(mut self, endpoint_url: impl Into<String>) -> Self {
        self.endpoint_url = Some(endpoint_url.into());
        self
    }

    pub fn with_timeout_seconds(mut self, timeout_seconds: u64) -> Self {
        self.timeout_seconds = timeout_seconds;
        self
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
