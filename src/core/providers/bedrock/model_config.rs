//! Model Configuration for Bedrock Models
//!
//! Maps a dotted Bedrock model identifier (`"<provider>.<model-name>"`) to the
//! provider family that decides the request and response wire shapes.

use crate::core::providers::unified_provider::ProviderError;
use std::fmt;

/// Provider segments accepted at construction time, in the order they are reported
pub const ALLOWED_PROVIDERS: &[&str] = &["ai21", "anthropic", "amazon"];

/// Bedrock provider families
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    /// Anthropic, prompt-completion style
    Anthropic,
    /// AI21 Labs, generation style
    Ai21,
    /// Amazon Titan, structured-config style
    Amazon,
    /// Any other segment. Only reachable through the pure adapter functions;
    /// `from_model_id` rejects it.
    Unknown,
}

impl ProviderKind {
    /// Map a provider segment to its family, falling back to `Unknown`
    pub fn from_provider(provider: &str) -> Self {
        match provider {
            "anthropic" => Self::Anthropic,
            "ai21" => Self::Ai21,
            "amazon" => Self::Amazon,
            _ => Self::Unknown,
        }
    }

    /// Resolve the family of a model identifier, rejecting unsupported providers
    pub fn from_model_id(model_id: &str) -> Result<Self, ProviderError> {
        match Self::from_provider(provider_segment(model_id)) {
            Self::Unknown => Err(ProviderError::configuration(
                "bedrock",
                format!(
                    "Unknown model: '{}', only these are supported: {}",
                    model_id,
                    ALLOWED_PROVIDERS.join(",")
                ),
            )),
            kind => Ok(kind),
        }
    }

    /// Provider segment as it appears in model identifiers
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Anthropic => "anthropic",
            Self::Ai21 => "ai21",
            Self::Amazon => "amazon",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Leading segment of a dotted model identifier
pub fn provider_segment(model_id: &str) -> &str {
    model_id.split('.').next().unwrap_or(model_id)
}
