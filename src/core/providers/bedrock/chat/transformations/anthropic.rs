//! Anthropic Claude Model Transformations

use crate::core::providers::unified_provider::ProviderError;
use serde::Serialize;
use serde_json::Value;

/// Sample length sent when the caller has not chosen one
pub const DEFAULT_MAX_TOKENS_TO_SAMPLE: u32 = 50;

/// Text-completion request for Claude models
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnthropicRequest {
    pub prompt: String,
    pub max_tokens_to_sample: u32,
}

/// Transform a prompt for Anthropic Claude models
pub fn transform_request(prompt: &str) -> AnthropicRequest {
    AnthropicRequest {
        prompt: prompt.to_string(),
        max_tokens_to_sample: DEFAULT_MAX_TOKENS_TO_SAMPLE,
    }
}

/// Claude uses the same `completion` field for stream chunks and full responses
pub fn extract_text(response: &Value) -> Result<String, ProviderError> {
    super::text_at(response, "/completion")
}
