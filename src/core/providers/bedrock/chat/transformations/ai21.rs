//! AI21 Labs Model Transformations

use crate::core::providers::unified_provider::ProviderError;
use serde::Serialize;
use serde_json::Value;

/// Jurassic generation request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ai21Request {
    pub prompt: String,
}

/// Transform a prompt for AI21 models
pub fn transform_request(prompt: &str) -> Ai21Request {
    Ai21Request {
        prompt: prompt.to_string(),
    }
}

/// Extract generated text.
///
/// A stream chunk carries `data.text` directly; a complete response nests it
/// under the first entry of `completions`.
pub fn extract_text(response: &Value, streaming: bool) -> Result<String, ProviderError> {
    if streaming {
        super::text_at(response, "/data/text")
    } else {
        super::text_at(response, "/completions/0/data/text")
    }
}
