//! Amazon Titan Model Transformations

use crate::core::providers::unified_provider::ProviderError;
use serde::Serialize;
use serde_json::{Map, Value};

/// Titan text request
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TitanRequest {
    pub input_text: String,
    /// Sent empty so the model applies its own generation defaults
    pub text_generation_config: Map<String, Value>,
}

/// Bare `inputText` request used for unrecognized providers
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InputTextRequest {
    pub input_text: String,
}

/// Transform a prompt for Amazon Titan models
pub fn transform_titan_request(prompt: &str) -> TitanRequest {
    TitanRequest {
        input_text: prompt.to_string(),
        text_generation_config: Map::new(),
    }
}

/// Transform a prompt for providers without a dedicated shape
pub fn transform_input_text_request(prompt: &str) -> InputTextRequest {
    InputTextRequest {
        input_text: prompt.to_string(),
    }
}

/// Extract generated text.
///
/// A stream chunk carries `outputText` directly; a complete response nests it
/// under the first entry of `results`.
pub fn extract_text(response: &Value, streaming: bool) -> Result<String, ProviderError> {
    if streaming {
        super::text_at(response, "/outputText")
    } else {
        super::text_at(response, "/results/0/outputText")
    }
}
