//! Model-specific Request Transformations
//!
//! Pure functions mapping a prompt to the provider-shaped request body, and a
//! decoded provider response back to its generated text.

pub mod ai21;
pub mod amazon;
pub mod anthropic;

use crate::core::providers::bedrock::model_config::ProviderKind;
use crate::core::providers::unified_provider::ProviderError;
use serde::Serialize;
use serde_json::Value;

/// Provider-shaped request body, serialized as the JSON body of an invoke call
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RequestBody {
    Anthropic(anthropic::AnthropicRequest),
    Ai21(ai21::Ai21Request),
    Amazon(amazon::TitanRequest),
    InputText(amazon::InputTextRequest),
}

/// Build the request body for a provider family
pub fn prepare_input(provider: ProviderKind, prompt: &str) -> RequestBody {
    match provider {
        ProviderKind::Anthropic => RequestBody::Anthropic(anthropic::transform_request(prompt)),
        ProviderKind::Ai21 => RequestBody::Ai21(ai21::transform_request(prompt)),
        ProviderKind::Amazon => RequestBody::Amazon(amazon::transform_titan_request(prompt)),
        // Construction rejects unknown providers; this arm only serves direct callers
        ProviderKind::Unknown => RequestBody::InputText(amazon::transform_input_text_request(prompt)),
    }
}

/// Extract the generated text from a decoded response.
///
/// `streaming` selects the shape of a single stream chunk instead of a complete
/// response, which differ for AI21 and Amazon.
pub fn prepare_output(
    provider: ProviderKind,
    response: &Value,
    streaming: bool,
) -> Result<String, ProviderError> {
    match provider {
        ProviderKind::Anthropic => anthropic::extract_text(response),
        ProviderKind::Ai21 => ai21::extract_text(response, streaming),
        // Unknown shares the Amazon response shape, matching its request shape
        ProviderKind::Amazon | ProviderKind::Unknown => amazon::extract_text(response, streaming),
    }
}

/// Read a string at a JSON pointer, failing when it is absent
pub(crate) fn text_at(response: &Value, pointer: &str) -> Result<String, ProviderError> {
    response
        .pointer(pointer)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| {
            ProviderError::response_parsing(
                "bedrock",
                format!("missing text field '{}' in response: {}", pointer, response),
            )
        })
}
