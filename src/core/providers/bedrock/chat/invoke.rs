//! Invoke API Implementation
//!
//! Buffered and streamed text completion over the model-specific invoke API

use tracing::debug;

use super::transformations::{prepare_input, prepare_output};
use crate::core::callbacks::TokenObserver;
use crate::core::providers::bedrock::client::BedrockClient;
use crate::core::providers::bedrock::model_config::ProviderKind;
use crate::core::providers::bedrock::streaming::{EventStreamMarshaller, collect_text};
use crate::core::providers::unified_provider::ProviderError;

/// Execute an invoke API request and return the completion text
pub async fn execute_invoke(
    client: &BedrockClient,
    provider: ProviderKind,
    model_id: &str,
    prompt: &str,
) -> Result<String, ProviderError> {
    let body = prepare_input(provider, prompt);
    let response = client.send_request(model_id, false, &body).await?;

    let value = response.json().await?;
    let text = prepare_output(provider, &value, false)?;
    debug!(chars = text.len(), "Invoke completed");

    Ok(text)
}

/// Execute a streaming invoke request, reporting each fragment to `observer`
pub async fn execute_invoke_stream(
    client: &BedrockClient,
    provider: ProviderKind,
    model_id: &str,
    prompt: &str,
    marshaller: &dyn EventStreamMarshaller,
    observer: &dyn TokenObserver,
) -> Result<String, ProviderError> {
    let body = prepare_input(provider, prompt);
    let response = client.send_request(model_id, true, &body).await?;

    collect_text(provider, response.into_byte_stream(), marshaller, observer).await
}
