//! Bedrock Provider Error Handling
//!
//! Error mapping for failed Bedrock HTTP exchanges

use crate::core::providers::unified_provider::ProviderError;
use crate::core::traits::error_mapper::ErrorMapper;
use serde_json::Value;
use tracing::error;

/// Bedrock-specific error type (alias for ProviderError)
pub type BedrockError = ProviderError;

/// Error mapper for Bedrock provider
#[derive(Debug, Clone, Copy, Default)]
pub struct BedrockErrorMapper;

impl ErrorMapper<BedrockError> for BedrockErrorMapper {
    fn map_http_error(
        &self,
        url: &str,
        status: u16,
        status_text: &str,
        body: &str,
    ) -> BedrockError {
        let service_message = serde_json::from_str::<Value>(body)
            .ok()
            .and_then(|value| self.error_message(&value));
        error!(
            url,
            status,
            service_message = service_message.as_deref().unwrap_or(""),
            "Bedrock API error"
        );

        ProviderError::api_error(
            "bedrock",
            status,
            format!(
                "Failed to access underlying url '{}': got {} {}: {}",
                url, status, status_text, body
            ),
        )
    }

    fn map_network_error(&self, error: &dyn std::error::Error) -> BedrockError {
        ProviderError::network("bedrock", format!("Network error: {}", error))
    }
}

/// Helper functions for creating specific Bedrock errors
impl BedrockError {
    /// Create a stream decoding error that carries the offending chunk
    pub fn stream_decode(position: u64, chunk: &[u8], message: impl Into<String>) -> Self {
        ProviderError::streaming_error(
            "bedrock",
            "event-stream",
            Some(position),
            Some(String::from_utf8_lossy(chunk).into_owned()),
            message,
        )
    }
}
