//! Error mapper trait definition
//!
//! Converts HTTP failures and transport errors into the crate's error type.

use serde_json::Value;

/// Trait for mapping error conditions to a provider error type
///
/// ```rust
/// use bedrock_llm::ProviderError;
/// use bedrock_llm::core::traits::error_mapper::ErrorMapper;
///
/// struct MyMapper;
///
/// impl ErrorMapper<ProviderError> for MyMapper {
///     fn map_http_error(&self, url: &str, status: u16, status_text: &str, body: &str) -> ProviderError {
///         ProviderError::api_error("bedrock", status, format!("{} {}: {}", url, status_text, body))
///     }
///
///     fn map_network_error(&self, error: &dyn std::error::Error) -> ProviderError {
///         ProviderError::network("bedrock", error.to_string())
///     }
/// }
/// ```
pub trait ErrorMapper<E>: Send + Sync + 'static {
    /// Map a non-2xx response to an error
    ///
    /// # Parameters
    /// * `url` - URL the request was sent to
    /// * `status` - HTTP status code from the response
    /// * `status_text` - Reason phrase for the status
    /// * `body` - Raw response body as string
    fn map_http_error(&self, url: &str, status: u16, status_text: &str, body: &str) -> E;

    /// Map network-level errors
    fn map_network_error(&self, error: &dyn std::error::Error) -> E;

    /// Extract a service-provided error message from a JSON error body.
    ///
    /// Default implementation reads `message` or `Message`, the two casings
    /// AWS services use.
    fn error_message(&self, body: &Value) -> Option<String> {
        body.get("message")
            .or_else(|| body.get("Message"))
            .and_then(Value::as_str)
            .map(str::to_string)
    }
}
