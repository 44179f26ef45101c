//! Unified Provider Error Handling
//!
//! Single error type for every failure an invocation can hit.
//!
//! | Variant | Raised by | Retryable |
//! |------|------|--------|
//! | Configuration | construction (unknown model, missing region, bad endpoint) | No |
//! | Authentication | credential resolution, request signing | No |
//! | ApiError | non-2xx response from Bedrock | 429 / 5xx |
//! | Network | transport failures | Yes |
//! | Streaming | event-stream framing, metadata or payload decoding | No |
//! | ResponseParsing | missing text field, invalid JSON | No |
//! | Serialization | request body serialization | No |
//!
//! The invocation path never retries; `is_retryable` is a hint for callers
//! that implement their own retry policy.
//!
//! ## Usage
//!
//! ```rust
//! use bedrock_llm::ProviderError;
//!
//! let err = ProviderError::api_error("bedrock", 503, "Service unavailable");
//! assert!(err.is_retryable());
//! assert_eq!(err.provider(), "bedrock");
//! ```

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, ProviderError>;

/// Unified provider error type
#[derive(Debug, Clone, thiserror::Error)]
pub enum ProviderError {
    #[error("Authentication failed for {provider}: {message}")]
    Authentication {
        provider: &'static str,
        message: String,
    },

    #[error("Network error for {provider}: {message}")]
    Network {
        provider: &'static str,
        message: String,
    },

    #[error("Configuration error for {provider}: {message}")]
    Configuration {
        provider: &'static str,
        message: String,
    },

    #[error("Serialization error for {provider}: {message}")]
    Serialization {
        provider: &'static str,
        message: String,
    },

    /// API error with status code
    #[error("API error for {provider} (status {status}): {message}")]
    ApiError {
        provider: &'static str,
        status: u16,
        message: String,
    },

    /// Response parsing error, including responses missing the expected text field
    #[error("Failed to parse {provider} response: {message}")]
    ResponseParsing {
        provider: &'static str,
        message: String,
    },

    /// Streaming operation error
    #[error("Streaming error for {provider}: {stream_type} at position {position:?}: {message}")]
    Streaming {
        provider: &'static str,
        /// Type of stream (event-stream, ...)
        stream_type: String,
        /// Index of the event where the error occurred
        position: Option<u64>,
        /// Offending chunk, rendered for diagnostics
        last_chunk: Option<String>,
        /// Error message
        message: String,
    },
}

impl ProviderError {
    /// Create authentication error
    pub fn authentication(provider: &'static str, message: impl Into<String>) -> Self {
        Self::Authentication {
            provider,
            message: message.into(),
        }
    }

    /// Create network error
    pub fn network(provider: &'static str, message: impl Into<String>) -> Self {
        Self::Network {
            provider,
            message: message.into(),
        }
    }

    /// Create configuration error
    pub fn configuration(provider: &'static str, message: impl Into<String>) -> Self {
        Self::Configuration {
            provider,
            message: message.into(),
        }
    }

    /// Create serialization error
    pub fn serialization(provider: &'static str, message: impl Into<String>) -> Self {
        Self::Serialization {
            provider,
            message: message.into(),
        }
    }

    /// Create API error with status code
    pub fn api_error(provider: &'static str, status: u16, message: impl Into<String>) -> Self {
        Self::ApiError {
            provider,
            status,
            message: message.into(),
        }
    }

    /// Create response parsing error
    pub fn response_parsing(provider: &'static str, message: impl Into<String>) -> Self {
        Self::ResponseParsing {
            provider,
            message: message.into(),
        }
    }

    /// Create streaming error
    pub fn streaming_error(
        provider: &'static str,
        stream_type: impl Into<String>,
        position: Option<u64>,
        last_chunk: Option<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Streaming {
            provider,
            stream_type: stream_type.into(),
            position,
            last_chunk,
            message: message.into(),
        }
    }

    /// Get the provider name that caused this error
    pub fn provider(&self) -> &'static str {
        match self {
            Self::Authentication { provider, .. }
            | Self::Network { provider, .. }
            | Self::Configuration { provider, .. }
            | Self::Serialization { provider, .. }
            | Self::ApiError { provider, .. }
            | Self::ResponseParsing { provider, .. }
            | Self::Streaming { provider, .. } => provider,
        }
    }

    /// Check if this error is retryable
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network { .. } => true,

            // API errors depend on status code
            Self::ApiError { status, .. } => matches!(*status, 429 | 500..=599),

            Self::Authentication { .. }
            | Self::Configuration { .. }
            | Self::Serialization { .. }
            | Self::ResponseParsing { .. }
            | Self::Streaming { .. } => false,
        }
    }

    /// HTTP status returned by Bedrock, if the error came from a response
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::ApiError { status, .. } => Some(*status),
            _ => None,
        }
    }
}
