//! HTTP transport for Bedrock
//!
//! The invocation path talks to the network only through [`Transport`], so a
//! caller can swap in its own client (or a test double). [`ReqwestTransport`]
//! is the default.

use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use futures::{Stream, StreamExt, TryStreamExt};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::pin::Pin;
use std::time::Duration;
use url::Url;

use super::error::BedrockErrorMapper;
use crate::core::providers::unified_provider::ProviderError;
use crate::core::traits::error_mapper::ErrorMapper;

/// Lazy, finite sequence of raw body chunks; not restartable
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, ProviderError>> + Send>>;

/// Canonical description of an outgoing request, before and after signing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: String,
    pub hostname: String,
    pub path: String,
    pub query: BTreeMap<String, String>,
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

impl HttpRequest {
    /// Case-insensitive header lookup
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Response body, either already in memory or still arriving
pub enum ResponseBody {
    Buffered(Bytes),
    Streaming(ByteStream),
}

impl fmt::Debug for ResponseBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Buffered(bytes) => f.debug_tuple("Buffered").field(&bytes.len()).finish(),
            Self::Streaming(_) => f.write_str("Streaming(..)"),
        }
    }
}

/// Response returned by a [`Transport`]
#[derive(Debug)]
pub struct HttpResponse {
    pub status: u16,
    pub status_text: String,
    body: ResponseBody,
}

impl HttpResponse {
    /// Create a response
    pub fn new(status: u16, status_text: impl Into<String>, body: ResponseBody) -> Self {
        Self {
            status,
            status_text: status_text.into(),
            body,
        }
    }

    /// Whether the status is in `[200, 300)`
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Read the whole body into memory
    pub async fn bytes(self) -> Result<Bytes, ProviderError> {
        match self.body {
            ResponseBody::Buffered(bytes) => Ok(bytes),
            ResponseBody::Streaming(stream) => {
                let buffer = stream
                    .try_fold(BytesMut::new(), |mut buffer, chunk| async move {
                        buffer.extend_from_slice(&chunk);
                        Ok(buffer)
                    })
                    .await?;
                Ok(buffer.freeze())
            }
        }
    }

    /// Read the whole body as UTF-8 text
    pub async fn text(self) -> Result<String, ProviderError> {
        let bytes = self.bytes().await?;
        String::from_utf8(bytes.to_vec()).map_err(|e| {
            ProviderError::response_parsing("bedrock", format!("Response is not UTF-8: {}", e))
        })
    }

    /// Read the whole body as JSON
    pub async fn json(self) -> Result<Value, ProviderError> {
        let bytes = self.bytes().await?;
        serde_json::from_slice(&bytes)
            .map_err(|e| ProviderError::response_parsing("bedrock", e.to_string()))
    }

    /// Consume the body chunk by chunk
    pub fn into_byte_stream(self) -> ByteStream {
        match self.body {
            ResponseBody::Buffered(bytes) => {
                Box::pin(futures::stream::once(async move { Ok::<_, ProviderError>(bytes) }))
            }
            ResponseBody::Streaming(stream) => stream,
        }
    }
}

/// Sends one request and returns the raw response, whatever its status
#[async_trait]
pub trait Transport: Send + Sync {
    async fn fetch(&self, url: &Url, request: HttpRequest) -> Result<HttpResponse, ProviderError>;
}

/// Default transport backed by `reqwest`
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Create a transport with a request timeout
    pub fn new(timeout: Duration) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("bedrock-llm/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| {
                ProviderError::configuration("bedrock", format!("Failed to build HTTP client: {}", e))
            })?;

        Ok(Self { client })
    }

    /// Wrap an existing client
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn fetch(&self, url: &Url, request: HttpRequest) -> Result<HttpResponse, ProviderError> {
        let method = reqwest::Method::from_bytes(request.method.as_bytes()).map_err(|e| {
            ProviderError::configuration("bedrock", format!("Invalid HTTP method: {}", e))
        })?;

        let mut builder = self.client.request(method, url.clone());
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let response = builder
            .body(request.body)
            .send()
            .await
            .map_err(|e| BedrockErrorMapper.map_network_error(&e))?;

        let status = response.status();

        let stream = response
            .bytes_stream()
            .map(|chunk| chunk.map_err(|e| BedrockErrorMapper.map_network_error(&e)));

        Ok(HttpResponse::new(
            status.as_u16(),
            status.canonical_reason().unwrap_or_default(),
            ResponseBody::Streaming(Box::pin(stream)),
        ))
    }
}
