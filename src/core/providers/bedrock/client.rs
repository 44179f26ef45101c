//! Bedrock HTTP Client
//!
//! Builds, signs and dispatches invoke requests. All network access goes
//! through the [`Transport`] and all signing through the [`RequestSigner`].

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use tracing::debug;
use url::Url;

use super::error::{BedrockError, BedrockErrorMapper};
use super::sigv4::RequestSigner;
use super::transport::{HttpRequest, HttpResponse, Transport};
use super::utils::CredentialSource;
use crate::core::providers::unified_provider::ProviderError;
use crate::core::traits::error_mapper::ErrorMapper;

/// Service name used in the SigV4 credential scope
pub const SERVICE_NAME: &str = "bedrock";

/// Bedrock HTTP client wrapper
#[derive(Clone)]
pub struct BedrockClient {
    region: String,
    credentials: CredentialSource,
    signer: Arc<dyn RequestSigner>,
    transport: Arc<dyn Transport>,
    endpoint_url: Option<Url>,
    error_mapper: BedrockErrorMapper,
}

impl BedrockClient {
    /// Create a new Bedrock client
    pub fn new(
        region: impl Into<String>,
        credentials: CredentialSource,
        signer: Arc<dyn RequestSigner>,
        transport: Arc<dyn Transport>,
    ) -> Self {
        Self {
            region: region.into(),
            credentials,
            signer,
            transport,
            endpoint_url: None,
            error_mapper: BedrockErrorMapper,
        }
    }

    /// Send requests to `endpoint` instead of the regional AWS host
    pub fn with_endpoint_url(mut self, endpoint: Url) -> Self {
        self.endpoint_url = Some(endpoint);
        self
    }

    pub fn with_credentials(mut self, credentials: CredentialSource) -> Self {
        self.credentials = credentials;
        self
    }

    pub fn with_signer(mut self, signer: Arc<dyn RequestSigner>) -> Self {
        self.signer = signer;
        self
    }

    pub fn with_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = transport;
        self
    }

    /// Region requests are signed for
    pub fn region(&self) -> &str {
        &self.region
    }

    /// Build Bedrock API URL for a model
    pub fn build_url(&self, model_id: &str, streaming: bool) -> Result<Url, BedrockError> {
        let operation = if streaming {
            "invoke-with-response-stream"
        } else {
            "invoke"
        };

        let mut url = match &self.endpoint_url {
            Some(endpoint) => endpoint.clone(),
            None => Url::parse(&format!("https://bedrock.{}.amazonaws.com", self.region))
                .map_err(|e| {
                    ProviderError::configuration(
                        "bedrock",
                        format!("Invalid region '{}' for endpoint: {}", self.region, e),
                    )
                })?,
        };
        url.set_path(&format!("/model/{}/{}", model_id, operation));

        Ok(url)
    }

    /// Describe a POST of `body` to `url`, ready for signing
    pub fn build_request(&self, url: &Url, body: String) -> Result<HttpRequest, BedrockError> {
        let host = url.host_str().ok_or_else(|| {
            ProviderError::configuration("bedrock", format!("URL '{}' has no host", url))
        })?;
        let hostname = match url.port() {
            Some(port) => format!("{}:{}", host, port),
            None => host.to_string(),
        };

        let mut headers = BTreeMap::new();
        headers.insert("host".to_string(), hostname.clone());
        headers.insert("accept".to_string(), "application/json".to_string());
        headers.insert("Content-Type".to_string(), "application/json".to_string());

        Ok(HttpRequest {
            method: "POST".to_string(),
            hostname,
            path: url.path().to_string(),
            query: url.query_pairs().into_owned().collect(),
            headers,
            body,
        })
    }

    /// Sign and send a request, failing on any non-2xx status
    #[tracing::instrument(skip(self, body), fields(region = %self.region))]
    pub async fn send_request<B>(
        &self,
        model_id: &str,
        streaming: bool,
        body: &B,
    ) -> Result<HttpResponse, BedrockError>
    where
        B: Serialize + Sync + ?Sized,
    {
        let url = self.build_url(model_id, streaming)?;
        let body_str = serde_json::to_string(body)
            .map_err(|e| ProviderError::serialization("bedrock", e.to_string()))?;

        debug!(url = %url, body_len = body_str.len(), "Bedrock request");

        let request = self.build_request(&url, body_str)?;
        let credentials = self.credentials.resolve().await?;
        let signed = self
            .signer
            .sign(request, &credentials, &self.region, SERVICE_NAME)?;

        let response = self.transport.fetch(&url, signed).await?;
        debug!(status = response.status, "Bedrock response");

        if !response.is_success() {
            let status = response.status;
            let status_text = response.status_text.clone();
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(self.error_mapper.map_http_error(
                url.as_str(),
                status,
                &status_text,
                &error_body,
            ));
        }

        Ok(response)
    }
}

impl fmt::Debug for BedrockClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BedrockClient")
            .field("region", &self.region)
            .field("credentials", &self.credentials)
            .field("endpoint_url", &self.endpoint_url.as_ref().map(Url::as_str))
            .finish_non_exhaustive()
    }
}
