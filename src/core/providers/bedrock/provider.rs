//! Main Bedrock Provider Implementation
//!
//! [`BedrockLlm`] turns a prompt into generated text with one Bedrock invoke
//! call. Collaborators default to the real AWS stack and can be replaced.

use std::env;
use std::fmt;
use std::sync::Arc;
use tracing::info;
use url::Url;

use super::chat::{execute_invoke, execute_invoke_stream};
use super::client::BedrockClient;
use super::config::BedrockConfig;
use super::error::BedrockError;
use super::model_config::ProviderKind;
use super::sigv4::{RequestSigner, SigV4Signer};
use super::streaming::{AwsEventStreamCodec, EventStreamMarshaller};
use super::transport::{ReqwestTransport, Transport};
use super::utils::region::{REGION_ENV_VAR, resolve_region_from};
use super::utils::{AwsCredentials, CredentialSource};
use crate::core::callbacks::{NoopObserver, TokenObserver};
use crate::core::providers::unified_provider::ProviderError;

/// Identifier reported by [`BedrockLlm::llm_type`]
pub const LLM_TYPE: &str = "bedrock";

/// Text-completion model served by AWS Bedrock
///
/// Immutable once built; clones share their collaborators and can be used
/// from several tasks at once.
#[derive(Clone)]
pub struct BedrockLlm {
    model: String,
    provider: ProviderKind,
    region: String,
    temperature: Option<f64>,
    max_tokens: Option<u32>,
    streaming: bool,
    client: BedrockClient,
    marshaller: Arc<dyn EventStreamMarshaller>,
}

impl BedrockLlm {
    /// Build a model from configuration.
    ///
    /// Fails before any network use when the model's provider is not supported
    /// or no region can be found.
    pub fn new(config: BedrockConfig) -> Result<Self, BedrockError> {
        let env_region = env::var(REGION_ENV_VAR).ok();
        Self::with_env_region(config, env_region.as_deref())
    }

    pub(crate) fn with_env_region(
        config: BedrockConfig,
        env_region: Option<&str>,
    ) -> Result<Self, BedrockError> {
        let provider = ProviderKind::from_model_id(&config.model)?;
        let region = resolve_region_from(config.region.as_deref(), env_region)?;
        config.validate()?;

        let transport = ReqwestTransport::new(config.timeout())?;
        let mut client = BedrockClient::new(
            region.clone(),
            CredentialSource::default(),
            Arc::new(SigV4Signer::new()),
            Arc::new(transport),
        );
        if let Some(endpoint) = &config.endpoint_url {
            let endpoint = Url::parse(endpoint).map_err(|e| {
                ProviderError::configuration(
                    "bedrock",
                    format!("Invalid endpoint URL '{}': {}", endpoint, e),
                )
            })?;
            client = client.with_endpoint_url(endpoint);
        }

        info!(
            model = %config.model,
            provider = %provider,
            region = %region,
            streaming = config.streaming,
            "Bedrock model configured"
        );

        Ok(Self {
            model: config.model,
            provider,
            region,
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            streaming: config.streaming,
            client,
            marshaller: Arc::new(AwsEventStreamCodec),
        })
    }

    /// Use fixed credentials instead of the environment
    pub fn with_credentials(mut self, credentials: AwsCredentials) -> Self {
        self.client = self.client.with_credentials(credentials.into());
        self
    }

    /// Use a custom credential source
    pub fn with_credential_source(mut self, source: CredentialSource) -> Self {
        self.client = self.client.with_credentials(source);
        self
    }

    pub fn with_signer(mut self, signer: Arc<dyn RequestSigner>) -> Self {
        self.client = self.client.with_signer(signer);
        self
    }

    pub fn with_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.client = self.client.with_transport(transport);
        self
    }

    pub fn with_marshaller(mut self, marshaller: Arc<dyn EventStreamMarshaller>) -> Self {
        self.marshaller = marshaller;
        self
    }

    /// Generate text for `prompt`
    pub async fn invoke(&self, prompt: &str) -> Result<String, BedrockError> {
        self.invoke_with_observer(prompt, &NoopObserver).await
    }

    /// Generate text for `prompt`, reporting each streamed fragment to
    /// `observer` in arrival order.
    ///
    /// The observer is only called when streaming is enabled. On failure no
    /// partial text is returned, even if fragments were already reported.
    #[tracing::instrument(
        name = "bedrock_invoke",
        skip(self, prompt, observer),
        fields(model = %self.model, streaming = self.streaming)
    )]
    pub async fn invoke_with_observer(
        &self,
        prompt: &str,
        observer: &dyn TokenObserver,
    ) -> Result<String, BedrockError> {
        if self.streaming {
            execute_invoke_stream(
                &self.client,
                self.provider,
                &self.model,
                prompt,
                self.marshaller.as_ref(),
                observer,
            )
            .await
        } else {
            execute_invoke(&self.client, self.provider, &self.model, prompt).await
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn provider(&self) -> ProviderKind {
        self.provider
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn temperature(&self) -> Option<f64> {
        self.temperature
    }

    pub fn max_tokens(&self) -> Option<u32> {
        self.max_tokens
    }

    pub fn is_streaming(&self) -> bool {
        self.streaming
    }

    /// Identifier of this model type
    pub fn llm_type(&self) -> &'static str {
        LLM_TYPE
    }
}

impl fmt::Debug for BedrockLlm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BedrockLlm")
            .field("model", &self.model)
            .field("provider", &self.provider)
            .field("region", &self.region)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("streaming", &self.streaming)
            .field("client", &self.client)
            .finish_non_exhaustive()
    }
}
