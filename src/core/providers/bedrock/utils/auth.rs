//! AWS Authentication for Bedrock
//!
//! Credential types and the sources an invocation resolves them from.

use crate::core::providers::unified_provider::ProviderError;
use async_trait::async_trait;
use std::env;
use std::fmt;
use std::sync::Arc;

/// AWS access credentials
#[derive(Clone, PartialEq, Eq)]
pub struct AwsCredentials {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub session_token: Option<String>,
}

impl AwsCredentials {
    /// Create credentials from explicit values
    pub fn new(
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
        session_token: Option<String>,
    ) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
            session_token,
        }
    }

    /// Check if credentials are temporary (have session token)
    pub fn is_temporary(&self) -> bool {
        self.session_token.is_some()
    }

    /// Validate that both key halves are present
    pub fn validate(&self) -> Result<(), ProviderError> {
        if self.access_key_id.is_empty() {
            return Err(ProviderError::authentication(
                "bedrock",
                "AWS access key ID cannot be empty",
            ));
        }

        if self.secret_access_key.is_empty() {
            return Err(ProviderError::authentication(
                "bedrock",
                "AWS secret access key cannot be empty",
            ));
        }

        Ok(())
    }
}

impl fmt::Debug for AwsCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AwsCredentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"** redacted **")
            .field(
                "session_token",
                &self.session_token.as_ref().map(|_| "** redacted **"),
            )
            .finish()
    }
}

/// Deferred credential lookup, consulted once per invocation
#[async_trait]
pub trait CredentialProvider: Send + Sync + fmt::Debug {
    async fn provide_credentials(&self) -> Result<AwsCredentials, ProviderError>;
}

/// Reads `AWS_ACCESS_KEY_ID`, `AWS_SECRET_ACCESS_KEY` and `AWS_SESSION_TOKEN`
#[derive(Debug, Clone, Default)]
pub struct EnvironmentCredentialProvider;

#[async_trait]
impl CredentialProvider for EnvironmentCredentialProvider {
    async fn provide_credentials(&self) -> Result<AwsCredentials, ProviderError> {
        let access_key_id = env::var("AWS_ACCESS_KEY_ID").map_err(|_| {
            ProviderError::authentication(
                "bedrock",
                "AWS_ACCESS_KEY_ID environment variable not found",
            )
        })?;

        let secret_access_key = env::var("AWS_SECRET_ACCESS_KEY").map_err(|_| {
            ProviderError::authentication(
                "bedrock",
                "AWS_SECRET_ACCESS_KEY environment variable not found",
            )
        })?;

        let session_token = env::var("AWS_SESSION_TOKEN")
            .ok()
            .filter(|token| !token.is_empty());

        Ok(AwsCredentials::new(
            access_key_id,
            secret_access_key,
            session_token,
        ))
    }
}

/// Where an invocation gets its credentials from
#[derive(Debug, Clone)]
pub enum CredentialSource {
    /// Fixed credentials
    Static(AwsCredentials),
    /// Credentials looked up on every invocation
    Provider(Arc<dyn CredentialProvider>),
}

impl CredentialSource {
    /// Resolve to concrete credentials
    pub async fn resolve(&self) -> Result<AwsCredentials, ProviderError> {
        let credentials = match self {
            Self::Static(credentials) => credentials.clone(),
            Self::Provider(provider) => provider.provide_credentials().await?,
        };
        credentials.validate()?;
        Ok(credentials)
    }
}

impl Default for CredentialSource {
    fn default() -> Self {
        Self::Provider(Arc::new(EnvironmentCredentialProvider))
    }
}

impl From<AwsCredentials> for CredentialSource {
    fn from(credentials: AwsCredentials) -> Self {
        Self::Static(credentials)
    }
}
