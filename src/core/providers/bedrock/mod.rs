//! AWS Bedrock Provider
//!
//! Text completion against the Bedrock runtime for the Anthropic, AI21 and
//! Amazon model families, buffered or streamed, with AWS SigV4 authentication.

// Core modules
pub mod client;
pub mod config;
pub mod error;
pub mod model_config;
pub mod provider;
pub mod sigv4;
pub mod transport;
pub mod utils;

// Feature modules
pub mod chat;
pub mod streaming;

// Re-export main types for external use
pub use client::BedrockClient;
pub use config::BedrockConfig;
pub use error::{BedrockError, BedrockErrorMapper};
pub use model_config::{ALLOWED_PROVIDERS, ProviderKind};
pub use provider::BedrockLlm;
pub use sigv4::{RequestSigner, SigV4Signer};
pub use transport::{ByteStream, HttpRequest, HttpResponse, ResponseBody, ReqwestTransport, Transport};
pub use utils::{
    AWS_REGIONS, AwsCredentials, CredentialProvider, CredentialSource,
    EnvironmentCredentialProvider, is_known_region,
};

// Re-export feature modules
pub use chat::{RequestBody, prepare_input, prepare_output};
pub use streaming::{
    AwsEventStreamCodec, EventStreamHeader, EventStreamMarshaller, EventStreamMessage,
    HeaderValue,
};
