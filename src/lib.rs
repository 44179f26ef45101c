//! # bedrock-llm
//!
//! Text completion on AWS Bedrock: give it a prompt, get text back.
//!
//! ## Features
//!
//! - **Three model families**: Anthropic, AI21 and Amazon models behind one call
//! - **Streaming**: decodes the binary event stream and reports each fragment as it arrives
//! - **SigV4 signing**: AWS Signature Version 4 with static or deferred credentials
//! - **Pluggable**: transport, signer, credentials and event-stream codec are traits
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use bedrock_llm::{BedrockConfig, BedrockLlm};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let llm = BedrockLlm::new(
//!         BedrockConfig::new("anthropic.claude-v2").with_region("us-east-1"),
//!     )?;
//!
//!     let text = llm.invoke("\n\nHuman: What is your name?\n\nAssistant:").await?;
//!     println!("{}", text);
//!     Ok(())
//! }
//! ```
//!
//! ## Streaming
//!
//! ```rust,no_run
//! use bedrock_llm::{BedrockConfig, BedrockLlm};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let llm = BedrockLlm::new(BedrockConfig::from_env()?.with_streaming(true))?;
//!
//!     let print = |token: &str| print!("{}", token);
//!     let text = llm.invoke_with_observer("Tell me a story.", &print).await?;
//!     println!("\n({} bytes)", text.len());
//!     Ok(())
//! }
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]

pub mod core;
pub mod utils;

// Re-export main types
pub use core::callbacks::{NoopObserver, TokenObserver};
pub use core::providers::bedrock::{
    AwsCredentials, AwsEventStreamCodec, BedrockClient, BedrockConfig, BedrockLlm,
    CredentialProvider, CredentialSource, EnvironmentCredentialProvider, EventStreamMarshaller,
    ProviderKind, ReqwestTransport, RequestSigner, SigV4Signer, Transport,
};
pub use core::providers::{ProviderError, Result};
pub use utils::logging::{LogFormat, init_logging};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
