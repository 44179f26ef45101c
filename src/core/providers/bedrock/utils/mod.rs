//! Utility modules for Bedrock provider
//!
//! AWS credential resolution and region handling.

pub mod auth;
pub mod region;

pub use auth::{
    AwsCredentials, CredentialProvider, CredentialSource, EnvironmentCredentialProvider,
};
pub use region::{AWS_REGIONS, is_known_region};
