//! Provider implementations
//!
//! Bedrock is the only provider; errors are shared through [`ProviderError`].

pub mod bedrock;
pub mod unified_provider;

pub use unified_provider::{ProviderError, Result};
