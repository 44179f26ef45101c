//! AWS Region Management for Bedrock
//!
//! Resolves the region an invocation targets and recognizes the regions
//! Bedrock is known to run in.

use crate::core::providers::unified_provider::ProviderError;
use tracing::warn;

/// Environment variable consulted when no region is configured
pub const REGION_ENV_VAR: &str = "AWS_DEFAULT_REGION";

/// AWS regions that host the Bedrock runtime
pub const AWS_REGIONS: &[&str] = &[
    // US regions
    "us-east-1",
    "us-east-2",
    "us-west-1",
    "us-west-2",
    // EU regions
    "eu-west-1",
    "eu-west-2",
    "eu-west-3",
    "eu-central-1",
    "eu-central-2",
    "eu-north-1",
    "eu-south-1",
    "eu-south-2",
    // Asia Pacific regions
    "ap-northeast-1",
    "ap-northeast-2",
    "ap-northeast-3",
    "ap-south-1",
    "ap-south-2",
    "ap-southeast-1",
    "ap-southeast-2",
    "ap-southeast-3",
    "ap-southeast-4",
    "ap-southeast-5",
    // Other regions
    "ca-central-1",
    "sa-east-1",
    "us-gov-west-1",
    "us-gov-east-1",
];

/// Check if a region is one Bedrock is known to run in
pub fn is_known_region(region: &str) -> bool {
    AWS_REGIONS.contains(&region)
}

/// Resolve the target region from explicit configuration, then the
/// `AWS_DEFAULT_REGION` value the caller looked up.
///
/// Unknown but well-formed regions are accepted so new regions work without a
/// release; only an absent or empty region is an error.
pub(crate) fn resolve_region_from(
    explicit: Option<&str>,
    from_env: Option<&str>,
) -> Result<String, ProviderError> {
    let region = explicit
        .or(from_env)
        .map(str::trim)
        .filter(|region| !region.is_empty())
        .ok_or_else(|| {
            ProviderError::configuration(
                "bedrock",
                "Please set the AWS_DEFAULT_REGION environment variable or pass it to the constructor as the region field.",
            )
        })?;

    if region.contains(|c: char| !(c.is_ascii_alphanumeric() || c == '-')) {
        return Err(ProviderError::configuration(
            "bedrock",
            format!("Invalid AWS region: '{}'", region),
        ));
    }

    if !is_known_region(region) {
        warn!(region, "Region is not in the list of known Bedrock regions");
    }

    Ok(region.to_string())
}
