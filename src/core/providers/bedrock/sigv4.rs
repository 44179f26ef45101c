//! AWS SigV4 Authentication for Bedrock
//!
//! Implementation of AWS Signature Version 4 signing process
//! for authenticating requests to AWS Bedrock services.

use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};

use super::transport::HttpRequest;
use super::utils::AwsCredentials;
use crate::core::providers::unified_provider::ProviderError;

type HmacSha256 = Hmac<Sha256>;

const ALGORITHM: &str = "AWS4-HMAC-SHA256";

/// Computes authentication headers for an outgoing request.
///
/// Signing is synchronous; method, path and body pass through unchanged.
pub trait RequestSigner: Send + Sync {
    fn sign(
        &self,
        request: HttpRequest,
        credentials: &AwsCredentials,
        region: &str,
        service: &str,
    ) -> Result<HttpRequest, ProviderError>;
}

/// AWS SigV4 signer
#[derive(Debug, Clone, Copy, Default)]
pub struct SigV4Signer;

impl SigV4Signer {
    /// Create a new SigV4 signer
    pub fn new() -> Self {
        Self
    }

    /// Sign a request as of `timestamp`
    pub fn sign_at(
        &self,
        mut request: HttpRequest,
        credentials: &AwsCredentials,
        region: &str,
        service: &str,
        timestamp: DateTime<Utc>,
    ) -> Result<HttpRequest, ProviderError> {
        let amz_date = timestamp.format("%Y%m%dT%H%M%SZ").to_string();
        let date_stamp = timestamp.format("%Y%m%d").to_string();
        let payload_hash = hex::encode(Sha256::digest(request.body.as_bytes()));

        if request.header("host").is_none() {
            request
                .headers
                .insert("host".to_string(), request.hostname.clone());
        }
        request
            .headers
            .insert("x-amz-date".to_string(), amz_date.clone());
        request
            .headers
            .insert("x-amz-content-sha256".to_string(), payload_hash.clone());
        if let Some(ref token) = credentials.session_token {
            request
                .headers
                .insert("x-amz-security-token".to_string(), token.clone());
        }

        // Sort headers by lowercase name
        let mut sorted_headers: Vec<(String, &str)> = request
            .headers
            .iter()
            .map(|(k, v)| (k.to_lowercase(), v.trim()))
            .collect();
        sorted_headers.sort_by(|a, b| a.0.cmp(&b.0));

        let canonical_headers_str = sorted_headers
            .iter()
            .map(|(k, v)| format!("{}:{}\n", k, v))
            .collect::<String>();

        let signed_headers = sorted_headers
            .iter()
            .map(|(k, _)| k.as_str())
            .collect::<Vec<_>>()
            .join(";");

        let canonical_request = format!(
            "{}\n{}\n{}\n{}\n{}\n{}",
            request.method.to_uppercase(),
            canonical_uri(&request.path),
            canonical_query(&request),
            canonical_headers_str,
            signed_headers,
            payload_hash
        );

        let credential_scope = format!("{}/{}/{}/aws4_request", date_stamp, region, service);
        let canonical_request_hash = hex::encode(Sha256::digest(canonical_request.as_bytes()));

        let string_to_sign = format!(
            "{}\n{}\n{}\n{}",
            ALGORITHM, amz_date, credential_scope, canonical_request_hash
        );

        let signature = calculate_signature(
            &credentials.secret_access_key,
            &date_stamp,
            region,
            service,
            &string_to_sign,
        )?;

        let authorization = format!(
            "{} Credential={}/{}, SignedHeaders={}, Signature={}",
            ALGORITHM, credentials.access_key_id, credential_scope, signed_headers, signature
        );
        request
            .headers
            .insert("authorization".to_string(), authorization);

        Ok(request)
    }
}

impl RequestSigner for SigV4Signer {
    fn sign(
        &self,
        request: HttpRequest,
        credentials: &AwsCredentials,
        region: &str,
        service: &str,
    ) -> Result<HttpRequest, ProviderError> {
        self.sign_at(request, credentials, region, service, Utc::now())
    }
}

/// URI-encode each path segment; Bedrock model ids may contain `:`
fn canonical_uri(path: &str) -> String {
    if path.is_empty() {
        return "/".to_string();
    }
    path.split('/')
        .map(uri_encode)
        .collect::<Vec<_>>()
        .join("/")
}

fn canonical_query(request: &HttpRequest) -> String {
    // BTreeMap iteration is already sorted by key
    request
        .query
        .iter()
        .map(|(k, v)| format!("{}={}", uri_encode(k), uri_encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

/// RFC 3986 encoding as required by SigV4: only unreserved characters pass through
fn uri_encode(input: &str) -> String {
    let mut encoded = String::with_capacity(input.len());
    for byte in input.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                encoded.push(byte as char)
            }
            _ => encoded.push_str(&format!("%{:02X}", byte)),
        }
    }
    encoded
}

/// Calculate AWS SigV4 signature
fn calculate_signature(
    secret_key: &str,
    date_stamp: &str,
    region: &str,
    service: &str,
    string_to_sign: &str,
) -> Result<String, ProviderError> {
    let k_date = hmac_sha256(
        format!("AWS4{}", secret_key).as_bytes(),
        date_stamp.as_bytes(),
    )?;
    let k_region = hmac_sha256(&k_date, region.as_bytes())?;
    let k_service = hmac_sha256(&k_region, service.as_bytes())?;
    let k_signing = hmac_sha256(&k_service, b"aws4_request")?;

    let signature = hmac_sha256(&k_signing, string_to_sign.as_bytes())?;
    Ok(hex::encode(signature))
}

/// HMAC-SHA256 helper function
fn hmac_sha256(key: &[u8], data: &[u8]) -> Result<Vec<u8>, ProviderError> {
    let mut mac = HmacSha256::new_from_slice(key)
        .map_err(|e| ProviderError::authentication("bedrock", format!("HMAC key error: {}", e)))?;
    mac.update(data);
    Ok(mac.finalize().into_bytes().to_vec())
}
