//! Transport test doubles
//!
//! [`ScriptedTransport`] records every request and answers from a fixed
//! script; [`MockBedrockTransport`] is a `mockall` mock for call-count checks.

use async_trait::async_trait;
use bedrock_llm::ProviderError;
use bedrock_llm::core::providers::bedrock::transport::{
    HttpRequest, HttpResponse, ResponseBody, Transport,
};
use bytes::Bytes;
use mockall::mock;
use std::sync::{Arc, Mutex};
use url::Url;

mock! {
    pub BedrockTransport {}

    #[async_trait]
    impl Transport for BedrockTransport {
        async fn fetch(&self, url: &Url, request: HttpRequest) -> Result<HttpResponse, ProviderError>;
    }
}

/// How the scripted body is delivered
#[derive(Debug, Clone)]
enum Body {
    Buffered(Bytes),
    Chunked(Vec<Bytes>),
}

/// Transport that replays a canned response and records requests
#[derive(Debug)]
pub struct ScriptedTransport {
    status: u16,
    status_text: String,
    body: Body,
    requests: Mutex<Vec<(Url, HttpRequest)>>,
}

impl ScriptedTransport {
    fn new(status: u16, status_text: &str, body: Body) -> Arc<Self> {
        Arc::new(Self {
            status,
            status_text: status_text.to_string(),
            body,
            requests: Mutex::new(Vec::new()),
        })
    }

    /// 200 response with a buffered JSON body
    pub fn json(status: u16, body: &str) -> Arc<Self> {
        Self::new(
            status,
            "OK",
            Body::Buffered(Bytes::copy_from_slice(body.as_bytes())),
        )
    }

    /// Response with a plain text body
    pub fn text(status: u16, status_text: &str, body: &str) -> Arc<Self> {
        Self::new(
            status,
            status_text,
            Body::Buffered(Bytes::copy_from_slice(body.as_bytes())),
        )
    }

    /// 200 response whose body arrives as the given chunks
    pub fn chunks(chunks: Vec<Bytes>) -> Arc<Self> {
        Self::new(200, "OK", Body::Chunked(chunks))
    }

    /// Requests seen so far
    pub fn requests(&self) -> Vec<(Url, HttpRequest)> {
        self.requests.lock().unwrap().clone()
    }

    /// The only request seen, panicking otherwise
    pub fn single_request(&self) -> (Url, HttpRequest) {
        let requests = self.requests();
        assert_eq!(requests.len(), 1, "expected exactly one request");
        requests.into_iter().next().unwrap()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn fetch(&self, url: &Url, request: HttpRequest) -> Result<HttpResponse, ProviderError> {
        self.requests.lock().unwrap().push((url.clone(), request));

        let body = match &self.body {
            Body::Buffered(bytes) => ResponseBody::Buffered(bytes.clone()),
            Body::Chunked(chunks) => ResponseBody::Streaming(Box::pin(futures::stream::iter(
                chunks.clone().into_iter().map(Ok::<_, ProviderError>),
            ))),
        };

        Ok(HttpResponse::new(self.status, self.status_text.clone(), body))
    }
}
