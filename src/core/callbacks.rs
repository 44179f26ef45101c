//! Token callbacks
//!
//! Streaming invocations hand every decoded text fragment to a
//! [`TokenObserver`] before reading the next frame.

use async_trait::async_trait;

/// Receives streamed text fragments in arrival order
#[async_trait]
pub trait TokenObserver: Send + Sync {
    async fn on_new_token(&self, token: &str);
}

#[async_trait]
impl<F> TokenObserver for F
where
    F: Fn(&str) + Send + Sync,
{
    async fn on_new_token(&self, token: &str) {
        self(token)
    }
}

/// Observer that ignores every fragment
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

#[async_trait]
impl TokenObserver for NoopObserver {
    async fn on_new_token(&self, _token: &str) {}
}
