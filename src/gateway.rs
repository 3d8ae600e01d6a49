//! Chat gateway abstraction
//!
//! One request/response hop carrying a transcript toward the analysis
//! service. The same contract runs on the client-facing hop and on the
//! server-facing relay.

mod error;
mod http;
mod types;

pub use error::{GatewayError, GatewayErrorKind, BACKEND_SERVICE_ERROR, INTERNAL_SERVER_ERROR};
pub use http::HttpGateway;
pub use types::*;

use async_trait::async_trait;
use std::sync::Arc;

/// Common interface for a relay hop
#[async_trait]
pub trait ChatGateway: Send + Sync {
    /// Send the transcript and wait for the full reply
    async fn send(&self, request: &ChatRequest) -> Result<ChatReply, GatewayError>;

    /// Address this hop talks to, for logging
    fn upstream(&self) -> &str;
}

#[async_trait]
impl<T: ChatGateway + ?Sized> ChatGateway for Arc<T> {
    async fn send(&self, request: &ChatRequest) -> Result<ChatReply, GatewayError> {
        (**self).send(request).await
    }

    fn upstream(&self) -> &str {
        (**self).upstream()
    }
}

/// Logging wrapper for gateways
pub struct LoggingGateway {
    inner: Arc<dyn ChatGateway>,
    upstream: String,
}

impl LoggingGateway {
    #[must_use]
    pub fn new(inner: Arc<dyn ChatGateway>) -> Self {
        let upstream = inner.upstream().to_string();
        Self { inner, upstream }
    }
}

#[async_trait]
impl ChatGateway for LoggingGateway {
    async fn send(&self, request: &ChatRequest) -> Result<ChatReply, GatewayError> {
        let start = std::time::Instant::now();
        let result = self.inner.send(request).await;
        let duration = start.elapsed();

        match &result {
            Ok(reply) => {
                tracing::info!(
                    upstream = %self.upstream,
                    duration_ms = %duration.as_millis(),
                    messages = request.messages.len(),
                    has_image = reply.image_url.is_some(),
                    "Chat request completed"
                );
            }
            Err(e) => {
                tracing::error!(
                    upstream = %self.upstream,
                    duration_ms = %duration.as_millis(),
                    status = e.status(),
                    error = %e.message,
                    backend = e.kind.is_backend(),
                    "Chat request failed"
                );
            }
        }

        result
    }

    fn upstream(&self) -> &str {
        &self.upstream
    }
}
