//! HTTP implementation of a single relay hop

use super::types::{ChatReply, ChatRequest};
use super::{ChatGateway, GatewayError};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;

/// POSTs JSON to one fixed upstream address.
///
/// No retries and no timeout beyond the transport defaults. Proxy
/// environment variables are ignored; the upstream is addressed directly.
pub struct HttpGateway {
    client: Client,
    url: String,
}

impl HttpGateway {
    /// # Panics
    ///
    /// Panics if the TLS backend cannot be initialized.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        let client = Client::builder()
            .no_proxy()
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            url: url.into(),
        }
    }

    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Forward a body and return the upstream's JSON untouched
    ///
    /// # Errors
    ///
    /// Returns a backend error carrying the raw body when the upstream
    /// answers non-success, and a transport error when it cannot be reached
    /// or its body is not JSON.
    pub async fn forward<T>(&self, body: &T) -> Result<Value, GatewayError>
    where
        T: Serialize + ?Sized + Sync,
    {
        let response = self
            .client
            .post(&self.url)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GatewayError::transport(format!("Request timeout: {e}"))
                } else if e.is_connect() {
                    GatewayError::transport(format!("Connection failed: {e}"))
                } else {
                    GatewayError::transport(format!("Request failed: {e}"))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            // The body is diagnostic text only, never parsed as an answer
            let details = response
                .text()
                .await
                .map_err(|e| GatewayError::transport(format!("Failed to read response: {e}")))?;
            return Err(GatewayError::backend(status.as_u16(), details));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| GatewayError::transport(format!("Failed to parse response: {e}")))
    }
}

#[async_trait]
impl ChatGateway for HttpGateway {
    async fn send(&self, request: &ChatRequest) -> Result<ChatReply, GatewayError> {
        let value = self.forward(request).await?;
        serde_json::from_value(value)
            .map_err(|e| GatewayError::transport(format!("Unexpected reply shape: {e}")))
    }

    fn upstream(&self) -> &str {
        &self.url
    }
}
