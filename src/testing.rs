//! Test doubles shared across modules
//!
//! A scripted gateway for store tests, and helpers that stand up real HTTP
//! upstreams on loopback for the hop tests.

use crate::gateway::{ChatGateway, ChatReply, ChatRequest, GatewayError};
use async_trait::async_trait;
use axum::Router;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;
use tokio::sync::Notify;

// ============================================================================
// Mock Gateway
// ============================================================================

/// Gateway that returns queued results
pub struct MockGateway {
    responses: Mutex<VecDeque<Result<ChatReply, GatewayError>>>,
    /// Record of all requests sent
    requests: Mutex<Vec<ChatRequest>>,
    /// When set, every send waits for a permit before answering
    gate: Option<Arc<Notify>>,
}

impl MockGateway {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
            gate: None,
        }
    }

    /// A gateway that holds each reply until the returned `Notify` fires
    pub fn gated() -> (Self, Arc<Notify>) {
        let gate = Arc::new(Notify::new());
        let mut gateway = Self::new();
        gateway.gate = Some(gate.clone());
        (gateway, gate)
    }

    pub fn queue_reply(&self, reply: ChatReply) {
        self.responses.lock().unwrap().push_back(Ok(reply));
    }

    pub fn queue_error(&self, error: GatewayError) {
        self.responses.lock().unwrap().push_back(Err(error));
    }

    pub fn recorded_requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatGateway for MockGateway {
    async fn send(&self, request: &ChatRequest) -> Result<ChatReply, GatewayError> {
        self.requests.lock().unwrap().push(request.clone());
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(GatewayError::transport("No mock response queued")))
    }

    fn upstream(&self) -> &str {
        "mock://upstream"
    }
}

// ============================================================================
// Loopback upstreams
// ============================================================================

/// Serve `app` on an ephemeral port; returns its `/api/chat` URL
pub async fn spawn_upstream(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}/api/chat")
}

/// A URL on a port nothing listens on
pub async fn refused_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}/api/chat")
}
