//! HTTP API for the relay hop
//!
//! `POST /api/chat` forwards the transcript to the analysis service and
//! answers with its JSON, or with `{ error, details }` on failure.

mod handlers;
mod types;


pub use handlers::create_router;
pub use types::*;

use crate::gateway::HttpGateway;
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub upstream: Arc<HttpGateway>,
}

impl AppState {
    #[must_use]
    pub fn new(upstream: HttpGateway) -> Self {
        Self {
            upstream: Arc::new(upstream),
        }
    }
}
