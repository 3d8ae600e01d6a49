//! HTTP request handlers

use super::types::{RelayRequest, VersionResponse};
use super::AppState;
use crate::gateway::{
    ErrorBody, GatewayError, GatewayErrorKind, BACKEND_SERVICE_ERROR, INTERNAL_SERVER_ERROR,
};
use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::Value;
use std::time::Instant;

/// Create the API router
#[must_use]
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Relay hop
        .route("/api/chat", post(relay_chat))
        // Version
        .route("/version", get(get_version))
        .with_state(state)
}

// ============================================================
// Relay
// ============================================================

/// The body is read as JSON whatever its `Content-Type` says
async fn relay_chat(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<Value>, AppError> {
    let req: RelayRequest = serde_json::from_slice(&body).map_err(|e| {
        tracing::error!(status = 500, details = %e, "Unreadable relay request");
        AppError::Internal(format!("Invalid request body: {e}"))
    })?;

    let start = Instant::now();
    let reply = state.upstream.forward(&req).await?;

    tracing::info!(
        upstream = %state.upstream.url(),
        duration_ms = %start.elapsed().as_millis(),
        "Relayed chat request"
    );
    Ok(Json(reply))
}

// ============================================================
// Version
// ============================================================

async fn get_version() -> Json<VersionResponse> {
    Json(VersionResponse::current())
}

// ============================================================
// Error Handling
// ============================================================

/// Upstream failure as answered by the relay
#[derive(Debug)]
enum AppError {
    /// Upstream answered non-success: mirror its status, keep its body
    Backend { status: u16, details: String },
    /// No usable upstream response, or a request body that is not JSON
    Internal(String),
}

impl From<GatewayError> for AppError {
    fn from(e: GatewayError) -> Self {
        match e.kind {
            GatewayErrorKind::Backend { status } => {
                tracing::error!(status, details = %e.message, "Error from upstream");
                AppError::Backend {
                    status,
                    details: e.message,
                }
            }
            GatewayErrorKind::Transport => {
                tracing::error!(status = 500, details = %e.message, "Error fetching from upstream");
                AppError::Internal(e.message)
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::Backend { status, details } => (
                StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
                ErrorBody::new(BACKEND_SERVICE_ERROR, details),
            ),
            AppError::Internal(details) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorBody::new(INTERNAL_SERVER_ERROR, details),
            ),
        };

        (status, Json(body)).into_response()
    }
}
