//! Gateway error types

use thiserror::Error;

pub const BACKEND_SERVICE_ERROR: &str = "Backend service error";
pub const INTERNAL_SERVER_ERROR: &str = "Internal Server Error";

/// Gateway error with classification
#[derive(Debug, Error)]
#[error("{message}")]
pub struct GatewayError {
    pub kind: GatewayErrorKind,
    /// Raw upstream body for backend errors, failure message otherwise
    pub message: String,
}

impl GatewayError {
    #[must_use]
    pub fn new(kind: GatewayErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn backend(status: u16, body: impl Into<String>) -> Self {
        Self::new(GatewayErrorKind::Backend { status }, body)
    }

    #[must_use]
    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(GatewayErrorKind::Transport, message)
    }

    /// Status the relay answers with: the upstream's own, or 500
    #[must_use]
    pub fn status(&self) -> u16 {
        match self.kind {
            GatewayErrorKind::Backend { status } => status,
            GatewayErrorKind::Transport => 500,
        }
    }
}

/// Error classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatewayErrorKind {
    /// Upstream answered with a non-success status
    Backend { status: u16 },
    /// No usable response: connect/DNS/timeout failure or unreadable body
    Transport,
}

impl GatewayErrorKind {
    #[must_use]
    pub fn is_backend(self) -> bool {
        matches!(self, Self::Backend { .. })
    }
}
