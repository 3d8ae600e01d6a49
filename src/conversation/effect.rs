//! Effects produced by state transitions

use super::state::Message;
use crate::gateway::{ChatRequest, GatewayErrorKind};

/// Effects to be executed after state transition
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Append a message to the transcript
    AppendMessage { message: Message },

    /// Send the transcript through the gateway
    SendTranscript { request: ChatRequest },

    /// Record a failed turn before it is replaced by the synthetic reply
    ReportFailure {
        message: String,
        error_kind: GatewayErrorKind,
    },
}

impl Effect {
    #[must_use]
    pub fn append(message: Message) -> Self {
        Effect::AppendMessage { message }
    }

    #[must_use]
    pub fn send(request: ChatRequest) -> Self {
        Effect::SendTranscript { request }
    }
}
