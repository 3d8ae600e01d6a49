//! Events that can occur in a conversation

use crate::gateway::{ChatReply, GatewayErrorKind};

/// Events that trigger state transitions
#[derive(Debug, Clone)]
pub enum Event {
    // User events
    Submit {
        text: String,
    },

    // Gateway events
    ReplyReceived {
        reply: ChatReply,
    },
    RequestFailed {
        message: String,
        error_kind: GatewayErrorKind,
    },
}

impl Event {
    #[must_use]
    pub fn submit(text: impl Into<String>) -> Self {
        Event::Submit { text: text.into() }
    }
}
