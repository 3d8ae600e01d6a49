//! Conversation state types

use crate::gateway::{ChatRequest, OutboundMessage};
use serde::{Deserialize, Serialize};

// ============================================================================
// Messages
// ============================================================================

/// Author of a transcript entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// A single transcript entry. Never edited once appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub role: Role,
    pub content: String,
    /// Only ever set on assistant replies; produced upstream, never locally
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl Message {
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            image_url: None,
        }
    }

    #[must_use]
    pub fn assistant(content: impl Into<String>, image_url: Option<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            image_url,
        }
    }

    #[must_use]
    pub fn is_user(&self) -> bool {
        self.role == Role::User
    }
}

// ============================================================================
// Submission State
// ============================================================================

/// Whether a request is outstanding for the conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionState {
    /// Ready for user input
    #[default]
    Idle,
    /// One request in flight; new submissions are dropped
    Pending,
}

impl SubmissionState {
    #[must_use]
    pub fn is_pending(self) -> bool {
        matches!(self, SubmissionState::Pending)
    }
}

// ============================================================================
// Transcript
// ============================================================================

/// Ordered, append-only chat history
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Conversation {
    messages: Vec<Message>,
}

impl Conversation {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    #[must_use]
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    #[must_use]
    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// The transcript as sent upstream, with image references stripped
    #[must_use]
    pub fn outbound(&self) -> ChatRequest {
        ChatRequest {
            messages: self.messages.iter().map(OutboundMessage::from).collect(),
        }
    }
}

/// Read-only inputs to a transition
#[derive(Debug, Clone, Copy)]
pub struct ConvContext<'a> {
    pub conversation: &'a Conversation,
    /// Text of the synthetic reply appended when a turn fails
    pub error_text: &'a str,
}

impl<'a> ConvContext<'a> {
    #[must_use]
    pub fn new(conversation: &'a Conversation, error_text: &'a str) -> Self {
        Self {
            conversation,
            error_text,
        }
    }
}
