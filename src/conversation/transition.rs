//! Pure state transition function
//!
//! Given the same state, context and event this always yields the same new
//! state and effects. All I/O happens in the store that executes the effects.

use super::state::{ConvContext, Message, SubmissionState};
use super::{Effect, Event};
use crate::gateway::OutboundMessage;
use thiserror::Error;

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    pub new_state: SubmissionState,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    #[must_use]
    pub fn new(state: SubmissionState) -> Self {
        Self {
            new_state: state,
            effects: vec![],
        }
    }

    #[must_use]
    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }
}

/// Why an event was dropped without changing anything
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("Message is empty")]
    EmptyInput,
    #[error("A request is already pending, submission ignored")]
    Busy,
    #[error("No request is pending")]
    NotPending,
}

/// Pure transition function
///
/// # Errors
///
/// Returns a [`Rejection`] when the event is not accepted in `state`; the
/// caller must then leave state and transcript untouched.
pub fn transition(
    state: SubmissionState,
    context: &ConvContext<'_>,
    event: Event,
) -> Result<TransitionResult, Rejection> {
    match (state, event) {
        // ============================================================
        // Admission gate
        // ============================================================

        // Pending + Submit -> dropped, never queued
        (SubmissionState::Pending, Event::Submit { .. }) => Err(Rejection::Busy),

        (SubmissionState::Idle, Event::Submit { text }) if text.trim().is_empty() => {
            Err(Rejection::EmptyInput)
        }

        // Idle + Submit -> Pending, user message appended before any I/O
        (SubmissionState::Idle, Event::Submit { text }) => {
            let message = Message::user(text);

            let mut request = context.conversation.outbound();
            request.messages.push(OutboundMessage::from(&message));

            Ok(TransitionResult::new(SubmissionState::Pending)
                .with_effect(Effect::append(message))
                .with_effect(Effect::send(request)))
        }

        // ============================================================
        // Settling
        // ============================================================

        (SubmissionState::Pending, Event::ReplyReceived { reply }) => {
            Ok(TransitionResult::new(SubmissionState::Idle)
                .with_effect(Effect::append(Message::assistant(
                    reply.content,
                    reply.image_url,
                ))))
        }

        // Every failure kind collapses into the same synthetic reply
        (SubmissionState::Pending, Event::RequestFailed { message, error_kind }) => {
            Ok(TransitionResult::new(SubmissionState::Idle)
                .with_effect(Effect::ReportFailure {
                    message,
                    error_kind,
                })
                .with_effect(Effect::append(Message::assistant(
                    context.error_text,
                    None,
                ))))
        }

        (SubmissionState::Idle, Event::ReplyReceived { .. } | Event::RequestFailed { .. }) => {
            Err(Rejection::NotPending)
        }
    }
}
