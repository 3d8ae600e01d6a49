//! Core conversation state machine
//!
//! Pure transitions over an append-only transcript, plus the store that
//! executes their effects against a chat gateway.

mod effect;
pub mod event;
pub mod state;
mod store;
pub(crate) mod transition;

#[cfg(test)]
mod proptests;

pub use effect::Effect;
pub use event::Event;
pub use state::{ConvContext, Conversation, Message, Role, SubmissionState};
pub use store::{ConversationStore, SubmitOutcome, Turn, TurnOutcome};
pub use transition::{transition, Rejection, TransitionResult};
