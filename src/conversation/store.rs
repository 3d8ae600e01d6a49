//! Conversation store
//!
//! Owns the transcript and the submission state, and executes transition
//! effects against a [`ChatGateway`]. The state lock is only held while a
//! transition is applied, never across the network round trip.

use super::state::{ConvContext, Conversation, Message, SubmissionState};
use super::transition::{transition, Rejection};
use super::{Effect, Event};
use crate::config::DEFAULT_ERROR_TEXT;
use crate::gateway::{ChatGateway, ChatRequest, GatewayErrorKind};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// How an admitted turn settled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnOutcome {
    /// The upstream answer was appended
    Replied,
    /// The synthetic error reply was appended
    Failed,
}

/// Result of [`ConversationStore::submit`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Dropped by the admission gate; nothing was appended
    Rejected(Rejection),
    Settled(TurnOutcome),
}

#[derive(Debug, Default)]
struct Inner {
    state: SubmissionState,
    conversation: Conversation,
}

/// Single-conversation store with single-flight submission
pub struct ConversationStore<G: ChatGateway> {
    inner: Mutex<Inner>,
    gateway: G,
    error_text: String,
}

impl<G: ChatGateway> ConversationStore<G> {
    #[must_use]
    pub fn new(gateway: G) -> Self {
        Self {
            inner: Mutex::new(Inner::default()),
            gateway,
            error_text: DEFAULT_ERROR_TEXT.to_string(),
        }
    }

    /// Override the text of the synthetic reply shown when a turn fails
    #[must_use]
    pub fn with_error_text(mut self, error_text: impl Into<String>) -> Self {
        self.error_text = error_text.into();
        self
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[must_use]
    pub fn state(&self) -> SubmissionState {
        self.lock().state
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.state().is_pending()
    }

    /// Snapshot of the transcript
    #[must_use]
    pub fn messages(&self) -> Vec<Message> {
        self.lock().conversation.messages().to_vec()
    }

    #[must_use]
    pub fn last_message(&self) -> Option<Message> {
        self.lock().conversation.last().cloned()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().conversation.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().conversation.is_empty()
    }

    /// Submit user text and wait for the turn to settle.
    ///
    /// Never fails: gateway errors surface as the synthetic assistant reply.
    pub async fn submit(&self, text: impl Into<String>) -> SubmitOutcome {
        match self.begin(text) {
            Ok(turn) => SubmitOutcome::Settled(turn.settle().await),
            Err(rejection) => SubmitOutcome::Rejected(rejection),
        }
    }

    /// Admit a submission without waiting for the reply.
    ///
    /// On success the user message is already in the transcript and the
    /// store is pending; the returned [`Turn`] must be settled (or dropped,
    /// which settles it as failed).
    ///
    /// # Errors
    ///
    /// Returns [`Rejection::EmptyInput`] for blank text and
    /// [`Rejection::Busy`] while another turn is pending. Nothing is appended
    /// in either case.
    pub fn begin(&self, text: impl Into<String>) -> Result<Turn<'_, G>, Rejection> {
        let outbox = self
            .apply(Event::submit(text))
            .inspect_err(|rejection| tracing::debug!(%rejection, "Submission ignored"))?;

        Ok(Turn {
            store: self,
            outbox,
            settled: false,
        })
    }

    /// Apply one event and execute its local effects.
    /// Returns the transcripts that still need to go through the gateway.
    fn apply(&self, event: Event) -> Result<Vec<ChatRequest>, Rejection> {
        let mut inner = self.lock();
        let result = {
            let ctx = ConvContext::new(&inner.conversation, &self.error_text);
            transition(inner.state, &ctx, event)?
        };

        let mut outbox = Vec::new();
        for effect in result.effects {
            match effect {
                Effect::AppendMessage { message } => inner.conversation.push(message),
                Effect::SendTranscript { request } => outbox.push(request),
                Effect::ReportFailure {
                    message,
                    error_kind,
                } => {
                    tracing::warn!(
                        upstream = %self.gateway.upstream(),
                        error = %message,
                        ?error_kind,
                        "Chat request failed"
                    );
                }
            }
        }
        inner.state = result.new_state;

        Ok(outbox)
    }

    async fn round_trip(&self, request: &ChatRequest) -> TurnOutcome {
        let (event, outcome) = match self.gateway.send(request).await {
            Ok(reply) => (Event::ReplyReceived { reply }, TurnOutcome::Replied),
            Err(e) => (
                Event::RequestFailed {
                    message: e.message,
                    error_kind: e.kind,
                },
                TurnOutcome::Failed,
            ),
        };
        self.settle_with(event);
        outcome
    }

    fn settle_with(&self, event: Event) {
        if let Err(rejection) = self.apply(event) {
            tracing::error!(%rejection, "Turn settled while no request was pending");
        }
    }
}

/// An admitted submission whose reply has not been applied yet
pub struct Turn<'a, G: ChatGateway> {
    store: &'a ConversationStore<G>,
    outbox: Vec<ChatRequest>,
    settled: bool,
}

impl<G: ChatGateway> Turn<'_, G> {
    /// The transcript being sent for this turn
    #[must_use]
    pub fn request(&self) -> Option<&ChatRequest> {
        self.outbox.first()
    }

    /// Send the transcript and append exactly one assistant message
    pub async fn settle(mut self) -> TurnOutcome {
        let mut outcome = TurnOutcome::Failed;
        for request in std::mem::take(&mut self.outbox) {
            outcome = self.store.round_trip(&request).await;
            self.settled = true;
        }
        outcome
    }
}

impl<G: ChatGateway> Drop for Turn<'_, G> {
    fn drop(&mut self) {
        if !self.settled {
            self.store.settle_with(Event::RequestFailed {
                message: "Turn dropped before the reply arrived".to_string(),
                error_kind: GatewayErrorKind::Transport,
            });
        }
    }
}
