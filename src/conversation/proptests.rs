//! Property-based tests for the conversation state machine
//!
//! These drive arbitrary event sequences through `transition` and check the
//! transcript invariants after every step.

use super::{
    transition, ConvContext, Conversation, Effect, Event, Message, Rejection, Role,
    SubmissionState,
};
use crate::gateway::{ChatReply, ChatRequest, GatewayErrorKind};
use proptest::prelude::*;

const ERROR_TEXT: &str = "generic failure";

// ============================================================================
// Test Helpers
// ============================================================================

/// Minimal executor: applies local effects, returns what would be sent
fn step(
    state: &mut SubmissionState,
    conv: &mut Conversation,
    event: Event,
) -> Result<Vec<ChatRequest>, Rejection> {
    let result = {
        let ctx = ConvContext::new(conv, ERROR_TEXT);
        transition(*state, &ctx, event)?
    };
    let mut sent = Vec::new();
    for effect in result.effects {
        match effect {
            Effect::AppendMessage { message } => conv.push(message),
            Effect::SendTranscript { request } => sent.push(request),
            Effect::ReportFailure { .. } => {}
        }
    }
    *state = result.new_state;
    Ok(sent)
}

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_valid_text() -> impl Strategy<Value = String> {
    "[ \t]{0,3}[a-zA-Z0-9?!]{1,20}[ \n]{0,3}"
}

fn arb_blank_text() -> impl Strategy<Value = String> {
    "[ \t\n\r]{0,8}"
}

fn arb_text() -> impl Strategy<Value = String> {
    prop_oneof![3 => arb_valid_text(), 1 => arb_blank_text()]
}

fn arb_image_url() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        Just(None),
        "/img/[0-9]{1,3}\\.png".prop_map(Some),
        "[A-Za-z0-9+/]{4,16}".prop_map(|d| Some(format!("data:image/png;base64,{d}"))),
    ]
}

fn arb_reply() -> impl Strategy<Value = ChatReply> {
    ("[a-zA-Z ]{0,30}", arb_image_url())
        .prop_map(|(content, image_url)| ChatReply { content, image_url })
}

fn arb_error_kind() -> impl Strategy<Value = GatewayErrorKind> {
    prop_oneof![
        Just(GatewayErrorKind::Transport),
        (400u16..600).prop_map(|status| GatewayErrorKind::Backend { status }),
    ]
}

fn arb_settle_event() -> impl Strategy<Value = Event> {
    prop_oneof![
        arb_reply().prop_map(|reply| Event::ReplyReceived { reply }),
        ("[a-z ]{1,20}", arb_error_kind()).prop_map(|(message, error_kind)| {
            Event::RequestFailed {
                message,
                error_kind,
            }
        }),
    ]
}

fn arb_event() -> impl Strategy<Value = Event> {
    prop_oneof![
        arb_text().prop_map(Event::submit),
        arb_settle_event(),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    // Transcript only grows, by the exact amounts each event allows
    #[test]
    fn prop_length_deltas(events in proptest::collection::vec(arb_event(), 0..30)) {
        let mut state = SubmissionState::Idle;
        let mut conv = Conversation::new();

        for event in events {
            let before = conv.len();
            let was_pending = state.is_pending();
            let is_submit = matches!(event, Event::Submit { .. });

            match step(&mut state, &mut conv, event) {
                Ok(sent) => {
                    prop_assert_eq!(conv.len(), before + 1);
                    if is_submit {
                        prop_assert!(!was_pending);
                        prop_assert!(state.is_pending());
                        prop_assert_eq!(sent.len(), 1);
                        prop_assert!(conv.last().is_some_and(Message::is_user));
                    } else {
                        prop_assert!(was_pending);
                        prop_assert!(!state.is_pending());
                        prop_assert!(sent.is_empty());
                        prop_assert_eq!(conv.last().map(|m| m.role), Some(Role::Assistant));
                    }
                }
                Err(_) => {
                    prop_assert_eq!(conv.len(), before);
                    prop_assert_eq!(state.is_pending(), was_pending);
                }
            }
        }
    }

    // Users and assistants alternate, starting with a user message
    #[test]
    fn prop_roles_alternate(events in proptest::collection::vec(arb_event(), 0..30)) {
        let mut state = SubmissionState::Idle;
        let mut conv = Conversation::new();
        for event in events {
            let _ = step(&mut state, &mut conv, event);
        }

        for (i, message) in conv.messages().iter().enumerate() {
            let expected = if i % 2 == 0 { Role::User } else { Role::Assistant };
            prop_assert_eq!(message.role, expected);
        }
        // An odd-length transcript means exactly one turn is still in flight
        prop_assert_eq!(conv.len() % 2 == 1, state.is_pending());
    }

    // A full admitted turn always adds exactly two messages
    #[test]
    fn prop_turn_adds_two(
        history in proptest::collection::vec((arb_valid_text(), arb_settle_event()), 0..5),
        text in arb_valid_text(),
        settle in arb_settle_event(),
    ) {
        let mut state = SubmissionState::Idle;
        let mut conv = Conversation::new();
        for (t, s) in history {
            step(&mut state, &mut conv, Event::submit(t)).unwrap();
            step(&mut state, &mut conv, s).unwrap();
        }

        let before = conv.len();
        step(&mut state, &mut conv, Event::submit(text)).unwrap();
        step(&mut state, &mut conv, settle).unwrap();
        prop_assert_eq!(conv.len(), before + 2);
        prop_assert_eq!(state, SubmissionState::Idle);
    }

    // Pending drops every submission untouched
    #[test]
    fn prop_pending_gate(text in arb_text(), prior in arb_valid_text()) {
        let mut state = SubmissionState::Idle;
        let mut conv = Conversation::new();
        step(&mut state, &mut conv, Event::submit(prior)).unwrap();
        let snapshot = conv.clone();

        let result = step(&mut state, &mut conv, Event::submit(text));
        prop_assert_eq!(result.unwrap_err(), Rejection::Busy);
        prop_assert_eq!(conv, snapshot);
        prop_assert_eq!(state, SubmissionState::Pending);
    }

    // Blank input never changes the transcript
    #[test]
    fn prop_blank_rejected(text in arb_blank_text()) {
        let mut state = SubmissionState::Idle;
        let mut conv = Conversation::new();
        let result = step(&mut state, &mut conv, Event::submit(text));
        prop_assert_eq!(result.unwrap_err(), Rejection::EmptyInput);
        prop_assert!(conv.is_empty());
        prop_assert_eq!(state, SubmissionState::Idle);
    }

    // Image references never travel upstream
    #[test]
    fn prop_outbound_has_no_image_urls(
        turns in proptest::collection::vec((arb_valid_text(), arb_reply()), 0..6),
        text in arb_valid_text(),
    ) {
        let mut state = SubmissionState::Idle;
        let mut conv = Conversation::new();
        for (t, reply) in turns {
            step(&mut state, &mut conv, Event::submit(t)).unwrap();
            step(&mut state, &mut conv, Event::ReplyReceived { reply }).unwrap();
        }

        let sent = step(&mut state, &mut conv, Event::submit(text)).unwrap();
        prop_assert_eq!(sent.len(), 1);
        prop_assert_eq!(sent[0].messages.len(), conv.len());

        let value = serde_json::to_value(&sent[0]).unwrap();
        for message in value["messages"].as_array().unwrap() {
            let obj = message.as_object().unwrap();
            prop_assert!(!obj.contains_key("imageUrl"));
            prop_assert!(!obj.contains_key("image_url"));
            prop_assert_eq!(obj.len(), 2);
        }
    }
}
