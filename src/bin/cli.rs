//! Analysis chat terminal client
//!
//! Reads one message per line from stdin and sends the running transcript
//! through the relay configured by `CHAT_RELAY_URL`. Input stays live while
//! a reply is pending; lines typed meanwhile are dropped.

use analysis_chat::config::ClientConfig;
use analysis_chat::conversation::{ConversationStore, Rejection, TurnOutcome};
use analysis_chat::gateway::{HttpGateway, LoggingGateway};
use analysis_chat::render::{Renderer, BUSY_NOTICE, PENDING_INDICATOR};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

type InFlight<'a> = Pin<Box<dyn Future<Output = TurnOutcome> + 'a>>;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logs go to stderr so they never interleave with the transcript
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "analysis_chat=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = ClientConfig::from_env();
    tracing::info!(relay = %config.relay_url, "Client configured");

    let gateway = LoggingGateway::new(Arc::new(HttpGateway::new(config.relay_url.clone())));
    let store = ConversationStore::new(gateway).with_error_text(config.error_text.clone());
    let renderer = Renderer::new(config.image_dir.clone());

    println!("{}", Renderer::banner());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut in_flight: Option<InFlight<'_>> = None;

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match store.begin(line) {
                    Ok(turn) => {
                        println!("{PENDING_INDICATOR}");
                        in_flight = Some(Box::pin(turn.settle()));
                    }
                    Err(Rejection::Busy) => println!("{BUSY_NOTICE}"),
                    Err(_) => {}
                }
            }
            outcome = async {
                if let Some(turn) = in_flight.as_mut() {
                    turn.await
                } else {
                    std::future::pending().await
                }
            } => {
                in_flight = None;
                tracing::debug!(?outcome, "Turn settled");
                if let Some(message) = store.last_message() {
                    println!("{}", renderer.render(&message));
                }
            }
        }
    }

    // Stdin closed: let an outstanding turn finish rather than abandon it
    if let Some(turn) = in_flight {
        turn.await;
        if let Some(message) = store.last_message() {
            println!("{}", renderer.render(&message));
        }
    }

    Ok(())
}
