//! Terminal rendering of the transcript

use crate::conversation::{Message, Role};
use crate::images::{self, ImageRef};
use std::path::PathBuf;

pub const TITLE: &str = "データ分析＆可視化アシスタント(MCPサーバーのデモ)";
pub const SUBTITLE: &str = "架空の企業データをAIを使って分析しましょう。";
pub const PROMPT_HINT: &str = "メッセージを入力してください...";
pub const PENDING_INDICATOR: &str = "assistant> ...";
pub const BUSY_NOTICE: &str = "(waiting for the previous reply, message ignored)";

const CONTINUATION_INDENT: &str = "  ";

/// Formats messages for a line-oriented terminal
pub struct Renderer {
    image_dir: PathBuf,
}

impl Renderer {
    #[must_use]
    pub fn new(image_dir: impl Into<PathBuf>) -> Self {
        Self {
            image_dir: image_dir.into(),
        }
    }

    #[must_use]
    pub fn banner() -> String {
        format!("{TITLE}\n{SUBTITLE}\n{PROMPT_HINT}")
    }

    #[must_use]
    pub fn render(&self, message: &Message) -> String {
        let label = match message.role {
            Role::User => "you",
            Role::Assistant => "assistant",
        };

        let mut out = String::new();
        for (i, line) in message.content.lines().enumerate() {
            if i == 0 {
                out.push_str(label);
                out.push_str("> ");
            } else {
                out.push('\n');
                out.push_str(CONTINUATION_INDENT);
            }
            out.push_str(line);
        }
        if out.is_empty() {
            out.push_str(label);
            out.push('>');
        }

        if let Some(url) = &message.image_url {
            out.push('\n');
            out.push_str(CONTINUATION_INDENT);
            out.push_str("[image] ");
            out.push_str(&self.image_location(url));
        }
        out
    }

    fn image_location(&self, url: &str) -> String {
        match ImageRef::parse(url) {
            ImageRef::Linked(link) => link.to_string(),
            ImageRef::Inline { media_type, data } => {
                match images::materialize(url, &self.image_dir) {
                    Ok(path) => path.display().to_string(),
                    Err(e) => {
                        tracing::warn!(error = %e, media_type, "Could not save inline image");
                        format!("<{media_type}, {} base64 chars, not saved: {e}>", data.len())
                    }
                }
            }
        }
    }
}
