//! Environment-driven configuration
//!
//! Both binaries resolve their settings once at startup.

use std::path::PathBuf;

/// Where the relay forwards transcripts when `WEB_APP_URL` is unset
pub const DEFAULT_UPSTREAM_URL: &str = "http://localhost:8000/api/chat";
pub const DEFAULT_RELAY_PORT: u16 = 3000;
pub const DEFAULT_RELAY_URL: &str = "http://localhost:3000/api/chat";
/// Synthetic assistant reply for any failed turn
pub const DEFAULT_ERROR_TEXT: &str = "エラーが発生しました。もう一度お試しください。";

/// Settings for the server-facing relay hop
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayConfig {
    pub upstream_url: String,
    pub port: u16,
}

impl RelayConfig {
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            upstream_url: get("WEB_APP_URL").unwrap_or_else(|| DEFAULT_UPSTREAM_URL.to_string()),
            port: get("CHAT_RELAY_PORT")
                .and_then(|p| p.trim().parse().ok())
                .unwrap_or(DEFAULT_RELAY_PORT),
        }
    }
}

/// Settings for the terminal client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub relay_url: String,
    /// Directory inline images are written to
    pub image_dir: PathBuf,
    pub error_text: String,
}

impl ClientConfig {
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            relay_url: get("CHAT_RELAY_URL").unwrap_or_else(|| DEFAULT_RELAY_URL.to_string()),
            image_dir: get("CHAT_IMAGE_DIR")
                .map_or_else(|| std::env::temp_dir().join("analysis-chat"), PathBuf::from),
            error_text: get("CHAT_ERROR_TEXT").unwrap_or_else(|| DEFAULT_ERROR_TEXT.to_string()),
        }
    }
}
