//! API request and response types

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body accepted on `POST /api/chat`.
///
/// Only `messages` is picked out, and it is forwarded without validation.
#[derive(Debug, Deserialize, Serialize)]
pub struct RelayRequest {
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub messages: Value,
}

/// Response for `GET /version`
#[derive(Debug, Serialize)]
pub struct VersionResponse {
    pub name: &'static str,
    pub version: &'static str,
}

impl VersionResponse {
    #[must_use]
    pub fn current() -> Self {
        Self {
            name: env!("CARGO_PKG_NAME"),
            version: env!("CARGO_PKG_VERSION"),
        }
    }
}
