//! Transport settings.
//!
//! Everything has a default, so an empty JSON object is a valid config.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Unit applied to bare integer timeouts arriving from C callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeoutUnit {
    #[default]
    Seconds,
    Milliseconds,
}

impl TimeoutUnit {
    pub fn to_duration(self, value: u64) -> Duration {
        match self {
            TimeoutUnit::Seconds => Duration::from_secs(value),
            TimeoutUnit::Milliseconds => Duration::from_millis(value),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransportConfig {
    pub timeout_unit: TimeoutUnit,
    /// Responses with a larger body fail with `BodyTooLarge`.
    pub max_body_bytes: u64,
    /// Sent as `User-Agent` unless the request carries its own.
    pub user_agent: Option<String>,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout_unit: TimeoutUnit::Seconds,
            max_body_bytes: 10 * 1024 * 1024,
            user_agent: None,
        }
    }
}

impl TransportConfig {
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }
}
