//! Trait abstraction for the relay client to enable mocking in tests

use super::payload::RelayPayload;
use async_trait::async_trait;
use serde::Deserialize;

/// Result reported by the relay for one submission
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RelayResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: String,
    /// HTTP status of the reply
    #[serde(skip)]
    pub status: u16,
}

impl RelayResponse {
    pub fn accepted(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            status: 200,
        }
    }

    pub fn rejected(status: u16, message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            status,
        }
    }
}

/// Transport-level relay failures
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout)
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The relay replied with something that is not its JSON result
    #[error("Unreadable relay response (HTTP {status}): {source}")]
    Decode {
        status: u16,
        #[source]
        source: serde_json::Error,
    },
}

/// Trait for relay operations, enabling mocking in tests
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RelayClientTrait: Send + Sync {
    /// Deliver one multipart submission
    async fn submit(&self, payload: RelayPayload) -> Result<RelayResponse, RelayError>;
}
