//! Reply sender seam: the gateway sends replies through this trait so tests can substitute it.

use async_trait::async_trait;

/// Outbound send failure. Kept distinct from an empty provider response.
#[derive(Debug, thiserror::Error)]
pub enum SendError {
    #[error("send request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("send failed: {status} {body}")]
    Api {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("invalid send response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Sends a text message to a destination and returns the provider's JSON response.
#[async_trait]
pub trait ReplySender: Send + Sync {
    /// `number` is the destination as received from the webhook (None when the sender was absent).
    async fn send_text(
        &self,
        number: Option<&str>,
        text: &str,
    ) -> Result<serde_json::Value, SendError>;
}
