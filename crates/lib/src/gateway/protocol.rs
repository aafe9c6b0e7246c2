//! Webhook wire types: inbound provider envelope and the JSON acknowledgement we return.

use crate::channels::InboundMessage;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Event name the provider uses for a new (or updated) chat message.
pub const MESSAGES_UPSERT: &str = "messages.upsert";

const ACK_PROCESSED: &str = "Evento processado";

#[derive(Debug, thiserror::Error)]
pub enum WebhookError {
    #[error("invalid webhook body: {0}")]
    Json(#[from] serde_json::Error),
    #[error("webhook body must be a JSON object")]
    NotAnObject,
    #[error("invalid messages.upsert data: {0}")]
    Data(serde_json::Error),
}

/// Wire envelope: `{ "event", "data", ... }`. Other provider fields (instance, date_time, ...) are ignored.
/// A missing `data` is an empty object; an explicit `null` is kept so it can be rejected.
#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    event: Option<Value>,
    #[serde(default = "empty_object")]
    data: Value,
}

fn empty_object() -> Value {
    Value::Object(serde_json::Map::new())
}

/// `data` of a `messages.upsert` event (subset we need).
#[derive(Debug, Default, Deserialize)]
struct UpsertData {
    #[serde(default)]
    key: MessageKey,
    #[serde(default)]
    message: MessageContent,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MessageKey {
    #[serde(default)]
    remote_jid: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
struct MessageContent {
    #[serde(default)]
    conversation: Option<Value>,
}

/// Text form of a scalar field: strings as-is, other JSON rendered compactly, null as None.
fn value_text(value: Option<Value>) -> Option<String> {
    match value? {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

/// Parsed webhook event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookEvent {
    /// `messages.upsert`: an incoming chat message to answer.
    MessageUpsert(InboundMessage),
    /// Any other event (or none); accepted and ignored. Holds the event name when it was a string.
    Ignored(Option<String>),
}

/// Parse a raw webhook body. Fails on invalid JSON, a non-object body, or malformed upsert data.
pub fn parse_webhook(body: &[u8]) -> Result<WebhookEvent, WebhookError> {
    let value: Value = serde_json::from_slice(body)?;
    if !value.is_object() {
        return Err(WebhookError::NotAnObject);
    }
    let envelope: Envelope = serde_json::from_value(value)?;
    let event = envelope.event.as_ref().and_then(Value::as_str);
    if event != Some(MESSAGES_UPSERT) {
        return Ok(WebhookEvent::Ignored(event.map(str::to_string)));
    }
    let data: UpsertData = serde_json::from_value(envelope.data).map_err(WebhookError::Data)?;
    Ok(WebhookEvent::MessageUpsert(InboundMessage {
        conversation_id: value_text(data.key.remote_jid),
        text: value_text(data.message.conversation),
    }))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AckStatus {
    Success,
    Error,
}

/// Webhook response body: `{ "status": "success" | "error", "message" }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookAck {
    pub status: AckStatus,
    pub message: String,
}

impl WebhookAck {
    pub fn success() -> Self {
        Self {
            status: AckStatus::Success,
            message: ACK_PROCESSED.to_string(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: AckStatus::Error,
            message: message.into(),
        }
    }
}
