//! Gateway: HTTP surface for the provider webhook.
//!
//! Single port serves `POST /webhook` (provider events) and `GET /` (health).
//! Every webhook request is answered with HTTP 200 and a JSON ack whose `status`
//! field carries the real outcome.

mod protocol;
mod server;

pub use protocol::{parse_webhook, AckStatus, WebhookAck, WebhookError, WebhookEvent, MESSAGES_UPSERT};
pub use server::{router, run_gateway, send_auto_reply, GatewayState};
