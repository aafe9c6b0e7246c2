//! Gateway HTTP server (single port): provider webhook and health probe.

use crate::channels::{EvolutionClient, InboundMessage, ReplySender, SendError};
use crate::config::Config;
use crate::gateway::protocol::{parse_webhook, WebhookAck, WebhookError, WebhookEvent};
use crate::reply;
use anyhow::{Context, Result};
use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, State},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;

/// Shared state for the gateway (read-only config and the reply sender).
#[derive(Clone)]
pub struct GatewayState {
    pub config: Arc<Config>,
    /// Outbound sender used for automatic replies (the provider client outside tests).
    pub sender: Arc<dyn ReplySender>,
}

impl GatewayState {
    /// State with an [`EvolutionClient`] built from `config.provider`.
    pub fn new(config: Arc<Config>) -> Self {
        let sender = Arc::new(EvolutionClient::from_config(&config));
        Self { config, sender }
    }

    pub fn with_sender(config: Arc<Config>, sender: Arc<dyn ReplySender>) -> Self {
        Self { config, sender }
    }
}

/// Routes: `GET /` health, `POST /webhook` provider events.
/// No request body limit: events with inline base64 media exceed axum's 2 MB default,
/// and a rejected body would not get the JSON ack.
pub fn router(state: GatewayState) -> Router {
    Router::new()
        .route("/", get(health_http))
        .route("/webhook", post(webhook))
        .layer(DefaultBodyLimit::disable())
        .with_state(state)
}

pub async fn run_gateway(config: Config) -> Result<()> {
    for key in config.provider.missing() {
        log::warn!("{} is not set; outbound replies will fail", key);
    }
    let bind_addr = format!("{}:{}", config.gateway.bind.trim(), config.gateway.port);
    let state = GatewayState::new(Arc::new(config));
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("binding to {}", bind_addr))?;
    log::info!("gateway listening on {}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("gateway server exited")?;
    log::info!("gateway stopped");
    Ok(())
}

/// Future that completes when the process should shut down (SIGINT or SIGTERM).
/// In-flight requests, including reply sends, run to completion.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    log::info!("shutdown signal received, draining connections");
}

/// POST /webhook — receives the provider event JSON and answers `messages.upsert` with an automatic reply.
/// Always HTTP 200; the `status` field of the body carries the outcome.
async fn webhook(State(state): State<GatewayState>, body: Bytes) -> Json<WebhookAck> {
    match process_webhook(&state, &body).await {
        Ok(()) => Json(WebhookAck::success()),
        Err(e) => {
            log::error!("error processing webhook: {}", e);
            Json(WebhookAck::error(e.to_string()))
        }
    }
}

/// Parse and dispatch one webhook body. A failed reply send is logged, not returned.
async fn process_webhook(state: &GatewayState, body: &[u8]) -> Result<(), WebhookError> {
    match parse_webhook(body)? {
        WebhookEvent::MessageUpsert(msg) => {
            match send_auto_reply(state.sender.as_ref(), &msg).await {
                Ok(response) => log::info!("reply sent: {}", response),
                Err(e) => log::warn!("error sending reply: {}", e),
            }
        }
        WebhookEvent::Ignored(event) => {
            log::debug!("ignoring webhook event {:?}", event);
        }
    }
    Ok(())
}

/// Format the automatic reply for `msg` and send it to the message's sender.
pub async fn send_auto_reply(
    sender: &dyn ReplySender,
    msg: &InboundMessage,
) -> Result<serde_json::Value, SendError> {
    let text = reply::format_reply(msg.text.as_deref());
    sender
        .send_text(msg.conversation_id.as_deref(), &text)
        .await
}

/// GET / returns a simple health JSON (for probes).
async fn health_http(State(state): State<GatewayState>) -> Json<serde_json::Value> {
    Json(json!({
        "runtime": "running",
        "port": state.config.gateway.port,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::protocol::AckStatus;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Records every send and answers with a fixed result.
    struct RecordingSender {
        calls: Mutex<Vec<(Option<String>, String)>>,
        fail: bool,
    }

    impl RecordingSender {
        fn new(fail: bool) -> Arc<Self> {
            Arc::new(Self {
                calls: Mutex::new(Vec::new()),
                fail,
            })
        }

        fn calls(&self) -> Vec<(Option<String>, String)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ReplySender for RecordingSender {
        async fn send_text(
            &self,
            number: Option<&str>,
            text: &str,
        ) -> Result<serde_json::Value, SendError> {
            self.calls
                .lock()
                .unwrap()
                .push((number.map(str::to_string), text.to_string()));
            if self.fail {
                Err(SendError::Api {
                    status: reqwest::StatusCode::INTERNAL_SERVER_ERROR,
                    body: "down".to_string(),
                })
            } else {
                Ok(json!({ "key": { "id": "ABC" } }))
            }
        }
    }

    fn state_with(sender: Arc<RecordingSender>) -> GatewayState {
        GatewayState::with_sender(Arc::new(Config::default()), sender)
    }

    async fn deliver(state: &GatewayState, body: &str) -> WebhookAck {
        let Json(ack) = webhook(State(state.clone()), Bytes::from(body.to_string())).await;
        ack
    }

    #[tokio::test]
    async fn upsert_sends_reply_to_sender() {
        let sender = RecordingSender::new(false);
        let state = state_with(sender.clone());
        let ack = deliver(
            &state,
            r#"{"event":"messages.upsert","data":{"key":{"remoteJid":"X"},"message":{"conversation":"Y"}}}"#,
        )
        .await;
        assert_eq!(ack, WebhookAck::success());
        assert_eq!(
            sender.calls(),
            vec![(Some("X".to_string()), "Olá! você disse: Y".to_string())]
        );
    }

    #[tokio::test]
    async fn other_events_send_nothing() {
        let sender = RecordingSender::new(false);
        let state = state_with(sender.clone());
        for body in [
            r#"{"event":"connection.update","data":{}}"#,
            r#"{"data":{"key":{"remoteJid":"X"}}}"#,
            r#"{}"#,
        ] {
            assert_eq!(deliver(&state, body).await.status, AckStatus::Success);
        }
        assert!(sender.calls().is_empty());
    }

    #[tokio::test]
    async fn send_failure_still_acks_success() {
        let sender = RecordingSender::new(true);
        let state = state_with(sender.clone());
        let ack = deliver(&state, r#"{"event":"messages.upsert","data":{"key":{"remoteJid":"X"}}}"#).await;
        assert_eq!(ack.status, AckStatus::Success);
        assert_eq!(sender.calls().len(), 1);
    }

    #[tokio::test]
    async fn invalid_json_acks_error() {
        let sender = RecordingSender::new(false);
        let state = state_with(sender.clone());
        let ack = deliver(&state, "{not json").await;
        assert_eq!(ack.status, AckStatus::Error);
        assert!(!ack.message.is_empty());
        assert!(sender.calls().is_empty());
    }

    #[tokio::test]
    async fn null_upsert_data_acks_error() {
        let sender = RecordingSender::new(false);
        let state = state_with(sender.clone());
        let ack = deliver(&state, r#"{"event":"messages.upsert","data":null}"#).await;
        assert_eq!(ack.status, AckStatus::Error);
        assert!(sender.calls().is_empty());
    }

    #[tokio::test]
    async fn duplicate_events_send_twice() {
        let sender = RecordingSender::new(false);
        let state = state_with(sender.clone());
        let body = r#"{"event":"messages.upsert","data":{"key":{"remoteJid":"X"},"message":{"conversation":"Y"}}}"#;
        deliver(&state, body).await;
        deliver(&state, body).await;
        let calls = sender.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0], calls[1]);
    }

    #[tokio::test]
    async fn send_auto_reply_surfaces_sender_result() {
        let msg = InboundMessage {
            conversation_id: Some("X".to_string()),
            text: None,
        };
        let ok = RecordingSender::new(false);
        let response = send_auto_reply(&*ok, &msg).await.unwrap();
        assert_eq!(response["key"]["id"], "ABC");
        assert_eq!(ok.calls()[0].1, "Olá! você disse: ");

        let failing = RecordingSender::new(true);
        assert!(send_auto_reply(&*failing, &msg).await.is_err());
    }
}
