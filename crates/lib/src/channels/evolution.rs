//! Evolution-style messaging API: sendText via `POST {base}/message/sendText/{instance}`.

use crate::channels::sender::{ReplySender, SendError};
use crate::config::{Config, ProviderConfig};
use async_trait::async_trait;
use serde::Serialize;

/// sendText request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendTextRequest {
    /// Destination in international format without symbols (or a provider JID).
    pub number: Option<String>,
    pub text: String,
    /// Presence delay in ms before the message is sent; always 0.
    pub delay: u64,
    pub link_preview: bool,
}

impl SendTextRequest {
    pub fn new(number: Option<&str>, text: &str) -> Self {
        Self {
            number: number.map(str::to_string),
            text: text.to_string(),
            delay: 0,
            link_preview: false,
        }
    }
}

/// Client for the provider's sendText endpoint. One attempt per send; no retry, no timeout.
#[derive(Clone)]
pub struct EvolutionClient {
    base_url: String,
    instance_id: String,
    api_key: String,
    client: reqwest::Client,
}

impl EvolutionClient {
    pub fn new(provider: &ProviderConfig) -> Self {
        Self {
            base_url: provider.api_base_url.trim_end_matches('/').to_string(),
            instance_id: provider.instance_id.clone(),
            api_key: provider.api_key.clone(),
            client: reqwest::Client::new(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.provider)
    }

    /// Target URL for sendText on the configured instance.
    pub fn send_text_url(&self) -> String {
        format!("{}/message/sendText/{}", self.base_url, self.instance_id)
    }

    /// POST sendText. Returns the parsed JSON response on a 2xx status.
    pub async fn send_text(
        &self,
        number: Option<&str>,
        text: &str,
    ) -> Result<serde_json::Value, SendError> {
        let url = self.send_text_url();
        let body = SendTextRequest::new(number, text);
        let res = self
            .client
            .post(&url)
            .header("apikey", self.api_key.as_str())
            .json(&body)
            .send()
            .await?;
        let status = res.status();
        let text = res.text().await?;
        if !status.is_success() {
            return Err(SendError::Api { status, body: text });
        }
        Ok(serde_json::from_str(&text)?)
    }
}

#[async_trait]
impl ReplySender for EvolutionClient {
    async fn send_text(
        &self,
        number: Option<&str>,
        text: &str,
    ) -> Result<serde_json::Value, SendError> {
        EvolutionClient::send_text(self, number, text).await
    }
}
