//! Configuration types and loading.
//!
//! Config is loaded once at startup from an optional JSON file (e.g. `./replybot.json`),
//! then `.env` and the process environment. The result is passed around as `Arc<Config>`.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Top-level application config.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Gateway server settings.
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Messaging provider (outbound API) settings.
    #[serde(default)]
    pub provider: ProviderConfig,
}

/// Gateway bind and port.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayConfig {
    /// Port for HTTP (default 8000). Overridden by REPLYBOT_PORT env.
    #[serde(default = "default_gateway_port")]
    pub port: u16,

    /// Bind address (default "0.0.0.0"). Overridden by REPLYBOT_BIND env.
    #[serde(default = "default_gateway_bind")]
    pub bind: String,
}

fn default_gateway_port() -> u16 {
    8000
}

fn default_gateway_bind() -> String {
    "0.0.0.0".to_string()
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            port: default_gateway_port(),
            bind: default_gateway_bind(),
        }
    }
}

/// Outbound messaging API settings. Empty values are not rejected; they yield a
/// malformed URL or an empty `apikey` header when a reply is sent.
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderConfig {
    /// API base URL, e.g. "https://evo.example.com". Overridden by API_BASE_URL env.
    #[serde(default)]
    pub api_base_url: String,
    /// Provider instance id. Overridden by INSTANCE_ID env.
    #[serde(default)]
    pub instance_id: String,
    /// API key sent in the `apikey` header. Overridden by API_KEY env.
    #[serde(default)]
    pub api_key: String,
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("api_base_url", &self.api_base_url)
            .field("instance_id", &self.instance_id)
            .field("api_key", &if self.api_key.is_empty() { "" } else { "[redacted]" })
            .finish()
    }
}

impl ProviderConfig {
    /// Names of provider settings that are empty, as their environment variable names.
    pub fn missing(&self) -> Vec<&'static str> {
        let mut out = Vec::new();
        if self.api_base_url.trim().is_empty() {
            out.push("API_BASE_URL");
        }
        if self.instance_id.trim().is_empty() {
            out.push("INSTANCE_ID");
        }
        if self.api_key.trim().is_empty() {
            out.push("API_KEY");
        }
        out
    }
}

/// Resolve config path from env or default.
pub fn default_config_path() -> PathBuf {
    std::env::var("REPLYBOT_CONFIG_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("replybot.json"))
}

/// Non-blank value of an environment variable, trimmed.
fn env_value(key: &str) -> Option<String> {
    std::env::var(key).ok().and_then(|s| {
        let t = s.trim();
        if t.is_empty() {
            None
        } else {
            Some(t.to_string())
        }
    })
}

/// Apply environment overrides using `lookup` for each variable. Blank values are ignored.
pub fn apply_env_overrides<F>(config: &mut Config, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(v) = lookup("API_BASE_URL") {
        config.provider.api_base_url = v;
    }
    if let Some(v) = lookup("INSTANCE_ID") {
        config.provider.instance_id = v;
    }
    if let Some(v) = lookup("API_KEY") {
        config.provider.api_key = v;
    }
    if let Some(v) = lookup("REPLYBOT_BIND") {
        config.gateway.bind = v;
    }
    if let Some(v) = lookup("REPLYBOT_PORT") {
        match v.parse::<u16>() {
            Ok(p) => config.gateway.port = p,
            Err(_) => log::warn!("ignoring invalid REPLYBOT_PORT: {}", v),
        }
    }
}

/// Load config from the given path (or REPLYBOT_CONFIG_PATH / `./replybot.json`), then `.env`
/// and the process environment. Missing file => default config.
/// Returns the config and the path that was used.
pub fn load_config(path: Option<PathBuf>) -> Result<(Config, PathBuf)> {
    if let Ok(p) = dotenvy::dotenv() {
        log::debug!("loaded environment from {}", p.display());
    }
    let path = path.unwrap_or_else(default_config_path);
    let mut config = if !path.exists() {
        log::debug!("config file not found, using defaults: {}", path.display());
        Config::default()
    } else {
        let s = std::fs::read_to_string(&path)
            .with_context(|| format!("reading config from {}", path.display()))?;
        serde_json::from_str(&s)
            .with_context(|| format!("parsing config from {}", path.display()))?
    };
    apply_env_overrides(&mut config, env_value);
    Ok((config, path))
}
