// Evolution Client: Configuration
// EvolutionConfig, SocketSettings, EmptyBodyPolicy, from_env / from_toml_str / from_file

use crate::atoms::constants::*;
use crate::atoms::error::{EvolutionError, EvolutionResult};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

// ── Policies ───────────────────────────────────────────────────────────

/// What a 2xx response with an empty body turns into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyBodyPolicy {
    /// Return `{}`.
    #[default]
    EmptyObject,
    /// Raise a decode error.
    Reject,
}

// ── Socket Settings ────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SocketSettings {
    /// Reconnect attempts before giving up (default: 5)
    pub max_retries: u32,
    /// Base backoff delay; attempt k waits `retry_delay_ms × 2^k`
    pub retry_delay_ms: u64,
    pub connect_timeout_secs: u64,
    /// Idle time before a keepalive ping is sent
    pub keepalive_secs: u64,
}

impl Default for SocketSettings {
    fn default() -> Self {
        SocketSettings {
            max_retries: DEFAULT_SOCKET_MAX_RETRIES,
            retry_delay_ms: DEFAULT_SOCKET_RETRY_DELAY_MS,
            connect_timeout_secs: DEFAULT_SOCKET_CONNECT_TIMEOUT_SECS,
            keepalive_secs: DEFAULT_SOCKET_KEEPALIVE_SECS,
        }
    }
}

impl SocketSettings {
    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn keepalive(&self) -> Duration {
        Duration::from_secs(self.keepalive_secs)
    }
}

// ── Config Struct ──────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvolutionConfig {
    /// Evolution API base URL (e.g. "http://localhost:8080")
    pub base_url: String,
    /// Global API key sent in the `apikey` header
    pub api_key: String,
    /// Instance used when the caller does not name one
    pub default_instance: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
    /// Where the remote service should deliver webhook events
    pub webhook_url: Option<String>,
    pub webhook_events: Vec<String>,
    pub empty_body: EmptyBodyPolicy,
    pub socket: SocketSettings,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        EvolutionConfig {
            base_url: DEFAULT_BASE_URL.into(),
            api_key: String::new(),
            default_instance: DEFAULT_INSTANCE.into(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            webhook_url: None,
            webhook_events: DEFAULT_WEBHOOK_EVENTS.iter().map(|e| e.to_string()).collect(),
            empty_body: EmptyBodyPolicy::default(),
            socket: SocketSettings::default(),
        }
    }
}

// ── Loading ────────────────────────────────────────────────────────────

impl EvolutionConfig {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        EvolutionConfig { base_url: base_url.into(), api_key: api_key.into(), ..Default::default() }
    }

    /// Read `EVOLUTION_*` variables from the process environment.
    pub fn from_env() -> EvolutionResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an injectable lookup.
    pub fn from_lookup<F>(lookup: F) -> EvolutionResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = EvolutionConfig::default();
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        if let Some(url) = get("EVOLUTION_API_URL") {
            config.base_url = url;
        }
        if let Some(key) = get("EVOLUTION_API_KEY") {
            config.api_key = key;
        }
        if let Some(instance) = get("EVOLUTION_DEFAULT_INSTANCE") {
            config.default_instance = instance;
        }
        if let Some(timeout) = get("EVOLUTION_API_TIMEOUT") {
            config.timeout_secs = timeout.parse().map_err(|_| {
                EvolutionError::config(format!("EVOLUTION_API_TIMEOUT must be a whole number of seconds, got '{}'", timeout))
            })?;
        }
        config.webhook_url = get("EVOLUTION_WEBHOOK_URL");
        if let Some(events) = get("EVOLUTION_WEBHOOK_EVENTS") {
            config.webhook_events = events
                .split(',')
                .map(str::trim)
                .filter(|e| !e.is_empty())
                .map(String::from)
                .collect();
        }
        Ok(config)
    }

    pub fn from_toml_str(raw: &str) -> EvolutionResult<Self> {
        Ok(toml::from_str(raw)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> EvolutionResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| EvolutionError::config(format!("cannot read {}: {}", path.display(), e)))?;
        Self::from_toml_str(&raw)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn defaults_match_documented_values() {
        let config = EvolutionConfig::default();
        assert_eq!(config.base_url, "http://localhost:8080");
        assert_eq!(config.default_instance, "default");
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.webhook_events, vec!["message", "message.ack", "status.instance"]);
        assert_eq!(config.empty_body, EmptyBodyPolicy::EmptyObject);
        assert_eq!(config.socket.max_retries, 5);
        assert_eq!(config.socket.retry_delay(), Duration::from_secs(1));
    }

    #[test]
    fn env_lookup_overrides_defaults() {
        let vars: HashMap<&str, &str> = [
            ("EVOLUTION_API_URL", "https://evo.example.com"),
            ("EVOLUTION_API_KEY", "secret"),
            ("EVOLUTION_DEFAULT_INSTANCE", "sales"),
            ("EVOLUTION_API_TIMEOUT", "12"),
            ("EVOLUTION_WEBHOOK_URL", "https://hooks.example.com/evo"),
            ("EVOLUTION_WEBHOOK_EVENTS", "messages.upsert, connection.update,,"),
        ]
        .into_iter()
        .collect();

        let config = EvolutionConfig::from_lookup(|k| vars.get(k).map(|v| v.to_string())).unwrap();
        assert_eq!(config.base_url, "https://evo.example.com");
        assert_eq!(config.api_key, "secret");
        assert_eq!(config.default_instance, "sales");
        assert_eq!(config.timeout_secs, 12);
        assert_eq!(config.webhook_url.as_deref(), Some("https://hooks.example.com/evo"));
        assert_eq!(config.webhook_events, vec!["messages.upsert", "connection.update"]);
    }

    #[test]
    fn bad_timeout_is_config_error() {
        let err = EvolutionConfig::from_lookup(|k| (k == "EVOLUTION_API_TIMEOUT").then(|| "soon".to_string()))
            .unwrap_err();
        assert!(matches!(err, EvolutionError::Config(_)));
    }

    #[test]
    fn toml_fills_missing_fields_with_defaults() {
        let config = EvolutionConfig::from_toml_str(
            r#"
            base_url = "http://10.0.0.5:8085"
            api_key = "k"
            empty_body = "reject"

            [socket]
            max_retries = 2
            "#,
        )
        .unwrap();
        assert_eq!(config.base_url, "http://10.0.0.5:8085");
        assert_eq!(config.empty_body, EmptyBodyPolicy::Reject);
        assert_eq!(config.socket.max_retries, 2);
        assert_eq!(config.socket.retry_delay_ms, 1_000);
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn invalid_toml_is_config_error() {
        let err = EvolutionConfig::from_toml_str("timeout_secs = \"thirty\"").unwrap_err();
        assert!(matches!(err, EvolutionError::Config(_)));
    }
}
