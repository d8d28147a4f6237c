// Evolution Client: Instance lifecycle
// create, qrcode, status, connectionState, connect, logout, delete, restart, webhook

use log::{info, warn};
use serde_json::{json, Value};

use crate::atoms::error::{EvolutionError, EvolutionResult};
use crate::atoms::types::{ApiResponse, Endpoint};
use crate::engine::client::EvolutionClient;
use crate::engine::payloads::{encode, CreateInstance, Webhook};

pub struct Instances<'a> {
    client: &'a EvolutionClient,
}

impl<'a> Instances<'a> {
    pub(crate) fn new(client: &'a EvolutionClient) -> Self {
        Instances { client }
    }

    /// Create the client's instance on the server with a fresh per-instance
    /// token. When `webhook` is `None` the configured webhook URL (if any)
    /// is registered with the configured events.
    pub async fn create(&self, webhook: Option<Webhook>) -> EvolutionResult<ApiResponse> {
        let config = self.client.config();
        let webhook = webhook.or_else(|| {
            config.webhook_url.as_ref().map(|url| Webhook { url: url.clone(), events: config.webhook_events.clone() })
        });
        let token = instance_token();
        info!("[evolution] Creating instance '{}'", self.client.instance());

        let body = CreateInstance {
            instance_name: self.client.instance().to_string(),
            token,
            qrcode: true,
            webhook,
        };
        self.client.call(Endpoint::post("/instance/create", encode("instance", &body)?)).await
    }

    pub async fn qrcode(&self) -> EvolutionResult<ApiResponse> {
        self.client.call(Endpoint::get(self.client.path("instance", "qrcode"))).await
    }

    pub async fn status(&self) -> EvolutionResult<ApiResponse> {
        self.client.call(Endpoint::get(self.client.path("instance", "status"))).await
    }

    pub async fn connection_state(&self) -> EvolutionResult<ApiResponse> {
        self.client.call(Endpoint::get(self.client.path("instance", "connectionState"))).await
    }

    pub async fn is_connected(&self) -> EvolutionResult<bool> {
        Ok(is_open(&self.status().await?))
    }

    /// Returns a pairing QR when the instance is not yet linked.
    pub async fn connect(&self) -> EvolutionResult<ApiResponse> {
        self.client.call(Endpoint::post_empty(self.client.path("instance", "connect"))).await
    }

    pub async fn logout(&self) -> EvolutionResult<ApiResponse> {
        self.client.call(Endpoint::delete(self.client.path("instance", "logout"))).await
    }

    pub async fn delete(&self) -> EvolutionResult<ApiResponse> {
        self.client.call(Endpoint::delete(self.client.path("instance", "delete"))).await
    }

    pub async fn restart(&self) -> EvolutionResult<ApiResponse> {
        self.client.call(Endpoint::post_empty(self.client.path("instance", "restart"))).await
    }

    pub async fn set_webhook(&self, url: &str, events: &[String]) -> EvolutionResult<ApiResponse> {
        if url.trim().is_empty() {
            return Err(EvolutionError::validation("webhook URL is required"));
        }
        let body = json!({ "url": url, "events": events });
        self.client.call(Endpoint::post(self.client.path("instance", "webhook"), body)).await
    }
}

fn instance_token() -> String {
    let id = uuid::Uuid::new_v4().simple().to_string();
    format!("evo-{}", &id[..12])
}

/// Whether a status / connectionState payload reports a linked session.
pub fn is_open(status: &Value) -> bool {
    if status.get("status").and_then(Value::as_str) == Some("connected") {
        return true;
    }
    let state = status
        .pointer("/instance/state")
        .or_else(|| status.get("state"))
        .and_then(Value::as_str);
    state == Some("open")
}

/// Pull the QR image out of a create/connect/qrcode response.
///
/// Accepts `{"qrcode":{"base64":..}}`, `{"base64":..}` and a bare
/// `{"qrcode":"data:image/..."}`.
pub fn extract_qr(resp: &Value) -> Option<String> {
    let qr = resp
        .pointer("/qrcode/base64")
        .and_then(Value::as_str)
        .or_else(|| resp.get("base64").and_then(Value::as_str))
        .or_else(|| resp.get("qrcode").and_then(Value::as_str).filter(|s| s.starts_with("data:")))
        .filter(|s| !s.is_empty());

    match qr {
        Some(qr) => {
            info!("[evolution] QR code extracted ({} bytes)", qr.len());
            Some(qr.to_string())
        }
        None => {
            let field = &resp["qrcode"];
            warn!(
                "[evolution] No QR code in response. qrcode field: {}, keys: {:?}",
                json_kind(field),
                field.as_object().map(|o| o.keys().collect::<Vec<_>>())
            );
            None
        }
    }
}

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
