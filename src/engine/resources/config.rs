// Evolution Client: Per-instance configuration resources
// proxy, settings, template, websocket: each a set/find (or create/find) pair.

use crate::atoms::error::{EvolutionError, EvolutionResult};
use crate::atoms::types::{ApiResponse, Endpoint};
use crate::engine::client::EvolutionClient;
use crate::engine::payloads::{encode, InstanceSettings, ProxyConfig, TemplateDefinition, WebSocketConfig};
use crate::engine::socket::{SocketClient, SocketConfig};

// ── Proxy ──────────────────────────────────────────────────────────────

pub struct Proxies<'a> {
    client: &'a EvolutionClient,
}

impl<'a> Proxies<'a> {
    pub(crate) fn new(client: &'a EvolutionClient) -> Self {
        Proxies { client }
    }

    pub async fn set(&self, proxy: &ProxyConfig) -> EvolutionResult<ApiResponse> {
        if proxy.enabled && proxy.host.trim().is_empty() {
            return Err(EvolutionError::validation("proxy host is required"));
        }
        let body = encode("proxy", proxy)?;
        self.client.call(Endpoint::post(self.client.path("proxy", "set"), body)).await
    }

    pub async fn find(&self) -> EvolutionResult<ApiResponse> {
        self.client.call(Endpoint::get(self.client.path("proxy", "find"))).await
    }
}

// ── Settings ───────────────────────────────────────────────────────────

pub struct Settings<'a> {
    client: &'a EvolutionClient,
}

impl<'a> Settings<'a> {
    pub(crate) fn new(client: &'a EvolutionClient) -> Self {
        Settings { client }
    }

    pub async fn set(&self, settings: &InstanceSettings) -> EvolutionResult<ApiResponse> {
        let body = encode("settings", settings)?;
        self.client.call(Endpoint::post(self.client.path("settings", "set"), body)).await
    }

    pub async fn find(&self) -> EvolutionResult<ApiResponse> {
        self.client.call(Endpoint::get(self.client.path("settings", "find"))).await
    }
}

// ── Templates ──────────────────────────────────────────────────────────

pub struct Templates<'a> {
    client: &'a EvolutionClient,
}

impl<'a> Templates<'a> {
    pub(crate) fn new(client: &'a EvolutionClient) -> Self {
        Templates { client }
    }

    pub async fn create(&self, template: &TemplateDefinition) -> EvolutionResult<ApiResponse> {
        if template.name.trim().is_empty() {
            return Err(EvolutionError::validation("template name is required"));
        }
        let body = encode("template", template)?;
        self.client.call(Endpoint::post(self.client.path("template", "create"), body)).await
    }

    pub async fn find(&self) -> EvolutionResult<ApiResponse> {
        self.client.call(Endpoint::get(self.client.path("template", "find"))).await
    }
}

// ── WebSocket ──────────────────────────────────────────────────────────

pub struct WebSockets<'a> {
    client: &'a EvolutionClient,
}

impl<'a> WebSockets<'a> {
    pub(crate) fn new(client: &'a EvolutionClient) -> Self {
        WebSockets { client }
    }

    /// Enable/disable server-side event streaming and pick the events.
    pub async fn set(&self, config: &WebSocketConfig) -> EvolutionResult<ApiResponse> {
        let body = encode("websocket", config)?;
        self.client.call(Endpoint::post(self.client.path("websocket", "set"), body)).await
    }

    pub async fn find(&self) -> EvolutionResult<ApiResponse> {
        self.client.call(Endpoint::get(self.client.path("websocket", "find"))).await
    }

    /// A socket client for this instance using the configured retry settings.
    pub fn socket_client(&self) -> EvolutionResult<SocketClient> {
        SocketClient::new(SocketConfig::from_config(self.client.config(), self.client.instance()))
    }
}
