// Evolution Client: Instance-scoped client
//
// Bundles a transport with an instance name. Resource groups borrow the
// client, build an `Endpoint` per operation and hand it to the transport.

use std::fmt;
use std::sync::Arc;

use super::config::EvolutionConfig;
use super::http::HttpTransport;
use super::payloads::TextOptions;
use super::recipient::Recipient;
use super::resources::{
    Calls, Chats, Groups, Instances, Labels, Messages, Profiles, Proxies, Settings, Templates, WebSockets,
};
use crate::atoms::error::EvolutionResult;
use crate::atoms::traits::Transport;
use crate::atoms::types::{ApiResponse, Endpoint};

#[derive(Clone)]
pub struct EvolutionClient {
    transport: Arc<dyn Transport>,
    config: Arc<EvolutionConfig>,
    instance: String,
}

impl fmt::Debug for EvolutionClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EvolutionClient")
            .field("base_url", &self.config.base_url)
            .field("instance", &self.instance)
            .finish_non_exhaustive()
    }
}

impl EvolutionClient {
    /// HTTP client for `config.default_instance`.
    pub fn new(config: EvolutionConfig) -> EvolutionResult<Self> {
        let transport = HttpTransport::new(&config)?;
        Ok(Self::with_transport(Arc::new(transport), config))
    }

    /// Use a custom transport (tests, proxies, recorders).
    pub fn with_transport(transport: Arc<dyn Transport>, config: EvolutionConfig) -> Self {
        let instance = config.default_instance.clone();
        EvolutionClient { transport, config: Arc::new(config), instance }
    }

    /// A client scoped to another instance, sharing the same transport.
    pub fn with_instance(&self, instance: impl Into<String>) -> Self {
        EvolutionClient {
            transport: Arc::clone(&self.transport),
            config: Arc::clone(&self.config),
            instance: instance.into(),
        }
    }

    pub fn instance(&self) -> &str {
        &self.instance
    }

    pub fn config(&self) -> &EvolutionConfig {
        &self.config
    }

    /// Issue one endpoint as-is.
    pub async fn call(&self, endpoint: Endpoint) -> EvolutionResult<ApiResponse> {
        self.transport.execute(endpoint).await
    }

    /// `/{resource}/{action}/{instance}`
    pub(crate) fn path(&self, resource: &str, action: &str) -> String {
        format!("/{}/{}/{}", resource, action, self.instance)
    }

    // ── Resources ──────────────────────────────────────────────────────

    pub fn instances(&self) -> Instances<'_> {
        Instances::new(self)
    }

    pub fn messages(&self) -> Messages<'_> {
        Messages::new(self)
    }

    pub fn chats(&self) -> Chats<'_> {
        Chats::new(self)
    }

    pub fn groups(&self) -> Groups<'_> {
        Groups::new(self)
    }

    pub fn labels(&self) -> Labels<'_> {
        Labels::new(self)
    }

    pub fn profiles(&self) -> Profiles<'_> {
        Profiles::new(self)
    }

    pub fn proxies(&self) -> Proxies<'_> {
        Proxies::new(self)
    }

    pub fn settings(&self) -> Settings<'_> {
        Settings::new(self)
    }

    pub fn templates(&self) -> Templates<'_> {
        Templates::new(self)
    }

    pub fn websockets(&self) -> WebSockets<'_> {
        WebSockets::new(self)
    }

    pub fn calls(&self) -> Calls<'_> {
        Calls::new(self)
    }

    // ── Shortcuts ──────────────────────────────────────────────────────

    pub async fn send_text(&self, to: impl Into<Recipient>, text: &str) -> EvolutionResult<ApiResponse> {
        self.messages().send_text(to, text, TextOptions::default()).await
    }

    pub async fn qr_code(&self) -> EvolutionResult<ApiResponse> {
        self.instances().qrcode().await
    }

    pub async fn is_connected(&self) -> EvolutionResult<bool> {
        self.instances().is_connected().await
    }

    /// Log the instance out of WhatsApp. The instance itself is kept.
    pub async fn disconnect(&self) -> EvolutionResult<ApiResponse> {
        self.instances().logout().await
    }
}
