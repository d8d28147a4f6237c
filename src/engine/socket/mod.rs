// ── Evolution Engine: Event Socket ─────────────────────────────────────────
//
// One live WebSocket to the event stream with exponential-backoff
// reconnects. Lifecycle:
//
//   Disconnected ─connect()→ Connecting ─open→ Connected ─close/error→ Disconnected
//                                  └─fail/timeout→ Disconnected
//   Disconnected → (policy) → wait base×2^k → Connecting …
//   any ─disconnect()→ Closing → Disconnected (no further reconnects)
//
// A stop request stays pending until a running loop consumes it, so a
// `disconnect()` that lands before the loop starts still wins.
//
// `connect()` drives the loop on the caller's task and returns a
// `SocketExit` once it stops for good. Errors never escape; they are logged
// and handed to the reconnect policy.

mod handlers;
mod policy;

pub use handlers::{Dispatch, EventHandler, HandlerTable};
pub use policy::ReconnectPolicy;

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures::{SinkExt, StreamExt};
use log::{debug, error, info, warn};
use parking_lot::Mutex;
use serde_json::{json, Value};
use tokio::sync::watch;
use tokio_tungstenite::{connect_async, tungstenite::Message as WsMessage};
use url::Url;

use super::config::EvolutionConfig;
use crate::atoms::constants::*;
use crate::atoms::error::{EvolutionError, EvolutionResult};
use crate::atoms::types::{ConnectionState, SocketExit};

// ── Config ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct SocketConfig {
    pub base_url: String,
    pub api_key: String,
    pub instance: String,
    pub max_retries: u32,
    pub retry_delay: Duration,
    pub connect_timeout: Duration,
    pub keepalive: Duration,
}

impl SocketConfig {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>, instance: impl Into<String>) -> Self {
        SocketConfig {
            base_url: base_url.into(),
            api_key: api_key.into(),
            instance: instance.into(),
            max_retries: DEFAULT_SOCKET_MAX_RETRIES,
            retry_delay: Duration::from_millis(DEFAULT_SOCKET_RETRY_DELAY_MS),
            connect_timeout: Duration::from_secs(DEFAULT_SOCKET_CONNECT_TIMEOUT_SECS),
            keepalive: Duration::from_secs(DEFAULT_SOCKET_KEEPALIVE_SECS),
        }
    }

    pub fn from_config(config: &EvolutionConfig, instance: &str) -> Self {
        SocketConfig {
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
            instance: instance.to_string(),
            max_retries: config.socket.max_retries,
            retry_delay: config.socket.retry_delay(),
            connect_timeout: config.socket.connect_timeout(),
            keepalive: config.socket.keepalive(),
        }
    }

    pub fn with_retries(mut self, max_retries: u32, retry_delay: Duration) -> Self {
        self.max_retries = max_retries;
        self.retry_delay = retry_delay;
        self
    }
}

/// `http(s)://host` → `ws(s)://host?apikey=<key>`.
pub(crate) fn socket_url(base_url: &str, api_key: &str) -> EvolutionResult<Url> {
    let mut url = Url::parse(base_url.trim().trim_end_matches('/'))?;
    let scheme = match url.scheme() {
        "http" | "ws" => "ws",
        "https" | "wss" => "wss",
        other => {
            return Err(EvolutionError::config(format!(
                "socket URL scheme must be http(s) or ws(s), got '{}'",
                other
            )))
        }
    };
    url.set_scheme(scheme)
        .map_err(|_| EvolutionError::config(format!("cannot switch '{}' to {}", base_url, scheme)))?;
    url.query_pairs_mut().append_pair("apikey", api_key);
    Ok(url)
}

// ── Client ─────────────────────────────────────────────────────────────

struct Inner {
    url: Url,
    /// Host + path only, for log lines (the query carries the key).
    display_url: String,
    instance: String,
    policy: ReconnectPolicy,
    connect_timeout: Duration,
    keepalive: Duration,
    handlers: HandlerTable,
    state: Mutex<ConnectionState>,
    retry_count: AtomicU32,
    stop: watch::Sender<bool>,
    running: tokio::sync::Mutex<()>,
}

/// Cheap to clone; clones share the connection, counters and handlers.
#[derive(Clone)]
pub struct SocketClient {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for SocketClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SocketClient")
            .field("url", &self.inner.display_url)
            .field("instance", &self.inner.instance)
            .field("state", &self.state())
            .field("retry_count", &self.retry_count())
            .finish()
    }
}

impl SocketClient {
    pub fn new(config: SocketConfig) -> EvolutionResult<Self> {
        if config.keepalive.is_zero() {
            return Err(EvolutionError::config("socket keepalive must be greater than zero"));
        }
        if config.connect_timeout.is_zero() {
            return Err(EvolutionError::config("socket connect timeout must be greater than zero"));
        }
        let url = socket_url(&config.base_url, &config.api_key)?;
        let port = url.port().map(|p| format!(":{}", p)).unwrap_or_default();
        let display_url = format!("{}://{}{}{}", url.scheme(), url.host_str().unwrap_or(""), port, url.path());
        let (stop, _) = watch::channel(false);
        Ok(SocketClient {
            inner: Arc::new(Inner {
                url,
                display_url,
                instance: config.instance,
                policy: ReconnectPolicy::new(config.retry_delay, config.max_retries),
                connect_timeout: config.connect_timeout,
                keepalive: config.keepalive,
                handlers: HandlerTable::default(),
                state: Mutex::new(ConnectionState::Disconnected),
                retry_count: AtomicU32::new(0),
                stop,
                running: tokio::sync::Mutex::new(()),
            }),
        })
    }

    /// Register `handler` for `event`, replacing any previous one. Works in
    /// any state and never connects.
    pub fn on<F>(&self, event: impl Into<String>, handler: F) -> &Self
    where
        F: Fn(Value) + Send + Sync + 'static,
    {
        self.inner.handlers.insert(event, Arc::new(handler));
        self
    }

    pub fn state(&self) -> ConnectionState {
        *self.inner.state.lock()
    }

    pub fn retry_count(&self) -> u32 {
        self.inner.retry_count.load(Ordering::SeqCst)
    }

    pub fn url(&self) -> &Url {
        &self.inner.url
    }

    pub fn policy(&self) -> ReconnectPolicy {
        self.inner.policy
    }

    /// Stop reconnecting and close the live socket, if any. A request made
    /// while no loop is running ends the next `connect()` before it dials.
    pub fn disconnect(&self) {
        info!("[evolution-ws] Disconnect requested");
        self.inner.stop.send_replace(true);
    }

    fn set_state(&self, state: ConnectionState) {
        *self.inner.state.lock() = state;
    }

    fn stop_requested(&self) -> bool {
        *self.inner.stop.borrow()
    }

    /// Run the connect/reconnect loop until stopped or out of retries.
    pub async fn connect(&self) -> SocketExit {
        let Ok(_running) = self.inner.running.try_lock() else {
            warn!("[evolution-ws] connect() called while already running");
            return SocketExit::AlreadyRunning;
        };

        self.inner.retry_count.store(0, Ordering::SeqCst);
        let exit = self.run_loop().await;
        // A stop request is consumed by the loop it ended.
        self.inner.stop.send_replace(false);
        exit
    }

    async fn run_loop(&self) -> SocketExit {
        let mut stop_rx = self.inner.stop.subscribe();

        loop {
            if self.stop_requested() {
                info!("[evolution-ws] Stopped");
                return SocketExit::Stopped;
            }
            self.set_state(ConnectionState::Connecting);
            info!(
                "[evolution-ws] Connecting to {} (instance '{}', retry {})",
                self.inner.display_url,
                self.inner.instance,
                self.retry_count()
            );

            if let Err(e) = self.run_session(&mut stop_rx).await {
                warn!("[evolution-ws] {}", e);
            }
            self.set_state(ConnectionState::Disconnected);

            let retries = self.retry_count();
            let stopping = self.stop_requested();
            let Some(delay) = self.inner.policy.next_delay(retries, stopping) else {
                if stopping {
                    info!("[evolution-ws] Stopped");
                    return SocketExit::Stopped;
                }
                error!("[evolution-ws] Maximum reconnect attempts ({}) reached, giving up", retries);
                return SocketExit::RetriesExhausted;
            };

            warn!(
                "[evolution-ws] Reconnecting in {}ms (attempt {}/{})",
                delay.as_millis(),
                retries + 1,
                self.inner.policy.max_retries
            );
            tokio::select! {
                _ = tokio::time::sleep(delay) => {}
                _ = stopped(&mut stop_rx) => {
                    info!("[evolution-ws] Stopped during backoff");
                    return SocketExit::Stopped;
                }
            }
            self.inner.retry_count.fetch_add(1, Ordering::SeqCst);
        }
    }

    /// One connection: open, subscribe, pump frames until it ends.
    /// `Ok` means a clean close (by either side), `Err` a failure.
    async fn run_session(&self, stop_rx: &mut watch::Receiver<bool>) -> EvolutionResult<()> {
        let attempt = tokio::time::timeout(self.inner.connect_timeout, connect_async(self.inner.url.as_str())).await;
        let (ws_stream, _) = match attempt {
            Err(_) => {
                return Err(EvolutionError::socket(format!(
                    "connection timed out after {}ms",
                    self.inner.connect_timeout.as_millis()
                )))
            }
            Ok(Err(e)) => return Err(EvolutionError::socket(format!("connection failed: {}", e))),
            Ok(Ok(pair)) => pair,
        };
        let (mut ws_tx, mut ws_rx) = ws_stream.split();

        // disconnect() raced the handshake
        if self.stop_requested() {
            self.set_state(ConnectionState::Closing);
            let _ = ws_tx.send(WsMessage::Close(None)).await;
            return Ok(());
        }

        self.set_state(ConnectionState::Connected);
        self.inner.retry_count.store(0, Ordering::SeqCst);
        info!("[evolution-ws] Connected");

        let subscribe = json!({
            "event": SUBSCRIBE_EVENT,
            "data": { "instance": self.inner.instance },
        });
        ws_tx
            .send(WsMessage::Text(subscribe.to_string()))
            .await
            .map_err(|e| EvolutionError::socket(format!("subscribe failed: {}", e)))?;

        loop {
            let frame = tokio::select! {
                frame = ws_rx.next() => frame,
                _ = stopped(stop_rx) => {
                    self.set_state(ConnectionState::Closing);
                    let _ = ws_tx.send(WsMessage::Close(None)).await;
                    return Ok(());
                }
                _ = tokio::time::sleep(self.inner.keepalive) => {
                    let _ = ws_tx.send(WsMessage::Ping(vec![])).await;
                    continue;
                }
            };

            match frame {
                Some(Ok(WsMessage::Text(text))) => self.dispatch(&text),
                Some(Ok(WsMessage::Binary(bytes))) => match String::from_utf8(bytes) {
                    Ok(text) => self.dispatch(&text),
                    Err(_) => warn!("[evolution-ws] Dropping non-UTF-8 binary frame"),
                },
                Some(Ok(WsMessage::Ping(data))) => {
                    let _ = ws_tx.send(WsMessage::Pong(data)).await;
                }
                Some(Ok(WsMessage::Close(frame))) => {
                    info!("[evolution-ws] Closed by server: {:?}", frame);
                    return Ok(());
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(EvolutionError::socket(format!("read failed: {}", e))),
                None => return Ok(()),
            }
        }
    }

    fn dispatch(&self, text: &str) {
        match self.inner.handlers.dispatch(text) {
            Dispatch::Handled(event) => debug!("[evolution-ws] Dispatched '{}'", event),
            Dispatch::Ignored => {}
            Dispatch::Invalid(e) => warn!("[evolution-ws] Ignoring undecodable frame: {}", e),
        }
    }
}

/// Resolves once a stop is requested (or the sender is gone).
async fn stopped(stop_rx: &mut watch::Receiver<bool>) {
    let _ = stop_rx.wait_for(|stop| *stop).await;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_schemes_map_to_ws() {
        let url = socket_url("http://localhost:8080/", "k").unwrap();
        assert_eq!(url.as_str(), "ws://localhost:8080/?apikey=k");
        let url = socket_url("https://evo.example.com", "k").unwrap();
        assert_eq!(url.scheme(), "wss");
        assert_eq!(socket_url("wss://evo.example.com", "k").unwrap().scheme(), "wss");
    }

    #[test]
    fn api_key_is_url_encoded() {
        let url = socket_url("http://localhost:8080", "a b&c").unwrap();
        let key: Vec<_> = url.query_pairs().filter(|(k, _)| k == "apikey").map(|(_, v)| v.into_owned()).collect();
        assert_eq!(key, vec!["a b&c"]);
        assert!(!url.as_str().contains("a b&c"));
    }

    #[test]
    fn other_schemes_are_rejected() {
        assert!(matches!(socket_url("ftp://host", "k"), Err(EvolutionError::Config(_))));
        assert!(matches!(socket_url("not a url", "k"), Err(EvolutionError::Config(_))));
    }

    #[test]
    fn new_client_is_idle() {
        let client = SocketClient::new(SocketConfig::new("http://localhost:8080", "secret", "main")).unwrap();
        assert_eq!(client.state(), ConnectionState::Disconnected);
        assert_eq!(client.retry_count(), 0);
        assert_eq!(client.policy(), ReconnectPolicy::new(Duration::from_secs(1), 5));
        assert!(!format!("{:?}", client).contains("secret"));
    }

    #[test]
    fn handlers_register_without_connecting() {
        let client = SocketClient::new(SocketConfig::new("http://localhost:8080", "k", "main")).unwrap();
        client.on("message", |_| {}).on("connection.update", |_| {});
        assert_eq!(client.inner.handlers.len(), 2);
        assert_eq!(client.state(), ConnectionState::Disconnected);
    }

    #[test]
    fn settings_flow_from_client_config() {
        let mut config = EvolutionConfig::new("https://evo.example.com", "k");
        config.socket.max_retries = 2;
        config.socket.retry_delay_ms = 250;
        let socket = SocketConfig::from_config(&config, "sales");
        assert_eq!(socket.instance, "sales");
        assert_eq!(socket.max_retries, 2);
        assert_eq!(socket.retry_delay, Duration::from_millis(250));
    }

    #[test]
    fn zero_keepalive_or_connect_timeout_is_rejected() {
        let mut config = SocketConfig::new("http://localhost:8080", "k", "main");
        config.keepalive = Duration::ZERO;
        assert!(matches!(SocketClient::new(config), Err(EvolutionError::Config(_))));

        let mut config = SocketConfig::new("http://localhost:8080", "k", "main");
        config.connect_timeout = Duration::ZERO;
        assert!(matches!(SocketClient::new(config), Err(EvolutionError::Config(_))));

        let mut settings = EvolutionConfig::new("http://localhost:8080", "k");
        settings.socket.keepalive_secs = 0;
        assert!(SocketClient::new(SocketConfig::from_config(&settings, "main")).is_err());
    }
}
