// ── Evolution Atoms: Pure Data Types ──────────────────────────────────────────
// Plain struct/enum definitions with no I/O.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Decoded response body. Usually an object; list endpoints return arrays.
pub type ApiResponse = Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One outbound call: method, instance-scoped path, query and body.
///
/// The transport sends whatever query and body are set. Resources attach
/// queries only to GET/DELETE and bodies only to POST/PUT.
#[derive(Debug, Clone, PartialEq)]
pub struct Endpoint {
    pub method: HttpMethod,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl Endpoint {
    pub fn get(path: impl Into<String>) -> Self {
        Self { method: HttpMethod::Get, path: path.into(), query: vec![], body: None }
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self { method: HttpMethod::Delete, path: path.into(), query: vec![], body: None }
    }

    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self { method: HttpMethod::Post, path: path.into(), query: vec![], body: Some(body) }
    }

    /// POST without a body (connect, restart).
    pub fn post_empty(path: impl Into<String>) -> Self {
        Self { method: HttpMethod::Post, path: path.into(), query: vec![], body: None }
    }

    pub fn put(path: impl Into<String>, body: Value) -> Self {
        Self { method: HttpMethod::Put, path: path.into(), query: vec![], body: Some(body) }
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }
}

/// Socket connection lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
    Closing,
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ConnectionState::Disconnected => "disconnected",
            ConnectionState::Connecting => "connecting",
            ConnectionState::Connected => "connected",
            ConnectionState::Closing => "closing",
        };
        f.write_str(s)
    }
}

/// Why `SocketClient::connect` returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SocketExit {
    /// `disconnect()` was requested.
    Stopped,
    /// The retry ceiling was reached without a successful connection.
    RetriesExhausted,
    /// Another `connect()` is already driving this client.
    AlreadyRunning,
}
