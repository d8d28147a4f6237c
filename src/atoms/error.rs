// ── Evolution Atoms: Error Types ───────────────────────────────────────────
// Single canonical error enum for the client, built with `thiserror`.
//
// Design rules:
//   • Variants separate "rejected before sending" (Validation, Config) from
//     "the remote call failed" (Transport, Api, Decode) and from "the remote
//     call succeeded but reported an error" (Application).
//   • Every variant that came off the wire keeps the numeric code it arrived
//     with; `code()` exposes it uniformly.
//   • No variant carries the API key in its message.

use serde_json::Value;
use thiserror::Error;

// ── Primary error enum ─────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum EvolutionError {
    /// Network unreachable, timeout, TLS failure.
    #[error("Transport error: {message}")]
    Transport {
        message: String,
        /// The transport's own status code when it has one, otherwise 0.
        code: u16,
        #[source]
        source: Option<reqwest::Error>,
    },

    /// The remote service answered with a non-2xx status.
    #[error("API error ({status}): {message}")]
    Api {
        message: String,
        status: u16,
        body: Option<Value>,
    },

    /// The remote service answered 2xx but the payload reports an error.
    #[error("Application error ({status}): {message}")]
    Application {
        message: String,
        status: u16,
        payload: Value,
    },

    /// Response body was not the JSON it should have been.
    #[error("Decode error ({status}): {message}")]
    Decode {
        message: String,
        status: u16,
        #[source]
        source: Option<serde_json::Error>,
    },

    /// Caller input rejected before any network call was made.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Client configuration is invalid or could not be loaded.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Event socket failure. Handled by the reconnect loop, never returned
    /// from the public socket API.
    #[error("Socket error: {0}")]
    Socket(String),
}

// ── Convenience constructors ───────────────────────────────────────────────

impl EvolutionError {
    /// Wrap a reqwest failure that happened before a response was read.
    pub fn transport(err: reqwest::Error) -> Self {
        let code = err.status().map(|s| s.as_u16()).unwrap_or(0);
        let message = if err.is_timeout() {
            format!("request timed out: {}", err)
        } else if err.is_connect() {
            format!("connection failed: {}", err)
        } else {
            err.to_string()
        };
        Self::Transport { message, code, source: Some(err) }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    pub fn socket(message: impl Into<String>) -> Self {
        Self::Socket(message.into())
    }

    /// Numeric code: HTTP status for remote failures, transport code, or 0.
    pub fn code(&self) -> u16 {
        match self {
            Self::Transport { code, .. } => *code,
            Self::Api { status, .. }
            | Self::Application { status, .. }
            | Self::Decode { status, .. } => *status,
            Self::Validation(_) | Self::Config(_) | Self::Socket(_) => 0,
        }
    }

    /// Human-readable message without the variant prefix.
    pub fn message(&self) -> &str {
        match self {
            Self::Transport { message, .. }
            | Self::Api { message, .. }
            | Self::Application { message, .. }
            | Self::Decode { message, .. } => message,
            Self::Validation(m) | Self::Config(m) | Self::Socket(m) => m,
        }
    }

    /// True when the error was raised before anything was sent.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// True when a request reached (or tried to reach) the remote service.
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            Self::Transport { .. } | Self::Api { .. } | Self::Application { .. } | Self::Decode { .. }
        )
    }
}

impl From<url::ParseError> for EvolutionError {
    fn from(e: url::ParseError) -> Self {
        EvolutionError::Config(format!("invalid URL: {}", e))
    }
}

impl From<toml::de::Error> for EvolutionError {
    fn from(e: toml::de::Error) -> Self {
        EvolutionError::Config(format!("invalid TOML: {}", e))
    }
}

// ── Convenience alias ──────────────────────────────────────────────────────

/// All client operations return this type.
pub type EvolutionResult<T> = Result<T, EvolutionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_follow_variant() {
        let api = EvolutionError::Api { message: "Not Found".into(), status: 404, body: None };
        assert_eq!(api.code(), 404);
        assert!(api.is_remote());
        assert!(!api.is_validation());

        let v = EvolutionError::validation("phone number is required");
        assert_eq!(v.code(), 0);
        assert!(v.is_validation());
        assert!(!v.is_remote());
        assert_eq!(v.message(), "phone number is required");
    }

    #[test]
    fn display_includes_status() {
        let e = EvolutionError::Application {
            message: "instance not found".into(),
            status: 200,
            payload: serde_json::json!({"status": "error"}),
        };
        assert_eq!(e.to_string(), "Application error (200): instance not found");
    }
}
