// ── Evolution Engine: HTTP Transport ───────────────────────────────────────
//
// The request client. One `execute()` = one network call:
//   • Fixed headers (JSON content negotiation + `apikey`) and timeout
//   • 2xx → decoded JSON, subject to the empty-body policy and the
//     error-indicator check
//   • non-2xx → `Api` error with the remote message when one is present
//   • transport failure → `Transport` error wrapping the reqwest cause
//
// No retries, no caching.

use async_trait::async_trait;
use log::{debug, error, warn};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Method};
use serde_json::{Map, Value};

use super::config::{EmptyBodyPolicy, EvolutionConfig};
use crate::atoms::constants::{API_KEY_HEADER, JSON_CONTENT_TYPE, LOG_BODY_LIMIT};
use crate::atoms::error::{EvolutionError, EvolutionResult};
use crate::atoms::traits::Transport;
use crate::atoms::types::{ApiResponse, Endpoint, HttpMethod};

// ── Transport ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: String,
    empty_body: EmptyBodyPolicy,
}

impl HttpTransport {
    pub fn new(config: &EvolutionConfig) -> EvolutionResult<Self> {
        if config.timeout_secs == 0 {
            return Err(EvolutionError::config("timeout_secs must be greater than zero"));
        }
        let base_url = config.base_url.trim().trim_end_matches('/').to_string();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(EvolutionError::config(format!(
                "base URL must start with http:// or https://, got '{}'",
                base_url
            )));
        }

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE));
        headers.insert(ACCEPT, HeaderValue::from_static(JSON_CONTENT_TYPE));
        let mut key = HeaderValue::from_str(&config.api_key)
            .map_err(|_| EvolutionError::config("API key contains characters not allowed in a header"))?;
        key.set_sensitive(true);
        headers.insert(API_KEY_HEADER, key);

        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout())
            .build()
            .map_err(|e| EvolutionError::config(format!("cannot build HTTP client: {}", e)))?;

        Ok(Self { client, base_url, empty_body: config.empty_body })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url_for(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(&self, endpoint: Endpoint) -> EvolutionResult<ApiResponse> {
        let url = self.url_for(&endpoint.path);
        let method = to_reqwest(endpoint.method);
        debug!("[evolution] {} {}", endpoint.method, endpoint.path);

        let mut request = self.client.request(method, &url);
        if !endpoint.query.is_empty() {
            request = request.query(&endpoint.query);
        }
        if let Some(body) = &endpoint.body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| {
            error!("[evolution] {} {} failed: {}", endpoint.method, endpoint.path, e);
            EvolutionError::transport(e)
        })?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_else(|e| {
                warn!("[evolution] {} {}: error body unreadable: {}", endpoint.method, endpoint.path, e);
                String::new()
            });
            error!(
                "[evolution] {} {} returned {}: {}",
                endpoint.method,
                endpoint.path,
                status.as_u16(),
                truncate_for_log(&text, LOG_BODY_LIMIT)
            );
            return Err(api_error(&endpoint, status.as_u16(), &text));
        }

        let text = response.text().await.map_err(EvolutionError::transport)?;
        decode_success(status.as_u16(), &text, self.empty_body)
    }
}

fn to_reqwest(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Delete => Method::DELETE,
    }
}

// ── Response normalisation ─────────────────────────────────────────────────

/// Decode a 2xx body, applying the empty-body policy and raising an
/// `Application` error when the payload itself reports a failure.
pub(crate) fn decode_success(status: u16, text: &str, policy: EmptyBodyPolicy) -> EvolutionResult<ApiResponse> {
    if text.trim().is_empty() {
        return match policy {
            EmptyBodyPolicy::EmptyObject => Ok(Value::Object(Map::new())),
            EmptyBodyPolicy::Reject => Err(EvolutionError::Decode {
                message: "response body is empty".into(),
                status,
                source: None,
            }),
        };
    }

    let body: Value = serde_json::from_str(text).map_err(|e| EvolutionError::Decode {
        message: format!("response body is not valid JSON: {}", e),
        status,
        source: Some(e),
    })?;

    if let Some(message) = error_indicator(&body) {
        return Err(EvolutionError::Application { message, status, payload: body });
    }
    Ok(body)
}

/// The remote message for a 2xx payload that signals failure, if it does.
fn error_indicator(body: &Value) -> Option<String> {
    let obj = body.as_object()?;
    let has_error = match obj.get("error") {
        None | Some(Value::Null) | Some(Value::Bool(false)) => false,
        Some(_) => true,
    };
    let status_error = obj.get("status").and_then(Value::as_str) == Some("error");
    if !has_error && !status_error {
        return None;
    }
    Some(remote_message(body).unwrap_or_else(|| "remote service reported an error".to_string()))
}

/// Pull a human-readable message out of an error body.
fn remote_message(body: &Value) -> Option<String> {
    if let Some(s) = body.get("error").and_then(Value::as_str).filter(|s| !s.is_empty()) {
        return Some(s.to_string());
    }
    if let Some(s) = body.get("message").and_then(Value::as_str).filter(|s| !s.is_empty()) {
        return Some(s.to_string());
    }
    match body.pointer("/response/message") {
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        Some(Value::Array(items)) => {
            let parts: Vec<String> = items
                .iter()
                .map(|v| match v {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect();
            (!parts.is_empty()).then(|| parts.join("; "))
        }
        _ => None,
    }
}

pub(crate) fn api_error(endpoint: &Endpoint, status: u16, text: &str) -> EvolutionError {
    let body: Option<Value> = serde_json::from_str(text).ok();
    let message = body
        .as_ref()
        .and_then(remote_message)
        .unwrap_or_else(|| format!("{} {} returned {}", endpoint.method, endpoint.path, status));
    EvolutionError::Api { message, status, body }
}

/// Cut `text` to at most `limit` bytes on a char boundary.
pub(crate) fn truncate_for_log(text: &str, limit: usize) -> &str {
    if text.len() <= limit {
        return text;
    }
    let mut end = limit;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}

// ── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn success_body_round_trips() {
        let text = r#"{"key":{"id":"ABC","remoteJid":"5511999999999@c.us","fromMe":true},"status":"PENDING"}"#;
        let decoded = decode_success(201, text, EmptyBodyPolicy::EmptyObject).unwrap();
        assert_eq!(decoded, serde_json::from_str::<Value>(text).unwrap());
    }

    #[test]
    fn arrays_pass_through() {
        let decoded = decode_success(200, r#"[{"id":"1"},{"id":"2"}]"#, EmptyBodyPolicy::EmptyObject).unwrap();
        assert_eq!(decoded, json!([{"id": "1"}, {"id": "2"}]));
    }

    #[test]
    fn empty_body_follows_policy() {
        assert_eq!(decode_success(200, "  ", EmptyBodyPolicy::EmptyObject).unwrap(), json!({}));
        let err = decode_success(204, "", EmptyBodyPolicy::Reject).unwrap_err();
        assert!(matches!(err, EvolutionError::Decode { status: 204, .. }));
    }

    #[test]
    fn invalid_json_is_decode_error() {
        let err = decode_success(200, "<html>oops</html>", EmptyBodyPolicy::EmptyObject).unwrap_err();
        assert!(matches!(err, EvolutionError::Decode { status: 200, source: Some(_), .. }));
    }

    #[test]
    fn error_payload_on_success_status_is_application_error() {
        let err = decode_success(200, r#"{"status":"error","message":"instance offline"}"#, EmptyBodyPolicy::EmptyObject)
            .unwrap_err();
        match err {
            EvolutionError::Application { message, status, payload } => {
                assert_eq!(message, "instance offline");
                assert_eq!(status, 200);
                assert_eq!(payload["status"], "error");
            }
            other => panic!("expected application error, got {:?}", other),
        }

        let err = decode_success(200, r#"{"error":"Unauthorized"}"#, EmptyBodyPolicy::EmptyObject).unwrap_err();
        assert_eq!(err.message(), "Unauthorized");
    }

    #[test]
    fn false_or_null_error_field_is_not_an_error() {
        assert!(decode_success(200, r#"{"error":false,"ok":1}"#, EmptyBodyPolicy::EmptyObject).is_ok());
        assert!(decode_success(200, r#"{"error":null}"#, EmptyBodyPolicy::EmptyObject).is_ok());
    }

    #[test]
    fn api_error_prefers_remote_message() {
        let ep = Endpoint::get("/instance/status/main");
        let err = api_error(&ep, 404, r#"{"status":404,"error":"Not Found"}"#);
        assert_eq!(err.message(), "Not Found");
        assert_eq!(err.code(), 404);

        let err = api_error(&ep, 400, r#"{"status":400,"response":{"message":["a","b"]}}"#);
        assert_eq!(err.message(), "a; b");
    }

    #[test]
    fn api_error_falls_back_to_generic_message() {
        let ep = Endpoint::delete("/chat/delete/main");
        let err = api_error(&ep, 502, "Bad Gateway");
        assert_eq!(err.message(), "DELETE /chat/delete/main returned 502");
        assert!(matches!(err, EvolutionError::Api { body: None, .. }));
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        assert_eq!(truncate_for_log("abc", 10), "abc");
        assert_eq!(truncate_for_log("São Paulo", 2), "S");
    }

    #[test]
    fn rejects_non_http_base_url() {
        let config = EvolutionConfig::new("ftp://example.com", "k");
        assert!(matches!(HttpTransport::new(&config), Err(EvolutionError::Config(_))));
    }

    #[test]
    fn rejects_zero_timeout() {
        let mut config = EvolutionConfig::new("http://localhost:8080", "k");
        config.timeout_secs = 0;
        assert!(matches!(HttpTransport::new(&config), Err(EvolutionError::Config(_))));
    }

    #[test]
    fn joins_paths_without_double_slashes() {
        let config = EvolutionConfig::new("http://localhost:8080/", "k");
        let transport = HttpTransport::new(&config).unwrap();
        assert_eq!(transport.base_url(), "http://localhost:8080");
        assert_eq!(transport.url_for("/message/sendText/main"), "http://localhost:8080/message/sendText/main");
    }
}
