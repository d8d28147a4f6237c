// Evolution Client: Inbound Events
// Decodes the payloads the service pushes over the socket or a webhook:
// qrcode.updated, connection.update, messages.upsert.

use serde::Serialize;
use serde_json::Value;

use crate::atoms::constants::GROUP_SUFFIX;

pub const QRCODE_UPDATED: &str = "qrcode.updated";
pub const CONNECTION_UPDATE: &str = "connection.update";
pub const MESSAGES_UPSERT: &str = "messages.upsert";

/// A text message received by the instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InboundMessage {
    pub id: Option<String>,
    /// Chat the message belongs to (person or group JID).
    pub remote_jid: String,
    /// Author id without the JID domain. In groups, the participant.
    pub sender: String,
    pub push_name: String,
    pub text: String,
    pub from_me: bool,
    pub is_group: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum InboundEvent {
    QrCode(String),
    Connection { state: String },
    Messages(Vec<InboundMessage>),
    Other { event: String, data: Value },
}

impl InboundEvent {
    /// From a full `{"event": .., "data": ..}` envelope (webhook body).
    pub fn from_envelope(payload: &Value) -> Option<Self> {
        let event = payload.get("event").and_then(Value::as_str)?;
        Some(Self::from_parts(event, &payload["data"]))
    }

    /// From an event name and its `data`, as a socket handler receives them.
    pub fn from_parts(event: &str, data: &Value) -> Self {
        match normalize_event_name(event).as_str() {
            QRCODE_UPDATED => match qr_from_data(data) {
                Some(qr) => InboundEvent::QrCode(qr),
                None => InboundEvent::Other { event: event.to_string(), data: data.clone() },
            },
            CONNECTION_UPDATE => InboundEvent::Connection {
                state: data.get("state").and_then(Value::as_str).unwrap_or("").to_string(),
            },
            MESSAGES_UPSERT => InboundEvent::Messages(parse_messages(data)),
            _ => InboundEvent::Other { event: event.to_string(), data: data.clone() },
        }
    }

    pub fn is_connected(&self) -> bool {
        matches!(self, InboundEvent::Connection { state } if state == "open" || state == "connected")
    }
}

/// `MESSAGES_UPSERT` → `messages.upsert`. Dotted names pass through.
pub fn normalize_event_name(event: &str) -> String {
    event.trim().to_ascii_lowercase().replace('_', ".")
}

fn qr_from_data(data: &Value) -> Option<String> {
    data.pointer("/qrcode/base64")
        .and_then(Value::as_str)
        .or_else(|| data.get("qrcode").and_then(Value::as_str))
        .filter(|qr| !qr.is_empty())
        .map(str::to_string)
}

/// Text messages in a `messages.upsert` payload. `data` may be one message
/// or an array; entries without text (media, reactions, receipts) are skipped.
pub fn parse_messages(data: &Value) -> Vec<InboundMessage> {
    let entries: Vec<&Value> = match data.as_array() {
        Some(arr) => arr.iter().collect(),
        None => vec![data],
    };
    entries.into_iter().filter_map(parse_message).collect()
}

fn parse_message(msg: &Value) -> Option<InboundMessage> {
    let key = msg.get("key")?;
    let text = msg
        .pointer("/message/conversation")
        .and_then(Value::as_str)
        .or_else(|| msg.pointer("/message/extendedTextMessage/text").and_then(Value::as_str))
        .filter(|t| !t.is_empty())?;

    let remote_jid = key.get("remoteJid").and_then(Value::as_str).unwrap_or("");
    let participant = key.get("participant").and_then(Value::as_str).unwrap_or(remote_jid);
    let sender = participant.split('@').next().unwrap_or(participant).to_string();
    let push_name = msg.get("pushName").and_then(Value::as_str).unwrap_or(&sender).to_string();

    Some(InboundMessage {
        id: key.get("id").and_then(Value::as_str).map(str::to_string),
        remote_jid: remote_jid.to_string(),
        push_name,
        sender,
        text: text.to_string(),
        from_me: key.get("fromMe").and_then(Value::as_bool).unwrap_or(false),
        is_group: remote_jid.ends_with(GROUP_SUFFIX),
    })
}
