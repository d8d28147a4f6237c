// Evolution Client: Message Payloads
//
// One struct per message kind the remote service accepts. Optional fields are
// `Option<_>` with `skip_serializing_if`, so an unset field is absent from the
// JSON rather than `null`; the remote API treats the two differently.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::atoms::constants::{CHAT_SEND_DELAY_MS, CHAT_SEND_PRESENCE};
use crate::atoms::error::EvolutionResult;

// ── Shared pieces ──────────────────────────────────────────────────────

/// Identifies an existing message (reactions, quotes).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageKey {
    pub remote_jid: String,
    pub from_me: bool,
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub participant: Option<String>,
}

/// A message being replied to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quoted {
    pub key: MessageKey,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<Value>,
}

/// Optional fields shared by text and media sends.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delay: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quoted: Option<Quoted>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link_preview: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mentions_every_one: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mentioned: Option<Vec<String>>,
}

/// `delay` + `quoted`, used by poll/list/button sends.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SendOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delay: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quoted: Option<Quoted>,
}

/// Typing simulation block sent by the `chat/send/*` endpoints.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PresenceOptions {
    pub delay: u32,
    pub presence: String,
}

impl Default for PresenceOptions {
    fn default() -> Self {
        PresenceOptions { delay: CHAT_SEND_DELAY_MS, presence: CHAT_SEND_PRESENCE.into() }
    }
}

// ── Text & media ───────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextMessage {
    pub number: String,
    pub text: String,
    #[serde(flatten)]
    pub options: TextOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Image,
    Video,
    Audio,
    Document,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mimetype: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delay: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quoted: Option<Quoted>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mentions_every_one: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mentioned: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MediaMessage {
    pub number: String,
    pub mediatype: MediaType,
    /// URL or base64 payload.
    pub media: String,
    #[serde(flatten)]
    pub options: MediaOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageBody {
    pub image: String,
    pub caption: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageMessage {
    pub number: String,
    pub options: PresenceOptions,
    pub image_message: ImageBody,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentBody {
    pub document: String,
    pub file_name: String,
    pub caption: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentMessage {
    pub number: String,
    pub options: PresenceOptions,
    pub document_message: DocumentBody,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationBody {
    pub lat: f64,
    pub lng: f64,
    pub name: String,
    pub address: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationMessage {
    pub number: String,
    pub options: PresenceOptions,
    pub location_message: LocationBody,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AudioMessage {
    pub number: String,
    pub audio: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delay: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StickerMessage {
    pub number: String,
    pub sticker: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delay: Option<u32>,
}

// ── Contacts ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub full_name: String,
    pub wuid: String,
    pub phone_number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl Contact {
    pub fn new(full_name: impl Into<String>, phone_number: impl Into<String>) -> Self {
        let phone_number = phone_number.into();
        Contact {
            full_name: full_name.into(),
            wuid: phone_number.clone(),
            phone_number,
            organization: None,
            email: None,
            url: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContactMessage {
    pub number: String,
    pub contact: Vec<Contact>,
}

// ── Interactive ────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PollMessage {
    pub number: String,
    pub name: String,
    pub selectable_count: u32,
    pub values: Vec<String>,
    #[serde(flatten)]
    pub options: SendOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListRow {
    pub title: String,
    pub description: String,
    pub row_id: String,
}

impl ListRow {
    pub fn new(title: impl Into<String>, description: impl Into<String>, row_id: impl Into<String>) -> Self {
        ListRow { title: title.into(), description: description.into(), row_id: row_id.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListSection {
    pub title: String,
    pub rows: Vec<ListRow>,
}

/// The visible part of a list message.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListContent {
    pub title: String,
    pub description: String,
    pub button_text: String,
    pub footer_text: String,
    pub sections: Vec<ListSection>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListMessage {
    pub number: String,
    #[serde(flatten)]
    pub content: ListContent,
    #[serde(flatten)]
    pub options: SendOptions,
}

/// A reply/url/call button. Type-specific fields (`id`, `url`,
/// `phoneNumber`, ...) go in `extra` and are merged into the object.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Button {
    #[serde(rename = "type")]
    pub kind: String,
    pub display_text: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Button {
    pub fn reply(display_text: impl Into<String>, id: impl Into<String>) -> Self {
        let mut extra = Map::new();
        extra.insert("id".into(), Value::String(id.into()));
        Button { kind: "reply".into(), display_text: display_text.into(), extra }
    }

    pub fn url(display_text: impl Into<String>, url: impl Into<String>) -> Self {
        let mut extra = Map::new();
        extra.insert("url".into(), Value::String(url.into()));
        Button { kind: "url".into(), display_text: display_text.into(), extra }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ButtonMessage {
    pub number: String,
    pub title: String,
    pub description: String,
    pub footer: String,
    pub buttons: Vec<Button>,
    #[serde(flatten)]
    pub options: SendOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReactionMessage {
    pub key: MessageKey,
    pub reaction: String,
}

// ── Status & templates ─────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusType {
    Text,
    Image,
    Video,
    Audio,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font: Option<u8>,
    pub all_contacts: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_jid_list: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusMessage {
    #[serde(rename = "type")]
    pub kind: StatusType,
    pub content: String,
    #[serde(flatten)]
    pub options: StatusOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateMessage {
    pub number: String,
    pub name: String,
    pub language: String,
    pub components: Vec<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub webhook_url: Option<String>,
}

// ── The closed set ─────────────────────────────────────────────────────

/// Every message kind the client can send, tagged by the endpoint it goes to.
#[derive(Debug, Clone, PartialEq)]
pub enum OutgoingMessage {
    Text(TextMessage),
    Media(MediaMessage),
    Image(ImageMessage),
    Document(DocumentMessage),
    Location(LocationMessage),
    Contact(ContactMessage),
    Poll(PollMessage),
    List(ListMessage),
    Buttons(ButtonMessage),
    Reaction(ReactionMessage),
    Status(StatusMessage),
    Audio(AudioMessage),
    Sticker(StickerMessage),
    Template(TemplateMessage),
}

impl OutgoingMessage {
    /// Path segment between `/message/` and `/{instance}`.
    pub fn action(&self) -> &'static str {
        match self {
            OutgoingMessage::Text(_) => "sendText",
            OutgoingMessage::Media(_) => "sendMedia",
            OutgoingMessage::Image(_) => "chat/send/image",
            OutgoingMessage::Document(_) => "chat/send/document",
            OutgoingMessage::Location(_) => "chat/send/location",
            OutgoingMessage::Contact(_) => "sendContact",
            OutgoingMessage::Poll(_) => "sendPoll",
            OutgoingMessage::List(_) => "sendList",
            OutgoingMessage::Buttons(_) => "sendButtons",
            OutgoingMessage::Reaction(_) => "sendReaction",
            OutgoingMessage::Status(_) => "sendStatus",
            OutgoingMessage::Audio(_) => "sendWhatsAppAudio",
            OutgoingMessage::Sticker(_) => "sendSticker",
            OutgoingMessage::Template(_) => "sendTemplate",
        }
    }

    pub fn path(&self, instance: &str) -> String {
        format!("/message/{}/{}", self.action(), instance)
    }

    pub fn to_value(&self) -> EvolutionResult<Value> {
        let what = self.action();
        match self {
            OutgoingMessage::Text(m) => super::encode(what, m),
            OutgoingMessage::Media(m) => super::encode(what, m),
            OutgoingMessage::Image(m) => super::encode(what, m),
            OutgoingMessage::Document(m) => super::encode(what, m),
            OutgoingMessage::Location(m) => super::encode(what, m),
            OutgoingMessage::Contact(m) => super::encode(what, m),
            OutgoingMessage::Poll(m) => super::encode(what, m),
            OutgoingMessage::List(m) => super::encode(what, m),
            OutgoingMessage::Buttons(m) => super::encode(what, m),
            OutgoingMessage::Reaction(m) => super::encode(what, m),
            OutgoingMessage::Status(m) => super::encode(what, m),
            OutgoingMessage::Audio(m) => super::encode(what, m),
            OutgoingMessage::Sticker(m) => super::encode(what, m),
            OutgoingMessage::Template(m) => super::encode(what, m),
        }
    }
}
