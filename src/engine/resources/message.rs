// Evolution Client: Message sending
//
// Every send formats the recipient and checks required fields before any
// network call, then posts one `OutgoingMessage`.

use log::debug;
use serde_json::Value;

use crate::atoms::error::{EvolutionError, EvolutionResult};
use crate::atoms::types::{ApiResponse, Endpoint};
use crate::engine::client::EvolutionClient;
use crate::engine::payloads::*;
use crate::engine::recipient::Recipient;

pub struct Messages<'a> {
    client: &'a EvolutionClient,
}

fn required(field: &str, value: &str) -> EvolutionResult<()> {
    if value.trim().is_empty() {
        return Err(EvolutionError::validation(format!("{} is required", field)));
    }
    Ok(())
}

impl<'a> Messages<'a> {
    pub(crate) fn new(client: &'a EvolutionClient) -> Self {
        Messages { client }
    }

    /// Post any prepared message.
    pub async fn send(&self, message: OutgoingMessage) -> EvolutionResult<ApiResponse> {
        let path = message.path(self.client.instance());
        debug!("[evolution] {} via {}", message.action(), self.client.instance());
        let body = message.to_value()?;
        self.client.call(Endpoint::post(path, body)).await
    }

    pub async fn send_text(
        &self,
        to: impl Into<Recipient>,
        text: &str,
        options: TextOptions,
    ) -> EvolutionResult<ApiResponse> {
        let number = to.into().jid()?;
        required("message text", text)?;
        self.send(OutgoingMessage::Text(TextMessage { number, text: text.to_string(), options })).await
    }

    /// Generic media by URL or base64.
    pub async fn send_media(
        &self,
        to: impl Into<Recipient>,
        mediatype: MediaType,
        media: &str,
        options: MediaOptions,
    ) -> EvolutionResult<ApiResponse> {
        let number = to.into().jid()?;
        required("media", media)?;
        self.send(OutgoingMessage::Media(MediaMessage { number, mediatype, media: media.to_string(), options }))
            .await
    }

    pub async fn send_image(&self, to: impl Into<Recipient>, image: &str, caption: &str) -> EvolutionResult<ApiResponse> {
        let number = to.into().jid()?;
        required("image", image)?;
        self.send(OutgoingMessage::Image(ImageMessage {
            number,
            options: PresenceOptions::default(),
            image_message: ImageBody { image: image.to_string(), caption: caption.to_string() },
        }))
        .await
    }

    pub async fn send_document(
        &self,
        to: impl Into<Recipient>,
        document: &str,
        file_name: &str,
        caption: &str,
    ) -> EvolutionResult<ApiResponse> {
        let number = to.into().jid()?;
        required("document", document)?;
        required("file name", file_name)?;
        self.send(OutgoingMessage::Document(DocumentMessage {
            number,
            options: PresenceOptions::default(),
            document_message: DocumentBody {
                document: document.to_string(),
                file_name: file_name.to_string(),
                caption: caption.to_string(),
            },
        }))
        .await
    }

    pub async fn send_location(
        &self,
        to: impl Into<Recipient>,
        lat: f64,
        lng: f64,
        name: &str,
        address: &str,
    ) -> EvolutionResult<ApiResponse> {
        let number = to.into().jid()?;
        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng) {
            return Err(EvolutionError::validation(format!("invalid coordinates ({}, {})", lat, lng)));
        }
        self.send(OutgoingMessage::Location(LocationMessage {
            number,
            options: PresenceOptions::default(),
            location_message: LocationBody { lat, lng, name: name.to_string(), address: address.to_string() },
        }))
        .await
    }

    pub async fn send_contact(&self, to: impl Into<Recipient>, contacts: Vec<Contact>) -> EvolutionResult<ApiResponse> {
        let number = to.into().jid()?;
        if contacts.is_empty() {
            return Err(EvolutionError::validation("at least one contact is required"));
        }
        self.send(OutgoingMessage::Contact(ContactMessage { number, contact: contacts })).await
    }

    pub async fn send_poll(
        &self,
        to: impl Into<Recipient>,
        name: &str,
        selectable_count: u32,
        values: Vec<String>,
        options: SendOptions,
    ) -> EvolutionResult<ApiResponse> {
        let number = to.into().jid()?;
        required("poll name", name)?;
        if values.is_empty() {
            return Err(EvolutionError::validation("a poll needs at least one option"));
        }
        self.send(OutgoingMessage::Poll(PollMessage {
            number,
            name: name.to_string(),
            selectable_count,
            values,
            options,
        }))
        .await
    }

    pub async fn send_list(
        &self,
        to: impl Into<Recipient>,
        content: ListContent,
        options: SendOptions,
    ) -> EvolutionResult<ApiResponse> {
        let number = to.into().jid()?;
        required("list title", &content.title)?;
        if content.sections.is_empty() {
            return Err(EvolutionError::validation("a list needs at least one section"));
        }
        self.send(OutgoingMessage::List(ListMessage { number, content, options })).await
    }

    pub async fn send_buttons(
        &self,
        to: impl Into<Recipient>,
        title: &str,
        description: &str,
        footer: &str,
        buttons: Vec<Button>,
        options: SendOptions,
    ) -> EvolutionResult<ApiResponse> {
        let number = to.into().jid()?;
        if buttons.is_empty() {
            return Err(EvolutionError::validation("at least one button is required"));
        }
        self.send(OutgoingMessage::Buttons(ButtonMessage {
            number,
            title: title.to_string(),
            description: description.to_string(),
            footer: footer.to_string(),
            buttons,
            options,
        }))
        .await
    }

    /// An empty `reaction` removes a previous one.
    pub async fn send_reaction(&self, key: MessageKey, reaction: &str) -> EvolutionResult<ApiResponse> {
        required("message id", &key.id)?;
        self.send(OutgoingMessage::Reaction(ReactionMessage { key, reaction: reaction.to_string() })).await
    }

    pub async fn send_status(
        &self,
        kind: StatusType,
        content: &str,
        options: StatusOptions,
    ) -> EvolutionResult<ApiResponse> {
        required("status content", content)?;
        self.send(OutgoingMessage::Status(StatusMessage { kind, content: content.to_string(), options })).await
    }

    /// Voice note (push-to-talk).
    pub async fn send_audio(&self, to: impl Into<Recipient>, audio: &str, delay: Option<u32>) -> EvolutionResult<ApiResponse> {
        let number = to.into().jid()?;
        required("audio", audio)?;
        self.send(OutgoingMessage::Audio(AudioMessage { number, audio: audio.to_string(), delay })).await
    }

    pub async fn send_sticker(
        &self,
        to: impl Into<Recipient>,
        sticker: &str,
        delay: Option<u32>,
    ) -> EvolutionResult<ApiResponse> {
        let number = to.into().jid()?;
        required("sticker", sticker)?;
        self.send(OutgoingMessage::Sticker(StickerMessage { number, sticker: sticker.to_string(), delay })).await
    }

    pub async fn send_template(
        &self,
        to: impl Into<Recipient>,
        name: &str,
        language: &str,
        components: Vec<Value>,
        webhook_url: Option<String>,
    ) -> EvolutionResult<ApiResponse> {
        let number = to.into().jid()?;
        required("template name", name)?;
        required("template language", language)?;
        self.send(OutgoingMessage::Template(TemplateMessage {
            number,
            name: name.to_string(),
            language: language.to_string(),
            components,
            webhook_url,
        }))
        .await
    }
}
