// Evolution Client: Chats
// Numbers are always formatted as person ids.

use serde_json::json;

use crate::atoms::constants::{DEFAULT_CHAT_MESSAGE_COUNT, DEFAULT_TYPING_DURATION_MS};
use crate::atoms::error::EvolutionResult;
use crate::atoms::types::{ApiResponse, Endpoint};
use crate::engine::client::EvolutionClient;
use crate::engine::recipient::person_jid;

pub struct Chats<'a> {
    client: &'a EvolutionClient,
}

impl<'a> Chats<'a> {
    pub(crate) fn new(client: &'a EvolutionClient) -> Self {
        Chats { client }
    }

    pub async fn fetch_all(&self) -> EvolutionResult<ApiResponse> {
        self.client.call(Endpoint::get(self.client.path("chat", "fetch"))).await
    }

    pub async fn find(&self, phone: &str) -> EvolutionResult<ApiResponse> {
        let number = person_jid(phone)?;
        self.client.call(Endpoint::get(self.client.path("chat", "find")).with_query("number", number)).await
    }

    /// Latest `count` messages (default 20 when `None`).
    pub async fn messages(&self, phone: &str, count: Option<u32>) -> EvolutionResult<ApiResponse> {
        let number = person_jid(phone)?;
        let endpoint = Endpoint::get(self.client.path("chat", "messages"))
            .with_query("number", number)
            .with_query("count", count.unwrap_or(DEFAULT_CHAT_MESSAGE_COUNT));
        self.client.call(endpoint).await
    }

    pub async fn clear(&self, phone: &str) -> EvolutionResult<ApiResponse> {
        let number = person_jid(phone)?;
        self.client.call(Endpoint::post(self.client.path("chat", "clear"), json!({ "number": number }))).await
    }

    pub async fn archive(&self, phone: &str) -> EvolutionResult<ApiResponse> {
        self.set_archived(phone, true).await
    }

    pub async fn unarchive(&self, phone: &str) -> EvolutionResult<ApiResponse> {
        self.set_archived(phone, false).await
    }

    async fn set_archived(&self, phone: &str, archive: bool) -> EvolutionResult<ApiResponse> {
        let number = person_jid(phone)?;
        let body = json!({ "number": number, "archive": archive });
        self.client.call(Endpoint::post(self.client.path("chat", "archive"), body)).await
    }

    pub async fn delete(&self, phone: &str) -> EvolutionResult<ApiResponse> {
        let number = person_jid(phone)?;
        self.client.call(Endpoint::delete(self.client.path("chat", "delete")).with_query("number", number)).await
    }

    pub async fn mark_as_read(&self, phone: &str) -> EvolutionResult<ApiResponse> {
        let number = person_jid(phone)?;
        self.client.call(Endpoint::post(self.client.path("chat", "read"), json!({ "number": number }))).await
    }

    /// Show "typing…" for `duration_ms` (default 1000).
    pub async fn start_typing(&self, phone: &str, duration_ms: Option<u32>) -> EvolutionResult<ApiResponse> {
        let number = person_jid(phone)?;
        let body = json!({
            "number": number,
            "presence": "composing",
            "duration": duration_ms.unwrap_or(DEFAULT_TYPING_DURATION_MS),
        });
        self.client.call(Endpoint::post(self.client.path("chat", "presence"), body)).await
    }

    pub async fn stop_typing(&self, phone: &str) -> EvolutionResult<ApiResponse> {
        let number = person_jid(phone)?;
        let body = json!({ "number": number, "presence": "paused" });
        self.client.call(Endpoint::post(self.client.path("chat", "presence"), body)).await
    }
}
