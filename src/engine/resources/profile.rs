// Evolution Client: Profile & privacy
// The service files these under /chat.

use serde_json::json;

use crate::atoms::error::{EvolutionError, EvolutionResult};
use crate::atoms::types::{ApiResponse, Endpoint};
use crate::engine::client::EvolutionClient;
use crate::engine::payloads::{encode, PrivacySettings};

pub struct Profiles<'a> {
    client: &'a EvolutionClient,
}

fn non_empty<'s>(field: &str, value: &'s str) -> EvolutionResult<&'s str> {
    let value = value.trim();
    if value.is_empty() {
        return Err(EvolutionError::validation(format!("{} is required", field)));
    }
    Ok(value)
}

impl<'a> Profiles<'a> {
    pub(crate) fn new(client: &'a EvolutionClient) -> Self {
        Profiles { client }
    }

    pub async fn fetch_business_profile(&self, number: &str) -> EvolutionResult<ApiResponse> {
        let body = json!({ "number": non_empty("phone number", number)? });
        self.client.call(Endpoint::post(self.client.path("chat", "fetchBusinessProfile"), body)).await
    }

    pub async fn fetch_profile(&self, number: &str) -> EvolutionResult<ApiResponse> {
        let body = json!({ "number": non_empty("phone number", number)? });
        self.client.call(Endpoint::post(self.client.path("chat", "fetchProfile"), body)).await
    }

    pub async fn update_name(&self, name: &str) -> EvolutionResult<ApiResponse> {
        let body = json!({ "name": non_empty("profile name", name)? });
        self.client.call(Endpoint::post(self.client.path("chat", "updateProfileName"), body)).await
    }

    /// The "about" text.
    pub async fn update_status(&self, status: &str) -> EvolutionResult<ApiResponse> {
        let body = json!({ "status": status });
        self.client.call(Endpoint::post(self.client.path("chat", "updateProfileStatus"), body)).await
    }

    /// `picture` is a URL or base64 image.
    pub async fn update_picture(&self, picture: &str) -> EvolutionResult<ApiResponse> {
        let body = json!({ "picture": non_empty("picture", picture)? });
        self.client.call(Endpoint::post(self.client.path("chat", "updateProfilePicture"), body)).await
    }

    pub async fn remove_picture(&self) -> EvolutionResult<ApiResponse> {
        self.client.call(Endpoint::delete(self.client.path("chat", "removeProfilePicture"))).await
    }

    pub async fn fetch_privacy_settings(&self) -> EvolutionResult<ApiResponse> {
        self.client.call(Endpoint::get(self.client.path("chat", "fetchPrivacySettings"))).await
    }

    pub async fn update_privacy_settings(&self, privacy: &PrivacySettings) -> EvolutionResult<ApiResponse> {
        privacy.validate()?;
        let body = encode("privacy", privacy)?;
        self.client.call(Endpoint::post(self.client.path("chat", "updatePrivacySettings"), body)).await
    }
}
