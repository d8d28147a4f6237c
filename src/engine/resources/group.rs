// Evolution Client: Groups
// Group ids are sent as given; participants as bare digits.

use serde_json::json;

use crate::atoms::error::{EvolutionError, EvolutionResult};
use crate::atoms::types::{ApiResponse, Endpoint};
use crate::engine::client::EvolutionClient;
use crate::engine::recipient::{participant, participants};

pub struct Groups<'a> {
    client: &'a EvolutionClient,
}

fn group_id(id: &str) -> EvolutionResult<&str> {
    let id = id.trim();
    if id.is_empty() {
        return Err(EvolutionError::validation("group id is required"));
    }
    Ok(id)
}

impl<'a> Groups<'a> {
    pub(crate) fn new(client: &'a EvolutionClient) -> Self {
        Groups { client }
    }

    pub async fn fetch_all(&self) -> EvolutionResult<ApiResponse> {
        self.client.call(Endpoint::get(self.client.path("group", "fetch"))).await
    }

    pub async fn find(&self, id: &str) -> EvolutionResult<ApiResponse> {
        let id = group_id(id)?;
        self.client.call(Endpoint::get(self.client.path("group", "find")).with_query("groupId", id)).await
    }

    pub async fn create<S: AsRef<str>>(&self, name: &str, members: &[S]) -> EvolutionResult<ApiResponse> {
        if name.trim().is_empty() {
            return Err(EvolutionError::validation("group name is required"));
        }
        let body = json!({ "name": name, "participants": participants(members)? });
        self.client.call(Endpoint::post(self.client.path("group", "create"), body)).await
    }

    pub async fn update_subject(&self, id: &str, subject: &str) -> EvolutionResult<ApiResponse> {
        let body = json!({ "groupId": group_id(id)?, "subject": subject });
        self.client.call(Endpoint::put(self.client.path("group", "update-subject"), body)).await
    }

    pub async fn update_description(&self, id: &str, description: &str) -> EvolutionResult<ApiResponse> {
        let body = json!({ "groupId": group_id(id)?, "description": description });
        self.client.call(Endpoint::put(self.client.path("group", "update-description"), body)).await
    }

    pub async fn add_participants<S: AsRef<str>>(&self, id: &str, members: &[S]) -> EvolutionResult<ApiResponse> {
        self.participants_action("add-participants", id, participants(members)?).await
    }

    pub async fn remove_participants<S: AsRef<str>>(&self, id: &str, members: &[S]) -> EvolutionResult<ApiResponse> {
        self.participants_action("remove-participants", id, participants(members)?).await
    }

    pub async fn promote(&self, id: &str, member: &str) -> EvolutionResult<ApiResponse> {
        self.participants_action("promote-participants", id, vec![participant(member)?]).await
    }

    pub async fn demote(&self, id: &str, member: &str) -> EvolutionResult<ApiResponse> {
        self.participants_action("demote-participants", id, vec![participant(member)?]).await
    }

    async fn participants_action(&self, action: &str, id: &str, members: Vec<String>) -> EvolutionResult<ApiResponse> {
        let body = json!({ "groupId": group_id(id)?, "participants": members });
        self.client.call(Endpoint::post(self.client.path("group", action), body)).await
    }

    pub async fn leave(&self, id: &str) -> EvolutionResult<ApiResponse> {
        let body = json!({ "groupId": group_id(id)? });
        self.client.call(Endpoint::post(self.client.path("group", "leave"), body)).await
    }

    pub async fn invite_code(&self, id: &str) -> EvolutionResult<ApiResponse> {
        let id = group_id(id)?;
        self.client.call(Endpoint::get(self.client.path("group", "invite-code")).with_query("groupId", id)).await
    }

    pub async fn join(&self, invite_code: &str) -> EvolutionResult<ApiResponse> {
        if invite_code.trim().is_empty() {
            return Err(EvolutionError::validation("invite code is required"));
        }
        let body = json!({ "inviteCode": invite_code.trim() });
        self.client.call(Endpoint::post(self.client.path("group", "join"), body)).await
    }
}
