// Evolution Client: Labels
// One handleLabel endpoint; add/remove differ only in `action`.

use crate::atoms::error::{EvolutionError, EvolutionResult};
use crate::atoms::types::{ApiResponse, Endpoint};
use crate::engine::client::EvolutionClient;
use crate::engine::payloads::{encode, HandleLabel, LabelAction};

pub struct Labels<'a> {
    client: &'a EvolutionClient,
}

impl<'a> Labels<'a> {
    pub(crate) fn new(client: &'a EvolutionClient) -> Self {
        Labels { client }
    }

    pub async fn find_labels(&self) -> EvolutionResult<ApiResponse> {
        self.client.call(Endpoint::get(self.client.path("label", "findLabels"))).await
    }

    /// `action` must be `"add"` or `"remove"`; anything else fails before
    /// a request is made.
    pub async fn handle_label(&self, number: &str, label_id: &str, action: &str) -> EvolutionResult<ApiResponse> {
        let action: LabelAction = action.parse()?;
        self.apply(number, label_id, action).await
    }

    pub async fn add_label(&self, number: &str, label_id: &str) -> EvolutionResult<ApiResponse> {
        self.apply(number, label_id, LabelAction::Add).await
    }

    pub async fn remove_label(&self, number: &str, label_id: &str) -> EvolutionResult<ApiResponse> {
        self.apply(number, label_id, LabelAction::Remove).await
    }

    pub async fn apply(&self, number: &str, label_id: &str, action: LabelAction) -> EvolutionResult<ApiResponse> {
        if number.trim().is_empty() {
            return Err(EvolutionError::validation("phone number is required"));
        }
        if label_id.trim().is_empty() {
            return Err(EvolutionError::validation("label id is required"));
        }
        let body = HandleLabel { number: number.trim().to_string(), label_id: label_id.trim().to_string(), action };
        self.client.call(Endpoint::post(self.client.path("label", "handleLabel"), encode("label", &body)?)).await
    }
}
