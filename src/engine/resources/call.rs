// Evolution Client: Calls

use crate::atoms::error::EvolutionResult;
use crate::atoms::types::{ApiResponse, Endpoint};
use crate::engine::client::EvolutionClient;
use crate::engine::payloads::{encode, CallOffer};
use crate::engine::recipient::person_jid;

pub struct Calls<'a> {
    client: &'a EvolutionClient,
}

impl<'a> Calls<'a> {
    pub(crate) fn new(client: &'a EvolutionClient) -> Self {
        Calls { client }
    }

    /// Ring `phone` without a real media session.
    pub async fn fake_call(&self, phone: &str, is_video: bool, duration_secs: Option<u32>) -> EvolutionResult<ApiResponse> {
        let mut offer = CallOffer::voice(person_jid(phone)?);
        offer.is_video = is_video;
        if let Some(secs) = duration_secs {
            offer.call_duration = secs;
        }
        let body = encode("call", &offer)?;
        self.client.call(Endpoint::post(self.client.path("call", "offer"), body)).await
    }
}
