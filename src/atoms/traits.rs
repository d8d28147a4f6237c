// ── Evolution Atoms: Traits ────────────────────────────────────────────────
// The seam between resources (which build endpoints) and the transport
// (which performs them). Tests swap in a recording transport.

use async_trait::async_trait;

use super::error::EvolutionResult;
use super::types::{ApiResponse, Endpoint};

#[async_trait]
pub trait Transport: Send + Sync {
    /// Perform exactly one call for `endpoint` and normalise the outcome.
    async fn execute(&self, endpoint: Endpoint) -> EvolutionResult<ApiResponse>;
}
