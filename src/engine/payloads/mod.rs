// Evolution Client: Payloads
// Serde shapes for every request body the remote service accepts.

pub mod message;
pub mod settings;

pub use message::*;
pub use settings::*;

use serde::Serialize;
use serde_json::Value;

use crate::atoms::error::{EvolutionError, EvolutionResult};

/// Serialize a request body, naming `what` in the error.
pub(crate) fn encode<T: Serialize>(what: &str, payload: &T) -> EvolutionResult<Value> {
    serde_json::to_value(payload).map_err(|e| EvolutionError::validation(format!("cannot encode {} payload: {}", what, e)))
}
