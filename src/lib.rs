// Evolution API client
//
// A typed request client for the Evolution WhatsApp gateway plus a
// reconnecting event socket.
//
//   atoms/   constants, error, traits, plain types (no I/O)
//   engine/  HTTP transport, resources, payloads, socket, inbound events

pub mod atoms;
pub mod engine;

pub use atoms::error::{EvolutionError, EvolutionResult};
pub use atoms::traits::Transport;
pub use atoms::types::{ApiResponse, ConnectionState, Endpoint, HttpMethod, SocketExit};
pub use engine::client::EvolutionClient;
pub use engine::config::{EmptyBodyPolicy, EvolutionConfig, SocketSettings};
pub use engine::events::{InboundEvent, InboundMessage};
pub use engine::http::HttpTransport;
pub use engine::recipient::Recipient;
pub use engine::socket::{ReconnectPolicy, SocketClient, SocketConfig};
