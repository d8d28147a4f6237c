// Evolution Engine: request client, resources and event socket
// Everything that performs I/O lives here; pure types live in atoms/.

pub mod client;
pub mod config;
pub mod events;
pub mod http;
pub mod payloads;
pub mod recipient;
pub mod resources;
pub mod socket;
