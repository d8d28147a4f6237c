// Evolution Client: Resources
// One borrowed view per remote resource; obtain them from `EvolutionClient`.

mod call;
mod chat;
mod config;
mod group;
pub mod instance;
mod label;
mod message;
mod profile;

pub use call::Calls;
pub use chat::Chats;
pub use config::{Proxies, Settings, Templates, WebSockets};
pub use group::Groups;
pub use instance::{extract_qr, is_open, Instances};
pub use label::Labels;
pub use message::Messages;
pub use profile::Profiles;
