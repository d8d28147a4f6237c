// ── Evolution Atoms: Constants ─────────────────────────────────────────────
// All named constants for the crate live here.

// ── Recipient suffixes ────────────────────────────────────────────────────
// The remote service addresses chats by JID-like ids.
pub const PERSON_SUFFIX: &str = "@c.us";
pub const GROUP_SUFFIX: &str = "@g.us";

// ── HTTP ───────────────────────────────────────────────────────────────────
pub const API_KEY_HEADER: &str = "apikey";
pub const JSON_CONTENT_TYPE: &str = "application/json";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";
pub const DEFAULT_INSTANCE: &str = "default";

/// Bodies longer than this are truncated in log lines.
pub(crate) const LOG_BODY_LIMIT: usize = 500;

// ── Event socket ───────────────────────────────────────────────────────────
pub const DEFAULT_SOCKET_MAX_RETRIES: u32 = 5;
pub const DEFAULT_SOCKET_RETRY_DELAY_MS: u64 = 1_000;
pub const DEFAULT_SOCKET_CONNECT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_SOCKET_KEEPALIVE_SECS: u64 = 60;
pub const SUBSCRIBE_EVENT: &str = "subscribe";

// ── Message defaults ───────────────────────────────────────────────────────
// The chat/send/* endpoints take an explicit typing simulation block.
pub(crate) const CHAT_SEND_DELAY_MS: u32 = 1_200;
pub(crate) const CHAT_SEND_PRESENCE: &str = "composing";
pub(crate) const DEFAULT_CHAT_MESSAGE_COUNT: u32 = 20;
pub(crate) const DEFAULT_TYPING_DURATION_MS: u32 = 1_000;
pub(crate) const DEFAULT_CALL_DURATION_SECS: u32 = 45;

// ── Webhook events ─────────────────────────────────────────────────────────
pub const DEFAULT_WEBHOOK_EVENTS: [&str; 3] = ["message", "message.ack", "status.instance"];

// ── Privacy setting vocabularies ───────────────────────────────────────────
pub(crate) const PRIVACY_READRECEIPTS: &[&str] = &["all", "none"];
pub(crate) const PRIVACY_AUDIENCE: &[&str] = &["all", "contacts", "contact_blacklist", "none"];
pub(crate) const PRIVACY_ONLINE: &[&str] = &["all", "match_last_seen"];
pub(crate) const PRIVACY_GROUPADD: &[&str] = &["all", "contacts", "contact_blacklist"];
