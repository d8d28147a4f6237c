// ── Evolution Atoms Layer ──────────────────────────────────────────────────
// Pure constants, types, traits and error types. No I/O.
// Nothing here may import from engine/.

pub mod constants;
pub mod error;
pub mod traits;
pub mod types;
