//! # Ticketdesk Console
//!
//! The admin session layer: one logical thread of control per operator,
//! tying the read path (concurrent snapshot fetch → aggregation → filtered
//! rows) to the write path (draft → state machine plan → store write →
//! mandatory reload).
//!
//! ```text
//! refresh:  tickets ─┐
//!           orders  ─┼─ try_join ──> indices ──> enriched rows
//!           customers┘                 (never on a partial snapshot)
//!
//! submit:   draft ──> machine::plan ──> PATCH ──> refresh
//!                        │ reject            │ fail: snapshot untouched,
//!                        ▼                   ▼       error surfaced
//!                   reported inline     operator retries explicitly
//! ```

pub mod config;
pub mod session;

pub use config::Config;
pub use session::{Session, SessionError, Snapshot};
