//! Upstream Slack API subsystem.
//!
//! # Data Flow
//! ```text
//! Updater (every cycle)
//!     → client.rs fetch_team / fetch_members
//!     → types.rs (ok-flag check, wire → domain types)
//!     → Team / Vec<Member> or FetchError
//!
//! Invite handler (per request)
//!     → client.rs invite
//!     → InviteError mapped to a visitor-facing message
//! ```

pub mod client;
pub mod types;

pub use client::{HttpSlackClient, SlackApi};
pub use types::{FetchError, InviteError, Member, Presence, Team};
