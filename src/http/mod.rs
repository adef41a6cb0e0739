//! HTTP surface: pages, widget, badge and the invite endpoint.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware stack)
//!     → request.rs (request ID, per-request span)
//!     → handlers.rs (read SnapshotCache, render templates.rs / badge.rs)
//!     → invite.rs (POST /invite → SlackApi::invite)
//!     → response.rs (content types, warming-up 503)
//!     → Send to client
//! ```
//!
//! # Design Decisions
//! - Read handlers never call Slack; they only load cache slots
//! - Only the invite handler suspends on an outbound call

pub mod badge;
pub mod handlers;
pub mod invite;
pub mod request;
pub mod response;
pub mod server;
pub mod templates;

pub use request::X_REQUEST_ID;
pub use server::{AppState, HttpServer, SiteInfo};
