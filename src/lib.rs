//! slackin library: background Slack refresher, snapshot cache and the
//! HTTP surface that reads it.

pub mod cache;
pub mod cli;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod updater;
pub mod upstream;

pub use cache::SnapshotCache;
pub use config::SlackinConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use updater::Updater;
pub use upstream::{HttpSlackClient, SlackApi};
