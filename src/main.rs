//! slackin: a public invite page, embeddable widget and SVG badge for a
//! Slack workspace.
//!
//! # Architecture Overview
//!
//! ```text
//!                  ┌──────────────────────────────────────────────────────┐
//!                  │                        SLACKIN                         │
//!                  │                                                        │
//!  Slack Web API   │  ┌──────────┐   set_team /   ┌───────────────┐        │
//!  ◀───────────────┼──│ updater  │───set_roster──▶│ SnapshotCache │        │
//!  team.info,      │  │  (loop)  │                │  (arc-swap)   │        │
//!  users.list      │  └──────────┘                └───────┬───────┘        │
//!                  │                                      │ load           │
//!                  │                                      ▼                │
//!  Browser         │  ┌──────────┐                ┌───────────────┐        │
//!  ────────────────┼─▶│   http   │───────────────▶│   handlers    │        │
//!                  │  │  server  │                │ pages, badge  │        │
//!                  │  └──────────┘                └───────────────┘        │
//!                  │        │ POST /invite                                 │
//!  ◀───────────────┼────────┘ users.admin.invite                           │
//!                  └──────────────────────────────────────────────────────┘
//! ```

use clap::Parser;

use slackin::cli::Cli;
use slackin::config::{finalize, load_config};
use slackin::lifecycle::startup;
use slackin::observability::logging::init_logging;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = load_config(cli.config.as_deref())?;
    let config = finalize(cli.apply(config))?;

    init_logging(&config.observability.log_level);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        subdomain = %config.slack.subdomain,
        bind_address = %config.listener.bind_address(),
        interval_ms = config.refresh.interval_ms,
        channels = ?config.slack.channels,
        "Configuration loaded"
    );

    startup::run(config).await?;
    Ok(())
}
