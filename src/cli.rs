//! Command-line interface.
//!
//! ```text
//! slackin [-p <port>] [-i <ms>] [-c <channels>] [--config <file>] <subdomain> <api-token>
//! ```
//!
//! Flags override values from the config file; anything left unset keeps
//! the file value (or its default).

use clap::Parser;
use secrecy::SecretString;
use std::path::PathBuf;

use crate::config::SlackinConfig;

#[derive(Debug, Parser)]
#[command(name = "slackin", version, about = "Public Slack invite page and badge")]
pub struct Cli {
    /// Slack workspace subdomain (the `foo` in foo.slack.com)
    pub subdomain: Option<String>,

    /// Slack API token with admin scope
    pub token: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Refresh interval in milliseconds
    #[arg(short, long)]
    pub interval: Option<u64>,

    /// Comma-separated channels invitees may join
    #[arg(short, long, value_delimiter = ',')]
    pub channels: Option<Vec<String>>,

    /// Path to a TOML config file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log level when RUST_LOG is unset
    #[arg(long)]
    pub log_level: Option<String>,
}

impl Cli {
    /// Overlay the flags that were given onto `config`.
    pub fn apply(self, mut config: SlackinConfig) -> SlackinConfig {
        if let Some(subdomain) = self.subdomain {
            config.slack.subdomain = subdomain;
        }
        if let Some(token) = self.token {
            config.slack.token = SecretString::from(token);
        }
        if let Some(port) = self.port {
            config.listener.port = port;
        }
        if let Some(interval) = self.interval {
            config.refresh.interval_ms = interval;
        }
        if let Some(channels) = self.channels {
            config.slack.channels = channels.into_iter().map(|c| c.trim().to_string()).collect();
        }
        if let Some(level) = self.log_level {
            config.observability.log_level = level;
        }
        config
    }
}
