//! Startup orchestration.
//!
//! # Responsibilities
//! - Build the Slack client, the empty cache and the templates
//! - Spawn the updater on its own task
//! - Bind the listener and begin accepting traffic
//! - Wire SIGINT/SIGTERM to the shared [`Shutdown`]
//!
//! # Design Decisions
//! - Fail fast: bind, template and client errors abort startup
//! - Subsystems initialize in order, not concurrently
//! - The listener is up before the first refresh completes

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::task::{JoinError, JoinHandle};

use crate::cache::SnapshotCache;
use crate::config::SlackinConfig;
use crate::http::HttpServer;
use crate::lifecycle::{signals, Shutdown};
use crate::observability::metrics;
use crate::updater::Updater;
use crate::upstream::{HttpSlackClient, SlackApi};

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("Failed to build Slack client: {0}")]
    Client(#[from] reqwest::Error),

    #[error("Failed to compile templates: {0}")]
    Templates(#[from] tera::Error),

    #[error("Invalid metrics address '{0}'")]
    MetricsAddress(String),

    #[error("Failed to start metrics exporter: {0}")]
    Metrics(#[from] metrics_exporter_prometheus::BuildError),

    #[error("Failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: io::Error,
    },

    #[error("Server error: {0}")]
    Serve(#[from] io::Error),

    #[error("Background task failed: {0}")]
    Task(#[from] JoinError),
}

/// A started instance: updater and server running on their own tasks.
pub struct Running {
    cache: Arc<SnapshotCache>,
    shutdown: Arc<Shutdown>,
    local_addr: SocketAddr,
    updater: JoinHandle<()>,
    server: JoinHandle<io::Result<()>>,
}

impl Running {
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn cache(&self) -> &Arc<SnapshotCache> {
        &self.cache
    }

    pub fn shutdown(&self) -> Arc<Shutdown> {
        Arc::clone(&self.shutdown)
    }

    /// Wait for both tasks to finish.
    ///
    /// If the server stops on its own, the updater is told to stop too.
    pub async fn wait(self) -> Result<(), StartupError> {
        let served = self.server.await;
        if !self.shutdown.is_triggered() {
            tracing::warn!("HTTP server exited before shutdown was requested");
            self.shutdown.trigger();
        }
        self.updater.await?;
        served??;
        Ok(())
    }
}

/// Start serving on an already-bound listener with the HTTP Slack client.
pub fn start(config: SlackinConfig, listener: TcpListener) -> Result<Running, StartupError> {
    let slack: Arc<dyn SlackApi> = Arc::new(HttpSlackClient::new(&config.slack)?);
    start_with(config, listener, slack)
}

/// Start serving with any [`SlackApi`] implementation.
pub fn start_with(
    config: SlackinConfig,
    listener: TcpListener,
    slack: Arc<dyn SlackApi>,
) -> Result<Running, StartupError> {
    let local_addr = listener.local_addr()?;
    let cache = Arc::new(SnapshotCache::new());
    let shutdown = Arc::new(Shutdown::new());

    let server = HttpServer::new(config.clone(), Arc::clone(&cache), Arc::clone(&slack))?;

    let updater = Updater::from_config(slack, Arc::clone(&cache), &config.refresh);
    let updater = tokio::spawn(updater.run(shutdown.subscribe()));
    let server = tokio::spawn(server.run(listener, shutdown.subscribe()));

    Ok(Running {
        cache,
        shutdown,
        local_addr,
        updater,
        server,
    })
}

/// Run slackin until SIGINT or SIGTERM.
pub async fn run(config: SlackinConfig) -> Result<(), StartupError> {
    if config.observability.metrics_enabled {
        let addr = config
            .observability
            .metrics_address
            .parse()
            .map_err(|_| StartupError::MetricsAddress(config.observability.metrics_address.clone()))?;
        metrics::init_metrics(addr)?;
    }

    let address = config.listener.bind_address();
    let listener = TcpListener::bind(&address)
        .await
        .map_err(|source| StartupError::Bind {
            address: address.clone(),
            source,
        })?;

    let running = start(config, listener)?;
    tracing::info!(address = %running.local_addr(), "slackin ready");

    let shutdown = running.shutdown();
    tokio::spawn(async move {
        if let Err(e) = signals::wait_for_shutdown_signal().await {
            tracing::error!(error = %e, "Failed to install signal handlers");
        }
        shutdown.trigger();
    });

    running.wait().await?;
    tracing::info!("Shutdown complete");
    Ok(())
}
