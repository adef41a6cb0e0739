//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (tracing, request ID, timeouts, body limit, metrics)
//! - Bind server to listener
//! - Stop accepting on shutdown and drain in-flight requests

use axum::{
    extract::{MatchedPath, Request},
    http::{header, HeaderValue},
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    set_header::SetResponseHeaderLayer,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::cache::SnapshotCache;
use crate::config::SlackinConfig;
use crate::http::request::{make_request_span, RequestUuid, X_REQUEST_ID};
use crate::http::templates::Templates;
use crate::http::{handlers, invite};
use crate::observability::metrics;
use crate::upstream::SlackApi;

/// Largest accepted request body (invite JSON is tiny).
pub const MAX_BODY_BYTES: usize = 16 * 1024;

/// Static site settings the handlers need.
#[derive(Debug, Clone, Default)]
pub struct SiteInfo {
    /// Configured workspace subdomain.
    pub subdomain: String,
    /// Channels visitors may pick on invite.
    pub channels: Vec<String>,
}

impl SiteInfo {
    /// The team's own domain, or the configured one if Slack sent none.
    pub fn domain_for<'a>(&'a self, team_domain: &'a str) -> &'a str {
        if team_domain.is_empty() {
            &self.subdomain
        } else {
            team_domain
        }
    }
}

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub cache: Arc<SnapshotCache>,
    pub slack: Arc<dyn SlackApi>,
    pub templates: Arc<Templates>,
    pub site: Arc<SiteInfo>,
}

/// HTTP server for slackin.
pub struct HttpServer {
    router: Router,
    config: SlackinConfig,
}

impl HttpServer {
    /// Create a new HTTP server reading from `cache` and inviting through `slack`.
    pub fn new(
        config: SlackinConfig,
        cache: Arc<SnapshotCache>,
        slack: Arc<dyn SlackApi>,
    ) -> Result<Self, tera::Error> {
        let state = AppState {
            cache,
            slack,
            templates: Arc::new(Templates::new()?),
            site: Arc::new(SiteInfo {
                subdomain: config.slack.subdomain.clone(),
                channels: config.slack.channels.clone(),
            }),
        };

        let router = Self::build_router(state, Duration::from_secs(config.timeouts.request_secs));
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    pub fn build_router(state: AppState, request_timeout: Duration) -> Router {
        Router::new()
            .route("/", get(handlers::index))
            .route("/iframe", get(handlers::iframe))
            .route("/iframe/dialog", get(handlers::dialog))
            .route("/badge.svg", get(handlers::badge))
            .route("/slackin.js", get(handlers::badge_script))
            .route("/static/client.js", get(handlers::client_script))
            .route("/static/iframe.js", get(handlers::iframe_script))
            .route("/data", get(handlers::data))
            .route("/health", get(handlers::health))
            .route("/invite", post(invite::invite))
            .route_layer(middleware::from_fn(track_metrics))
            .with_state(state)
            .layer(SetResponseHeaderLayer::if_not_present(
                header::X_CONTENT_TYPE_OPTIONS,
                HeaderValue::from_static("nosniff"),
            ))
            .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
            .layer(TimeoutLayer::new(request_timeout))
            .layer(PropagateRequestIdLayer::new(X_REQUEST_ID))
            .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
            .layer(SetRequestIdLayer::new(X_REQUEST_ID, RequestUuid))
    }

    /// Run the server until the shutdown signal fires, then drain.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("HTTP server draining connections");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// A clone of the router, for driving the app without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &SlackinConfig {
        &self.config
    }
}

/// Count and time every routed request.
async fn track_metrics(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_owned())
        .unwrap_or_else(|| "unmatched".to_owned());
    let method = request.method().clone();

    let response = next.run(request).await;

    metrics::record_request(method.as_str(), &route, response.status().as_u16(), start);
    response
}
