//! Response builders shared by the handlers.
//!
//! # Design Decisions
//! - An empty cache slot is "warming up" (503 + Retry-After), never a 500
//! - Template failures are logged and surface as a bare 500
//! - Dynamic bodies are never cached by intermediaries

use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{Html, IntoResponse, Response};

pub const WARMING_UP: &str = "service warming up";

/// Seconds a client should wait before retrying a warming-up page.
const RETRY_AFTER_SECS: &str = "5";

/// 503 while the first refresh cycle has not completed.
pub fn warming_up() -> Response {
    (
        StatusCode::SERVICE_UNAVAILABLE,
        [(header::RETRY_AFTER, HeaderValue::from_static(RETRY_AFTER_SECS))],
        WARMING_UP,
    )
        .into_response()
}

/// Render result → HTML page or 500.
pub fn html(rendered: Result<String, tera::Error>) -> Response {
    match rendered {
        Ok(body) => Html(body).into_response(),
        Err(e) => render_failed(e),
    }
}

/// Render result → SVG image or 500.
pub fn svg(rendered: Result<String, tera::Error>) -> Response {
    match rendered {
        Ok(body) => (
            [
                (header::CONTENT_TYPE, HeaderValue::from_static("image/svg+xml")),
                (header::CACHE_CONTROL, HeaderValue::from_static("no-cache, max-age=0")),
            ],
            body,
        )
            .into_response(),
        Err(e) => render_failed(e),
    }
}

/// A static script.
pub fn javascript(body: &'static str) -> Response {
    (
        [(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/javascript; charset=utf-8"),
        )],
        body,
    )
        .into_response()
}

fn render_failed(e: tera::Error) -> Response {
    tracing::error!(error = %e, "Template rendering failed");
    (StatusCode::INTERNAL_SERVER_ERROR, "template error").into_response()
}
