//! Invite submission.
//!
//! The only handler that talks to Slack. It suspends its own connection for
//! one outbound call and touches neither the cache nor the updater.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Value};

use crate::http::server::AppState;
use crate::observability::metrics;
use crate::upstream::InviteError;

pub const MISSING_EMAIL: &str = "missing email";
pub const INVALID_CHANNEL: &str = "invalid channel";

/// `POST /invite` with `{"email": "...", "channel": "..."}`.
pub async fn invite(State(state): State<AppState>, body: Bytes) -> Response {
    let payload: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);

    let Some(email) = payload
        .get("email")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|e| e.contains('@'))
    else {
        metrics::record_invite("bad_request");
        return (StatusCode::BAD_REQUEST, MISSING_EMAIL).into_response();
    };

    let channel = payload
        .get("channel")
        .and_then(Value::as_str)
        .filter(|c| !c.is_empty());
    if let Some(channel) = channel {
        if !state.site.channels.iter().any(|c| c == channel) {
            metrics::record_invite("bad_request");
            return (StatusCode::BAD_REQUEST, INVALID_CHANNEL).into_response();
        }
    }

    match state.slack.invite(email, channel).await {
        Ok(()) => {
            tracing::info!(channel = ?channel, "Invite sent");
            metrics::record_invite("success");
            (StatusCode::OK, "success").into_response()
        }
        Err(InviteError::Rejected(msg)) => {
            tracing::info!(reason = %msg, "Invite rejected by Slack");
            metrics::record_invite("rejected");
            (StatusCode::BAD_REQUEST, Json(json!({ "msg": msg }))).into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "Invite request to Slack failed");
            metrics::record_invite("error");
            (
                StatusCode::BAD_GATEWAY,
                Json(json!({ "msg": "Server error, please try again later." })),
            )
                .into_response()
        }
    }
}
