//! Read-only page, widget and badge handlers.
//!
//! Every handler reads the snapshot cache and nothing else; none of them
//! reaches the Slack API.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tera::Context;

use crate::cache::Slot;
use crate::http::badge::{badge_value, BadgeLayout, BadgeStyle, DEFAULT_LABEL};
use crate::http::response::{self, warming_up};
use crate::http::server::AppState;
use crate::http::templates::{BADGE_JS, CLIENT_JS, IFRAME_JS};

/// Landing page with counts and the invite form.
pub async fn index(State(state): State<AppState>) -> Response {
    let (Some(team), Some(roster)) = (state.cache.team(), state.cache.roster()) else {
        return warming_up();
    };
    let team = &team.value;
    let subdomain = state.site.domain_for(&team.domain);

    let mut ctx = Context::new();
    ctx.insert("team_name", if team.name.is_empty() { subdomain } else { team.name.as_str() });
    ctx.insert("subdomain", subdomain);
    ctx.insert("logo", &team.icon_url);
    ctx.insert("users_active", &roster.value.active_count());
    ctx.insert("users_total", &roster.value.total_count());
    ctx.insert("channels", &state.site.channels);

    response::html(state.templates.render("index.html", &ctx))
}

/// Embeddable button showing `active/total`. `?large` selects the big variant.
pub async fn iframe(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let Some(roster) = state.cache.roster() else {
        return warming_up();
    };

    let mut ctx = Context::new();
    ctx.insert(
        "large",
        if params.contains_key("large") { "slack-btn-large" } else { "" },
    );
    ctx.insert("users_active", &roster.value.active_count());
    ctx.insert("users_total", &roster.value.total_count());

    response::html(state.templates.render("iframe.html", &ctx))
}

/// Invite dialog opened from the widget.
pub async fn dialog(State(state): State<AppState>) -> Response {
    let (Some(team), Some(roster)) = (state.cache.team(), state.cache.roster()) else {
        return warming_up();
    };

    let mut ctx = Context::new();
    ctx.insert("subdomain", state.site.domain_for(&team.value.domain));
    ctx.insert("users_active", &roster.value.active_count());
    ctx.insert("users_total", &roster.value.total_count());

    response::html(state.templates.render("dialog.html", &ctx))
}

#[derive(Debug, Deserialize)]
pub struct BadgeParams {
    label: Option<String>,
    style: Option<String>,
}

/// SVG status badge. Renders `-` until the first member fetch lands.
pub async fn badge(State(state): State<AppState>, Query(params): Query<BadgeParams>) -> Response {
    let roster = state.cache.roster();
    let value = badge_value(roster.as_deref().map(|s| &s.value));
    let label = params
        .label
        .as_deref()
        .filter(|l| !l.is_empty())
        .unwrap_or(DEFAULT_LABEL);
    let style = BadgeStyle::from_query(params.style.as_deref());

    let layout = BadgeLayout::new(label, &value);
    let rendered = Context::from_serialize(&layout)
        .and_then(|ctx| state.templates.render(style.template(), &ctx));
    response::svg(rendered)
}

pub async fn badge_script() -> Response {
    response::javascript(BADGE_JS)
}

pub async fn client_script() -> Response {
    response::javascript(CLIENT_JS)
}

pub async fn iframe_script() -> Response {
    response::javascript(IFRAME_JS)
}

#[derive(Debug, Serialize)]
pub struct Counts {
    pub active: usize,
    pub total: usize,
}

/// Current counts as JSON, polled by the landing page.
pub async fn data(State(state): State<AppState>) -> Response {
    match state.cache.roster() {
        Some(roster) => Json(Counts {
            active: roster.value.active_count(),
            total: roster.value.total_count(),
        })
        .into_response(),
        None => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(serde_json::json!({ "msg": response::WARMING_UP })),
        )
            .into_response(),
    }
}

#[derive(Debug, Serialize)]
pub struct Health {
    pub status: &'static str,
    pub version: &'static str,
    /// Seconds since each slot was last refreshed; `null` if never.
    pub slots: HashMap<&'static str, Option<u64>>,
}

/// Readiness probe: 200 once every slot is populated, 503 before.
pub async fn health(State(state): State<AppState>) -> Response {
    let slots = Slot::ALL
        .iter()
        .map(|slot| (slot.name(), state.cache.age(*slot).map(|a| a.as_secs())))
        .collect();

    let ready = state.cache.is_ready();
    let body = Health {
        status: if ready { "ready" } else { "warming_up" },
        version: env!("CARGO_PKG_VERSION"),
        slots,
    };
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(body)).into_response()
}
