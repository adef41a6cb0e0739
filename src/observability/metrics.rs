//! Metrics collection and exposition.
//!
//! # Metrics
//! - `slackin_refresh_cycles_total` (counter): completed refresh cycles
//! - `slackin_refresh_panics_total` (counter): cycles aborted by a panic
//! - `slackin_fetch_total` (counter): fetches by phase and outcome
//! - `slackin_users_total` / `slackin_users_active` (gauge): latest roster
//! - `slackin_http_requests_total` (counter): requests by route, status
//! - `slackin_http_request_duration_seconds` (histogram): latency distribution
//! - `slackin_invites_total` (counter): invite submissions by outcome
//!
//! Without an installed recorder every call is a no-op.

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};
use std::net::SocketAddr;
use std::time::Instant;

/// Start the Prometheus exporter on `addr`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

/// Record one completed refresh cycle.
pub fn record_cycle() {
    metrics::counter!("slackin_refresh_cycles_total").increment(1);
}

/// Record a cycle that panicked.
pub fn record_cycle_panic() {
    metrics::counter!("slackin_refresh_panics_total").increment(1);
}

/// Record one fetch (`phase` is "team" or "members").
pub fn record_fetch(phase: &'static str, success: bool) {
    let outcome = if success { "success" } else { "failure" };
    metrics::counter!("slackin_fetch_total", "phase" => phase, "outcome" => outcome).increment(1);
}

/// Publish the latest roster sizes.
pub fn record_roster(total: usize, active: usize) {
    metrics::gauge!("slackin_users_total").set(total as f64);
    metrics::gauge!("slackin_users_active").set(active as f64);
}

/// Record a served HTTP request.
pub fn record_request(method: &str, route: &str, status: u16, start: Instant) {
    let labels = [
        ("method", method.to_string()),
        ("route", route.to_string()),
        ("status", status.to_string()),
    ];
    metrics::counter!("slackin_http_requests_total", &labels).increment(1);
    metrics::histogram!("slackin_http_request_duration_seconds", &labels)
        .record(start.elapsed().as_secs_f64());
}

/// Record an invite submission.
pub fn record_invite(outcome: &'static str) {
    metrics::counter!("slackin_invites_total", "outcome" => outcome).increment(1);
}
