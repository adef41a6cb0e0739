//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! updater, http, lifecycle
//!     → logging.rs (tracing subscriber, RUST_LOG or configured level)
//!     → metrics.rs (refresh, fetch, roster, request and invite series)
//!
//! Consumers:
//!     → stdout
//!     → Prometheus scrape on observability.metrics_address, when enabled
//! ```
//!
//! Request spans carry the `x-request-id` set in `http::request`.

pub mod logging;
pub mod metrics;
