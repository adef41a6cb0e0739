//! Background refresh subsystem.
//!
//! # Data Flow
//! ```text
//! Timer (interval sleep)
//!     → fetch team      → set team slot        (on failure: keep old value)
//!     → fetch members   → derive roster → set  (on failure: keep old value)
//!     → sleep, repeat until shutdown
//! ```
//!
//! # Design Decisions
//! - Exactly one updater per process; the cache does not guard against two
//! - Each fetch has its own deadline; a timeout is an ordinary fetch failure
//! - Panics inside a cycle are caught at the loop boundary
//! - The interval is the only retry mechanism

pub mod refresher;

pub use refresher::{CycleReport, PhaseOutcome, Updater};
