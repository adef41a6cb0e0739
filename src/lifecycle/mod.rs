//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Build client → Empty cache → Spawn updater → Bind listener → Serve
//!
//! Shutdown (shutdown.rs):
//!     Trigger → Updater leaves its loop → Server drains connections → Exit
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Trigger graceful shutdown
//! ```
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal, nothing after startup is
//! - Traffic is accepted before the first refresh lands; pages answer
//!   "warming up" until then

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::Shutdown;
pub use signals::wait_for_shutdown_signal;
pub use startup::{run, start, start_with, Running, StartupError};
