//! Shared read cache.
//!
//! # Data Flow
//! ```text
//! Updater (single writer)
//!     → roster.rs (filter members into users_total / users_active)
//!     → snapshot.rs (atomic swap per slot)
//!
//! Request handlers (many readers)
//!     → snapshot.rs load (lock-free, never touches the network)
//! ```
//!
//! # Design Decisions
//! - No TTL: freshness is owned by the updater's schedule
//! - `users_total` and `users_active` are swapped as one value
//! - Empty slots mean "warming up", never an error

pub mod roster;
pub mod snapshot;

pub use roster::Roster;
pub use snapshot::{Slot, SnapshotCache, Stamped};
