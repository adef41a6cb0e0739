//! Lock-free snapshot cache shared by the updater and the request handlers.

use arc_swap::ArcSwapOption;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::cache::roster::Roster;
use crate::upstream::Team;

/// Names of the cached values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    Team,
    UsersTotal,
    UsersActive,
}

impl Slot {
    pub const ALL: [Slot; 3] = [Slot::Team, Slot::UsersTotal, Slot::UsersActive];

    pub fn name(&self) -> &'static str {
        match self {
            Slot::Team => "team",
            Slot::UsersTotal => "users_total",
            Slot::UsersActive => "users_active",
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A published value and the moment it was published.
#[derive(Debug)]
pub struct Stamped<T> {
    pub value: T,
    pub published_at: Instant,
}

impl<T> Stamped<T> {
    fn now(value: T) -> Self {
        Self {
            value,
            published_at: Instant::now(),
        }
    }

    /// Time since this value was fetched.
    pub fn age(&self) -> Duration {
        self.published_at.elapsed()
    }
}

/// Latest known team and roster.
///
/// Readers get an `Arc` to an immutable value and never wait on the writer.
/// A write replaces the whole value with one pointer swap, so a reader sees
/// either the previous value or the new one. There is no expiry: values stay
/// until the next successful refresh replaces them.
#[derive(Debug, Default)]
pub struct SnapshotCache {
    team: ArcSwapOption<Stamped<Team>>,
    roster: ArcSwapOption<Stamped<Roster>>,
}

impl SnapshotCache {
    /// Create a cache with every slot empty.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current team, `None` until the first successful `team.info`.
    pub fn team(&self) -> Option<Arc<Stamped<Team>>> {
        self.team.load_full()
    }

    /// Current `users_total`/`users_active` pair, `None` until the first
    /// successful `users.list`.
    pub fn roster(&self) -> Option<Arc<Stamped<Roster>>> {
        self.roster.load_full()
    }

    /// Replace the team slot.
    pub fn set_team(&self, team: Team) {
        self.team.store(Some(Arc::new(Stamped::now(team))));
    }

    /// Replace `users_total` and `users_active` together.
    pub fn set_roster(&self, roster: Roster) {
        self.roster.store(Some(Arc::new(Stamped::now(roster))));
    }

    /// Whether the slot has ever been filled.
    pub fn is_populated(&self, slot: Slot) -> bool {
        match slot {
            Slot::Team => self.team.load().is_some(),
            Slot::UsersTotal | Slot::UsersActive => self.roster.load().is_some(),
        }
    }

    /// Whether every slot has been filled at least once.
    pub fn is_ready(&self) -> bool {
        Slot::ALL.iter().all(|slot| self.is_populated(*slot))
    }

    /// Staleness of a slot, `None` if it is empty.
    pub fn age(&self, slot: Slot) -> Option<Duration> {
        match slot {
            Slot::Team => self.team.load_full().map(|s| s.age()),
            Slot::UsersTotal | Slot::UsersActive => self.roster.load_full().map(|s| s.age()),
        }
    }
}
