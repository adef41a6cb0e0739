//! Periodic refresh of the snapshot cache.
//!
//! # Responsibilities
//! - Fetch team and members on a fixed schedule
//! - Derive the member views and publish them atomically
//! - Keep the previous value of a slot when its fetch fails
//! - Survive anything a cycle throws at it until shutdown

use futures_util::FutureExt;
use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::time;

use crate::cache::{Roster, SnapshotCache};
use crate::config::RefreshConfig;
use crate::observability::metrics;
use crate::upstream::{FetchError, SlackApi};

/// Result of one phase of a cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhaseOutcome {
    /// Slot(s) replaced.
    Updated,
    /// Fetch failed; slot(s) untouched. Holds the error text.
    Kept(String),
}

impl PhaseOutcome {
    pub fn is_updated(&self) -> bool {
        matches!(self, PhaseOutcome::Updated)
    }
}

/// What happened in one cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleReport {
    pub team: PhaseOutcome,
    pub members: PhaseOutcome,
}

/// The single writer of the [`SnapshotCache`].
pub struct Updater {
    api: Arc<dyn SlackApi>,
    cache: Arc<SnapshotCache>,
    interval: Duration,
    fetch_timeout: Duration,
}

impl Updater {
    pub fn new(
        api: Arc<dyn SlackApi>,
        cache: Arc<SnapshotCache>,
        interval: Duration,
        fetch_timeout: Duration,
    ) -> Self {
        Self {
            api,
            cache,
            interval,
            fetch_timeout,
        }
    }

    /// Build from the `[refresh]` configuration section.
    pub fn from_config(
        api: Arc<dyn SlackApi>,
        cache: Arc<SnapshotCache>,
        config: &RefreshConfig,
    ) -> Self {
        Self::new(api, cache, config.interval(), config.fetch_timeout())
    }

    /// Run cycles until the shutdown signal fires.
    ///
    /// The first cycle starts immediately. A closed shutdown channel counts
    /// as a shutdown signal.
    pub async fn run(self, mut shutdown: broadcast::Receiver<()>) {
        tracing::info!(
            interval_ms = self.interval.as_millis() as u64,
            fetch_timeout_secs = self.fetch_timeout.as_secs(),
            "Updater starting"
        );

        loop {
            match AssertUnwindSafe(self.run_cycle()).catch_unwind().await {
                Ok(report) => {
                    tracing::debug!(
                        team = ?report.team,
                        members = ?report.members,
                        "Refresh cycle finished"
                    );
                }
                Err(panic) => {
                    metrics::record_cycle_panic();
                    tracing::error!(
                        panic = %panic_message(panic.as_ref()),
                        "Refresh cycle panicked; keeping cached data and continuing"
                    );
                }
            }

            tokio::select! {
                _ = time::sleep(self.interval) => {}
                _ = shutdown.recv() => {
                    tracing::info!("Updater received shutdown signal, exiting loop");
                    break;
                }
            }
        }
    }

    /// One fetch-and-publish pass. Both phases always run, even if the
    /// other one failed or panicked.
    pub async fn run_cycle(&self) -> CycleReport {
        let team = guarded("team", self.refresh_team()).await;
        let members = guarded("members", self.refresh_members()).await;
        metrics::record_cycle();
        CycleReport { team, members }
    }

    async fn refresh_team(&self) -> PhaseOutcome {
        match self.bounded(self.api.fetch_team()).await {
            Ok(team) => {
                tracing::debug!(domain = %team.domain, "Team data updated");
                self.cache.set_team(team);
                metrics::record_fetch("team", true);
                PhaseOutcome::Updated
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to refresh team data; serving previous value");
                metrics::record_fetch("team", false);
                PhaseOutcome::Kept(e.to_string())
            }
        }
    }

    async fn refresh_members(&self) -> PhaseOutcome {
        match self.bounded(self.api.fetch_members()).await {
            Ok(members) => {
                let fetched = members.len();
                let roster = Roster::from_members(members);
                tracing::debug!(
                    fetched = fetched,
                    total = roster.total_count(),
                    active = roster.active_count(),
                    "User data updated"
                );
                metrics::record_roster(roster.total_count(), roster.active_count());
                self.cache.set_roster(roster);
                metrics::record_fetch("members", true);
                PhaseOutcome::Updated
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to refresh user data; serving previous value");
                metrics::record_fetch("members", false);
                PhaseOutcome::Kept(e.to_string())
            }
        }
    }

    async fn bounded<T, F>(&self, fut: F) -> Result<T, FetchError>
    where
        F: Future<Output = Result<T, FetchError>>,
    {
        match time::timeout(self.fetch_timeout, fut).await {
            Ok(result) => result,
            Err(_) => Err(FetchError::Timeout(self.fetch_timeout)),
        }
    }
}

/// Run one phase, turning a panic into a kept slot.
async fn guarded<F>(phase: &'static str, fut: F) -> PhaseOutcome
where
    F: Future<Output = PhaseOutcome>,
{
    match AssertUnwindSafe(fut).catch_unwind().await {
        Ok(outcome) => outcome,
        Err(panic) => {
            let msg = panic_message(panic.as_ref());
            metrics::record_cycle_panic();
            metrics::record_fetch(phase, false);
            tracing::error!(phase = phase, panic = %msg, "Refresh phase panicked; serving previous value");
            PhaseOutcome::Kept(format!("panicked: {}", msg))
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::upstream::{InviteError, Member, Presence, Team};
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// What the fake returns for one call.
    enum Step<T> {
        Ok(T),
        Fail,
        Hang,
        Panic,
    }

    struct ScriptedSlack {
        teams: Mutex<VecDeque<Step<Team>>>,
        members: Mutex<VecDeque<Step<Vec<Member>>>>,
        team_calls: AtomicUsize,
        member_calls: AtomicUsize,
    }

    impl ScriptedSlack {
        fn new(teams: Vec<Step<Team>>, members: Vec<Step<Vec<Member>>>) -> Self {
            Self {
                teams: Mutex::new(teams.into()),
                members: Mutex::new(members.into()),
                team_calls: AtomicUsize::new(0),
                member_calls: AtomicUsize::new(0),
            }
        }
    }

    async fn play<T>(step: Option<Step<T>>) -> Result<T, FetchError> {
        match step {
            Some(Step::Ok(v)) => Ok(v),
            Some(Step::Fail) | None => Err(FetchError::Api("scripted_failure".to_string())),
            Some(Step::Hang) => std::future::pending().await,
            Some(Step::Panic) => panic!("scripted panic"),
        }
    }

    #[async_trait]
    impl SlackApi for ScriptedSlack {
        async fn fetch_team(&self) -> Result<Team, FetchError> {
            self.team_calls.fetch_add(1, Ordering::SeqCst);
            let step = self.teams.lock().unwrap().pop_front();
            play(step).await
        }

        async fn fetch_members(&self) -> Result<Vec<Member>, FetchError> {
            self.member_calls.fetch_add(1, Ordering::SeqCst);
            let step = self.members.lock().unwrap().pop_front();
            play(step).await
        }

        async fn invite(&self, _email: &str, _channels: Option<&str>) -> Result<(), InviteError> {
            Ok(())
        }
    }

    fn team(domain: &str) -> Team {
        Team {
            domain: domain.to_string(),
            name: String::new(),
            icon_url: String::new(),
        }
    }

    fn member(id: &str, is_bot: bool, presence: Presence) -> Member {
        Member {
            id: id.to_string(),
            is_bot,
            deleted: false,
            presence,
        }
    }

    fn sample_members() -> Vec<Member> {
        vec![
            member("U1", false, Presence::Active),
            member("U2", false, Presence::Away),
            member("B1", true, Presence::Active),
        ]
    }

    fn updater(api: Arc<ScriptedSlack>, cache: Arc<SnapshotCache>) -> Updater {
        Updater::new(api, cache, Duration::from_secs(60), Duration::from_secs(5))
    }

    #[tokio::test]
    async fn test_cycle_populates_every_slot() {
        let api = Arc::new(ScriptedSlack::new(
            vec![Step::Ok(team("rust"))],
            vec![Step::Ok(sample_members())],
        ));
        let cache = Arc::new(SnapshotCache::new());

        let report = updater(api, cache.clone()).run_cycle().await;

        assert!(report.team.is_updated());
        assert!(report.members.is_updated());
        assert!(cache.is_ready());
        let roster = cache.roster().unwrap();
        assert_eq!(roster.value.total_count(), 2);
        assert_eq!(roster.value.active_count(), 1);
    }

    #[tokio::test]
    async fn test_failed_team_fetch_keeps_previous_team() {
        let api = Arc::new(ScriptedSlack::new(
            vec![Step::Ok(team("before")), Step::Fail],
            vec![Step::Ok(sample_members()), Step::Ok(Vec::new())],
        ));
        let cache = Arc::new(SnapshotCache::new());
        let updater = updater(api, cache.clone());

        updater.run_cycle().await;
        let before = cache.team().unwrap();

        let report = updater.run_cycle().await;

        assert!(matches!(report.team, PhaseOutcome::Kept(_)));
        // The members phase still ran and published.
        assert!(report.members.is_updated());
        assert_eq!(cache.roster().unwrap().value.total_count(), 0);
        let after = cache.team().unwrap();
        assert!(Arc::ptr_eq(&before, &after));
    }

    #[tokio::test]
    async fn test_failed_member_fetch_keeps_both_views() {
        let api = Arc::new(ScriptedSlack::new(
            vec![Step::Ok(team("rust")), Step::Ok(team("rust2"))],
            vec![Step::Ok(sample_members()), Step::Fail],
        ));
        let cache = Arc::new(SnapshotCache::new());
        let updater = updater(api, cache.clone());

        updater.run_cycle().await;
        let before = cache.roster().unwrap();
        let report = updater.run_cycle().await;

        assert!(report.team.is_updated());
        assert_eq!(cache.team().unwrap().value.domain, "rust2");
        assert!(matches!(report.members, PhaseOutcome::Kept(_)));
        assert!(Arc::ptr_eq(&before, &cache.roster().unwrap()));
    }

    #[tokio::test]
    async fn test_first_cycle_failure_leaves_slots_empty() {
        let api = Arc::new(ScriptedSlack::new(vec![Step::Fail], vec![Step::Fail]));
        let cache = Arc::new(SnapshotCache::new());

        let report = updater(api, cache.clone()).run_cycle().await;

        assert!(!report.team.is_updated());
        assert!(!report.members.is_updated());
        assert!(cache.team().is_none());
        assert!(cache.roster().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_hanging_fetch_times_out() {
        let api = Arc::new(ScriptedSlack::new(
            vec![Step::Hang],
            vec![Step::Ok(sample_members())],
        ));
        let cache = Arc::new(SnapshotCache::new());

        let report = updater(api, cache.clone()).run_cycle().await;

        match report.team {
            PhaseOutcome::Kept(msg) => assert!(msg.contains("timed out")),
            other => panic!("expected timeout, got {:?}", other),
        }
        assert!(report.members.is_updated());
    }

    #[tokio::test]
    async fn test_team_panic_still_runs_members_phase() {
        let api = Arc::new(ScriptedSlack::new(
            vec![Step::Panic],
            vec![Step::Ok(sample_members())],
        ));
        let cache = Arc::new(SnapshotCache::new());

        let report = updater(api.clone(), cache.clone()).run_cycle().await;

        match report.team {
            PhaseOutcome::Kept(msg) => assert!(msg.contains("scripted panic")),
            other => panic!("expected kept team, got {:?}", other),
        }
        assert!(report.members.is_updated());
        assert_eq!(api.member_calls.load(Ordering::SeqCst), 1);
        assert!(cache.team().is_none());
        assert_eq!(cache.roster().unwrap().value.total_count(), 2);
    }

    #[tokio::test]
    async fn test_members_panic_keeps_previous_roster() {
        let api = Arc::new(ScriptedSlack::new(
            vec![Step::Ok(team("rust")), Step::Ok(team("rust"))],
            vec![Step::Ok(sample_members()), Step::Panic],
        ));
        let cache = Arc::new(SnapshotCache::new());
        let updater = updater(api, cache.clone());

        updater.run_cycle().await;
        let before = cache.roster().unwrap();

        let report = updater.run_cycle().await;
        assert!(report.team.is_updated());
        assert!(!report.members.is_updated());
        assert!(Arc::ptr_eq(&before, &cache.roster().unwrap()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_loop_survives_panics_and_repeats() {
        let api = Arc::new(ScriptedSlack::new(
            vec![Step::Panic, Step::Ok(team("rust")), Step::Ok(team("rust"))],
            vec![
                Step::Ok(sample_members()),
                Step::Ok(sample_members()),
                Step::Ok(sample_members()),
            ],
        ));
        let cache = Arc::new(SnapshotCache::new());
        let (tx, rx) = broadcast::channel(1);

        let handle = tokio::spawn(updater(api.clone(), cache.clone()).run(rx));

        // First cycle panics inside fetch_team; its members phase still runs.
        time::sleep(Duration::from_secs(1)).await;
        assert_eq!(api.team_calls.load(Ordering::SeqCst), 1);
        assert_eq!(api.member_calls.load(Ordering::SeqCst), 1);
        assert!(cache.team().is_none());
        assert!(cache.roster().is_some());

        // After one interval the next cycle runs normally.
        time::sleep(Duration::from_secs(60)).await;
        assert_eq!(api.team_calls.load(Ordering::SeqCst), 2);
        assert!(cache.is_ready());

        time::sleep(Duration::from_secs(60)).await;
        assert_eq!(api.team_calls.load(Ordering::SeqCst), 3);

        tx.send(()).unwrap();
        handle.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_stops_loop() {
        let api = Arc::new(ScriptedSlack::new(Vec::new(), Vec::new()));
        let cache = Arc::new(SnapshotCache::new());
        let (tx, rx) = broadcast::channel(1);

        let handle = tokio::spawn(updater(api.clone(), cache).run(rx));
        time::sleep(Duration::from_secs(1)).await;
        tx.send(()).unwrap();
        handle.await.unwrap();

        // Only the immediate first cycle ran.
        assert_eq!(api.team_calls.load(Ordering::SeqCst), 1);
        assert_eq!(api.member_calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_panic_message() {
        let payload: Box<dyn Any + Send> = Box::new("boom");
        assert_eq!(panic_message(payload.as_ref()), "boom");
        let payload: Box<dyn Any + Send> = Box::new(String::from("bang"));
        assert_eq!(panic_message(payload.as_ref()), "bang");
        let payload: Box<dyn Any + Send> = Box::new(7u8);
        assert_eq!(panic_message(payload.as_ref()), "non-string panic payload");
    }
}
