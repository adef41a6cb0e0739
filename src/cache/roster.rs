//! Member views derived from one `users.list` fetch.

use crate::upstream::Member;

/// The `users_total` / `users_active` pair.
///
/// Both views come from the same member list and are published together, so
/// `active` is always a subset of `total`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Roster {
    total: Vec<Member>,
    active: Vec<Member>,
}

impl Roster {
    /// Drop bots and deleted accounts, then pick out the members present now.
    pub fn from_members(members: Vec<Member>) -> Self {
        let total: Vec<Member> = members.into_iter().filter(Member::is_human).collect();
        let active = total.iter().filter(|m| m.is_active()).cloned().collect();
        Self { total, active }
    }

    pub fn users_total(&self) -> &[Member] {
        &self.total
    }

    pub fn users_active(&self) -> &[Member] {
        &self.active
    }

    pub fn total_count(&self) -> usize {
        self.total.len()
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::upstream::Presence;

    fn member(id: &str, is_bot: bool, deleted: bool, presence: Presence) -> Member {
        Member {
            id: id.to_string(),
            is_bot,
            deleted,
            presence,
        }
    }

    #[test]
    fn test_bots_and_deleted_excluded() {
        let roster = Roster::from_members(vec![
            member("U1", false, false, Presence::Active),
            member("U2", false, false, Presence::Away),
            member("B1", true, false, Presence::Active),
        ]);

        assert_eq!(roster.total_count(), 2);
        assert_eq!(roster.active_count(), 1);
        assert_eq!(roster.users_active()[0].id, "U1");
    }

    #[test]
    fn test_active_is_subset_of_total() {
        let roster = Roster::from_members(vec![
            member("U1", false, false, Presence::Active),
            member("U2", false, true, Presence::Active),
            member("U3", true, true, Presence::Active),
            member("U4", false, false, Presence::Unknown),
            member("U5", false, false, Presence::Active),
            member("U6", true, false, Presence::Away),
        ]);

        for m in roster.users_total() {
            assert!(!m.is_bot && !m.deleted, "{} should not be counted", m.id);
        }
        for m in roster.users_active() {
            assert!(roster.users_total().contains(m));
            assert_eq!(m.presence, Presence::Active);
        }
        assert_eq!(roster.total_count(), 3);
        assert_eq!(roster.active_count(), 2);
    }

    #[test]
    fn test_empty_member_list() {
        let roster = Roster::from_members(Vec::new());
        assert_eq!(roster.total_count(), 0);
        assert_eq!(roster.active_count(), 0);
    }
}
