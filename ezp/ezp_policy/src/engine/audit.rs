//! Permission auditing.
//!
//! This module records permission decisions per user. Both the entries
//! per user and the number of users are bounded; when a new user arrives
//! at capacity, the user whose latest entry is oldest is dropped.

use dashmap::DashMap;
use ezp_core::id::{PolicyId, UserId};
use std::sync::Arc;

use crate::model::AuditEntry;

/// Default bound on the number of audited users.
pub const DEFAULT_MAX_USERS: usize = 10_000;

/// A bounded per-user record of permission decisions.
#[derive(Clone)]
pub struct PermissionAudit {
    /// The audit entries.
    entries: Arc<DashMap<UserId, Vec<AuditEntry>>>,

    /// The maximum number of entries to keep per user.
    max_entries_per_user: usize,

    /// The maximum number of users to keep entries for.
    max_users: usize,
}

impl PermissionAudit {
    /// Create a new audit.
    ///
    /// # Arguments
    ///
    /// * `max_entries_per_user` - The maximum number of entries to keep per user.
    pub fn new(max_entries_per_user: usize) -> Self {
        Self {
            entries: Arc::new(DashMap::new()),
            max_entries_per_user,
            max_users: DEFAULT_MAX_USERS,
        }
    }

    /// Keep entries for at most `max_users` users.
    pub fn with_max_users(mut self, max_users: usize) -> Self {
        self.max_users = max_users;
        self
    }

    /// Record an entry, dropping the user's oldest entries past capacity.
    pub fn record(&self, entry: AuditEntry) {
        if !self.entries.contains_key(&entry.user_id) {
            self.make_room();
        }

        let mut user_entries = self.entries.entry(entry.user_id).or_default();
        user_entries.push(entry);

        if user_entries.len() > self.max_entries_per_user {
            let to_remove = user_entries.len() - self.max_entries_per_user;
            user_entries.drain(0..to_remove);
        }
    }

    /// Get entries for a user, oldest first.
    pub fn get_entries(&self, user_id: &UserId) -> Vec<AuditEntry> {
        self.entries
            .get(user_id)
            .map(|entries| entries.clone())
            .unwrap_or_default()
    }

    /// Clear entries for a user.
    pub fn clear_entries(&self, user_id: &UserId) {
        self.entries.remove(user_id);
    }

    /// Get all entries.
    pub fn get_all_entries(&self) -> Vec<AuditEntry> {
        self.entries
            .iter()
            .flat_map(|entry| entry.value().clone())
            .collect()
    }

    /// Get all denied entries.
    pub fn get_denied_entries(&self) -> Vec<AuditEntry> {
        self.filter(|entry| !entry.decision.granted)
    }

    /// Get entries granted by a specific policy.
    pub fn get_entries_by_policy(&self, policy_id: &PolicyId) -> Vec<AuditEntry> {
        self.filter(|entry| {
            entry
                .decision
                .matched
                .is_some_and(|matched| matched.policy_id == *policy_id)
        })
    }

    /// Number of users with recorded entries.
    pub fn user_count(&self) -> usize {
        self.entries.len()
    }

    fn make_room(&self) {
        while self.entries.len() >= self.max_users {
            let stalest = self
                .entries
                .iter()
                .min_by_key(|entry| entry.value().last().map(|last| last.timestamp))
                .map(|entry| *entry.key());

            match stalest {
                Some(user_id) => {
                    self.entries.remove(&user_id);
                }
                None => break,
            }
        }
    }

    fn filter<F>(&self, predicate: F) -> Vec<AuditEntry>
    where
        F: Fn(&AuditEntry) -> bool,
    {
        let mut filtered = Vec::new();

        for entry in self.entries.iter() {
            for audit_entry in entry.value() {
                if predicate(audit_entry) {
                    filtered.push(audit_entry.clone());
                }
            }
        }

        filtered
    }
}

impl Default for PermissionAudit {
    fn default() -> Self {
        Self::new(1000)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Decision;
    use chrono::{Duration, Utc};
    use ezp_core::id::RoleId;

    fn entry(user_id: UserId, function: &str, decision: Decision) -> AuditEntry {
        AuditEntry::new(user_id, "content", function, "Content #1", decision)
    }

    #[test]
    fn test_record_and_get_entries() {
        let audit = PermissionAudit::new(10);
        let user_id = UserId::new();

        audit.record(entry(user_id, "read", Decision::denied()));
        audit.record(entry(user_id, "edit", Decision::denied()));

        let entries = audit.get_entries(&user_id);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].function, "read");
        assert!(audit.get_entries(&UserId::new()).is_empty());
    }

    #[test]
    fn test_trims_oldest_entries() {
        let audit = PermissionAudit::new(2);
        let user_id = UserId::new();

        for function in ["read", "edit", "publish"] {
            audit.record(entry(user_id, function, Decision::denied()));
        }

        let functions: Vec<String> = audit
            .get_entries(&user_id)
            .into_iter()
            .map(|e| e.function)
            .collect();
        assert_eq!(functions, vec!["edit", "publish"]);
    }

    #[test]
    fn test_drops_stalest_user_past_capacity() {
        let audit = PermissionAudit::new(10).with_max_users(2);
        let (alice, bob, carol) = (UserId::new(), UserId::new(), UserId::new());
        let start = Utc::now();

        let mut first = entry(alice, "read", Decision::denied());
        first.timestamp = start;
        let mut second = entry(bob, "read", Decision::denied());
        second.timestamp = start + Duration::seconds(1);
        let mut third = entry(alice, "edit", Decision::denied());
        third.timestamp = start + Duration::seconds(2);
        let mut fourth = entry(carol, "read", Decision::denied());
        fourth.timestamp = start + Duration::seconds(3);

        for e in [first, second, third] {
            audit.record(e);
        }
        assert_eq!(audit.user_count(), 2);

        audit.record(fourth);
        assert_eq!(audit.user_count(), 2);
        assert!(audit.get_entries(&bob).is_empty());
        assert_eq!(audit.get_entries(&alice).len(), 2);
        assert_eq!(audit.get_entries(&carol).len(), 1);
    }

    #[test]
    fn test_clear_entries() {
        let audit = PermissionAudit::default();
        let user_id = UserId::new();
        audit.record(entry(user_id, "read", Decision::denied()));

        audit.clear_entries(&user_id);
        assert!(audit.get_entries(&user_id).is_empty());
    }

    #[test]
    fn test_filters() {
        let audit = PermissionAudit::default();
        let alice = UserId::new();
        let bob = UserId::new();
        let policy_id = PolicyId::new();

        audit.record(entry(alice, "read", Decision::granted(RoleId::new(), policy_id)));
        audit.record(entry(bob, "edit", Decision::denied()));
        audit.record(entry(bob, "read", Decision::sudo()));

        assert_eq!(audit.get_all_entries().len(), 3);

        let denied = audit.get_denied_entries();
        assert_eq!(denied.len(), 1);
        assert_eq!(denied[0].user_id, bob);

        let by_policy = audit.get_entries_by_policy(&policy_id);
        assert_eq!(by_policy.len(), 1);
        assert_eq!(by_policy[0].user_id, alice);
    }
}
