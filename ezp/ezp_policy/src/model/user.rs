//! User reference model.

use ezp_core::id::{UserGroupId, UserId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Snapshot of the user a permission check runs for.
///
/// Group membership is resolved by the caller before the check; the role
/// store uses `group_ids` to find group-inherited role assignments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserReference {
    /// The user's ID.
    pub user_id: UserId,

    /// The user's login, used in diagnostics.
    pub login: String,

    /// Groups the user belongs to, directly or transitively.
    #[serde(default)]
    pub group_ids: Vec<UserGroupId>,
}

impl UserReference {
    /// Create a reference for a user with no group membership.
    pub fn new(user_id: UserId, login: impl Into<String>) -> Self {
        Self {
            user_id,
            login: login.into(),
            group_ids: Vec::new(),
        }
    }

    /// Create a reference with a fresh user ID.
    pub fn with_login(login: impl Into<String>) -> Self {
        Self::new(UserId::new(), login)
    }

    /// Add group membership.
    pub fn in_groups(mut self, group_ids: impl IntoIterator<Item = UserGroupId>) -> Self {
        for group_id in group_ids {
            if !self.group_ids.contains(&group_id) {
                self.group_ids.push(group_id);
            }
        }
        self
    }

    /// An anonymous user with no roles of its own.
    pub fn anonymous() -> Self {
        Self::new(UserId::nil(), "anonymous")
    }
}

impl fmt::Display for UserReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "User '{}' ({})", self.login, self.user_id)
    }
}
