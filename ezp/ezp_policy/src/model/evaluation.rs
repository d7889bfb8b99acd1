//! Permission evaluation model.
//!
//! This module defines the results the resolver produces.

use chrono::{DateTime, Utc};
use ezp_core::id::{PolicyId, RoleId, UserId};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::model::PermissionSet;

/// The policy that granted a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchedPolicy {
    /// The role the policy belongs to.
    pub role_id: RoleId,

    /// The granting policy.
    pub policy_id: PolicyId,
}

/// Outcome of one `can_user` evaluation.
///
/// `granted` is independent of role and policy order; `matched` names the
/// first granting policy found and may vary with that order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    /// Whether the request is allowed.
    pub granted: bool,

    /// The granting policy. `None` for denials and sudo grants.
    pub matched: Option<MatchedPolicy>,

    /// Whether the grant came from a sudo scope.
    #[serde(default)]
    pub sudo: bool,
}

impl Decision {
    /// A grant by a specific policy.
    pub fn granted(role_id: RoleId, policy_id: PolicyId) -> Self {
        Self {
            granted: true,
            matched: Some(MatchedPolicy { role_id, policy_id }),
            sudo: false,
        }
    }

    /// A denial.
    pub fn denied() -> Self {
        Self {
            granted: false,
            matched: None,
            sudo: false,
        }
    }

    /// A grant from a sudo scope.
    pub fn sudo() -> Self {
        Self {
            granted: true,
            matched: None,
            sudo: true,
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.granted, &self.matched) {
            (true, Some(matched)) => write!(
                f,
                "granted by policy {} of role {}",
                matched.policy_id, matched.role_id
            ),
            (true, None) => write!(f, "granted (sudo)"),
            (false, _) => write!(f, "denied"),
        }
    }
}

/// Outcome of a `has_access` query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccessResult {
    /// Some unlimited policy applies everywhere.
    Unlimited,

    /// No policy matches.
    Denied,

    /// Access depends on the listed permission sets.
    Limited(Vec<PermissionSet>),
}

impl AccessResult {
    /// Whether any access at all is possible.
    pub fn is_possible(&self) -> bool {
        !matches!(self, Self::Denied)
    }
}

/// A recorded permission check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    /// The user the check ran for.
    pub user_id: UserId,

    /// Requested module.
    pub module: String,

    /// Requested function.
    pub function: String,

    /// Description of the object checked.
    pub object: String,

    /// The decision.
    pub decision: Decision,

    /// When the check was performed.
    pub timestamp: DateTime<Utc>,
}

impl AuditEntry {
    /// Create an entry stamped with the current time.
    pub fn new(
        user_id: UserId,
        module: impl Into<String>,
        function: impl Into<String>,
        object: impl Into<String>,
        decision: Decision,
    ) -> Self {
        Self {
            user_id,
            module: module.into(),
            function: function.into(),
            object: object.into(),
            decision,
            timestamp: Utc::now(),
        }
    }
}
