//! Role model.

use ezp_core::id::RoleId;
use serde::{Deserialize, Serialize};

use crate::model::{Limitation, Policy};

/// A named, ordered bundle of policies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    /// The unique ID of this role.
    #[serde(default)]
    pub id: RoleId,

    /// Human readable identifier, e.g. `Editor`.
    pub identifier: String,

    /// The policies of this role.
    #[serde(default)]
    pub policies: Vec<Policy>,
}

impl Role {
    /// Create a role without policies.
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            id: RoleId::new(),
            identifier: identifier.into(),
            policies: Vec::new(),
        }
    }

    /// Add a policy.
    pub fn with_policy(mut self, policy: Policy) -> Self {
        self.policies.push(policy);
        self
    }

    /// Policies covering `module`/`function`, in role order.
    pub fn policies_for<'a, 'b>(
        &'a self,
        module: &'b str,
        function: &'b str,
    ) -> impl Iterator<Item = &'a Policy> + 'b
    where
        'a: 'b,
    {
        self.policies
            .iter()
            .filter(move |policy| policy.matches(module, function))
    }
}

/// A role as assigned to a user or group.
///
/// The optional role limitation restricts which objects the whole role
/// applies to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleAssignment {
    /// The assigned role.
    pub role: Role,

    /// The role limitation, if any.
    pub limitation: Option<Limitation>,
}

impl RoleAssignment {
    /// An assignment without role limitation.
    pub fn unlimited(role: Role) -> Self {
        Self {
            role,
            limitation: None,
        }
    }

    /// An assignment restricted by `limitation`.
    pub fn limited(role: Role, limitation: Limitation) -> Self {
        Self {
            role,
            limitation: Some(limitation),
        }
    }
}

/// Policies of one assignment that match a (module, function) pair,
/// together with the assignment's role limitation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionSet {
    /// The role limitation, if any.
    pub limitation: Option<Limitation>,

    /// The matching policies.
    pub policies: Vec<Policy>,
}
