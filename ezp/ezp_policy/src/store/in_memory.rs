//! In-memory role store.

use dashmap::DashMap;
use ezp_core::error::{Result, RoleError};
use ezp_core::id::{RoleId, UserGroupId, UserId};
use std::hash::Hash;
use std::sync::Arc;
use tracing::info;

use super::RoleStore;
use crate::model::{Limitation, Role, RoleAssignment, UserReference};

#[derive(Debug, Clone, PartialEq, Eq)]
struct StoredAssignment {
    role_id: RoleId,
    limitation: Option<Limitation>,
}

/// An in-memory role store. Clones share the same data.
#[derive(Clone, Default)]
pub struct InMemoryRoleStore {
    /// The roles, indexed by ID.
    roles: Arc<DashMap<RoleId, Role>>,

    /// Direct assignments, indexed by user.
    user_assignments: Arc<DashMap<UserId, Vec<StoredAssignment>>>,

    /// Group assignments, indexed by group.
    group_assignments: Arc<DashMap<UserGroupId, Vec<StoredAssignment>>>,
}

impl InMemoryRoleStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn assign<K>(
        &self,
        assignments: &DashMap<K, Vec<StoredAssignment>>,
        key: K,
        role_id: &RoleId,
        limitation: Option<Limitation>,
    ) -> Result<()>
    where
        K: Eq + Hash,
    {
        if !self.roles.contains_key(role_id) {
            return Err(RoleError::RoleNotFound(*role_id).into());
        }

        let assignment = StoredAssignment {
            role_id: *role_id,
            limitation,
        };

        let mut entries = assignments.entry(key).or_default();
        if entries.contains(&assignment) {
            return Err(RoleError::Conflict(format!("Role {} is already assigned", role_id)).into());
        }
        entries.push(assignment);

        Ok(())
    }

    fn resolve(&self, stored: &[StoredAssignment], into: &mut Vec<RoleAssignment>) {
        for assignment in stored {
            if let Some(role) = self.roles.get(&assignment.role_id) {
                into.push(RoleAssignment {
                    role: role.clone(),
                    limitation: assignment.limitation.clone(),
                });
            }
        }
    }
}

impl RoleStore for InMemoryRoleStore {
    fn add_role(&self, role: Role) -> Result<()> {
        if self.roles.contains_key(&role.id) {
            return Err(RoleError::Conflict(format!("Role {} already exists", role.id)).into());
        }

        info!("Adding role '{}' ({})", role.identifier, role.id);
        self.roles.insert(role.id, role);

        Ok(())
    }

    fn get_role(&self, role_id: &RoleId) -> Result<Role> {
        self.roles
            .get(role_id)
            .map(|r| r.value().clone())
            .ok_or_else(|| RoleError::RoleNotFound(*role_id).into())
    }

    fn update_role(&self, role: Role) -> Result<()> {
        if !self.roles.contains_key(&role.id) {
            return Err(RoleError::RoleNotFound(role.id).into());
        }

        self.roles.insert(role.id, role);

        Ok(())
    }

    fn remove_role(&self, role_id: &RoleId) -> Result<()> {
        if self.roles.remove(role_id).is_none() {
            return Err(RoleError::RoleNotFound(*role_id).into());
        }

        for mut entry in self.user_assignments.iter_mut() {
            entry.value_mut().retain(|a| a.role_id != *role_id);
        }
        for mut entry in self.group_assignments.iter_mut() {
            entry.value_mut().retain(|a| a.role_id != *role_id);
        }

        info!("Removed role {} and its assignments", role_id);

        Ok(())
    }

    fn list_roles(&self) -> Result<Vec<Role>> {
        Ok(self.roles.iter().map(|r| r.value().clone()).collect())
    }

    fn assign_role_to_user(
        &self,
        role_id: &RoleId,
        user_id: UserId,
        limitation: Option<Limitation>,
    ) -> Result<()> {
        self.assign(&self.user_assignments, user_id, role_id, limitation)
    }

    fn assign_role_to_group(
        &self,
        role_id: &RoleId,
        group_id: UserGroupId,
        limitation: Option<Limitation>,
    ) -> Result<()> {
        self.assign(&self.group_assignments, group_id, role_id, limitation)
    }

    fn load_role_assignments_for_user(&self, user: &UserReference) -> Result<Vec<RoleAssignment>> {
        let mut assignments = Vec::new();

        if let Some(direct) = self.user_assignments.get(&user.user_id) {
            self.resolve(direct.value(), &mut assignments);
        }

        for group_id in &user.group_ids {
            if let Some(inherited) = self.group_assignments.get(group_id) {
                self.resolve(inherited.value(), &mut assignments);
            }
        }

        Ok(assignments)
    }
}
