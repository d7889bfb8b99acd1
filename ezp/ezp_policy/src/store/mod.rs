//! Role storage.
//!
//! The persistence layer is an external collaborator; the engine only
//! needs the read side ([`RoleStore::load_role_assignments_for_user`]).
//! The mutating methods exist so hosts and tests can populate a store.
//! Stores keep limitations as given; the resolver checks them against its
//! limitation registry when it evaluates them.

mod in_memory;

pub use in_memory::InMemoryRoleStore;

use ezp_core::error::Result;
use ezp_core::id::{RoleId, UserGroupId, UserId};

use crate::model::{Limitation, Role, RoleAssignment, UserReference};

/// Trait for role storage.
pub trait RoleStore: Send + Sync {
    /// Add a role.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - If the role was added.
    /// * `Err` - If a role with the same ID exists.
    fn add_role(&self, role: Role) -> Result<()>;

    /// Get a role by ID.
    fn get_role(&self, role_id: &RoleId) -> Result<Role>;

    /// Replace a stored role.
    fn update_role(&self, role: Role) -> Result<()>;

    /// Remove a role together with all of its assignments.
    fn remove_role(&self, role_id: &RoleId) -> Result<()>;

    /// List all roles.
    fn list_roles(&self) -> Result<Vec<Role>>;

    /// Assign a role to a user, optionally restricted by a role limitation.
    fn assign_role_to_user(
        &self,
        role_id: &RoleId,
        user_id: UserId,
        limitation: Option<Limitation>,
    ) -> Result<()>;

    /// Assign a role to a user group, optionally restricted by a role
    /// limitation.
    fn assign_role_to_group(
        &self,
        role_id: &RoleId,
        group_id: UserGroupId,
        limitation: Option<Limitation>,
    ) -> Result<()>;

    /// Load the user's direct and group-inherited role assignments.
    fn load_role_assignments_for_user(&self, user: &UserReference) -> Result<Vec<RoleAssignment>>;

    /// Load the distinct roles the user holds.
    fn load_roles_for_user(&self, user: &UserReference) -> Result<Vec<Role>> {
        let mut roles: Vec<Role> = Vec::new();
        for assignment in self.load_role_assignments_for_user(user)? {
            if !roles.iter().any(|role| role.id == assignment.role.id) {
                roles.push(assignment.role);
            }
        }
        Ok(roles)
    }
}
