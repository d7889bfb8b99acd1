//! Strongly-typed identifiers.
//!
//! Users, groups, roles and policies are identified by UUID-backed
//! identifiers with a phantom marker, so an identifier for one entity
//! kind cannot be passed where another is expected. Content items keep
//! the repository's numeric identifiers ([`ContentId`]).
//!
//! # Examples
//!
//! ```
//! use ezp_core::id::{RoleId, UserId};
//! use std::str::FromStr;
//!
//! let user_id = UserId::new();
//! let role_id = RoleId::new();
//! assert_ne!(user_id.to_string(), role_id.to_string());
//!
//! let id_str = "550e8400-e29b-41d4-a716-446655440000";
//! let user_id = UserId::from_str(id_str).unwrap();
//! assert_eq!(user_id.to_string(), id_str);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;
use uuid::Uuid;

/// A type-safe identifier based on UUID.
///
/// Serializes as the bare UUID string.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(transparent)]
pub struct Id<T> {
    uuid: Uuid,
    #[serde(skip)]
    _marker: PhantomData<T>,
}

impl<T> Id<T> {
    /// Create a new random identifier.
    pub fn new() -> Self {
        Self::from_uuid(Uuid::new_v4())
    }

    /// Create an identifier from a specific UUID.
    ///
    /// ```
    /// use ezp_core::id::UserId;
    /// use uuid::Uuid;
    ///
    /// let uuid = Uuid::new_v4();
    /// let id = UserId::from_uuid(uuid);
    /// assert_eq!(id.uuid(), uuid);
    /// ```
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self {
            uuid,
            _marker: PhantomData,
        }
    }

    /// Get the underlying UUID.
    pub fn uuid(&self) -> Uuid {
        self.uuid
    }

    /// Create a nil (all zeros) identifier.
    pub fn nil() -> Self {
        Self::from_uuid(Uuid::nil())
    }

    /// Check if this is a nil identifier.
    pub fn is_nil(&self) -> bool {
        self.uuid.is_nil()
    }
}

impl<T> Default for Id<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.uuid)
    }
}

impl<T> FromStr for Id<T> {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_uuid(Uuid::parse_str(s)?))
    }
}

/// Marker type for users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UserMarker;
/// Identifier for a user.
pub type UserId = Id<UserMarker>;

/// Marker type for user groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UserGroupMarker;
/// Identifier for a user group.
pub type UserGroupId = Id<UserGroupMarker>;

/// Marker type for roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RoleMarker;
/// Identifier for a role.
pub type RoleId = Id<RoleMarker>;

/// Marker type for policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PolicyMarker;
/// Identifier for a policy.
pub type PolicyId = Id<PolicyMarker>;

/// Identifier for a content item.
pub type ContentId = u64;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_new() {
        let id1 = UserId::new();
        let id2 = UserId::new();
        assert_ne!(id1, id2, "Generated IDs should be unique");
    }

    #[test]
    fn test_id_from_str() {
        let uuid_str = "550e8400-e29b-41d4-a716-446655440000";
        let id = RoleId::from_str(uuid_str).unwrap();
        assert_eq!(id.to_string(), uuid_str);
        assert!(RoleId::from_str("not-a-uuid").is_err());
    }

    #[test]
    fn test_id_nil() {
        let nil_id = PolicyId::nil();
        assert_eq!(nil_id.to_string(), "00000000-0000-0000-0000-000000000000");
        assert!(nil_id.is_nil());
        assert!(!PolicyId::new().is_nil());
    }

    #[test]
    fn test_id_serializes_as_bare_uuid() {
        let id = UserGroupId::new();
        let serialized = serde_json::to_string(&id).unwrap();
        assert_eq!(serialized, format!("\"{}\"", id));

        let deserialized: UserGroupId = serde_json::from_str(&serialized).unwrap();
        assert_eq!(id, deserialized);
    }
}
