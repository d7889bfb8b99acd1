//! Permission models.
//!
//! This module defines the roles, policies, limitations, objects and
//! targets the permission engine evaluates.

pub mod evaluation;
pub mod limitation;
pub mod object;
pub mod policy;
pub mod role;
pub mod target;
pub mod user;

pub use evaluation::{AccessResult, AuditEntry, Decision, MatchedPolicy};
pub use limitation::Limitation;
pub use object::{ContentCreateStruct, ContentInfo, PermissionObject, VersionInfo, VersionStatus};
pub use policy::Policy;
pub use role::{PermissionSet, Role, RoleAssignment};
pub use target::{LocationTarget, Target, VersionBuilder, VersionTarget};
pub use user::UserReference;
