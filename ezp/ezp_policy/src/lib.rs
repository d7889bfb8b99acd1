//! # ezp Policy
//!
//! `ezp_policy` decides whether the current user may perform a
//! `(module, function)` pair, such as `content/publish`, on a content
//! object.
//!
//! Key concepts:
//!
//! 1. **Role**: A named bundle of policies, assigned to users or groups,
//!    optionally restricted by a role limitation (Section or Subtree).
//!
//! 2. **Policy**: A grant for one `(module, function)` pair narrowed by
//!    limitations. Limitations of a policy are AND-combined; policies
//!    are OR-combined across all roles of the user.
//!
//! 3. **Limitation**: A typed rule (Language, Class, Section, Owner,
//!    Subtree) evaluated against the object and the check's targets.
//!
//! 4. **Target**: Intent data for an operation, e.g. which translations a
//!    publish will touch, built with [`VersionBuilder`].
//!
//! ```
//! use ezp_policy::{
//!     ContentInfo, InMemoryRoleStore, Limitation, LimitationService, PermissionContext,
//!     PermissionObject, PermissionResolver, Policy, Role, RoleStore, UserReference,
//!     VersionBuilder,
//! };
//!
//! let store = InMemoryRoleStore::new();
//! let role = Role::new("Translator").with_policy(
//!     Policy::new("content", "edit").with_limitation(Limitation::language(["ger-DE"])),
//! );
//! let user = UserReference::with_login("translator");
//! store.add_role(role.clone()).unwrap();
//! store.assign_role_to_user(&role.id, user.user_id, None).unwrap();
//!
//! let resolver = PermissionResolver::new(store, LimitationService::with_builtins());
//! let context = PermissionContext::new(user);
//! let object: PermissionObject =
//!     ContentInfo::new(1, "article", "standard", Default::default(), "eng-GB").into();
//! let targets = [VersionBuilder::new().translate_to_any_language_of(["ger-DE"]).build()];
//!
//! assert!(resolver.can_user(&context, "content", "edit", &object, &targets).unwrap());
//! ```

pub mod config;
pub mod engine;
pub mod limitation;
pub mod model;
pub mod store;

// Re-export key types and traits for convenience
pub use config::{AuditConfig, EngineConfig, LimitationConfig, LoggingConfig};
pub use engine::{PermissionAudit, PermissionContext, PermissionResolver};
pub use limitation::{AccessVote, EvaluationInput, LimitationKind, LimitationService};
pub use model::{
    AccessResult, AuditEntry, ContentCreateStruct, ContentInfo, Decision, Limitation,
    LocationTarget, MatchedPolicy, PermissionObject, PermissionSet, Policy, Role, RoleAssignment,
    Target, UserReference, VersionBuilder, VersionInfo, VersionStatus, VersionTarget,
};
pub use store::{InMemoryRoleStore, RoleStore};
