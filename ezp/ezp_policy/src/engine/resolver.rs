//! Permission resolution.
//!
//! This module answers "may the current user perform this function on
//! this object" from the user's role assignments.

use ezp_core::error::{PermissionError, Result};
use tracing::{debug, trace, warn};

use super::{PermissionAudit, PermissionContext};
use crate::config::EngineConfig;
use crate::limitation::{AccessVote, EvaluationInput, LimitationKind, LimitationService};
use crate::model::{
    AccessResult, AuditEntry, Decision, Limitation, PermissionObject, PermissionSet, Policy,
    RoleAssignment, Target,
};
use crate::store::RoleStore;

/// A policy matching the request, with its limitation kinds resolved.
struct CandidatePolicy<'a> {
    policy: &'a Policy,
    limitations: Vec<(&'a Limitation, LimitationKind)>,
}

/// An assignment holding at least one matching policy.
struct Candidate<'a> {
    assignment: &'a RoleAssignment,
    role_limitation: Option<(&'a Limitation, LimitationKind)>,
    policies: Vec<CandidatePolicy<'a>>,
}

/// Resolves permission checks against a role store.
///
/// Policies are OR-combined across all of the user's roles; the
/// limitations of one policy are AND-combined. A role limitation gates
/// every policy of its assignment.
pub struct PermissionResolver<S> {
    /// The role store.
    role_store: S,

    /// The limitation registry.
    limitations: LimitationService,

    /// Decision audit, if enabled.
    audit: Option<PermissionAudit>,
}

impl<S> PermissionResolver<S>
where
    S: RoleStore,
{
    /// Create a new resolver.
    ///
    /// # Arguments
    ///
    /// * `role_store` - The role store.
    /// * `limitations` - The limitation registry.
    ///
    /// # Returns
    ///
    /// A new resolver without audit.
    pub fn new(role_store: S, limitations: LimitationService) -> Self {
        Self {
            role_store,
            limitations,
            audit: None,
        }
    }

    /// Record every decision to `audit`.
    pub fn with_audit(mut self, audit: PermissionAudit) -> Self {
        self.audit = Some(audit);
        self
    }

    /// Create a resolver with registry and audit built from `config`.
    pub fn from_config(role_store: S, config: &EngineConfig) -> Result<Self> {
        config.validate()?;

        let limitations = LimitationService::from_config(&config.limitations)?;
        let resolver = Self::new(role_store, limitations);

        if config.audit.enabled {
            let audit = PermissionAudit::new(config.audit.max_entries_per_user)
                .with_max_users(config.audit.max_users);
            Ok(resolver.with_audit(audit))
        } else {
            Ok(resolver)
        }
    }

    /// The role store.
    pub fn role_store(&self) -> &S {
        &self.role_store
    }

    /// The limitation registry.
    pub fn limitation_service(&self) -> &LimitationService {
        &self.limitations
    }

    /// The decision audit, if enabled.
    pub fn audit(&self) -> Option<&PermissionAudit> {
        self.audit.as_ref()
    }

    /// Evaluate a permission check.
    ///
    /// # Arguments
    ///
    /// * `context` - The request's permission context.
    /// * `module` - The requested module, e.g. `content`.
    /// * `function` - The requested function, e.g. `edit`.
    /// * `object` - The object the function is applied to.
    /// * `targets` - Intent data for the operation; may be empty.
    ///
    /// # Returns
    ///
    /// * `Ok(Decision)` - The decision, granted or denied.
    /// * `Err` - If a relevant limitation is not registered or malformed,
    ///   a role limitation has a kind roles cannot use, or the roles could
    ///   not be loaded.
    pub fn evaluate(
        &self,
        context: &PermissionContext,
        module: &str,
        function: &str,
        object: &PermissionObject,
        targets: &[Target],
    ) -> Result<Decision> {
        let user = context.current_user_reference();

        if context.in_sudo() {
            trace!("{}/{} on {} bypassed by sudo", module, function, object);
            let decision = Decision::sudo();
            self.record(&AuditEntry::new(
                user.user_id,
                module,
                function,
                object.to_string(),
                decision.clone(),
            ));
            return Ok(decision);
        }

        let assignments = self.role_store.load_role_assignments_for_user(&user)?;
        let candidates = self.resolve_candidates(&assignments, module, function)?;
        let input = EvaluationInput::new(&user, object, targets);

        let mut decision = Decision::denied();
        'candidates: for candidate in &candidates {
            if let Some((limitation, kind)) = candidate.role_limitation {
                let vote = kind.evaluate(limitation, &input);
                if vote != AccessVote::Granted {
                    trace!(
                        "Role '{}' skipped: role limitation {} voted {:?}",
                        candidate.assignment.role.identifier,
                        limitation,
                        vote
                    );
                    continue;
                }
            }

            for candidate_policy in &candidate.policies {
                if Self::policy_grants(candidate_policy, &input) {
                    decision = Decision::granted(
                        candidate.assignment.role.id,
                        candidate_policy.policy.id,
                    );
                    break 'candidates;
                }
            }
        }

        debug!(
            "User '{}' {}/{} on {}: {}",
            user.login, module, function, object, decision
        );

        self.record(&AuditEntry::new(
            user.user_id,
            module,
            function,
            object.to_string(),
            decision.clone(),
        ));

        Ok(decision)
    }

    /// Check whether the current user may perform `module`/`function` on
    /// `object`. A denial is `Ok(false)`, not an error.
    pub fn can_user(
        &self,
        context: &PermissionContext,
        module: &str,
        function: &str,
        object: &PermissionObject,
        targets: &[Target],
    ) -> Result<bool> {
        Ok(self
            .evaluate(context, module, function, object, targets)?
            .granted)
    }

    /// Like [`can_user`](Self::can_user), but a denial becomes
    /// [`PermissionError::Unauthorized`].
    pub fn ensure_can_user(
        &self,
        context: &PermissionContext,
        module: &str,
        function: &str,
        object: &PermissionObject,
        targets: &[Target],
    ) -> Result<()> {
        if self.can_user(context, module, function, object, targets)? {
            return Ok(());
        }

        Err(PermissionError::Unauthorized {
            module: module.to_string(),
            function: function.to_string(),
            user: context.current_user_reference().login,
        }
        .into())
    }

    /// Object-independent access query.
    ///
    /// # Returns
    ///
    /// * `Ok(AccessResult::Unlimited)` - An unlimited policy of an unlimited
    ///   assignment matches, or a sudo scope is active.
    /// * `Ok(AccessResult::Denied)` - No policy matches.
    /// * `Ok(AccessResult::Limited(sets))` - One permission set per
    ///   assignment with matching policies, in load order.
    pub fn has_access(
        &self,
        context: &PermissionContext,
        module: &str,
        function: &str,
    ) -> Result<AccessResult> {
        if context.in_sudo() {
            return Ok(AccessResult::Unlimited);
        }

        let user = context.current_user_reference();
        let assignments = self.role_store.load_role_assignments_for_user(&user)?;

        let mut sets = Vec::new();
        for assignment in &assignments {
            let policies: Vec<Policy> = assignment
                .role
                .policies_for(module, function)
                .cloned()
                .collect();

            if policies.is_empty() {
                continue;
            }

            if assignment.limitation.is_none() && policies.iter().any(|p| !p.is_limited()) {
                debug!(
                    "User '{}' has unlimited {}/{} via role '{}'",
                    user.login, module, function, assignment.role.identifier
                );
                return Ok(AccessResult::Unlimited);
            }

            sets.push(PermissionSet {
                limitation: assignment.limitation.clone(),
                policies,
            });
        }

        if sets.is_empty() {
            Ok(AccessResult::Denied)
        } else {
            Ok(AccessResult::Limited(sets))
        }
    }

    /// Collect assignments with matching policies and resolve every
    /// limitation they use, so an unknown identifier or malformed value
    /// fails the check regardless of role and policy order.
    fn resolve_candidates<'a>(
        &self,
        assignments: &'a [RoleAssignment],
        module: &str,
        function: &str,
    ) -> Result<Vec<Candidate<'a>>> {
        let mut candidates = Vec::new();

        for assignment in assignments {
            let mut policies = Vec::new();
            for policy in assignment.role.policies_for(module, function) {
                let limitations = policy
                    .limitations
                    .iter()
                    .map(|l| Ok((l, self.resolve_kind(l)?)))
                    .collect::<Result<Vec<_>>>()?;
                policies.push(CandidatePolicy {
                    policy,
                    limitations,
                });
            }

            if policies.is_empty() {
                continue;
            }

            let role_limitation = match &assignment.limitation {
                Some(l) => Some((l, self.resolve_role_limitation(l)?)),
                None => None,
            };

            candidates.push(Candidate {
                assignment,
                role_limitation,
                policies,
            });
        }

        Ok(candidates)
    }

    fn resolve_kind(&self, limitation: &Limitation) -> Result<LimitationKind> {
        self.limitations
            .resolve(limitation)
            .inspect_err(|e| warn!("Policy limitation {} rejected: {}", limitation, e))
    }

    fn resolve_role_limitation(&self, limitation: &Limitation) -> Result<LimitationKind> {
        self.limitations
            .resolve_role_limitation(limitation)
            .inspect_err(|e| warn!("Role limitation {} rejected: {}", limitation, e))
    }

    fn policy_grants(candidate: &CandidatePolicy<'_>, input: &EvaluationInput<'_>) -> bool {
        candidate.limitations.iter().all(|(limitation, kind)| {
            match kind.evaluate(limitation, input) {
                AccessVote::Granted => true,
                AccessVote::Denied => false,
                AccessVote::Abstain => {
                    warn!(
                        "{} abstained on {}; policy {} does not grant",
                        limitation, input.object, candidate.policy
                    );
                    false
                }
            }
        })
    }

    fn record(&self, entry: &AuditEntry) {
        if let Some(audit) = &self.audit {
            audit.record(entry.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ContentInfo, Role, UserReference, VersionBuilder};
    use crate::store::InMemoryRoleStore;
    use crate::config::LimitationConfig;
    use ezp_core::error::{LimitationError, RoleError};
    use ezp_core::Error;
    use std::collections::HashMap;

    fn article(languages: &[&str]) -> PermissionObject {
        ContentInfo::new(42, "article", "standard", ezp_core::id::UserId::new(), languages[0])
            .with_languages(languages.iter().copied())
            .into()
    }

    fn setup(role: Role) -> (PermissionResolver<InMemoryRoleStore>, PermissionContext) {
        let store = InMemoryRoleStore::new();
        let user = UserReference::with_login("editor");
        store.add_role(role.clone()).unwrap();
        store.assign_role_to_user(&role.id, user.user_id, None).unwrap();

        let resolver = PermissionResolver::new(store, LimitationService::with_builtins())
            .with_audit(PermissionAudit::default());
        (resolver, PermissionContext::new(user))
    }

    #[test]
    fn test_no_roles_denies() {
        let resolver =
            PermissionResolver::new(InMemoryRoleStore::new(), LimitationService::with_builtins());
        let context = PermissionContext::new(UserReference::with_login("nobody"));

        assert!(!resolver
            .can_user(&context, "content", "read", &article(&["eng-GB"]), &[])
            .unwrap());
    }

    #[test]
    fn test_unlimited_policy_grants() {
        let policy = Policy::new("content", "read");
        let role = Role::new("Reader").with_policy(policy.clone());
        let role_id = role.id;
        let (resolver, context) = setup(role);

        let decision = resolver
            .evaluate(&context, "content", "read", &article(&["eng-GB"]), &[])
            .unwrap();
        assert!(decision.granted);
        let matched = decision.matched.unwrap();
        assert_eq!(matched.role_id, role_id);
        assert_eq!(matched.policy_id, policy.id);

        assert!(!resolver
            .can_user(&context, "content", "remove", &article(&["eng-GB"]), &[])
            .unwrap());
    }

    #[test]
    fn test_language_limitation_with_target() {
        let role = Role::new("Translator").with_policy(
            Policy::new("content", "edit").with_limitation(Limitation::language(["ger-DE"])),
        );
        let (resolver, context) = setup(role);
        let object = article(&["eng-GB"]);

        let german = [VersionBuilder::new()
            .translate_to_any_language_of(["ger-DE"])
            .build()];
        let english = [VersionBuilder::new()
            .translate_to_any_language_of(["eng-GB"])
            .build()];

        assert!(resolver
            .can_user(&context, "content", "edit", &object, &german)
            .unwrap());
        assert!(!resolver
            .can_user(&context, "content", "edit", &object, &english)
            .unwrap());
    }

    #[test]
    fn test_ensure_can_user_message() {
        let role = Role::new("Publisher").with_policy(
            Policy::new("content", "publish").with_limitation(Limitation::language(["ger-DE"])),
        );
        let (resolver, context) = setup(role);
        let targets = [VersionBuilder::new()
            .publish_translations(["ger-DE", "eng-GB"])
            .build()];

        let err = resolver
            .ensure_can_user(&context, "content", "publish", &article(&["eng-GB", "ger-DE"]), &targets)
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Permission error: The User does not have the 'publish' 'content' permission"
        );
        assert!(matches!(
            err,
            Error::Permission(PermissionError::Unauthorized { ref user, .. }) if user == "editor"
        ));
    }

    #[test]
    fn test_unknown_limitation_is_error() {
        let role = Role::new("Odd").with_policy(
            Policy::new("content", "read")
                .with_limitation(Limitation::new("ParentDepth", ["2"])),
        );
        let (resolver, context) = setup(role);

        let result = resolver.can_user(&context, "content", "read", &article(&["eng-GB"]), &[]);
        assert!(matches!(
            result,
            Err(Error::Limitation(LimitationError::UnknownLimitation(ref id))) if id == "ParentDepth"
        ));

        // Unrelated functions never look at the policy.
        assert!(!resolver
            .can_user(&context, "content", "edit", &article(&["eng-GB"]), &[])
            .unwrap());
    }

    #[test]
    fn test_malformed_limitation_value_is_error() {
        let role = Role::new("Gardener").with_policy(
            Policy::new("content", "edit").with_limitation(Limitation::subtree(["/1/2"])),
        );
        let (resolver, context) = setup(role);
        let object: PermissionObject =
            ContentInfo::new(22, "folder", "standard", ezp_core::id::UserId::new(), "eng-GB")
                .with_location("/1/22/")
                .into();

        let result = resolver.can_user(&context, "content", "edit", &object, &[]);
        assert!(matches!(
            result,
            Err(Error::Limitation(LimitationError::InvalidValue { ref value, .. })) if value == "/1/2"
        ));
    }

    #[test]
    fn test_empty_language_list_denies() {
        let role = Role::new("Nobody").with_policy(
            Policy::new("content", "edit")
                .with_limitation(Limitation::language(Vec::<String>::new())),
        );
        let (resolver, context) = setup(role);

        assert!(!resolver
            .can_user(&context, "content", "edit", &article(&["eng-GB"]), &[])
            .unwrap());
    }

    #[test]
    fn test_role_limitation_resolved_through_registry() {
        let mut aliases = HashMap::new();
        aliases.insert("SectionId".to_string(), "Section".to_string());
        let limitations = LimitationService::from_config(&LimitationConfig {
            enabled: vec!["Owner".to_string()],
            aliases,
        })
        .unwrap();

        let store = InMemoryRoleStore::new();
        let reader = Role::new("Reader").with_policy(Policy::new("content", "read"));
        store.add_role(reader.clone()).unwrap();

        let aliased = UserReference::with_login("aliased");
        store
            .assign_role_to_user(
                &reader.id,
                aliased.user_id,
                Some(Limitation::new("SectionId", ["standard"])),
            )
            .unwrap();
        let canonical = UserReference::with_login("canonical");
        store
            .assign_role_to_user(&reader.id, canonical.user_id, Some(Limitation::section(["standard"])))
            .unwrap();
        let owner = UserReference::with_login("owner");
        store
            .assign_role_to_user(&reader.id, owner.user_id, Some(Limitation::owner_self()))
            .unwrap();

        let resolver = PermissionResolver::new(store, limitations);
        let object = article(&["eng-GB"]);

        assert!(resolver
            .can_user(&PermissionContext::new(aliased), "content", "read", &object, &[])
            .unwrap());
        assert!(matches!(
            resolver.can_user(&PermissionContext::new(canonical), "content", "read", &object, &[]),
            Err(Error::Limitation(LimitationError::UnknownLimitation(ref id))) if id == "Section"
        ));
        assert!(matches!(
            resolver.can_user(&PermissionContext::new(owner), "content", "read", &object, &[]),
            Err(Error::Role(RoleError::InvalidRoleLimitation(_)))
        ));
    }

    #[test]
    fn test_sudo_bypasses_roles() {
        let resolver =
            PermissionResolver::new(InMemoryRoleStore::new(), LimitationService::with_builtins())
                .with_audit(PermissionAudit::default());
        let context = PermissionContext::new(UserReference::with_login("nobody"));

        let decision = context
            .sudo(|ctx| resolver.evaluate(ctx, "content", "remove", &article(&["eng-GB"]), &[]))
            .unwrap();
        assert!(decision.granted);
        assert!(decision.sudo);
        assert_eq!(
            context.sudo(|ctx| resolver.has_access(ctx, "content", "remove")).unwrap(),
            AccessResult::Unlimited
        );

        assert!(!resolver
            .can_user(&context, "content", "remove", &article(&["eng-GB"]), &[])
            .unwrap());
        assert_eq!(resolver.audit().unwrap().get_all_entries().len(), 2);
    }

    #[test]
    fn test_has_access() {
        let role = Role::new("Editor")
            .with_policy(Policy::new("content", "read"))
            .with_policy(
                Policy::new("content", "edit").with_limitation(Limitation::language(["ger-DE"])),
            );
        let (resolver, context) = setup(role);

        assert_eq!(
            resolver.has_access(&context, "content", "read").unwrap(),
            AccessResult::Unlimited
        );
        assert_eq!(
            resolver.has_access(&context, "user", "login").unwrap(),
            AccessResult::Denied
        );

        match resolver.has_access(&context, "content", "edit").unwrap() {
            AccessResult::Limited(sets) => {
                assert_eq!(sets.len(), 1);
                assert!(sets[0].limitation.is_none());
                assert_eq!(sets[0].policies[0].function, "edit");
            }
            other => panic!("expected limited access, got {:?}", other),
        }
    }

    #[test]
    fn test_from_config_without_audit() {
        let mut config = EngineConfig::default();
        config.audit.enabled = false;

        let resolver = PermissionResolver::from_config(InMemoryRoleStore::new(), &config).unwrap();
        assert!(resolver.audit().is_none());
        assert!(resolver.limitation_service().is_registered("Language"));
    }
}
