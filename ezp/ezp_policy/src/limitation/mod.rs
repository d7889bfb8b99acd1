//! Limitation types and the registry that resolves them.
//!
//! Each built-in limitation kind is a variant of [`LimitationKind`]. The
//! [`LimitationService`] maps stored identifiers to kinds; which kinds are
//! available, and under which identifiers, is decided by the host at
//! startup. Evaluators are pure functions of the limitation values, the
//! user, the object and the targets.

mod content_type;
mod language;
mod owner;
mod section;
mod subtree;

use ezp_core::error::{ConfigError, LimitationError, Result, RoleError};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use tracing::info;

use crate::config::LimitationConfig;
use crate::model::limitation::{CONTENT_TYPE, LANGUAGE, OWNER, SECTION, SUBTREE};
use crate::model::{Limitation, LocationTarget, PermissionObject, Target, UserReference, VersionTarget};

/// A limitation's verdict on one object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessVote {
    /// The limitation accepts the object.
    Granted,

    /// The limitation rejects the object.
    Denied,

    /// The limitation cannot judge this object.
    Abstain,
}

impl From<bool> for AccessVote {
    fn from(granted: bool) -> Self {
        if granted {
            Self::Granted
        } else {
            Self::Denied
        }
    }
}

/// Everything an evaluator may look at.
#[derive(Debug, Clone, Copy)]
pub struct EvaluationInput<'a> {
    /// The current user.
    pub user: &'a UserReference,

    /// The object under check.
    pub object: &'a PermissionObject,

    /// Per-check intent data.
    pub targets: &'a [Target],
}

impl<'a> EvaluationInput<'a> {
    /// Bundle the inputs of one check.
    pub fn new(user: &'a UserReference, object: &'a PermissionObject, targets: &'a [Target]) -> Self {
        Self {
            user,
            object,
            targets,
        }
    }

    /// The version targets of this check.
    pub fn version_targets(&self) -> impl Iterator<Item = &'a VersionTarget> + 'a {
        self.targets.iter().filter_map(Target::as_version)
    }

    /// The location targets of this check.
    pub fn location_targets(&self) -> impl Iterator<Item = &'a LocationTarget> + 'a {
        self.targets.iter().filter_map(Target::as_location)
    }
}

/// Built-in limitation kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LimitationKind {
    /// Translations by language code.
    Language,

    /// Content type identifiers.
    ContentType,

    /// Section identifiers.
    Section,

    /// Content owned by the current user.
    Owner,

    /// Content below location path strings.
    Subtree,
}

impl LimitationKind {
    /// All built-in kinds.
    pub const ALL: [LimitationKind; 5] = [
        Self::Language,
        Self::ContentType,
        Self::Section,
        Self::Owner,
        Self::Subtree,
    ];

    /// The canonical identifier of this kind.
    pub fn identifier(&self) -> &'static str {
        match self {
            Self::Language => LANGUAGE,
            Self::ContentType => CONTENT_TYPE,
            Self::Section => SECTION,
            Self::Owner => OWNER,
            Self::Subtree => SUBTREE,
        }
    }

    /// Whether this kind may restrict a whole role assignment.
    pub fn is_role_limitation(&self) -> bool {
        matches!(self, Self::Section | Self::Subtree)
    }

    /// Check that `limitation`'s values are well-formed for this kind.
    pub fn validate(&self, limitation: &Limitation) -> Result<()> {
        if limitation.values.is_empty() {
            return Err(LimitationError::EmptyValues(limitation.identifier.clone()).into());
        }

        self.validate_values(limitation)
    }

    /// Check that each of `limitation`'s values is well-formed for this
    /// kind. An empty value list passes.
    pub fn validate_values(&self, limitation: &Limitation) -> Result<()> {
        match self {
            Self::Language => language::validate(limitation),
            Self::ContentType => content_type::validate(limitation),
            Self::Section => section::validate(limitation),
            Self::Owner => owner::validate(limitation),
            Self::Subtree => subtree::validate(limitation),
        }
    }

    /// Evaluate `limitation` against one check.
    pub fn evaluate(&self, limitation: &Limitation, input: &EvaluationInput<'_>) -> AccessVote {
        let values = &limitation.values;
        match self {
            Self::Language => language::evaluate(values, input),
            Self::ContentType => content_type::evaluate(values, input),
            Self::Section => section::evaluate(values, input),
            Self::Owner => owner::evaluate(values, input),
            Self::Subtree => subtree::evaluate(values, input),
        }
    }
}

impl fmt::Display for LimitationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.identifier())
    }
}

impl FromStr for LimitationKind {
    type Err = LimitationError;

    /// Parse a canonical built-in identifier.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.identifier() == s)
            .ok_or_else(|| LimitationError::UnknownLimitation(s.to_string()))
    }
}

/// Registry mapping limitation identifiers to their kinds.
#[derive(Debug, Clone, Default)]
pub struct LimitationService {
    types: HashMap<String, LimitationKind>,
}

impl LimitationService {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with every built-in kind under its canonical
    /// identifier.
    pub fn with_builtins() -> Self {
        let mut service = Self::new();
        for kind in LimitationKind::ALL {
            service.register(kind.identifier(), kind);
        }
        service
    }

    /// Create a registry from configuration.
    pub fn from_config(config: &LimitationConfig) -> Result<Self> {
        let mut service = Self::new();

        for identifier in &config.enabled {
            let kind = LimitationKind::from_str(identifier).map_err(|_| {
                ConfigError::Invalid(format!("unknown built-in limitation '{}'", identifier))
            })?;
            service.register(identifier.clone(), kind);
        }

        for (alias, target) in &config.aliases {
            let kind = LimitationKind::from_str(target).map_err(|_| {
                ConfigError::Invalid(format!(
                    "alias '{}' points to unknown limitation '{}'",
                    alias, target
                ))
            })?;
            service.register(alias.clone(), kind);
        }

        info!(
            "Limitation registry configured with {} identifiers",
            service.types.len()
        );

        Ok(service)
    }

    /// Register `kind` under `identifier`, replacing any earlier mapping.
    pub fn register(&mut self, identifier: impl Into<String>, kind: LimitationKind) {
        self.types.insert(identifier.into(), kind);
    }

    /// Whether `identifier` is registered.
    pub fn is_registered(&self, identifier: &str) -> bool {
        self.types.contains_key(identifier)
    }

    /// Registered identifiers, sorted.
    pub fn identifiers(&self) -> Vec<&str> {
        let mut identifiers: Vec<&str> = self.types.keys().map(String::as_str).collect();
        identifiers.sort_unstable();
        identifiers
    }

    /// Resolve `identifier` to its kind.
    pub fn get_limitation_type(&self, identifier: &str) -> Result<LimitationKind> {
        self.types
            .get(identifier)
            .copied()
            .ok_or_else(|| LimitationError::UnknownLimitation(identifier.to_string()).into())
    }

    /// Check that `limitation` is registered and its values are well-formed.
    pub fn validate(&self, limitation: &Limitation) -> Result<()> {
        self.get_limitation_type(&limitation.identifier)?
            .validate(limitation)
    }

    /// Resolve a stored limitation for evaluation.
    ///
    /// # Returns
    ///
    /// * `Ok(LimitationKind)` - The registered kind.
    /// * `Err` - If the identifier is not registered or a value is
    ///   malformed. An empty value list is not an error; evaluators deny
    ///   on it.
    pub fn resolve(&self, limitation: &Limitation) -> Result<LimitationKind> {
        let kind = self.get_limitation_type(&limitation.identifier)?;
        kind.validate_values(limitation)?;
        Ok(kind)
    }

    /// Resolve a role limitation. Like [`resolve`](Self::resolve), and the
    /// kind must be allowed on role assignments.
    pub fn resolve_role_limitation(&self, limitation: &Limitation) -> Result<LimitationKind> {
        let kind = self.get_limitation_type(&limitation.identifier)?;
        if !kind.is_role_limitation() {
            return Err(RoleError::InvalidRoleLimitation(limitation.identifier.clone()).into());
        }
        kind.validate_values(limitation)?;
        Ok(kind)
    }

    /// Evaluate `limitation` against one check.
    pub fn evaluate(&self, limitation: &Limitation, input: &EvaluationInput<'_>) -> Result<AccessVote> {
        Ok(self.resolve(limitation)?.evaluate(limitation, input))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ezp_core::Error;
    use std::collections::HashMap;

    #[test]
    fn test_builtin_identifiers() {
        let service = LimitationService::with_builtins();
        assert_eq!(
            service.identifiers(),
            vec!["Class", "Language", "Owner", "Section", "Subtree"]
        );
        assert_eq!(
            service.get_limitation_type("Class").unwrap(),
            LimitationKind::ContentType
        );
    }

    #[test]
    fn test_unknown_limitation() {
        let service = LimitationService::with_builtins();
        let result = service.get_limitation_type("ParentDepth");
        assert!(matches!(
            result,
            Err(Error::Limitation(LimitationError::UnknownLimitation(ref id))) if id == "ParentDepth"
        ));
    }

    #[test]
    fn test_empty_registry_knows_nothing() {
        let service = LimitationService::new();
        assert!(!service.is_registered("Language"));
        assert!(service
            .validate(&Limitation::language(["ger-DE"]))
            .is_err());
    }

    #[test]
    fn test_from_config_with_alias() {
        let mut aliases = HashMap::new();
        aliases.insert("LanguageCode".to_string(), "Language".to_string());
        let config = LimitationConfig {
            enabled: vec!["Section".to_string()],
            aliases,
        };

        let service = LimitationService::from_config(&config).unwrap();
        assert_eq!(service.identifiers(), vec!["LanguageCode", "Section"]);
        assert_eq!(
            service.get_limitation_type("LanguageCode").unwrap(),
            LimitationKind::Language
        );
        assert!(!service.is_registered("Language"));
    }

    #[test]
    fn test_from_config_rejects_unknown_kind() {
        let config = LimitationConfig {
            enabled: vec!["NewState".to_string()],
            aliases: HashMap::new(),
        };
        assert!(matches!(
            LimitationService::from_config(&config),
            Err(Error::Config(ConfigError::Invalid(_)))
        ));
    }

    #[test]
    fn test_validate_empty_values() {
        let service = LimitationService::with_builtins();
        let result = service.validate(&Limitation::section(Vec::<String>::new()));
        assert!(matches!(
            result,
            Err(Error::Limitation(LimitationError::EmptyValues(_)))
        ));
    }

    #[test]
    fn test_role_limitation_kinds() {
        assert!(LimitationKind::Section.is_role_limitation());
        assert!(LimitationKind::Subtree.is_role_limitation());
        assert!(!LimitationKind::Language.is_role_limitation());
        assert!(!LimitationKind::Owner.is_role_limitation());
    }

    #[test]
    fn test_resolve_rejects_malformed_values() {
        let service = LimitationService::with_builtins();

        assert_eq!(
            service.resolve(&Limitation::subtree(["/1/2/"])).unwrap(),
            LimitationKind::Subtree
        );
        assert!(matches!(
            service.resolve(&Limitation::subtree(["/1/2"])),
            Err(Error::Limitation(LimitationError::InvalidValue { .. }))
        ));
        assert_eq!(
            service
                .resolve(&Limitation::language(Vec::<String>::new()))
                .unwrap(),
            LimitationKind::Language
        );
    }

    #[test]
    fn test_resolve_role_limitation_through_registry() {
        let mut aliases = HashMap::new();
        aliases.insert("SectionId".to_string(), "Section".to_string());
        let config = LimitationConfig {
            enabled: vec!["Language".to_string(), "Owner".to_string()],
            aliases,
        };
        let service = LimitationService::from_config(&config).unwrap();

        assert_eq!(
            service
                .resolve_role_limitation(&Limitation::new("SectionId", ["media"]))
                .unwrap(),
            LimitationKind::Section
        );
        assert!(matches!(
            service.resolve_role_limitation(&Limitation::section(["media"])),
            Err(Error::Limitation(LimitationError::UnknownLimitation(ref id))) if id == "Section"
        ));
        assert!(matches!(
            service.resolve_role_limitation(&Limitation::owner_self()),
            Err(Error::Role(RoleError::InvalidRoleLimitation(_)))
        ));
    }

    #[test]
    fn test_kind_round_trip_through_identifier() {
        for kind in LimitationKind::ALL {
            assert_eq!(LimitationKind::from_str(kind.identifier()).unwrap(), kind);
        }
    }
}
