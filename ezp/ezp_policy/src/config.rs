//! Engine configuration.
//!
//! Loaded from TOML. Every section and field is optional:
//!
//! ```toml
//! [limitations]
//! enabled = ["Language", "Class", "Section", "Owner", "Subtree"]
//!
//! [limitations.aliases]
//! LanguageCode = "Language"
//!
//! [audit]
//! enabled = true
//! max_entries_per_user = 1000
//! max_users = 10000
//!
//! [logging]
//! level = "info"
//! ```

use ezp_core::error::{ConfigError, Result};
use ezp_core::utils::LogLevel;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use tracing::{info, warn};

use crate::engine::DEFAULT_MAX_USERS;
use crate::limitation::LimitationKind;

/// Which limitation identifiers the registry knows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LimitationConfig {
    /// Built-in identifiers to register under their own name.
    #[serde(default = "default_enabled_limitations")]
    pub enabled: Vec<String>,

    /// Additional identifiers mapped to a built-in identifier.
    #[serde(default)]
    pub aliases: HashMap<String, String>,
}

fn default_enabled_limitations() -> Vec<String> {
    LimitationKind::ALL
        .iter()
        .map(|kind| kind.identifier().to_string())
        .collect()
}

impl Default for LimitationConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled_limitations(),
            aliases: HashMap::new(),
        }
    }
}

/// Audit trail settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditConfig {
    /// Whether decisions are recorded
    #[serde(default = "default_audit_enabled")]
    pub enabled: bool,

    /// Entries kept per user; older ones are dropped first
    #[serde(default = "default_max_entries_per_user")]
    pub max_entries_per_user: usize,

    /// Users kept; the user with the oldest latest entry is dropped first
    #[serde(default = "default_max_users")]
    pub max_users: usize,
}

fn default_audit_enabled() -> bool {
    true
}

fn default_max_entries_per_user() -> usize {
    1000
}

fn default_max_users() -> usize {
    DEFAULT_MAX_USERS
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            enabled: default_audit_enabled(),
            max_entries_per_user: default_max_entries_per_user(),
            max_users: default_max_users(),
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Minimum level emitted
    #[serde(default)]
    pub level: LogLevel,
}

/// Engine configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Limitation registry
    #[serde(default)]
    pub limitations: LimitationConfig,

    /// Audit trail
    #[serde(default)]
    pub audit: AuditConfig,

    /// Logging
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl EngineConfig {
    /// Load configuration from a TOML file.
    ///
    /// A missing file yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            warn!("Configuration file not found: {}", path.display());
            return Ok(Self::default());
        }

        info!("Loading configuration from {}", path.display());
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate configuration from a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(content).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every referenced limitation is a built-in.
    pub fn validate(&self) -> Result<()> {
        for identifier in &self.limitations.enabled {
            if LimitationKind::from_str(identifier).is_err() {
                return Err(ConfigError::Invalid(format!(
                    "unknown built-in limitation '{}'",
                    identifier
                ))
                .into());
            }
        }

        for (alias, target) in &self.limitations.aliases {
            if LimitationKind::from_str(target).is_err() {
                return Err(ConfigError::Invalid(format!(
                    "alias '{}' points to unknown limitation '{}'",
                    alias, target
                ))
                .into());
            }
        }

        if self.audit.enabled && self.audit.max_entries_per_user == 0 {
            return Err(ConfigError::Invalid(
                "audit.max_entries_per_user must be positive when audit is enabled".to_string(),
            )
            .into());
        }

        if self.audit.enabled && self.audit.max_users == 0 {
            return Err(ConfigError::Invalid(
                "audit.max_users must be positive when audit is enabled".to_string(),
            )
            .into());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ezp_core::Error;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.limitations.enabled.len(), 5);
        assert!(config.audit.enabled);
        assert_eq!(config.audit.max_entries_per_user, 1000);
        assert_eq!(config.audit.max_users, 10_000);
        assert_eq!(config.logging.level, LogLevel::Info);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_document_is_default() {
        assert_eq!(EngineConfig::from_toml_str("").unwrap(), EngineConfig::default());
    }

    #[test]
    fn test_parse_partial_document() {
        let config = EngineConfig::from_toml_str(
            r#"
            [limitations]
            enabled = ["Language"]

            [limitations.aliases]
            LanguageCode = "Language"

            [logging]
            level = "debug"
            "#,
        )
        .unwrap();

        assert_eq!(config.limitations.enabled, vec!["Language"]);
        assert_eq!(config.limitations.aliases["LanguageCode"], "Language");
        assert_eq!(config.logging.level, LogLevel::Debug);
        assert!(config.audit.enabled);
    }

    #[test]
    fn test_rejects_unknown_limitation() {
        let result = EngineConfig::from_toml_str(
            r#"
            [limitations]
            enabled = ["Language", "ParentOwner"]
            "#,
        );
        assert!(matches!(result, Err(Error::Config(ConfigError::Invalid(_)))));
    }

    #[test]
    fn test_rejects_malformed_toml() {
        let result = EngineConfig::from_toml_str("[limitations");
        assert!(matches!(result, Err(Error::Config(ConfigError::ParseFailed(_)))));
    }

    #[test]
    fn test_rejects_zero_audit_capacity() {
        let result = EngineConfig::from_toml_str("[audit]\nmax_entries_per_user = 0\n");
        assert!(matches!(result, Err(Error::Config(ConfigError::Invalid(_)))));

        let result = EngineConfig::from_toml_str("[audit]\nmax_users = 0\n");
        assert!(matches!(result, Err(Error::Config(ConfigError::Invalid(_)))));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[audit]\nenabled = false").unwrap();

        let config = EngineConfig::load(file.path()).unwrap();
        assert!(!config.audit.enabled);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = EngineConfig::load(dir.path().join("missing.toml")).unwrap();
        assert_eq!(config, EngineConfig::default());
    }
}
