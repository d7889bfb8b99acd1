//! Policy model.

use ezp_core::id::PolicyId;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::model::Limitation;

/// Module or function name matching anything.
pub const WILDCARD: &str = "*";

/// A (module, function) grant narrowed by zero or more limitations.
///
/// Limitations are AND-combined: the policy grants only if every one of
/// them accepts. A policy without limitations grants on any match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Policy {
    /// The unique ID of this policy.
    #[serde(default)]
    pub id: PolicyId,

    /// The module, e.g. `content`, or `*`.
    pub module: String,

    /// The function, e.g. `publish`, or `*`.
    pub function: String,

    /// The limitations of this policy.
    #[serde(default)]
    pub limitations: Vec<Limitation>,
}

impl Policy {
    /// Create an unlimited policy.
    pub fn new(module: impl Into<String>, function: impl Into<String>) -> Self {
        Self {
            id: PolicyId::new(),
            module: module.into(),
            function: function.into(),
            limitations: Vec::new(),
        }
    }

    /// Add a limitation.
    pub fn with_limitation(mut self, limitation: Limitation) -> Self {
        self.limitations.push(limitation);
        self
    }

    /// Check whether this policy covers `module`/`function`.
    pub fn matches(&self, module: &str, function: &str) -> bool {
        (self.module == WILDCARD || self.module == module)
            && (self.function == WILDCARD || self.function == function)
    }

    /// Whether this policy carries any limitation.
    pub fn is_limited(&self) -> bool {
        !self.limitations.is_empty()
    }
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.module, self.function)?;
        if self.is_limited() {
            write!(f, " [")?;
            for (i, limitation) in self.limitations.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", limitation)?;
            }
            write!(f, "]")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches() {
        let policy = Policy::new("content", "publish");
        assert!(policy.matches("content", "publish"));
        assert!(!policy.matches("content", "edit"));
        assert!(!policy.matches("user", "publish"));
    }

    #[test]
    fn test_wildcard_function() {
        let policy = Policy::new("content", WILDCARD);
        assert!(policy.matches("content", "publish"));
        assert!(policy.matches("content", "remove"));
        assert!(!policy.matches("section", "view"));
    }

    #[test]
    fn test_wildcard_module() {
        let policy = Policy::new(WILDCARD, WILDCARD);
        assert!(policy.matches("section", "assign"));
    }

    #[test]
    fn test_display() {
        let policy =
            Policy::new("content", "edit").with_limitation(Limitation::language(["ger-DE"]));
        assert_eq!(policy.to_string(), "content/edit [Language(ger-DE)]");
        assert_eq!(Policy::new("content", "read").to_string(), "content/read");
    }
}
