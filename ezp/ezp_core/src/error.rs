//! Error types for the ezp permission engine.
//!
//! Errors are organized by subsystem, each with its own error type. The
//! root error type, `Error`, wraps any of them so callers can handle
//! failures uniformly at the top level.
//!
//! A denied permission check is *not* an error: `can_user` returns
//! `Ok(false)`. Only the operation boundary turns a deny into
//! [`PermissionError::Unauthorized`].

use crate::id::RoleId;
use thiserror::Error;

/// Root error type for ezp.
#[derive(Debug, Error)]
pub enum Error {
    /// Limitation registry and validation errors
    #[error("Limitation error: {0}")]
    Limitation(#[from] LimitationError),

    /// Role storage errors
    #[error("Role error: {0}")]
    Role(#[from] RoleError),

    /// Authorization failures at an operation boundary
    #[error("Permission error: {0}")]
    Permission(#[from] PermissionError),

    /// Engine configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors related to limitations.
#[derive(Debug, Error)]
pub enum LimitationError {
    /// A stored policy references a limitation identifier with no
    /// registered evaluator. This is a configuration fault, never a deny.
    #[error("Unknown limitation: {0}")]
    UnknownLimitation(String),

    /// A limitation value is malformed for its type
    #[error("Invalid value '{value}' for limitation {identifier}: {reason}")]
    InvalidValue {
        /// Limitation identifier
        identifier: String,

        /// Offending value
        value: String,

        /// Why the value was rejected
        reason: String,
    },

    /// A limitation carries no values at all
    #[error("Limitation {0} has no values")]
    EmptyValues(String),
}

/// Errors related to role storage and assignment.
#[derive(Debug, Error)]
pub enum RoleError {
    /// Role with the given ID was not found
    #[error("Role not found: {0}")]
    RoleNotFound(RoleId),

    /// Role already exists or conflicts with stored data
    #[error("Role conflict: {0}")]
    Conflict(String),

    /// Limitation kind cannot be used on a role assignment
    #[error("Limitation {0} cannot be used as a role limitation")]
    InvalidRoleLimitation(String),
}

/// Authorization failures.
#[derive(Debug, Error)]
pub enum PermissionError {
    /// The current user may not perform the requested function
    #[error("The User does not have the '{function}' '{module}' permission")]
    Unauthorized {
        /// Requested module
        module: String,

        /// Requested function
        function: String,

        /// Login of the user the check ran for
        user: String,
    },
}

/// Errors related to engine configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to parse a configuration document
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),

    /// Configuration is syntactically valid but semantically wrong
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Result type used throughout ezp.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_conversion() {
        let err: Error = LimitationError::UnknownLimitation("Foo".to_string()).into();
        assert!(matches!(
            err,
            Error::Limitation(LimitationError::UnknownLimitation(_))
        ));

        let err: Error = RoleError::RoleNotFound(RoleId::new()).into();
        assert!(matches!(err, Error::Role(RoleError::RoleNotFound(_))));

        let err: Error = std::io::Error::new(std::io::ErrorKind::NotFound, "ezp.toml").into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_unauthorized_display() {
        let err: Error = PermissionError::Unauthorized {
            module: "content".to_string(),
            function: "publish".to_string(),
            user: "editor".to_string(),
        }
        .into();

        assert!(err
            .to_string()
            .contains("The User does not have the 'publish' 'content' permission"));
    }

    #[test]
    fn test_invalid_value_display() {
        let err = LimitationError::InvalidValue {
            identifier: "Language".to_string(),
            value: "german".to_string(),
            reason: "expected a code like eng-GB".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid value 'german' for limitation Language: expected a code like eng-GB"
        );
    }
}
