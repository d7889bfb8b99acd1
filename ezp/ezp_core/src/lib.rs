//! # ezp Core
//!
//! `ezp_core` provides the building blocks shared by the ezp permission
//! engine: the error hierarchy, strongly-typed identifiers and logging
//! bootstrap.
//!
//! ## Crate Structure
//!
//! - **error**: Error types for all ezp components
//! - **id**: Strongly-typed identifier types
//! - **utils**: Logging helpers

pub mod error;
pub mod id;
pub mod utils;

// Re-export key types for convenience
pub use error::{Error, Result};
pub use id::{ContentId, PolicyId, RoleId, UserGroupId, UserId};
pub use utils::LogLevel;
