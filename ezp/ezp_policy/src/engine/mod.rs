//! Permission engine.
//!
//! This module provides the request context, the resolver answering
//! permission checks, and the decision audit.

mod audit;
mod context;
mod resolver;

pub use audit::{PermissionAudit, DEFAULT_MAX_USERS};
pub use context::PermissionContext;
pub use resolver::PermissionResolver;
