//! Subcommands
//!
//! Each subcommand loads a fixture, runs against it and reports its
//! result through the process exit code: 0 for success, 1 for a denied
//! check or an invalid fixture.

pub mod access;
pub mod check;
pub mod validate;

use anyhow::Result;
use ezp_policy::{EngineConfig, InMemoryRoleStore, PermissionResolver};

use crate::fixture::Fixture;

/// Build a resolver over the fixture's store.
fn resolver_for(
    fixture: &Fixture,
    config: &EngineConfig,
) -> Result<PermissionResolver<InMemoryRoleStore>> {
    Ok(PermissionResolver::from_config(fixture.store.clone(), config)?)
}
