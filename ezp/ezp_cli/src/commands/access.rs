//! The `access` command

use anyhow::Result;
use clap::Args;
use ezp_policy::{AccessResult, EngineConfig, PermissionContext};
use std::path::PathBuf;
use std::process::ExitCode;

use super::resolver_for;
use crate::fixture::Fixture;

/// Arguments for the access command
#[derive(Args)]
pub struct AccessArgs {
    /// Fixture file with roles, users and content
    #[clap(long)]
    pub fixture: PathBuf,

    /// Login of the user to check for
    #[clap(long)]
    pub user: String,

    /// Module, e.g. content
    #[clap(long, default_value = "content")]
    pub module: String,

    /// Function, e.g. edit
    #[clap(long)]
    pub function: String,
}

/// Implementation of the access command
pub fn execute_access(args: &AccessArgs, config: &EngineConfig) -> Result<ExitCode> {
    let fixture = Fixture::load(&args.fixture)?;
    let resolver = resolver_for(&fixture, config)?;
    let context = PermissionContext::new(fixture.user(&args.user)?);

    let access = resolver.has_access(&context, &args.module, &args.function)?;
    print!("{}", render(&access));

    Ok(if access.is_possible() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    })
}

fn render(access: &AccessResult) -> String {
    match access {
        AccessResult::Unlimited => "unlimited\n".to_string(),
        AccessResult::Denied => "denied\n".to_string(),
        AccessResult::Limited(sets) => {
            let mut out = String::from("limited\n");
            for set in sets {
                match &set.limitation {
                    Some(limitation) => out.push_str(&format!("  role limited to {}\n", limitation)),
                    None => out.push_str("  role unlimited\n"),
                }
                for policy in &set.policies {
                    out.push_str(&format!("    {}\n", policy));
                }
            }
            out
        }
    }
}
