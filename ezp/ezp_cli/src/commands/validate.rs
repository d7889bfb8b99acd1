//! The `validate` command

use anyhow::Result;
use clap::Args;
use ezp_policy::{EngineConfig, LimitationService};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::fixture::{Fixture, FixtureFile};

/// Arguments for the validate command
#[derive(Args)]
pub struct ValidateArgs {
    /// Fixture file to validate
    #[clap(long)]
    pub fixture: PathBuf,
}

/// Implementation of the validate command
pub fn execute_validate(args: &ValidateArgs, config: &EngineConfig) -> Result<ExitCode> {
    let file = FixtureFile::read(&args.fixture)?;
    let service = LimitationService::from_config(&config.limitations)?;

    let mut problems = file.problems(&service);
    let (roles, users, contents) = (file.roles.len(), file.users.len(), file.contents.len());

    // Dangling role, user and group references only show up when building.
    if problems.is_empty() {
        if let Err(e) = Fixture::build(file) {
            problems.push(format!("{:#}", e));
        }
    }

    if problems.is_empty() {
        println!(
            "Fixture is valid: {} roles, {} users, {} content items",
            roles, users, contents
        );
        return Ok(ExitCode::SUCCESS);
    }

    for problem in &problems {
        println!("error: {}", problem);
    }
    println!("{} problem(s) found", problems.len());

    Ok(ExitCode::from(1))
}
