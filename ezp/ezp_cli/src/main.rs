use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use ezp_core::utils::{init_tracing, LogLevel};
use ezp_policy::EngineConfig;
use std::path::PathBuf;
use std::process::ExitCode;

mod commands;
mod fixture;

use commands::access::{execute_access, AccessArgs};
use commands::check::{execute_check, CheckArgs};
use commands::validate::{execute_validate, ValidateArgs};

/// ezp permission checker
///
/// Evaluates role, policy and limitation fixtures the way the content
/// repository does.
#[derive(Parser)]
#[clap(author, version, about)]
struct Cli {
    /// Engine configuration file
    #[clap(long, global = true)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error); overrides the config
    #[clap(long, global = true)]
    log_level: Option<String>,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check whether a user may perform a function on an object
    Check(CheckArgs),

    /// Show which policies give a user access to a function
    Access(AccessArgs),

    /// Validate every limitation stored in a fixture
    Validate(ValidateArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::from(2)
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    let config = match &cli.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };

    let level = match &cli.log_level {
        Some(level) => level
            .parse::<LogLevel>()
            .map_err(|_| anyhow!("Invalid log level '{}'", level))?,
        None => config.logging.level,
    };
    init_tracing(level);

    match cli.command {
        Commands::Check(args) => execute_check(&args, &config),
        Commands::Access(args) => execute_access(&args, &config),
        Commands::Validate(args) => execute_validate(&args, &config),
    }
}
