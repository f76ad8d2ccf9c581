//! Blobmigrate CLI Binary
//!
//! Checks a cluster's blob storage layout ahead of an upgrade.

use anyhow::Context;
use blobmigrate::tooling::cli::{Cli, CliContext, CommandOutcome};
use blobmigrate::ExitStatus;
use clap::Parser;
use std::process;

fn run(cli: &Cli) -> anyhow::Result<CommandOutcome> {
    let context = CliContext::new(cli.config.clone()).context("Failed to load configuration")?;
    if let Err(e) = context.init_logging(cli) {
        eprintln!("Warning: logging disabled: {}", e);
    }
    Ok(context.execute(&cli.command))
}

fn main() {
    let cli = Cli::parse();

    match run(&cli) {
        Ok(outcome) => {
            print!("{}", outcome.stdout);
            eprint!("{}", outcome.stderr);
            process::exit(outcome.exit_code());
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            process::exit(ExitStatus::CannotProceed.code());
        }
    }
}
