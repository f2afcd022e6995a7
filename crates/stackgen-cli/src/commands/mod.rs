//! CLI command definitions and dispatch.

pub mod generate;

use clap::{Parser, Subcommand};

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(
    name = "stackgen",
    version,
    about = "Generate docker-compose stacks for PHP applications"
)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate docker-compose.yml and service build file locations from a
    /// stack description.
    Generate(generate::GenerateArgs),
}

/// Dispatches the parsed CLI to its command implementation.
///
/// # Errors
///
/// Returns the error of the executed command.
pub fn execute(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Generate(args) => generate::execute(args),
    }
}
