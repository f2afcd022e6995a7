//! # stackgen — stack description to docker-compose generator
//!
//! Reads a declarative YAML description of a PHP application stack and
//! produces a docker-compose configuration plus per-service build file
//! locations.

mod commands;

use clap::Parser;

use crate::commands::Cli;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    commands::execute(cli)
}
