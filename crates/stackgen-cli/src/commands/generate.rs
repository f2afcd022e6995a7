//! `stackgen generate` — Produce docker-compose.yml from a stack description.

use std::fs;
use std::path::PathBuf;

use clap::Args;

use stackgen_compose::assemble::assemble;
use stackgen_config::config::FullConfig;

/// Arguments for the `generate` subcommand.
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Path to the stack description file.
    #[arg(short, long, default_value = "stackgen.yml")]
    pub config: PathBuf,

    /// Override the output directory from the description.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Executes the `generate` command.
///
/// # Errors
///
/// Returns an error if the description cannot be read, parsed, or validated,
/// or if the output cannot be written. Validation failures list every
/// problem found in the input.
pub fn execute(args: GenerateArgs) -> anyhow::Result<()> {
    if !args.config.exists() {
        anyhow::bail!("stack description not found: {}", args.config.display());
    }

    let mut config = FullConfig::load(&args.config)?;

    if let Some(output) = args.output {
        config.output_path = Some(output);
    }

    let output_path = config.output_path();
    let compose = assemble(&config);
    let yaml = compose.to_yaml()?;

    fs::create_dir_all(&output_path)?;

    let compose_path = output_path.join("docker-compose.yml");
    fs::write(&compose_path, &yaml)?;
    tracing::info!(path = %compose_path.display(), "wrote compose configuration");

    // Create the mount points the render collaborator will fill in, and
    // report each planned file.
    for (service, files) in config.service_files() {
        for file in files {
            if let Some(dir) = file.path_on_host.parent() {
                fs::create_dir_all(dir)?;
            }
            tracing::info!(
                service = %service,
                template = %file.template_path,
                path = %file.path_on_host.display(),
                "planned service file"
            );
        }
    }

    println!("Generated {}", compose_path.display());
    println!("Services: {}", compose.services.len());

    Ok(())
}
