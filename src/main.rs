// ABOUTME: Entry point for the ebdeploy CLI application.
// ABOUTME: Parses arguments and dispatches to appropriate command handlers.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use commands::DeployOverrides;
use ebdeploy::config::{self, Config};
use ebdeploy::error::Result;
use ebdeploy::output::{Output, OutputMode};
use std::env;
use std::path::Path;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize tracing subscriber based on verbose flag
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let mode = if cli.json {
        OutputMode::Json
    } else if cli.quiet {
        OutputMode::Quiet
    } else {
        OutputMode::Normal
    };

    if let Err(e) = run(cli, mode).await {
        Output::new(mode).error(&e.to_string());
        std::process::exit(1);
    }
}

async fn run(cli: Cli, mode: OutputMode) -> Result<()> {
    let output = Output::new(mode);
    let cwd = env::current_dir()?;

    match cli.command {
        Commands::Init {
            application,
            environment,
            force,
        } => {
            config::init_config(&cwd, application.as_deref(), environment.as_deref(), force)?;
            output.success(&format!("Created {}", config::CONFIG_FILENAME));
            Ok(())
        }
        Commands::Deploy {
            target,
            bundle,
            version_label,
            description,
            deploy_type,
        } => {
            let config = load_config(cli.config.as_deref(), &cwd, target.as_deref())?;
            let overrides = DeployOverrides {
                bundle,
                version_label,
                description,
                deploy_type,
            };
            commands::deploy(config, overrides, output).await
        }
        Commands::Status { target } => {
            let config = load_config(cli.config.as_deref(), &cwd, target.as_deref())?;
            commands::status(config, output).await
        }
        Commands::Logs {
            target,
            output: output_dir,
        } => {
            let config = load_config(cli.config.as_deref(), &cwd, target.as_deref())?;
            commands::logs(config, output_dir, output).await
        }
    }
}

/// Load the explicit or discovered config and apply target overrides.
fn load_config(explicit: Option<&Path>, cwd: &Path, target: Option<&str>) -> Result<Config> {
    let config = match explicit {
        Some(path) => Config::load(path)?,
        None => Config::discover(cwd)?,
    };

    match target {
        Some(name) => config.for_target(name),
        None => Ok(config),
    }
}
