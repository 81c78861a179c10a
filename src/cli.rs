// ABOUTME: Command-line interface definition using clap derive macros.
// ABOUTME: Defines all subcommands and their arguments.

use clap::{Parser, Subcommand};
use ebdeploy::config::DeployType;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ebdeploy")]
#[command(about = "Deploy application bundles to AWS Elastic Beanstalk")]
#[command(version)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only print the final result (for CI)
    #[arg(short, long, global = true, conflicts_with = "json")]
    pub quiet: bool,

    /// Print JSON lines for scripting
    #[arg(long, global = true)]
    pub json: bool,

    /// Path to the configuration file (defaults to ebdeploy.yml discovery)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new ebdeploy.yml configuration file
    Init {
        /// Application name
        #[arg(long)]
        application: Option<String>,

        /// Target environment name
        #[arg(long)]
        environment: Option<String>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Upload the bundle, publish a version, and roll it out
    Deploy {
        /// Named target (defined in config)
        #[arg(short, long)]
        target: Option<String>,

        /// Source bundle to upload (overrides config)
        #[arg(short, long)]
        bundle: Option<PathBuf>,

        /// Version label (defaults to the bundle file name)
        #[arg(long)]
        version_label: Option<String>,

        /// Version description
        #[arg(long)]
        description: Option<String>,

        /// in-place, swap-to-new, or manual
        #[arg(long)]
        deploy_type: Option<DeployType>,
    },

    /// Show the target environment's status
    Status {
        /// Named target (defined in config)
        #[arg(short, long)]
        target: Option<String>,
    },

    /// Download tail logs from every instance of the target environment
    Logs {
        /// Named target (defined in config)
        #[arg(short, long)]
        target: Option<String>,

        /// Directory to write logs into (overrides config)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}
