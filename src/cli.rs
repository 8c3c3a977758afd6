//! CLI argument parsing and command dispatch

use anyhow::Result;
use clap::{Parser, Subcommand};

use repo_fleet::output::OutputConfig;

use crate::commands;

/// Repo Fleet - sync Git repositories and manage service groups
#[derive(Parser, Debug)]
#[command(name = "repo-fleet")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Colorize output (always, never, auto)
    #[arg(long, global = true, value_name = "WHEN", default_value = "auto")]
    color: String,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(long, global = true, value_name = "LEVEL", default_value = "warn")]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Sync Git repositories onto a branch and pull the latest changes
    Sync(commands::sync::SyncArgs),

    /// Manage Docker service groups (dependencies, microservices)
    Docker(commands::docker::DockerArgs),

    /// Generate shell completion scripts
    Completions(commands::completions::CompletionsArgs),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        let env = env_logger::Env::default().default_filter_or(self.log_level.as_str());
        env_logger::Builder::from_env(env)
            .format_timestamp(None)
            .try_init()
            .ok();

        let output = OutputConfig::from_env_and_flag(&self.color);

        match self.command {
            Commands::Sync(args) => commands::sync::execute(args, output),
            Commands::Docker(args) => commands::docker::execute(args, output),
            Commands::Completions(args) => commands::completions::execute(args),
        }
    }
}
