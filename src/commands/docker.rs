//! # Docker Command Implementation
//!
//! Thin CLI surface over the `docker` service-group manager: start the
//! dependency group, the microservices group, or both; stop, show status,
//! and stream logs. The compose files are resolved under a base directory
//! taken from `--directory`, the config file's `scanDirectory`, or the
//! current directory.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Subcommand};

use repo_fleet::config::Config;
use repo_fleet::docker::Manager;
use repo_fleet::output::{Console, OutputConfig};

/// Manage Docker containers and dependencies
#[derive(Args, Debug)]
pub struct DockerArgs {
    #[command(subcommand)]
    command: DockerCommands,

    /// Base directory containing the docker-compose files
    #[arg(short, long, global = true, value_name = "DIR")]
    directory: Option<PathBuf>,

    /// Path to the config.json file.
    /// Can also be set with the `REPO_FLEET_CONFIG` environment variable.
    #[arg(short, long, global = true, value_name = "FILE", env = "REPO_FLEET_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum DockerCommands {
    /// Start Docker services
    Start {
        #[command(subcommand)]
        target: StartTarget,
    },

    /// Stop all Docker services
    Stop,

    /// Show Docker services status
    Status,

    /// Show logs for Docker services
    Logs {
        /// Service to show logs for; all services when omitted
        #[arg(value_name = "SERVICE")]
        service: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
enum StartTarget {
    /// Start shared dependencies only (databases, message queues, ...)
    Deps,

    /// Start microservices only
    Services,

    /// Start both dependencies and microservices
    All,
}

/// Execute the `docker` command.
pub fn execute(args: DockerArgs, output: OutputConfig) -> Result<()> {
    let console = Console::new(output);
    let base_dir = resolve_base_dir(&args)?;
    let manager = Manager::new(&base_dir);

    match args.command {
        DockerCommands::Start { target } => match target {
            StartTarget::Deps => manager.start_dependencies(&console)?,
            StartTarget::Services => manager.start_services(&console)?,
            StartTarget::All => manager.start_all(&console)?,
        },
        DockerCommands::Stop => manager.stop(&console)?,
        DockerCommands::Status => manager.status(&console)?,
        DockerCommands::Logs { service } => manager.logs(service.as_deref())?,
    }

    Ok(())
}

fn resolve_base_dir(args: &DockerArgs) -> Result<PathBuf> {
    if let Some(dir) = &args.directory {
        return Ok(dir.canonicalize().unwrap_or_else(|_| dir.clone()));
    }

    let config = Config::load(args.config.as_deref())?;
    if let Some(dir) = config.scan_directory {
        return Ok(dir);
    }

    Ok(std::env::current_dir()?)
}
