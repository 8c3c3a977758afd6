//! # Sync Command Implementation
//!
//! Scans a directory for Git repositories (or takes the set pinned in the
//! config file) and syncs each one in parallel: check out the target branch
//! and pull the latest changes. Exits 0 when every repository succeeds and 1
//! when at least one fails.
//!
//! Repository selection, in order:
//! 1. The positional directory argument - scan it.
//! 2. Repositories listed in the config file, when any.
//! 3. The config file's `scanDirectory` - scan it.
//! 4. The current directory - scan it.

use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use anyhow::Result;
use clap::Args;

use repo_fleet::config::Config;
use repo_fleet::output::{Console, OutputConfig};
use repo_fleet::scan::Repository;
use repo_fleet::sync::{BatchResult, Syncer};

/// Sync Git repositories in a directory
#[derive(Args, Debug)]
pub struct SyncArgs {
    /// Directory to scan for Git repositories
    #[arg(value_name = "DIR")]
    pub directory: Option<PathBuf>,

    /// Git branch to check out and pull (defaults to the configured branch,
    /// then to per-repository default-branch detection)
    #[arg(short, long, value_name = "BRANCH")]
    pub branch: Option<String>,

    /// Path to the config.json file.
    /// Can also be set with the `REPO_FLEET_CONFIG` environment variable.
    #[arg(short, long, value_name = "FILE", env = "REPO_FLEET_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Execute the `sync` command.
pub fn execute(args: SyncArgs, output: OutputConfig) -> Result<()> {
    let config = Config::load(args.config.as_deref())?;
    let branch = args.branch.unwrap_or_else(|| config.git_branch.clone());

    let console = Arc::new(Console::new(output));
    let syncer = Syncer::new(console.clone());

    let result = run_sync(&args.directory, &config, &syncer, &console, &branch)?;

    if result.total == 0 {
        console.warning("No repositories found");
        return Ok(());
    }

    syncer.print_summary(&result);
    console.plain("");

    if result.all_succeeded() {
        console.success(&format!(
            "All {} repositories synced successfully!",
            result.succeeded
        ));
    } else {
        console.warning(&format!(
            "Synced {}/{} repositories successfully. {} failed.",
            result.succeeded, result.total, result.failed
        ));
        process::exit(1);
    }

    Ok(())
}

fn run_sync(
    directory: &Option<PathBuf>,
    config: &Config,
    syncer: &Syncer,
    console: &Console,
    branch: &str,
) -> Result<BatchResult> {
    if let Some(dir) = directory {
        return Ok(syncer.sync_all(dir, branch)?);
    }

    if !config.repositories.is_empty() {
        config.validate()?;
        let repositories: Vec<Repository> = config
            .repositories
            .iter()
            .map(|entry| Repository {
                path: entry.path.clone(),
                name: entry.name.clone(),
            })
            .collect();

        console.info(&format!(
            "Syncing {} configured repositories",
            repositories.len()
        ));
        console.plain("");

        return Ok(syncer.sync_repositories(&repositories, branch));
    }

    if let Some(dir) = &config.scan_directory {
        return Ok(syncer.sync_all(dir, branch)?);
    }

    let cwd = std::env::current_dir()?;
    Ok(syncer.sync_all(&cwd, branch)?)
}
