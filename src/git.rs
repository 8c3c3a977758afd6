//! # Git Process Boundary
//!
//! Every Git invocation in this crate goes through the `GitRunner` trait: a
//! synchronous call with the working copy as working directory, returning the
//! combined stdout+stderr text and the integer exit status. The trait-based
//! design separates the synchronization logic from the concrete process
//! execution, so tests can substitute deterministic mocks without real Git
//! state.
//!
//! `SystemGit` is the production implementation, shelling out to the `git`
//! binary on `PATH`. A launch failure (binary missing, spawn error) is
//! reported as `Error::CommandLaunch` and is distinct from a command that ran
//! and exited non-zero - the latter is visible through `GitOutput::code`.

use std::path::Path;
use std::process::Command;

use log::debug;

use crate::error::{Error, Result};

/// Captured result of one Git invocation.
#[derive(Debug, Clone)]
pub struct GitOutput {
    /// Combined stdout and stderr, lossily decoded.
    pub text: String,
    /// Process exit code; `None` when terminated by a signal.
    pub code: Option<i32>,
}

impl GitOutput {
    /// True when the command exited with status 0.
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Trait for running Git commands - allows mocking in tests.
pub trait GitRunner: Send + Sync {
    /// Run `git <args>` with `dir` as the working directory.
    ///
    /// Returns `Err` only when the process could not be launched; a non-zero
    /// exit is a successful `run` with a failing `GitOutput`.
    fn run(&self, dir: &Path, args: &[&str]) -> Result<GitOutput>;
}

/// The default `GitRunner`, executing the system `git` binary.
///
/// Using the system binary means SSH keys, credential helpers, and any
/// authentication configured in `~/.gitconfig` work unchanged.
pub struct SystemGit;

impl GitRunner for SystemGit {
    fn run(&self, dir: &Path, args: &[&str]) -> Result<GitOutput> {
        debug!("running `git {}` in {}", args.join(" "), dir.display());

        let output = Command::new("git")
            .args(args)
            .current_dir(dir)
            .output()
            .map_err(|e| Error::CommandLaunch {
                command: format!("git {}", args.join(" ")),
                message: e.to_string(),
            })?;

        let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
        text.push_str(&String::from_utf8_lossy(&output.stderr));

        Ok(GitOutput {
            text,
            code: output.status.code(),
        })
    }
}
