//! # Per-Repository Synchronization
//!
//! `Operations` drives one working copy through the synchronization state
//! machine:
//!
//! 1. **Guard** - refuse to touch a repository with staged or unstaged
//!    modifications.
//! 2. **Resolve** - pick the target branch: an explicitly requested branch is
//!    honored as-is, while an empty request or the `main` sentinel defers to
//!    default-branch detection.
//! 3. **Checkout** - switch branches only when the current branch differs.
//! 4. **Pull** - fast-forward from the remote, with a recovery path for
//!    branches that have no tracking information configured.
//!
//! Every failure is contained in the returned [`SyncOutcome`]; this module
//! never panics or aborts a batch. All Git access goes through the injected
//! [`GitRunner`], so the whole state machine is unit-testable without a real
//! repository.

use std::path::Path;

use log::{debug, warn};

use crate::git::{GitRunner, SystemGit};
use crate::scan::Repository;
use crate::sync::classify::{classify, FailureKind, SyncFailure, NOT_A_REPOSITORY_MSG, UNCOMMITTED_MSG};
use crate::sync::{SyncOutcome, DEFAULT_BRANCH, LEGACY_BRANCH};

/// Handles Git operations on a single repository at a time.
pub struct Operations {
    git: Box<dyn GitRunner>,
}

impl Default for Operations {
    fn default() -> Self {
        Self::new()
    }
}

impl Operations {
    /// Create operations backed by the system `git` binary.
    pub fn new() -> Self {
        Self {
            git: Box::new(SystemGit),
        }
    }

    /// Create operations with a custom runner.
    ///
    /// This is primarily used for testing to inject recording mocks.
    #[cfg(test)]
    pub fn with_runner(git: Box<dyn GitRunner>) -> Self {
        Self { git }
    }

    /// Synchronize one repository onto `requested_branch`.
    ///
    /// Never fails outward: every error becomes the repository's outcome.
    pub fn sync_repository(&self, repository: &Repository, requested_branch: &str) -> SyncOutcome {
        match self.try_sync(repository, requested_branch) {
            Ok(message) => SyncOutcome::succeeded(repository, message),
            Err(failure) => {
                if !failure.output.is_empty() {
                    debug!(
                        "{}: git {} output: {}",
                        repository.name,
                        failure.command,
                        failure.output.trim()
                    );
                }
                SyncOutcome::failed(repository, failure)
            }
        }
    }

    fn try_sync(
        &self,
        repository: &Repository,
        requested_branch: &str,
    ) -> Result<String, SyncFailure> {
        if self.has_uncommitted_changes(&repository.path)? {
            return Err(SyncFailure::new(
                FailureKind::UncommittedChanges,
                UNCOMMITTED_MSG,
                "diff",
            ));
        }

        // An explicit branch request is honored as-is; empty or the "main"
        // sentinel defers to per-repository detection.
        let target = if !requested_branch.is_empty() && requested_branch != DEFAULT_BRANCH {
            requested_branch.to_string()
        } else {
            self.default_branch(&repository.path)
        };

        let current = self.current_branch(&repository.path)?;

        let switched = current != target;
        if switched {
            self.run_checked(&repository.path, &["checkout", &target])?;
        }

        self.pull_with_fallback(&repository.path, &target)?;

        Ok(if switched {
            format!("Checked out '{}' and pulled latest changes", target)
        } else {
            format!("Already on '{}', pulled latest changes", target)
        })
    }

    /// Check whether the repository has staged or unstaged modifications.
    ///
    /// Exit status 1 from a `diff --quiet` probe means "differences present"
    /// and is the signal distinguished from genuine execution failure (any
    /// other non-zero code, or a launch failure).
    fn has_uncommitted_changes(&self, path: &Path) -> Result<bool, SyncFailure> {
        const PROBES: [&[&str]; 2] = [&["diff", "--cached", "--quiet"], &["diff", "--quiet"]];

        for probe in PROBES {
            let output = self.git.run(path, probe).map_err(|e| {
                SyncFailure::new(
                    FailureKind::CommandFailed,
                    format!("Failed to check repository status: {}", e),
                    "diff",
                )
            })?;

            match output.code {
                Some(0) => {}
                Some(1) => return Ok(true),
                _ => return Err(classify(&output.text, "diff")),
            }
        }

        Ok(false)
    }

    /// Read the currently checked-out branch name.
    ///
    /// Any failure here means the path is not usable as a repository.
    fn current_branch(&self, path: &Path) -> Result<String, SyncFailure> {
        match self.git.run(path, &["branch", "--show-current"]) {
            Ok(output) if output.success() => Ok(output.text.trim().to_string()),
            Ok(output) => Err(SyncFailure {
                kind: FailureKind::NotARepository,
                message: NOT_A_REPOSITORY_MSG.to_string(),
                command: "branch --show-current".to_string(),
                output: output.text,
            }),
            Err(e) => {
                debug!("current-branch read failed: {}", e);
                Err(SyncFailure::new(
                    FailureKind::NotARepository,
                    NOT_A_REPOSITORY_MSG,
                    "branch --show-current",
                ))
            }
        }
    }

    /// Determine the repository's default branch.
    ///
    /// Remote metadata is authoritative when present; working copies without
    /// a usable remote fall back to local branch probes and finally to a
    /// hard-coded name. Never fails.
    fn default_branch(&self, path: &Path) -> String {
        if let Ok(output) = self.git.run(path, &["symbolic-ref", "refs/remotes/origin/HEAD"]) {
            if output.success() {
                if let Some(name) = output.text.trim().rsplit('/').next() {
                    if !name.is_empty() {
                        return name.to_string();
                    }
                }
            }
        }

        for candidate in [DEFAULT_BRANCH, LEGACY_BRANCH] {
            let reference = format!("refs/heads/{}", candidate);
            if let Ok(output) = self
                .git
                .run(path, &["show-ref", "--verify", "--quiet", &reference])
            {
                if output.success() {
                    return candidate.to_string();
                }
            }
        }

        DEFAULT_BRANCH.to_string()
    }

    /// Pull, recovering from a missing tracking branch.
    ///
    /// A freshly checked-out branch without a configured upstream is common
    /// and recoverable without user intervention; every other pull failure
    /// (conflicts, network, auth) surfaces immediately.
    fn pull_with_fallback(&self, path: &Path, branch: &str) -> Result<(), SyncFailure> {
        match self.run_checked(path, &["pull"]) {
            Ok(()) => Ok(()),
            Err(failure) if failure.kind == FailureKind::NoTrackingBranch => {
                warn!(
                    "no tracking information for '{}', configuring upstream origin/{}",
                    branch, branch
                );
                self.setup_tracking_and_pull(path, branch)
            }
            Err(failure) => Err(failure),
        }
    }

    fn setup_tracking_and_pull(&self, path: &Path, branch: &str) -> Result<(), SyncFailure> {
        self.run_checked(path, &["fetch"])?;

        let upstream = format!("--set-upstream-to=origin/{}", branch);
        if self
            .run_checked(path, &["branch", &upstream, branch])
            .is_err()
        {
            // Binding the upstream failed; pull with an explicit remote and
            // branch instead.
            return self.run_checked(path, &["pull", "origin", branch]);
        }

        self.run_checked(path, &["pull"])
    }

    /// Run a Git command, classifying any non-zero exit.
    fn run_checked(&self, path: &Path, args: &[&str]) -> Result<(), SyncFailure> {
        let output = self.git.run(path, args).map_err(|e| {
            SyncFailure::new(FailureKind::CommandFailed, e.to_string(), args[0])
        })?;

        if output.success() {
            Ok(())
        } else {
            Err(classify(&output.text, args[0]))
        }
    }
}
