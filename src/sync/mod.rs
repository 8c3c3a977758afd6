//! # Repository Synchronization
//!
//! The core of `repo-fleet`: bringing every working copy in a batch onto a
//! target branch and fast-forwarding it from its remote, in parallel, with a
//! deterministic per-repository report.
//!
//! ## Structure
//!
//! - **`classify`**: maps raw Git failure output to a closed set of
//!   `FailureKind` categories with fixed user-facing messages. Matching is
//!   priority-ordered; the first rule wins.
//! - **`operations`**: the per-repository state machine - uncommitted-change
//!   guard, default-branch resolution, conditional checkout, and
//!   pull-with-fallback for branches without tracking information.
//! - **`syncer`**: the fan-out/fan-in orchestrator. One parallel task per
//!   repository, outcomes written into slots indexed by discovery position,
//!   one join barrier, then aggregation.
//!
//! ## Containment
//!
//! A failure inside one repository's attempt becomes that repository's
//! `SyncOutcome` and never aborts the batch or disturbs sibling workers. Only
//! a Discovery failure (missing scan root) aborts before any work starts.

pub mod classify;
pub mod operations;
pub mod syncer;

pub use classify::{classify, FailureKind, SyncFailure};
pub use operations::Operations;
pub use syncer::{BatchResult, Syncer};

use crate::scan::Repository;

/// Branch name used both as the final resolution fallback and as the request
/// sentinel: asking for `main` means "use the repository's detected default".
pub const DEFAULT_BRANCH: &str = "main";

/// Historical default branch, checked after `main` during resolution.
pub(crate) const LEGACY_BRANCH: &str = "master";

/// The result of one repository's synchronization attempt.
///
/// Created exactly once per repository and never mutated afterwards. The raw
/// command output behind a failure stays in the internal [`SyncFailure`] (and
/// the debug log); only the category and the one-line message travel here.
#[derive(Debug, Clone)]
pub struct SyncOutcome {
    pub repository: Repository,
    pub success: bool,
    /// Failure category; absent on success.
    pub failure: Option<FailureKind>,
    /// Human-readable one-line summary, always present.
    pub message: String,
}

impl SyncOutcome {
    pub(crate) fn succeeded(repository: &Repository, message: String) -> Self {
        Self {
            repository: repository.clone(),
            success: true,
            failure: None,
            message,
        }
    }

    pub(crate) fn failed(repository: &Repository, failure: SyncFailure) -> Self {
        Self {
            repository: repository.clone(),
            success: false,
            failure: Some(failure.kind),
            message: failure.message,
        }
    }
}
