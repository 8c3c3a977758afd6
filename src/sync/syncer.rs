//! # Batch Orchestration
//!
//! `Syncer` fans a batch of repositories out across parallel workers and
//! collects the outcomes deterministically.
//!
//! ## Ordering
//!
//! Each worker writes its outcome into a pre-sized slot at the repository's
//! discovery index - never an append-on-completion list - so the final
//! `BatchResult.outcomes` order always matches discovery order, no matter
//! which workers finish first. Progress lines, by contrast, are emitted as
//! outcomes become known: their order is completion order and is allowed to
//! diverge from the report order.
//!
//! ## Isolation
//!
//! Workers share nothing mutable except their own result slot and the
//! line-serialized [`Console`] sink. Each worker touches only its own
//! repository's filesystem subtree, so parallel execution across
//! repositories is always safe. No timeout wraps an individual attempt: a
//! hung external pull blocks its worker until the process returns.

use std::path::Path;
use std::sync::Arc;

use rayon::prelude::*;

use crate::error::Result;
use crate::output::{emoji, Console};
use crate::scan::{scan_directory, Repository};
use crate::sync::{Operations, SyncOutcome};

/// Aggregate result of one synchronization run.
#[derive(Debug, Clone, Default)]
pub struct BatchResult {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// Per-repository outcomes, ordered by discovery order.
    pub outcomes: Vec<SyncOutcome>,
}

impl BatchResult {
    fn from_outcomes(outcomes: Vec<SyncOutcome>) -> Self {
        let succeeded = outcomes.iter().filter(|o| o.success).count();
        Self {
            total: outcomes.len(),
            succeeded,
            failed: outcomes.len() - succeeded,
            outcomes,
        }
    }

    pub fn all_succeeded(&self) -> bool {
        self.failed == 0
    }
}

/// Orchestrates the parallel synchronization of many repositories.
pub struct Syncer {
    operations: Operations,
    console: Arc<Console>,
}

impl Syncer {
    pub fn new(console: Arc<Console>) -> Self {
        Self {
            operations: Operations::new(),
            console,
        }
    }

    /// Create a syncer with custom operations, for tests.
    #[cfg(test)]
    pub fn with_operations(operations: Operations, console: Arc<Console>) -> Self {
        Self { operations, console }
    }

    /// Scan `root` and synchronize every discovered repository.
    ///
    /// A scan failure (missing root) aborts the batch before any work
    /// starts; zero discovered repositories is a normal, empty result.
    pub fn sync_all(&self, root: &Path, branch: &str) -> Result<BatchResult> {
        let repositories = scan_directory(root)?;

        if repositories.is_empty() {
            return Ok(BatchResult::default());
        }

        self.console
            .info(&format!("Found {} repositories", repositories.len()));
        self.console.plain("");

        Ok(self.sync_repositories(&repositories, branch))
    }

    /// Synchronize an explicit set of repositories in parallel.
    ///
    /// One worker per repository; a single join barrier precedes
    /// aggregation. Per-repository failures never abort the batch.
    pub fn sync_repositories(&self, repositories: &[Repository], branch: &str) -> BatchResult {
        let mut slots: Vec<Option<SyncOutcome>> = Vec::new();
        slots.resize_with(repositories.len(), || None);

        repositories
            .par_iter()
            .zip(slots.par_iter_mut())
            .for_each(|(repository, slot)| {
                let folder = emoji(self.console.config(), "📂", "[DIR]");
                self.console.plain(&format!("  {} {}", folder, repository.name));

                let outcome = self.operations.sync_repository(repository, branch);

                let mark = if outcome.success {
                    emoji(self.console.config(), "✅", "[OK]")
                } else {
                    emoji(self.console.config(), "❌", "[FAIL]")
                };
                self.console.plain(&format!("     {} {}", mark, outcome.message));

                *slot = Some(outcome);
            });

        let outcomes = slots
            .into_iter()
            .map(|slot| slot.expect("every worker writes its own slot"))
            .collect();

        BatchResult::from_outcomes(outcomes)
    }

    /// Print the Total/Successful/Failed summary block.
    pub fn print_summary(&self, result: &BatchResult) {
        self.console.plain("");
        self.console.plain("Summary:");
        self.console.plain(&format!("  Total: {}", result.total));
        self.console.plain(&format!("  Successful: {}", result.succeeded));
        self.console.plain(&format!("  Failed: {}", result.failed));
    }
}
