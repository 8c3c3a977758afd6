//! # Repo Fleet Library
//!
//! This library provides the core functionality for synchronizing a fleet of
//! Git working copies and for driving Docker-Compose-based service groups. It
//! is designed to be used by the `repo-fleet` command-line tool but can also
//! be embedded in other applications that need batch repository maintenance.
//!
//! ## Core Concepts
//!
//! The library is built around a few key pieces:
//!
//! - **Discovery (`scan`)**: Finds the Git working copies directly under a
//!   root directory.
//! - **Synchronization (`sync`)**: The per-repository state machine (guard,
//!   branch resolution, checkout, pull-with-fallback), the classifier that
//!   maps raw Git output to typed failures, and the `Syncer` orchestrator
//!   that fans a batch out across parallel workers.
//! - **Process Boundary (`git`)**: Every Git invocation goes through the
//!   `GitRunner` trait, so tests can substitute deterministic mocks for the
//!   real `git` binary.
//! - **Service Groups (`docker`)**: Sequential wrappers over the Docker
//!   Compose CLI, including daemon readiness and health polling.
//! - **Configuration (`config`)** and **Output (`output`)**: the JSON config
//!   file and the serialized console sink shared by concurrent workers.
//!
//! ## Execution Flow
//!
//! A `sync` run performs the following steps:
//!
//! 1. **Scan**: Enumerate the immediate subdirectories of the root and keep
//!    those containing a `.git` marker.
//! 2. **Fan out**: Dispatch one parallel task per repository.
//! 3. **Synchronize**: Each task runs the guard/resolve/checkout/pull state
//!    machine against its own working copy.
//! 4. **Join and aggregate**: Outcomes land in slots indexed by discovery
//!    position, so the final report order is deterministic even though
//!    completion order is not.

pub mod config;
pub mod docker;
pub mod error;
pub mod git;
pub mod output;
pub mod scan;
pub mod sync;
