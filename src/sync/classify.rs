//! Heuristic classification of Git command failures.
//!
//! Git reports most problems as free text on stderr. This module maps that
//! text onto a closed set of [`FailureKind`] categories, each with a fixed,
//! actionable one-line message, so the rest of the tool never string-matches
//! Git output itself.
//!
//! The match table is an explicit ordered list, not a map: some phrases are
//! substrings of others' contexts, so first-match-wins ordering is part of
//! the contract. Matching is case-insensitive.

use thiserror::Error;

/// Closed set of user-facing failure categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    UncommittedChanges,
    AlreadyCurrent,
    BranchNotFound,
    NotARepository,
    PathNotFound,
    PermissionDenied,
    RemoteInaccessible,
    NoTrackingBranch,
    /// Catch-all for output no rule recognizes.
    CommandFailed,
}

/// A classified failure from one Git invocation.
///
/// `message` is the user-facing summary; the attempted command and the raw
/// combined output are preserved here for logging and diagnosis but are not
/// shown by default.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct SyncFailure {
    pub kind: FailureKind,
    pub message: String,
    pub command: String,
    pub output: String,
}

impl SyncFailure {
    /// Build a failure that did not come from command output, e.g. the
    /// uncommitted-changes guard or a spawn error.
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>, command: &str) -> Self {
        Self {
            kind,
            message: message.into(),
            command: command.to_string(),
            output: String::new(),
        }
    }
}

pub(crate) const UNCOMMITTED_MSG: &str =
    "Repository has uncommitted changes. Please commit or stash changes first.";
pub(crate) const NOT_A_REPOSITORY_MSG: &str = "Not a valid Git repository";

/// Substring predicate over the lowercased command output.
enum Needle {
    /// Matches when any listed phrase is present.
    Any(&'static [&'static str]),
    /// Matches when every listed phrase is present.
    All(&'static [&'static str]),
}

impl Needle {
    fn matches(&self, haystack: &str) -> bool {
        match self {
            Needle::Any(phrases) => phrases.iter().any(|p| haystack.contains(p)),
            Needle::All(phrases) => phrases.iter().all(|p| haystack.contains(p)),
        }
    }
}

/// Priority-ordered classification rules; the first matching rule wins.
///
/// The branch-not-found check is an "A or (B and C)" predicate, expressed as
/// two adjacent rules with the same category and message.
const RULES: &[(Needle, FailureKind, &str)] = &[
    (
        Needle::Any(&["uncommitted changes", "would be overwritten"]),
        FailureKind::UncommittedChanges,
        UNCOMMITTED_MSG,
    ),
    (
        Needle::All(&["already on", "main"]),
        FailureKind::AlreadyCurrent,
        "Already on 'main' branch",
    ),
    (
        Needle::Any(&["did not match any file"]),
        FailureKind::BranchNotFound,
        "Branch does not exist in this repository",
    ),
    (
        Needle::All(&["pathspec", "did not match"]),
        FailureKind::BranchNotFound,
        "Branch does not exist in this repository",
    ),
    (
        Needle::Any(&["not a git repository"]),
        FailureKind::NotARepository,
        NOT_A_REPOSITORY_MSG,
    ),
    (
        Needle::Any(&["no such file or directory"]),
        FailureKind::PathNotFound,
        "File or directory not found",
    ),
    (
        Needle::Any(&["permission denied"]),
        FailureKind::PermissionDenied,
        "Permission denied. Check repository permissions.",
    ),
    (
        Needle::Any(&["repository not found", "could not read from remote"]),
        FailureKind::RemoteInaccessible,
        "Remote repository not accessible or not found",
    ),
    (
        Needle::Any(&["no tracking information"]),
        FailureKind::NoTrackingBranch,
        "No tracking branch configured for the current branch",
    ),
    (
        Needle::Any(&["your local changes to the following files"]),
        FailureKind::UncommittedChanges,
        UNCOMMITTED_MSG,
    ),
];

/// Classify the combined output of a failed Git command.
///
/// `command` is the Git subcommand that was attempted (`checkout`, `pull`,
/// ...); it is embedded in the catch-all message and preserved on the
/// returned failure.
pub fn classify(output: &str, command: &str) -> SyncFailure {
    let haystack = output.to_lowercase();

    for (needle, kind, message) in RULES {
        if needle.matches(&haystack) {
            return SyncFailure {
                kind: *kind,
                message: (*message).to_string(),
                command: command.to_string(),
                output: output.to_string(),
            };
        }
    }

    SyncFailure {
        kind: FailureKind::CommandFailed,
        message: format!("Git {} failed: {}", command, output.trim()),
        command: command.to_string(),
        output: output.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_overwritten_changes_on_checkout() {
        let failure = classify(
            "error: Your local changes to the following files would be overwritten by checkout",
            "checkout",
        );
        assert_eq!(failure.kind, FailureKind::UncommittedChanges);
        assert!(failure.message.contains("uncommitted changes"));
    }

    #[test]
    fn test_classify_overwritten_changes_on_merge() {
        let failure = classify(
            "error: Your local changes to the following files would be overwritten by merge",
            "pull",
        );
        assert_eq!(failure.kind, FailureKind::UncommittedChanges);
        assert!(failure.message.contains("commit or stash"));
    }

    #[test]
    fn test_classify_already_on_branch() {
        let failure = classify("Already on 'main'", "checkout");
        assert_eq!(failure.kind, FailureKind::AlreadyCurrent);
        assert!(failure.message.contains("Already on 'main'"));
    }

    #[test]
    fn test_classify_branch_not_found() {
        let failure = classify(
            "error: pathspec 'release-9' did not match any file(s) known to git",
            "checkout",
        );
        assert_eq!(failure.kind, FailureKind::BranchNotFound);
        assert!(failure.message.contains("does not exist"));
    }

    #[test]
    fn test_classify_pathspec_without_file_phrase() {
        // Only the "pathspec" + "did not match" pair, exercising the second
        // branch-not-found rule.
        let failure = classify("pathspec 'x' did not match", "checkout");
        assert_eq!(failure.kind, FailureKind::BranchNotFound);
    }

    #[test]
    fn test_classify_not_a_repository() {
        let failure = classify(
            "fatal: not a git repository (or any of the parent directories): .git",
            "status",
        );
        assert_eq!(failure.kind, FailureKind::NotARepository);
        assert!(failure.message.contains("Not a valid"));
    }

    #[test]
    fn test_classify_path_not_found() {
        let failure = classify("sh: no such file or directory", "pull");
        assert_eq!(failure.kind, FailureKind::PathNotFound);
    }

    #[test]
    fn test_classify_permission_denied() {
        let failure = classify(
            "fatal: could not open '.git/config': Permission denied",
            "status",
        );
        assert_eq!(failure.kind, FailureKind::PermissionDenied);
        assert!(failure.message.contains("Permission denied"));
    }

    #[test]
    fn test_classify_remote_not_found() {
        let failure = classify(
            "fatal: repository 'https://github.com/example/repo.git' not found",
            "pull",
        );
        assert_eq!(failure.kind, FailureKind::RemoteInaccessible);
        assert!(failure.message.contains("not accessible or not found"));
    }

    #[test]
    fn test_classify_remote_unreadable() {
        let failure = classify("fatal: Could not read from remote repository.", "fetch");
        assert_eq!(failure.kind, FailureKind::RemoteInaccessible);
    }

    #[test]
    fn test_classify_no_tracking_information() {
        let failure = classify(
            "There is no tracking information for the current branch.",
            "pull",
        );
        assert_eq!(failure.kind, FailureKind::NoTrackingBranch);
        assert!(failure.message.contains("No tracking branch configured"));
    }

    #[test]
    fn test_classify_default_embeds_command() {
        let failure = classify("fatal: unknown error occurred", "status");
        assert_eq!(failure.kind, FailureKind::CommandFailed);
        assert!(failure.message.contains("status"));
        assert!(failure.message.contains("failed"));
        assert!(failure.message.contains("unknown error occurred"));
    }

    #[test]
    fn test_classify_is_case_insensitive() {
        let failure = classify("FATAL: NOT A GIT REPOSITORY", "status");
        assert_eq!(failure.kind, FailureKind::NotARepository);
    }

    #[test]
    fn test_classify_priority_overwritten_beats_local_changes_rule() {
        // Contains both the rule-1 phrase ("would be overwritten") and the
        // late "your local changes to the following files" phrase; rule 1
        // must win. Same category either way, but the ordering is part of
        // the contract.
        let text = "error: Your local changes to the following files would be overwritten";
        let failure = classify(text, "checkout");
        assert_eq!(failure.kind, FailureKind::UncommittedChanges);
    }

    #[test]
    fn test_classify_preserves_raw_output_and_command() {
        let raw = "fatal: repository 'x' not found";
        let failure = classify(raw, "pull");
        assert_eq!(failure.output, raw);
        assert_eq!(failure.command, "pull");
    }
}
