//! Discovery of Git working copies under a root directory.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Directory entry that marks a checkout as a Git working copy.
pub const GIT_MARKER: &str = ".git";

/// A discovered Git working copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repository {
    /// Filesystem location of the checkout.
    pub path: PathBuf,
    /// Display label, the final path segment.
    pub name: String,
}

impl Repository {
    /// Build a repository handle from a path, deriving the display name from
    /// the final path segment.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self { path, name }
    }
}

/// Scan `root` for Git working copies.
///
/// Only immediate subdirectories are considered (non-recursive); a
/// subdirectory qualifies iff it directly contains a `.git` entry. Entries
/// are visited in lexicographic filename order, so the returned order is
/// deterministic. An empty root, or one without qualifying subdirectories,
/// yields an empty vector rather than an error.
pub fn scan_directory(root: &Path) -> Result<Vec<Repository>> {
    if !root.exists() {
        return Err(Error::DirectoryNotFound {
            path: root.to_path_buf(),
        });
    }

    let mut entries: Vec<fs::DirEntry> = fs::read_dir(root)?.collect::<std::io::Result<_>>()?;
    entries.sort_by_key(|entry| entry.file_name());

    let mut repositories = Vec::new();
    for entry in entries {
        let path = entry.path();
        if path.is_dir() && path.join(GIT_MARKER).exists() {
            repositories.push(Repository {
                name: entry.file_name().to_string_lossy().into_owned(),
                path,
            });
        }
    }

    Ok(repositories)
}
