//! Shared fixtures for the CLI end-to-end tests.

use std::fs;
use std::path::Path;

/// Create a directory that the scanner will treat as a Git working copy.
///
/// The `.git` marker is a plain directory, not a usable repository: real Git
/// commands against it fail, which is exactly what the failure-path tests
/// want.
pub fn fake_repo(root: &Path, name: &str) {
    fs::create_dir_all(root.join(name).join(".git")).unwrap();
}
