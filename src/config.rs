//! JSON configuration file loading and validation.
//!
//! The config file uses camelCase keys:
//!
//! ```json
//! {
//!   "repositories": [{"path": "/work/api", "name": "api"}],
//!   "scanDirectory": "/work",
//!   "gitBranch": "main"
//! }
//! ```
//!
//! All fields are optional; `gitBranch` defaults to `main`.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::scan::GIT_MARKER;

/// Name of the config file looked up in the working directory.
pub const CONFIG_FILE: &str = "config.json";

/// A repository pinned explicitly in the configuration file.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RepositoryEntry {
    pub path: PathBuf,
    pub name: String,
}

/// Tool configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Explicit repositories to sync; when empty, directory scanning is used.
    #[serde(default)]
    pub repositories: Vec<RepositoryEntry>,

    /// Default directory to scan when no directory argument is given.
    #[serde(default)]
    pub scan_directory: Option<PathBuf>,

    /// Branch to check out and pull. `main` defers to per-repository
    /// default-branch detection.
    #[serde(default = "default_branch")]
    pub git_branch: String,
}

fn default_branch() -> String {
    crate::sync::DEFAULT_BRANCH.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            repositories: Vec::new(),
            scan_directory: None,
            git_branch: default_branch(),
        }
    }
}

impl Config {
    /// Load configuration.
    ///
    /// With an explicit `path` the file must exist and parse. Otherwise
    /// `./config.json` is tried, then `<config_dir>/repo-fleet/config.json`,
    /// and finally the built-in defaults.
    pub fn load(path: Option<&Path>) -> Result<Config> {
        if let Some(path) = path {
            return Self::from_file(path);
        }

        let local = PathBuf::from(CONFIG_FILE);
        if local.exists() {
            return Self::from_file(&local);
        }

        if let Some(dir) = dirs::config_dir() {
            let fallback = dir.join("repo-fleet").join(CONFIG_FILE);
            if fallback.exists() {
                return Self::from_file(&fallback);
            }
        }

        Ok(Config::default())
    }

    /// Parse a configuration file.
    pub fn from_file(path: &Path) -> Result<Config> {
        let data = fs::read_to_string(path).map_err(|e| Error::ConfigParse {
            message: format!("failed to read {}: {}", path.display(), e),
            hint: None,
        })?;

        serde_json::from_str(&data).map_err(|e| Error::ConfigParse {
            message: format!("failed to parse {}: {}", path.display(), e),
            hint: Some("expected a JSON object with \"repositories\", \"scanDirectory\", and \"gitBranch\" keys".to_string()),
        })
    }

    /// Validate the explicitly configured repository entries.
    ///
    /// Only meaningful in configured mode; scan mode validates nothing here
    /// because the scanner itself filters to Git working copies.
    pub fn validate(&self) -> Result<()> {
        if self.repositories.is_empty() {
            return Err(Error::ConfigValidation {
                message: "no repositories configured".to_string(),
            });
        }

        for (index, entry) in self.repositories.iter().enumerate() {
            if entry.path.as_os_str().is_empty() {
                return Err(Error::ConfigValidation {
                    message: format!("repository {}: path is required", index),
                });
            }
            if entry.name.is_empty() {
                return Err(Error::ConfigValidation {
                    message: format!("repository {}: name is required", index),
                });
            }
            if !entry.path.exists() {
                return Err(Error::ConfigValidation {
                    message: format!(
                        "repository {}: path {} does not exist",
                        entry.name,
                        entry.path.display()
                    ),
                });
            }
            if !entry.path.is_dir() {
                return Err(Error::ConfigValidation {
                    message: format!(
                        "repository {}: path {} is not a directory",
                        entry.name,
                        entry.path.display()
                    ),
                });
            }
            if !entry.path.join(GIT_MARKER).exists() {
                return Err(Error::ConfigValidation {
                    message: format!(
                        "repository {}: path {} is not a git repository",
                        entry.name,
                        entry.path.display()
                    ),
                });
            }
        }

        Ok(())
    }
}
