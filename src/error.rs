//! # Error Handling
//!
//! This module defines the centralized error handling mechanism for the
//! `repo-fleet` application. It uses the `thiserror` library to create a
//! comprehensive `Error` enum that covers all anticipated failure modes,
//! providing clear and descriptive error messages.
//!
//! Two layers of errors exist in this crate:
//!
//! - **`Error`** (this module): out-of-band failures that stop an operation
//!   before, or outside of, per-repository work: a missing scan root, a bad
//!   configuration file, an external command that could not be launched, or a
//!   Docker Compose wrapper failure.
//!
//! - **`sync::SyncFailure`**: failures *inside* one repository's
//!   synchronization attempt. Those are contained in that repository's
//!   outcome and never abort the batch; see the `sync` module.
//!
//! The `Result` type alias is used to return `Result<T, Error>` from
//! functions, making it easy to handle errors and propagate them up the
//! call stack.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for repo-fleet operations
#[derive(Error, Debug)]
pub enum Error {
    /// The directory given to the repository scanner does not exist.
    #[error("Directory not found: {}", path.display())]
    DirectoryNotFound { path: PathBuf },

    /// An error occurred while reading or parsing the JSON configuration
    /// file.
    ///
    /// This error includes the specific parsing issue and optionally a hint
    /// about how to fix it.
    #[error("Configuration parsing error: {message}{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    ConfigParse {
        message: String,
        /// Optional hint for how to fix the configuration issue
        hint: Option<String>,
    },

    /// A configured repository entry failed validation.
    #[error("Invalid configuration: {message}")]
    ConfigValidation { message: String },

    /// An external command could not be launched at all (binary missing,
    /// spawn failure). Distinct from a command that ran and exited non-zero.
    #[error("Failed to run {command}: {message}")]
    CommandLaunch { command: String, message: String },

    /// A Docker Compose file referenced by the service manager is missing.
    #[error("Docker Compose file not found: {}", path.display())]
    ComposeFileMissing { path: PathBuf },

    /// A Docker or Docker Compose wrapper operation failed.
    #[error("Docker operation failed: {message}")]
    Compose { message: String },

    /// The Docker daemon did not become ready within the wait window.
    #[error("Timeout waiting for Docker daemon to start after {seconds}s")]
    DaemonTimeout { seconds: u64 },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A JSON parsing error, wrapped from `serde_json::Error`.
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_directory_not_found() {
        let error = Error::DirectoryNotFound {
            path: PathBuf::from("/no/such/dir"),
        };
        let display = format!("{}", error);
        assert!(display.contains("Directory not found"));
        assert!(display.contains("/no/such/dir"));
    }

    #[test]
    fn test_error_display_config_parse() {
        let error = Error::ConfigParse {
            message: "Invalid JSON".to_string(),
            hint: None,
        };
        let display = format!("{}", error);
        assert!(display.contains("Configuration parsing error"));
        assert!(display.contains("Invalid JSON"));
        assert!(!display.contains("hint:"));
    }

    #[test]
    fn test_error_display_config_parse_with_hint() {
        let error = Error::ConfigParse {
            message: "Missing path field".to_string(),
            hint: Some("Each repository entry needs a \"path\"".to_string()),
        };
        let display = format!("{}", error);
        assert!(display.contains("Configuration parsing error"));
        assert!(display.contains("Missing path field"));
        assert!(display.contains("hint:"));
        assert!(display.contains("needs a \"path\""));
    }

    #[test]
    fn test_error_display_command_launch() {
        let error = Error::CommandLaunch {
            command: "git pull".to_string(),
            message: "No such file or directory".to_string(),
        };
        let display = format!("{}", error);
        assert!(display.contains("Failed to run git pull"));
        assert!(display.contains("No such file or directory"));
    }

    #[test]
    fn test_error_display_compose_file_missing() {
        let error = Error::ComposeFileMissing {
            path: PathBuf::from("/srv/docker-compose.dependencies.yml"),
        };
        let display = format!("{}", error);
        assert!(display.contains("Docker Compose file not found"));
        assert!(display.contains("docker-compose.dependencies.yml"));
    }

    #[test]
    fn test_error_display_daemon_timeout() {
        let error = Error::DaemonTimeout { seconds: 60 };
        let display = format!("{}", error);
        assert!(display.contains("Timeout waiting for Docker daemon"));
        assert!(display.contains("60"));
    }

    #[test]
    fn test_error_from_io_error() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let error: Error = io_error.into();
        let display = format!("{}", error);
        assert!(display.contains("I/O error"));
        assert!(display.contains("File not found"));
    }

    #[test]
    fn test_error_from_json_error() {
        let json_error = serde_json::from_str::<serde_json::Value>("{unclosed").unwrap_err();
        let error: Error = json_error.into();
        let display = format!("{}", error);
        assert!(display.contains("JSON parsing error"));
    }
}
