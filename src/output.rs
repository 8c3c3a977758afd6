//! # Console Output
//!
//! This module provides utilities for controlling CLI output appearance and
//! the shared `Console` sink used by concurrent sync workers.
//!
//! ## Respecting User Preferences
//!
//! The module respects the following environment variables and flags:
//! - `--color=never|always|auto` - CLI flag for color control
//! - `NO_COLOR` - Disables colors when set (per https://no-color.org/)
//! - `CLICOLOR=0` - Disables colors
//! - `CLICOLOR_FORCE=1` - Forces colors even in non-TTY
//! - `TERM=dumb` - Disables colors for dumb terminals
//!
//! ## Concurrency
//!
//! `Console` is the only shared mutable resource between parallel sync
//! workers. It serializes whole output lines behind a mutex so two workers
//! can never interleave fragments of a line; the relative order of lines from
//! different workers is completion order and is deliberately unspecified.

use std::env;
use std::sync::Mutex;

use console::style;

/// Output configuration for controlling colors and emojis.
#[derive(Debug, Clone)]
pub struct OutputConfig {
    /// Whether colors and emojis should be used in output.
    pub use_color: bool,
}

impl OutputConfig {
    /// Create an output configuration from environment and CLI flag.
    ///
    /// # Arguments
    /// * `color_flag` - The value of the --color CLI flag: "always", "never", or "auto"
    ///
    /// # Behavior
    /// - `--color=always`: Force colors on (overrides NO_COLOR)
    /// - `--color=never`: Force colors off
    /// - `--color=auto`: Detect based on environment
    pub fn from_env_and_flag(color_flag: &str) -> Self {
        let use_color = match color_flag.to_lowercase().as_str() {
            "always" => true,
            "never" => false,
            _ => Self::detect_color_support(),
        };

        Self { use_color }
    }

    /// Detect whether color output is supported based on environment.
    fn detect_color_support() -> bool {
        // The presence of NO_COLOR (even if empty) disables colors
        if env::var_os("NO_COLOR").is_some() {
            return false;
        }

        if env::var("CLICOLOR").is_ok_and(|v| v == "0") {
            return false;
        }

        if env::var("CLICOLOR_FORCE").is_ok_and(|v| v != "0" && !v.is_empty()) {
            return true;
        }

        if env::var("TERM").is_ok_and(|v| v == "dumb") {
            return false;
        }

        // Use console crate's detection for TTY and color support
        console::Term::stdout().features().colors_supported()
    }

    /// Create a configuration with colors always enabled.
    #[cfg(test)]
    pub fn with_color() -> Self {
        Self { use_color: true }
    }

    /// Create a configuration with colors always disabled.
    #[cfg(test)]
    pub fn without_color() -> Self {
        Self { use_color: false }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self::from_env_and_flag("auto")
    }
}

/// Returns the appropriate string based on color configuration.
///
/// When colors are enabled, returns the emoji. When disabled, returns
/// the plain text alternative.
pub fn emoji<'a>(config: &OutputConfig, emoji_str: &'a str, plain: &'a str) -> &'a str {
    if config.use_color {
        emoji_str
    } else {
        plain
    }
}

/// A line-oriented console sink shared between concurrent workers.
///
/// Each method emits exactly one line while holding the internal lock, so
/// output from parallel sync tasks never corrupts mid-line.
#[derive(Debug)]
pub struct Console {
    config: OutputConfig,
    lock: Mutex<()>,
}

impl Console {
    pub fn new(config: OutputConfig) -> Self {
        Self {
            config,
            lock: Mutex::new(()),
        }
    }

    /// Access the underlying output configuration.
    pub fn config(&self) -> &OutputConfig {
        &self.config
    }

    fn line(&self, text: String) {
        let _guard = self.lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        println!("{}", text);
    }

    /// Emit a line exactly as given.
    pub fn plain(&self, message: &str) {
        self.line(message.to_string());
    }

    pub fn info(&self, message: &str) {
        let prefix = emoji(&self.config, "ℹ️ ", "[INFO]");
        self.line(format!("{} {}", prefix, self.paint_cyan(message)));
    }

    pub fn success(&self, message: &str) {
        let prefix = emoji(&self.config, "✅", "[OK]");
        self.line(format!("{} {}", prefix, self.paint_green(message)));
    }

    pub fn warning(&self, message: &str) {
        let prefix = emoji(&self.config, "⚠️ ", "[WARN]");
        self.line(format!("{} {}", prefix, self.paint_yellow(message)));
    }

    pub fn error(&self, message: &str) {
        let prefix = emoji(&self.config, "❌", "[FAIL]");
        self.line(format!("{} {}", prefix, self.paint_red(message)));
    }

    fn paint_cyan(&self, s: &str) -> String {
        if self.config.use_color {
            style(s).cyan().to_string()
        } else {
            s.to_string()
        }
    }

    fn paint_green(&self, s: &str) -> String {
        if self.config.use_color {
            style(s).green().to_string()
        } else {
            s.to_string()
        }
    }

    fn paint_yellow(&self, s: &str) -> String {
        if self.config.use_color {
            style(s).yellow().to_string()
        } else {
            s.to_string()
        }
    }

    fn paint_red(&self, s: &str) -> String {
        if self.config.use_color {
            style(s).red().to_string()
        } else {
            s.to_string()
        }
    }
}

impl Default for Console {
    fn default() -> Self {
        Self::new(OutputConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_always() {
        let config = OutputConfig::from_env_and_flag("always");
        assert!(config.use_color);
    }

    #[test]
    fn test_color_never() {
        let config = OutputConfig::from_env_and_flag("never");
        assert!(!config.use_color);
    }

    #[test]
    fn test_emoji_helper_with_color() {
        let config = OutputConfig::with_color();
        assert_eq!(emoji(&config, "📂", "[DIR]"), "📂");
    }

    #[test]
    fn test_emoji_helper_without_color() {
        let config = OutputConfig::without_color();
        assert_eq!(emoji(&config, "📂", "[DIR]"), "[DIR]");
    }

    #[test]
    fn test_console_is_sync() {
        fn assert_sync<T: Sync>() {}
        assert_sync::<Console>();
    }
}
