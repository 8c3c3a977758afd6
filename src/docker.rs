//! # Docker Service Groups
//!
//! Sequential wrappers over the Docker Compose CLI for the two fixed service
//! groups: shared dependencies (databases, message queues) and the
//! microservices themselves. There is no algorithmic content here - each
//! operation shells out to `docker`/`docker compose`, streams its output, and
//! reports the exit status - plus two polling loops: daemon readiness and
//! service health.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use log::debug;

use crate::error::{Error, Result};
use crate::output::Console;

/// Compose project name shared by both service groups.
pub const PROJECT_NAME: &str = "microservices";

/// Compose file for shared dependencies.
pub const DEPENDENCIES_FILE: &str = "docker-compose.dependencies.yml";

/// Compose file for the microservices.
pub const SERVICES_FILE: &str = "docker-compose.services.yml";

const HEALTH_TIMEOUT: Duration = Duration::from_secs(300);
const HEALTH_TICK: Duration = Duration::from_secs(10);
#[cfg(target_os = "macos")]
const DAEMON_TIMEOUT: Duration = Duration::from_secs(60);
#[cfg(target_os = "macos")]
const DAEMON_TICK: Duration = Duration::from_secs(2);

/// Detect the available compose invocation.
///
/// Prefers the `docker compose` plugin and falls back to the standalone
/// `docker-compose` binary, mirroring what is installed on developer
/// machines.
fn compose_program() -> (&'static str, &'static [&'static str]) {
    let plugin_works = Command::new("docker")
        .args(["compose", "version"])
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|status| status.success())
        .unwrap_or(false);

    if plugin_works {
        ("docker", &["compose"])
    } else {
        ("docker-compose", &[])
    }
}

fn compose_command() -> Command {
    let (program, prefix) = compose_program();
    let mut command = Command::new(program);
    command.args(prefix);
    command
}

/// One compose file plus the project settings used to drive it.
pub struct ComposeConfig {
    pub file_path: PathBuf,
    pub project_name: String,
    pub timeout: Duration,
}

impl ComposeConfig {
    pub fn new(file_path: impl Into<PathBuf>) -> Self {
        Self {
            file_path: file_path.into(),
            project_name: PROJECT_NAME.to_string(),
            timeout: HEALTH_TIMEOUT,
        }
    }

    pub fn validate_file(&self) -> Result<()> {
        if !self.file_path.exists() {
            return Err(Error::ComposeFileMissing {
                path: self.file_path.clone(),
            });
        }
        Ok(())
    }

    fn base_args(&self) -> Vec<String> {
        vec![
            "-f".to_string(),
            self.file_path.display().to_string(),
            "-p".to_string(),
            self.project_name.clone(),
        ]
    }

    /// `up -d --build`, streaming output, then wait for health checks.
    pub fn up(&self, console: &Console) -> Result<()> {
        let file = self
            .file_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.file_path.display().to_string());
        console.info(&format!("Starting services from {}...", file));

        self.validate_file()?;

        let args = self.base_args();
        let status = compose_command()
            .args(&args)
            .args(["up", "-d", "--build"])
            .status()
            .map_err(|e| Error::CommandLaunch {
                command: "compose up".to_string(),
                message: e.to_string(),
            })?;

        if !status.success() {
            return Err(Error::Compose {
                message: format!("failed to start services from {}", file),
            });
        }

        console.success("Services started successfully");
        self.wait_for_health(console)
    }

    /// Poll service health until everything is healthy or the window closes.
    ///
    /// On timeout this warns and shows the current status instead of
    /// failing: partially started stacks are still useful.
    pub fn wait_for_health(&self, console: &Console) -> Result<()> {
        console.info("Waiting for services to become healthy...");

        let deadline = Instant::now() + self.timeout;
        loop {
            if Instant::now() >= deadline {
                console.warning("Timeout waiting for all services to become healthy");
                return self.show_status(console);
            }

            thread::sleep(HEALTH_TICK);

            if self.services_healthy()? {
                console.success("All services are healthy");
                return Ok(());
            }
            console.info("Some services are still starting...");
        }
    }

    fn services_healthy(&self) -> Result<bool> {
        let args = self.base_args();
        let output = compose_command()
            .args(&args)
            .args(["ps", "--format", "json"])
            .output()
            .map_err(|e| Error::CommandLaunch {
                command: "compose ps".to_string(),
                message: e.to_string(),
            })?;

        if !output.status.success() {
            return Err(Error::Compose {
                message: "failed to check service status".to_string(),
            });
        }

        let text = String::from_utf8_lossy(&output.stdout);
        debug!("compose ps output: {}", text.trim());
        Ok(all_reported_healthy(&text))
    }

    /// `ps`, streaming output to the terminal.
    pub fn show_status(&self, _console: &Console) -> Result<()> {
        let args = self.base_args();
        let status = compose_command()
            .args(&args)
            .arg("ps")
            .status()
            .map_err(|e| Error::CommandLaunch {
                command: "compose ps".to_string(),
                message: e.to_string(),
            })?;

        if !status.success() {
            return Err(Error::Compose {
                message: "failed to show service status".to_string(),
            });
        }
        Ok(())
    }

    /// `down`, streaming output.
    pub fn down(&self, console: &Console) -> Result<()> {
        console.info("Stopping services...");

        let args = self.base_args();
        let status = compose_command()
            .args(&args)
            .arg("down")
            .status()
            .map_err(|e| Error::CommandLaunch {
                command: "compose down".to_string(),
                message: e.to_string(),
            })?;

        if !status.success() {
            return Err(Error::Compose {
                message: "failed to stop services".to_string(),
            });
        }

        console.success("Services stopped successfully");
        Ok(())
    }

    /// `logs -f [service]`, streaming until interrupted.
    pub fn logs(&self, service: Option<&str>) -> Result<()> {
        let args = self.base_args();
        let mut command = compose_command();
        command.args(&args).args(["logs", "-f"]);
        if let Some(service) = service {
            command.arg(service);
        }

        let status = command.status().map_err(|e| Error::CommandLaunch {
            command: "compose logs".to_string(),
            message: e.to_string(),
        })?;

        if !status.success() {
            return Err(Error::Compose {
                message: "failed to show service logs".to_string(),
            });
        }
        Ok(())
    }
}

/// True when the `ps --format json` listing reports every service healthy.
///
/// Empty output means nothing is running yet, which is not healthy.
fn all_reported_healthy(listing: &str) -> bool {
    let listing = listing.trim();
    if listing.is_empty() {
        return false;
    }
    !listing
        .lines()
        .any(|line| line.contains("unhealthy") || line.contains("starting"))
}

/// Ensure the Docker daemon is reachable, launching it when possible.
pub fn check_daemon(console: &Console) -> Result<()> {
    console.info("Checking Docker daemon status...");

    if daemon_responds()? {
        console.success("Docker daemon is running");
        return Ok(());
    }

    console.warning("Docker daemon is not running");
    start_daemon(console)
}

fn daemon_responds() -> Result<bool> {
    let status = Command::new("docker")
        .arg("info")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map_err(|e| Error::CommandLaunch {
            command: "docker info".to_string(),
            message: e.to_string(),
        })?;
    Ok(status.success())
}

#[cfg(target_os = "macos")]
fn start_daemon(console: &Console) -> Result<()> {
    console.info("Starting Docker daemon...");

    let status = Command::new("open")
        .args(["-a", "Docker"])
        .status()
        .map_err(|e| Error::CommandLaunch {
            command: "open -a Docker".to_string(),
            message: e.to_string(),
        })?;

    if !status.success() {
        return Err(Error::Compose {
            message: "failed to start Docker daemon".to_string(),
        });
    }

    wait_for_daemon(console)
}

#[cfg(not(target_os = "macos"))]
fn start_daemon(_console: &Console) -> Result<()> {
    Err(Error::Compose {
        message: "Docker daemon is not running; start it and retry".to_string(),
    })
}

#[cfg(target_os = "macos")]
fn wait_for_daemon(console: &Console) -> Result<()> {
    console.info("Waiting for Docker daemon to start...");

    let deadline = Instant::now() + DAEMON_TIMEOUT;
    while Instant::now() < deadline {
        thread::sleep(DAEMON_TICK);
        if daemon_responds()? {
            console.success("Docker daemon started successfully");
            return Ok(());
        }
    }

    Err(Error::DaemonTimeout {
        seconds: DAEMON_TIMEOUT.as_secs(),
    })
}

/// Verify that some compose implementation is available and report it.
pub fn check_compose(console: &Console) -> Result<()> {
    console.info("Checking Docker Compose availability...");

    let plugin = Command::new("docker")
        .args(["compose", "version"])
        .output();

    if let Ok(output) = &plugin {
        if output.status.success() {
            let version = String::from_utf8_lossy(&output.stdout);
            console.success(&format!(
                "Docker Compose is available: {}",
                version.trim()
            ));
            return Ok(());
        }
    }

    let standalone = Command::new("docker-compose")
        .arg("version")
        .output()
        .map_err(|e| Error::CommandLaunch {
            command: "docker-compose version".to_string(),
            message: e.to_string(),
        })?;

    if !standalone.status.success() {
        return Err(Error::Compose {
            message: "docker-compose not found".to_string(),
        });
    }

    console.success("docker-compose (standalone) is available");
    Ok(())
}

/// Drives the dependencies and services compose groups under a base
/// directory.
pub struct Manager {
    dependencies: ComposeConfig,
    services: ComposeConfig,
}

impl Manager {
    pub fn new(base_dir: &Path) -> Self {
        Self {
            dependencies: ComposeConfig::new(base_dir.join(DEPENDENCIES_FILE)),
            services: ComposeConfig::new(base_dir.join(SERVICES_FILE)),
        }
    }

    /// Start the shared dependencies, checking daemon and compose first.
    pub fn start_dependencies(&self, console: &Console) -> Result<()> {
        console.info("Starting Docker dependencies workflow...");

        check_daemon(console)?;
        check_compose(console)?;
        self.dependencies.up(console)?;

        console.success("Dependencies workflow completed successfully");
        Ok(())
    }

    /// Start the microservices group.
    pub fn start_services(&self, console: &Console) -> Result<()> {
        console.info("Starting microservices...");

        self.services.up(console)?;

        console.success("Services started successfully");
        Ok(())
    }

    pub fn start_all(&self, console: &Console) -> Result<()> {
        self.start_dependencies(console)?;
        self.start_services(console)?;

        console.success("All services started successfully");
        Ok(())
    }

    /// Stop everything: services first, then dependencies. A services-side
    /// failure only warns so the dependencies still come down.
    pub fn stop(&self, console: &Console) -> Result<()> {
        console.info("Stopping all services...");

        if let Err(e) = self.services.down(console) {
            console.warning(&format!("Failed to stop services: {}", e));
        }

        self.dependencies.down(console)?;

        console.success("All services stopped successfully");
        Ok(())
    }

    /// Show the status of both groups; per-group failures only warn.
    pub fn status(&self, console: &Console) -> Result<()> {
        console.info("Checking service status...");

        console.info("Dependencies status:");
        if self.dependencies.show_status(console).is_err() {
            console.warning("Failed to get dependencies status");
        }

        console.info("Services status:");
        if self.services.show_status(console).is_err() {
            console.warning("Failed to get services status");
        }

        Ok(())
    }

    pub fn logs(&self, service: Option<&str>) -> Result<()> {
        self.dependencies.logs(service)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compose_config_defaults() {
        let config = ComposeConfig::new("/srv/docker-compose.dependencies.yml");
        assert_eq!(config.project_name, "microservices");
        assert_eq!(config.timeout, Duration::from_secs(300));
    }

    #[test]
    fn test_validate_file_missing() {
        let temp = tempfile::tempdir().unwrap();
        let config = ComposeConfig::new(temp.path().join("absent.yml"));

        let result = config.validate_file();
        assert!(matches!(result, Err(Error::ComposeFileMissing { .. })));
    }

    #[test]
    fn test_validate_file_present() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("docker-compose.services.yml");
        std::fs::write(&path, "services: {}\n").unwrap();

        let config = ComposeConfig::new(path);
        assert!(config.validate_file().is_ok());
    }

    #[test]
    fn test_empty_listing_is_not_healthy() {
        assert!(!all_reported_healthy(""));
        assert!(!all_reported_healthy("  \n"));
    }

    #[test]
    fn test_healthy_listing() {
        let listing = r#"{"Name":"db","Health":"healthy"}
{"Name":"queue","Health":"healthy"}"#;
        assert!(all_reported_healthy(listing));
    }

    #[test]
    fn test_unhealthy_or_starting_listing() {
        let unhealthy = r#"{"Name":"db","Health":"healthy"}
{"Name":"queue","Health":"unhealthy"}"#;
        assert!(!all_reported_healthy(unhealthy));

        let starting = r#"{"Name":"db","Health":"starting"}"#;
        assert!(!all_reported_healthy(starting));
    }

    #[test]
    fn test_manager_binds_both_compose_files() {
        let manager = Manager::new(Path::new("/srv/stack"));
        assert_eq!(
            manager.dependencies.file_path,
            Path::new("/srv/stack/docker-compose.dependencies.yml")
        );
        assert_eq!(
            manager.services.file_path,
            Path::new("/srv/stack/docker-compose.services.yml")
        );
    }
}
