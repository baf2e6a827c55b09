//! Downstream process launch
//!
//! Once the property file has been saved, the dependent service is started
//! through the platform shell and waited on. Its exit status is reported back
//! to the caller for logging; it never changes the outcome of the merge.

use std::process::{Command, ExitStatus};

use thiserror::Error;
use tracing::{info, warn};

/// The downstream command could not be started
#[derive(Debug, Error)]
#[error("failed to launch '{command}': {source}")]
pub struct LaunchError {
    pub command: String,
    #[source]
    pub source: std::io::Error,
}

/// Something that runs the dependent process after a merge.
pub trait Launcher {
    /// Run to completion and return the exit status.
    fn launch(&self) -> Result<ExitStatus, LaunchError>;
}

/// Runs a command line through `sh -c` (or `cmd /C` on Windows).
#[derive(Debug, Clone)]
pub struct ShellLauncher {
    command: String,
}

impl ShellLauncher {
    pub fn new(command: impl Into<String>) -> Self {
        Self { command: command.into() }
    }

    fn shell_command(&self) -> Command {
        if cfg!(windows) {
            let mut cmd = Command::new("cmd");
            cmd.arg("/C").arg(&self.command);
            cmd
        } else {
            let mut cmd = Command::new("sh");
            cmd.arg("-c").arg(&self.command);
            cmd
        }
    }
}

impl Launcher for ShellLauncher {
    fn launch(&self) -> Result<ExitStatus, LaunchError> {
        info!(command = %self.command, "launching");
        let status = self
            .shell_command()
            .status()
            .map_err(|source| LaunchError { command: self.command.clone(), source })?;

        if status.success() {
            info!(command = %self.command, "process exited successfully");
        } else {
            warn!(command = %self.command, code = ?status.code(), "process exited with failure");
        }
        Ok(status)
    }
}
