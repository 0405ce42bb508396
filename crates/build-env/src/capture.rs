//! Capturing the `bitbake -e` environment dump
//!
//! The dump is produced by sourcing the build environment script in a shell
//! and running the environment command in the same shell:
//!
//! ```text
//! bash -c 'source "$1"; bitbake -e' bash <oe-init-build-env>
//! ```
//!
//! The script path is passed as a positional argument rather than spliced
//! into the command string. The child runs to completion; there is no
//! timeout.

use std::path::Path;
use std::process::Stdio;

use tokio::process::Command;
use tracing::{debug, info};

use crate::error::BuildEnvError;

const DEFAULT_SHELL: &str = "bash";
const DEFAULT_TOOL_COMMAND: &str = "bitbake -e";

/// Runs the environment dump command for a build environment script.
#[derive(Debug, Clone)]
pub struct DumpCapture {
    shell: String,
    tool_command: String,
}

impl DumpCapture {
    /// `bash` + `bitbake -e`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Shell used to source the script. Must understand `-c` and `source`.
    pub fn shell(mut self, shell: impl Into<String>) -> Self {
        self.shell = shell.into();
        self
    }

    /// Command run after the script has been sourced.
    pub fn tool_command(mut self, command: impl Into<String>) -> Self {
        self.tool_command = command.into();
        self
    }

    /// Human-readable command line, used in logs and errors.
    pub fn command_line(&self, script: &Path) -> String {
        format!(
            "{} -c 'source {}; {}'",
            self.shell,
            script.display(),
            self.tool_command
        )
    }

    /// Runs the dump and returns its stdout.
    ///
    /// # Errors
    ///
    /// - [`BuildEnvError::Spawn`] if the shell cannot be started
    /// - [`BuildEnvError::EmptyDump`] if stdout is empty, whatever the exit status
    pub async fn capture(&self, script: &Path) -> Result<String, BuildEnvError> {
        let command = self.command_line(script);
        info!(command = %command, "getting Yocto environment");

        let output = Command::new(&self.shell)
            .arg("-c")
            .arg(format!("source \"$1\"; {}", self.tool_command))
            .arg(&self.shell)
            .arg(script)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|source| BuildEnvError::Spawn {
                command: command.clone(),
                source,
            })?;

        if output.stdout.is_empty() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            debug!(
                status = %output.status,
                stderr = %stderr.trim(),
                "environment dump produced no output"
            );
            return Err(BuildEnvError::EmptyDump { command });
        }

        debug!(
            status = %output.status,
            bytes = output.stdout.len(),
            "environment dump captured"
        );
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl Default for DumpCapture {
    fn default() -> Self {
        Self {
            shell: DEFAULT_SHELL.to_owned(),
            tool_command: DEFAULT_TOOL_COMMAND.to_owned(),
        }
    }
}
