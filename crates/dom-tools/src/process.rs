//! Child process spawning for the external tools
//!
//! Every wrapper builds a [`ToolCommand`] and runs it with inherited stdio,
//! so the tool's own output goes straight to the terminal.

use crate::error::{Result, ToolError};
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use tokio::process::Command;

/// A program, its arguments and the directory it runs in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCommand {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: PathBuf,
}

impl ToolCommand {
    pub fn new(program: impl Into<String>, cwd: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: cwd.into(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// The line echoed before running, e.g. `ansible -i inventory/inventory.ini all -m ping`
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Run to completion with inherited stdio
    pub async fn status(&self) -> Result<ExitStatus> {
        ensure_dir(&self.cwd)?;

        tracing::debug!(cwd = %self.cwd.display(), "Running: {}", self.command_line());

        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .current_dir(&self.cwd)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        let mut child = cmd.spawn().map_err(|e| spawn_error(&self.program, e))?;
        Ok(child.wait().await?)
    }
}

/// Run a single line through `sh -c` in `cwd`
pub async fn run_shell_line(line: &str, cwd: &Path) -> Result<ExitStatus> {
    ToolCommand::new("sh", cwd).arg("-c").arg(line).status().await
}

/// Exit code to mirror; a child killed by a signal maps to 1
pub fn exit_code(status: ExitStatus) -> i32 {
    status.code().unwrap_or(1)
}

fn ensure_dir(dir: &Path) -> Result<()> {
    if dir.is_dir() {
        Ok(())
    } else {
        Err(ToolError::DirectoryNotFound(dir.to_path_buf()))
    }
}

fn spawn_error(program: &str, err: std::io::Error) -> ToolError {
    if err.kind() == std::io::ErrorKind::NotFound {
        ToolError::ExecutableNotFound(program.to_string())
    } else {
        ToolError::IoError(err)
    }
}
