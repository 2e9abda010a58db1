//! terraform wrapper
//!
//! Every subcommand runs `terraform` in the Terraform root. `import` replays
//! the generated import script one line at a time.

use crate::error::{Result, ToolError};
use crate::process::{ToolCommand, run_shell_line};
use std::path::{Path, PathBuf};

pub const GENERATED_DIR: &str = "generated";
pub const IMPORT_SCRIPT: &str = "import.sh";

/// Subcommands passed through to terraform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerraformCommand {
    Init,
    Plan,
    Apply { auto_approve: bool },
    Destroy { auto_approve: bool },
    Output,
    StateList,
    Fmt,
    Validate,
}

impl TerraformCommand {
    pub fn args(&self) -> Vec<&'static str> {
        match self {
            TerraformCommand::Init => vec!["init"],
            TerraformCommand::Plan => vec!["plan"],
            TerraformCommand::Apply { auto_approve } => with_approve("apply", *auto_approve),
            TerraformCommand::Destroy { auto_approve } => with_approve("destroy", *auto_approve),
            TerraformCommand::Output => vec!["output"],
            TerraformCommand::StateList => vec!["state", "list"],
            TerraformCommand::Fmt => vec!["fmt", "-recursive"],
            TerraformCommand::Validate => vec!["validate"],
        }
    }
}

fn with_approve(subcommand: &'static str, auto_approve: bool) -> Vec<&'static str> {
    if auto_approve {
        vec![subcommand, "-auto-approve"]
    } else {
        vec![subcommand]
    }
}

/// Progress of an import replay, reported line by line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportStep<'a> {
    Running(&'a str),
    Failed(&'a str),
}

/// Outcome of replaying the import script
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub ran: usize,
    /// Lines whose command exited non-zero or could not be spawned
    pub failed: Vec<String>,
}

/// Terraform project rooted at a directory (default `./terraform`)
#[derive(Debug, Clone)]
pub struct Terraform {
    root: PathBuf,
}

impl Terraform {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn generated_dir(&self) -> PathBuf {
        self.root.join(GENERATED_DIR)
    }

    pub fn command(&self, command: TerraformCommand) -> ToolCommand {
        ToolCommand::new("terraform", &self.root).args(command.args())
    }

    /// Path of `generated/import.sh`, which must exist
    pub fn import_script(&self) -> Result<PathBuf> {
        let path = self.generated_dir().join(IMPORT_SCRIPT);
        if path.is_file() {
            Ok(path)
        } else {
            Err(ToolError::ImportScriptNotFound(path))
        }
    }

    /// Run every command line of the import script through `sh -c`
    ///
    /// A failing line is logged and recorded, and the replay continues.
    pub async fn replay_import<F>(&self, mut on_step: F) -> Result<ImportReport>
    where
        F: FnMut(ImportStep<'_>),
    {
        let script = self.import_script()?;
        let content = std::fs::read_to_string(&script)?;

        let mut report = ImportReport::default();
        for line in script_lines(&content) {
            on_step(ImportStep::Running(line));
            report.ran += 1;

            let ok = match run_shell_line(line, &self.root).await {
                Ok(status) => status.success(),
                Err(e) => {
                    tracing::warn!("Failed to run '{}': {}", line, e);
                    false
                }
            };
            if !ok {
                tracing::warn!("Import command failed: {}", line);
                on_step(ImportStep::Failed(line));
                report.failed.push(line.to_string());
            }
        }

        Ok(report)
    }
}

/// Non-blank lines that are not `#` comments, trimmed
pub fn script_lines(content: &str) -> impl Iterator<Item = &str> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
}
