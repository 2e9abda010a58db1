//! External tool wrapper error types

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ToolError {
    #[error("No inventory found in {}", .0.display())]
    InventoryNotFound(PathBuf),

    #[error("Playbook not found: {name}")]
    PlaybookNotFound {
        name: String,
        /// Playbooks that do exist, for the hint
        available: Vec<String>,
    },

    #[error("{} not found", .0.display())]
    ImportScriptNotFound(PathBuf),

    #[error("Directory not found: {}", .0.display())]
    DirectoryNotFound(PathBuf),

    #[error("{0} not found. Please install it and make sure it is on PATH")]
    ExecutableNotFound(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl ToolError {
    /// The export command that produces the missing input, if any
    pub fn export_hint(&self) -> Option<&'static str> {
        match self {
            ToolError::InventoryNotFound(_) => Some("dom export ansible"),
            ToolError::ImportScriptNotFound(_) => Some("dom export terraform"),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ToolError>;
