//! External tool integration for dom
//!
//! - [`ansible`]: inventory/playbook discovery and `ansible` / `ansible-playbook` commands
//! - [`terraform`]: `terraform` subcommands and import-script replay
//! - [`export`]: renderers for the files those wrappers consume
//! - [`process`]: child processes with inherited stdio

pub mod ansible;
pub mod error;
pub mod export;
pub mod process;
pub mod terraform;

pub use ansible::{Ansible, Playbook};
pub use error::{Result, ToolError};
pub use process::{ToolCommand, exit_code};
pub use terraform::{ImportReport, ImportStep, Terraform, TerraformCommand};
