//! Command dispatching.
//!
//! This module provides the core command infrastructure:
//! - [`Command`] trait for implementing commands
//! - [`CommandResult`] for uniform result reporting
//! - [`CommandDispatcher`] for choosing a command from the flags

use std::path::PathBuf;

use crate::cli::args::Cli;
use crate::error::Result;
use crate::ui::{ColorChoice, UserInterface};

use super::list::ListCommand;
use super::run::RunCommand;

/// Trait for command implementations.
pub trait Command {
    /// Execute the command.
    ///
    /// An `Err` is printed by `main`; a failed [`CommandResult`] means the
    /// command already reported the problem itself.
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult>;
}

/// Result of command execution.
#[derive(Debug)]
pub struct CommandResult {
    /// Whether the command succeeded.
    pub success: bool,

    /// Exit code to use (0 for success, non-zero for failure).
    pub exit_code: i32,
}

impl CommandResult {
    /// Create a successful result.
    pub fn success() -> Self {
        Self {
            success: true,
            exit_code: 0,
        }
    }

    /// Create a failure result.
    pub fn failure(exit_code: i32) -> Self {
        Self {
            success: false,
            exit_code,
        }
    }
}

/// Dispatches the parsed command line to a command.
pub struct CommandDispatcher {
    working_dir: PathBuf,
    colors: ColorChoice,
}

impl CommandDispatcher {
    /// Create a dispatcher working in `working_dir`.
    pub fn new(working_dir: PathBuf, colors: ColorChoice) -> Self {
        Self {
            working_dir,
            colors,
        }
    }

    /// Execute the command the flags select.
    pub fn dispatch(&self, cli: &Cli, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        if cli.list {
            ListCommand::new(&self.working_dir, cli.config.clone(), self.colors).execute(ui)
        } else {
            RunCommand::new(&self.working_dir, cli).execute(ui)
        }
    }
}
