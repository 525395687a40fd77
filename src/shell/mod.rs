//! Shell command execution and platform probes.

pub mod command;
pub mod platform;

pub use command::{execute, CommandOptions, CommandResult};
pub use platform::{has_controlling_terminal, is_ci, is_elevated};
