//! Command-line interface for workstrap.
//!
//! - [`args`] - Flag definitions using clap's derive macros
//! - [`commands`] - The run and list commands

pub mod args;
pub mod commands;

use std::ffi::OsString;

use clap::error::ErrorKind;
use clap::Parser;

use crate::error::{Result, WorkstrapError};

pub use args::Cli;
pub use commands::{Command, CommandDispatcher, CommandResult, ListCommand, RunCommand};

/// What the command line asked for.
#[derive(Debug)]
pub enum Invocation {
    /// Do the work described by the flags.
    Run(Cli),
    /// Print this text (help or version) and exit successfully.
    Info(String),
}

/// Parse the command line.
///
/// `--help` and `--version` come back as [`Invocation::Info`]. Any other
/// parse failure is an `UnknownFlag` error carrying clap's rendered message
/// and usage.
pub fn parse_invocation<I, T>(args: I) -> Result<Invocation>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    match Cli::try_parse_from(args) {
        Ok(cli) => Ok(Invocation::Run(cli)),
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                Ok(Invocation::Info(e.render().to_string()))
            }
            _ => Err(WorkstrapError::UnknownFlag {
                message: e.render().to_string().trim_end().to_string(),
            }),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn help_is_info() {
        for flag in ["-h", "--help"] {
            match parse_invocation(["workstrap", flag]).unwrap() {
                Invocation::Info(text) => assert!(text.contains("Usage")),
                other => panic!("unexpected invocation: {other:?}"),
            }
        }
    }

    #[test]
    fn version_is_info() {
        match parse_invocation(["workstrap", "--version"]).unwrap() {
            Invocation::Info(text) => assert!(text.contains(env!("CARGO_PKG_VERSION"))),
            other => panic!("unexpected invocation: {other:?}"),
        }
    }

    #[test]
    fn unknown_flag_carries_usage() {
        let err = parse_invocation(["workstrap", "--unknown-flag"]).unwrap_err();
        match err {
            WorkstrapError::UnknownFlag { message } => {
                assert!(message.contains("--unknown-flag"));
                assert!(message.contains("Usage"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn missing_flag_value_is_unknown_flag() {
        assert!(matches!(
            parse_invocation(["workstrap", "--hostname"]),
            Err(WorkstrapError::UnknownFlag { .. })
        ));
    }

    #[test]
    fn flags_parse_to_run() {
        match parse_invocation(["workstrap", "--dry-run"]).unwrap() {
            Invocation::Run(cli) => assert!(cli.dry_run),
            other => panic!("unexpected invocation: {other:?}"),
        }
    }
}
