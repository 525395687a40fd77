//! CLI argument definitions.
//!
//! workstrap is a single command with flags only. The main entry point is
//! the [`Cli`] struct.

use clap::Parser;
use std::collections::HashSet;
use std::path::PathBuf;

use crate::config::ConfigValues;
use crate::ui::OutputMode;

/// workstrap - Idempotent workstation bootstrap.
#[derive(Default, Parser)]
#[command(name = "workstrap")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Hostname to give this machine
    #[arg(short = 'n', long, value_name = "HOSTNAME")]
    pub hostname: Option<String>,

    /// Python version to install
    #[arg(short = 'p', long = "python-version", value_name = "VERSION")]
    pub python_version: Option<String>,

    /// GitHub access token
    #[arg(
        short = 't',
        long = "github-token",
        value_name = "TOKEN",
        env = "WORKSTRAP_GITHUB_TOKEN",
        hide_env_values = true
    )]
    pub github_token: Option<String>,

    /// Path to the step catalogue (overrides ./workstrap.yml)
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Run checks only and report what would be applied
    #[arg(long)]
    pub dry_run: bool,

    /// List the catalogue steps in order and exit
    #[arg(long)]
    pub list: bool,

    /// Run only the named steps (comma-separated)
    #[arg(long, value_delimiter = ',', value_name = "STEPS")]
    pub only: Vec<String>,

    /// Never prompt; fail when a value is missing
    #[arg(long)]
    pub non_interactive: bool,

    /// Allow running as root
    #[arg(long)]
    pub allow_root: bool,

    /// Show command output as it runs
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Minimal output
    #[arg(short, long)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

impl std::fmt::Debug for Cli {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cli")
            .field("hostname", &self.hostname)
            .field("python_version", &self.python_version)
            .field("github_token", &self.github_token.as_ref().map(|_| "[REDACTED]"))
            .field("config", &self.config)
            .field("dry_run", &self.dry_run)
            .field("list", &self.list)
            .field("only", &self.only)
            .field("non_interactive", &self.non_interactive)
            .field("allow_root", &self.allow_root)
            .field("verbose", &self.verbose)
            .field("quiet", &self.quiet)
            .field("no_color", &self.no_color)
            .field("debug", &self.debug)
            .finish()
    }
}

impl Cli {
    /// Configuration values exactly as given on the command line.
    pub fn config_values(&self) -> ConfigValues {
        ConfigValues {
            hostname: self.hostname.clone(),
            version: self.python_version.clone(),
            token: self.github_token.clone(),
        }
    }

    /// Step names passed to `--only`, blanks dropped.
    pub fn only_steps(&self) -> HashSet<String> {
        self.only
            .iter()
            .map(|name| name.trim())
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect()
    }

    pub fn output_mode(&self) -> OutputMode {
        if self.quiet {
            OutputMode::Quiet
        } else if self.verbose {
            OutputMode::Verbose
        } else {
            OutputMode::Normal
        }
    }
}
