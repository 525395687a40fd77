//! Run command implementation.
//!
//! Loads the catalogue, resolves configuration for the selected steps and
//! runs them in order.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::cli::args::Cli;
use crate::config::{load_catalogue, resolve_configuration, validate, ConfigValues};
use crate::error::{Result, WorkstrapError};
use crate::runner::{RunOptions, Runner};
use crate::shell::is_elevated;
use crate::steps::StepRegistry;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// The run command implementation.
pub struct RunCommand {
    working_dir: PathBuf,
    config_path: Option<PathBuf>,
    values: ConfigValues,
    only: HashSet<String>,
    dry_run: bool,
    allow_root: bool,
    /// Whether the process runs as root; read once at construction.
    elevated: bool,
}

impl RunCommand {
    /// Create a run command from the parsed flags.
    pub fn new(working_dir: &Path, cli: &Cli) -> Self {
        Self {
            working_dir: working_dir.to_path_buf(),
            config_path: cli.config.clone(),
            values: cli.config_values(),
            only: cli.only_steps(),
            dry_run: cli.dry_run,
            allow_root: cli.allow_root,
            elevated: is_elevated(),
        }
    }

    fn check_preconditions(&self) -> Result<()> {
        if self.elevated && !self.allow_root {
            return Err(WorkstrapError::PreconditionFailed {
                message: "refusing to run as root; steps install into your user account \
                          (pass --allow-root to override)"
                    .to_string(),
            });
        }
        Ok(())
    }

    fn build_options(&self) -> RunOptions {
        RunOptions {
            only: self.only.clone(),
            dry_run: self.dry_run,
            working_dir: Some(self.working_dir.clone()),
        }
    }
}

impl Command for RunCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        self.check_preconditions()?;

        let (catalogue, source) = load_catalogue(&self.working_dir, self.config_path.as_deref())?;
        validate(&catalogue)?;
        info!("Loaded {} steps from {}", catalogue.steps.len(), source);

        let registry = StepRegistry::from_catalogue(&catalogue)?;

        // Reject typos before asking the user anything.
        let unknown = registry.unknown_names(&self.only);
        if !unknown.is_empty() {
            return Err(WorkstrapError::ConfigValidationError {
                message: format!("Unknown step(s) in --only: {}", unknown.join(", ")),
            });
        }

        ui.show_header(catalogue.display_name());
        if self.dry_run {
            ui.message("Dry run: checking steps only, nothing will be changed");
        }

        let required = registry.required_keys(&self.only);
        debug!("Configuration required: {:?}", required);
        let config = resolve_configuration(&self.values, &required, ui)?;

        let outcome = Runner::new(&registry).run(&config, &self.build_options(), ui)?;
        ui.show_run_summary(&outcome.summary());

        // The failed step and its output were already reported.
        match outcome.failure {
            Some(err) => {
                debug!("Run aborted: {}", err);
                Ok(CommandResult::failure(1))
            }
            None => Ok(CommandResult::success()),
        }
    }
}
