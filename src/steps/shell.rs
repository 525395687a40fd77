//! Steps defined in the catalogue as shell commands.

use std::collections::HashMap;

use tracing::debug;

use crate::config::{resolve_command, resolve_string, CompletedCheck, ConfigKey, StepConfig};
use crate::error::{Result, WorkstrapError};
use crate::shell::{execute, CommandOptions};

use super::completed_check::{run_check, CheckResult};
use super::step::{Step, StepContext};

/// Output lines kept from a failed command.
const FAILURE_OUTPUT_LINES: usize = 10;

/// A catalogue step: an optional check plus a shell command.
#[derive(Debug, Clone)]
pub struct ShellStep {
    name: String,
    description: Option<String>,
    requires: Vec<ConfigKey>,
    check: Option<CompletedCheck>,
    command: String,
    pause: Option<String>,
    interactive: bool,
    env: HashMap<String, String>,
}

impl ShellStep {
    /// Create from a catalogue entry.
    pub fn from_config(config: &StepConfig) -> Self {
        Self {
            name: config.name.clone(),
            description: config.description.clone(),
            requires: config.requires.clone(),
            check: config.check.clone(),
            command: config.command.clone(),
            pause: config.pause.clone(),
            interactive: config.interactive,
            env: config.env.clone(),
        }
    }

    /// Configuration values under `WORKSTRAP_*`, then the step's own `env`.
    fn resolved_env(&self, ctx: &StepContext<'_>) -> Result<HashMap<String, String>> {
        let mut env = ctx.variables.command_env();
        for (key, value) in &self.env {
            env.insert(key.clone(), resolve_string(value, &ctx.variables)?);
        }
        Ok(env)
    }

    fn action_error(&self, message: impl Into<String>) -> WorkstrapError {
        WorkstrapError::StepAction {
            step: self.name.clone(),
            message: message.into(),
        }
    }
}

impl Step for ShellStep {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    fn requires(&self) -> &[ConfigKey] {
        &self.requires
    }

    fn interactive(&self) -> bool {
        self.interactive
    }

    fn pause_message(&self, ctx: &StepContext<'_>) -> Result<Option<String>> {
        self.pause
            .as_deref()
            .map(|message| resolve_string(message, &ctx.variables))
            .transpose()
            .map_err(|e| self.action_error(e.to_string()))
    }

    fn check(&self, ctx: &StepContext<'_>) -> Result<CheckResult> {
        let Some(check) = &self.check else {
            return Ok(CheckResult::unchecked());
        };

        run_check(check, &ctx.variables, &ctx.working_dir).map_err(|e| {
            WorkstrapError::StepCheck {
                step: self.name.clone(),
                message: e.to_string(),
            }
        })
    }

    fn apply(&self, ctx: &StepContext<'_>) -> Result<()> {
        let command = resolve_command(&self.command, &ctx.variables)
            .map_err(|e| self.action_error(e.to_string()))?;
        let env = self
            .resolved_env(ctx)
            .map_err(|e| self.action_error(e.to_string()))?;

        // Interactive installers prompt on stdout and must be seen.
        let capture = !(ctx.stream_output || self.interactive);
        let options = CommandOptions {
            cwd: Some(ctx.working_dir.clone()),
            env,
            capture_stdout: capture,
            capture_stderr: capture,
            inherit_stdin: true,
        };

        debug!("Applying step {}", self.name);
        let result = execute(&command, &options).map_err(|e| self.action_error(e.to_string()))?;
        debug!("Step {} command finished in {:?}", self.name, result.duration);

        if result.success {
            return Ok(());
        }

        let mut message = match result.exit_code {
            Some(code) => format!("command exited with code {}", code),
            None => "command was terminated by a signal".to_string(),
        };
        for line in result.output_tail(FAILURE_OUTPUT_LINES) {
            message.push('\n');
            message.push_str(line);
        }
        Err(self.action_error(message))
    }
}
