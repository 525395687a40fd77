//! User interface components.
//!
//! This module provides:
//! - [`UserInterface`] trait for UI abstraction
//! - [`TerminalUI`] for interactive terminal usage
//! - [`NonInteractiveUI`] for CI/headless environments
//! - [`MockUI`] for tests
//! - Prompts, spinners and the colour theme
//!
//! # Example
//!
//! ```
//! use workstrap::ui::{create_ui, ColorChoice, OutputMode};
//!
//! // Use non-interactive mode for testability
//! let mut ui = create_ui(false, OutputMode::Quiet, ColorChoice::never());
//! ui.show_header("My workstation");
//! ui.success("Setup complete!");
//! ```

pub mod icons;
pub mod mock;
pub mod non_interactive;
pub mod output;
pub mod progress;
pub mod prompts;
pub mod spinner;
pub mod terminal;
pub mod theme;

pub use icons::StatusKind;
pub use mock::MockUI;
pub use non_interactive::NonInteractiveUI;
pub use output::OutputMode;
pub use progress::format_duration;
pub use prompts::prompt_user;
pub use spinner::ProgressSpinner;
pub use terminal::{create_ui, TerminalUI};
pub use theme::{ColorChoice, WorkstrapTheme};

use std::time::Duration;

use crate::error::Result;
use crate::steps::{StepOutcome, StepResult};

/// Trait for user interface interactions.
///
/// This trait allows mocking the UI in tests.
pub trait UserInterface {
    /// Get the current output mode.
    fn output_mode(&self) -> OutputMode;

    /// Display a message to the user.
    fn message(&mut self, msg: &str);

    /// Display a success message.
    fn success(&mut self, msg: &str);

    /// Display a warning message.
    fn warning(&mut self, msg: &str);

    /// Display an error message.
    fn error(&mut self, msg: &str);

    /// Show a prompt and get user input.
    fn prompt(&mut self, prompt: &Prompt) -> Result<PromptResult>;

    /// Show a header/banner.
    fn show_header(&mut self, title: &str);

    /// Announce that a step is about to be checked.
    ///
    /// `index` is 1-based.
    fn announce_step(&mut self, index: usize, total: usize, name: &str, description: Option<&str>);

    /// Give the terminal to an interactive step's command until the step
    /// is reported. Any spinner is stopped so the command's prompts show.
    fn hand_over_terminal(&mut self, name: &str);

    /// Report how a step ended.
    fn report_step(&mut self, result: &StepResult);

    /// Show the end-of-run summary.
    fn show_run_summary(&mut self, summary: &RunSummary);

    /// Check if running in interactive mode.
    fn is_interactive(&self) -> bool;
}

/// A prompt to show to the user.
#[derive(Debug, Clone)]
pub struct Prompt {
    /// Unique key for the prompt (used for lookup in tests).
    pub key: String,
    /// The question to display.
    pub question: String,
    /// The type of prompt.
    pub prompt_type: PromptType,
    /// Default value if user just presses enter.
    pub default: Option<String>,
}

/// The type of prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptType {
    /// Yes/no confirmation.
    Confirm,
    /// Free-form text input.
    Input,
    /// Text input that is not echoed.
    Password,
}

/// Result of a prompt.
#[derive(Debug, Clone)]
pub enum PromptResult {
    /// Boolean result from confirm.
    Bool(bool),
    /// String result from input or password.
    String(String),
}

impl PromptResult {
    /// Get as string, suitable for interpolation.
    pub fn as_string(&self) -> String {
        match self {
            Self::Bool(b) => b.to_string(),
            Self::String(s) => s.clone(),
        }
    }

    /// Get as bool if this is a Bool result.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

/// One line of the end-of-run summary.
#[derive(Debug, Clone)]
pub struct StepSummary {
    pub name: String,
    pub status: StatusKind,
    /// Only set for steps whose action ran.
    pub duration: Option<Duration>,
    pub detail: Option<String>,
}

impl From<&StepResult> for StepSummary {
    fn from(result: &StepResult) -> Self {
        let duration = match result.outcome {
            StepOutcome::Applied | StepOutcome::Failed(_) => Some(result.duration),
            _ => None,
        };
        Self {
            name: result.name.clone(),
            status: StatusKind::from(&result.outcome),
            duration,
            detail: result.detail.clone(),
        }
    }
}

/// Totals shown after a run.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub step_results: Vec<StepSummary>,
    pub total_duration: Duration,
    pub applied: usize,
    pub satisfied: usize,
    pub would_apply: usize,
    /// Name of the step that stopped the run.
    pub failed_step: Option<String>,
    /// Steps never reached because the run stopped early.
    pub not_run: usize,
    pub dry_run: bool,
}

impl RunSummary {
    /// Whether every step ended satisfied, applied or planned.
    pub fn success(&self) -> bool {
        self.failed_step.is_none()
    }

    /// One-line totals, e.g. "2 applied · 5 already satisfied".
    pub fn totals_line(&self) -> String {
        let mut parts = Vec::new();
        if self.dry_run {
            parts.push(format!("{} would apply", self.would_apply));
        } else {
            parts.push(format!("{} applied", self.applied));
        }
        parts.push(format!("{} already satisfied", self.satisfied));
        if self.failed_step.is_some() {
            parts.push("1 failed".to_string());
        }
        if self.not_run > 0 {
            parts.push(format!("{} not run", self.not_run));
        }
        parts.join(" · ")
    }
}
