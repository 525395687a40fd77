//! Non-interactive UI for CI/headless environments.

use crate::error::{Result, WorkstrapError};
use crate::steps::{StepOutcome, StepResult};

use super::prompts::parse_bool;
use super::theme::{ColorChoice, WorkstrapTheme};
use super::{OutputMode, Prompt, PromptResult, PromptType, RunSummary, UserInterface};

/// UI implementation for non-interactive mode.
///
/// Writes plain lines: no spinners, no prompts. Warnings and errors go
/// to stderr, everything else to stdout.
pub struct NonInteractiveUI {
    mode: OutputMode,
    theme: WorkstrapTheme,
}

impl NonInteractiveUI {
    /// Create a new non-interactive UI.
    pub fn new(mode: OutputMode, colors: ColorChoice) -> Self {
        Self {
            mode,
            theme: WorkstrapTheme::for_choice(colors),
        }
    }
}

impl UserInterface for NonInteractiveUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn message(&mut self, msg: &str) {
        println!("{}", msg);
    }

    fn success(&mut self, msg: &str) {
        println!("{}", self.theme.format_success(msg));
    }

    fn warning(&mut self, msg: &str) {
        eprintln!("{}", self.theme.format_warning(msg));
    }

    fn error(&mut self, msg: &str) {
        eprintln!("{}", self.theme.format_error(msg));
    }

    fn prompt(&mut self, prompt: &Prompt) -> Result<PromptResult> {
        if let Some(default) = &prompt.default {
            return Ok(match prompt.prompt_type {
                PromptType::Confirm => PromptResult::Bool(parse_bool(default)),
                PromptType::Input | PromptType::Password => PromptResult::String(default.clone()),
            });
        }

        Err(WorkstrapError::ConfigValidationError {
            message: format!(
                "Cannot prompt for '{}' in non-interactive mode (no default value)",
                prompt.key
            ),
        })
    }

    fn show_header(&mut self, title: &str) {
        if self.mode.shows_satisfied_steps() {
            println!("\n{}\n", self.theme.format_header(title));
        }
    }

    fn announce_step(&mut self, index: usize, total: usize, name: &str, description: Option<&str>) {
        if self.mode.shows_satisfied_steps() {
            println!(
                "{}",
                self.theme.format_step(index, total, name, description)
            );
        }
    }

    fn hand_over_terminal(&mut self, _name: &str) {}

    fn report_step(&mut self, result: &StepResult) {
        if matches!(result.outcome, StepOutcome::AlreadySatisfied)
            && !self.mode.shows_satisfied_steps()
        {
            return;
        }
        println!("{}", self.theme.format_step_result(result));
    }

    fn show_run_summary(&mut self, summary: &RunSummary) {
        for line in self.theme.format_run_summary(summary) {
            println!("{}", line);
        }
    }

    fn is_interactive(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ui() -> NonInteractiveUI {
        NonInteractiveUI::new(OutputMode::Normal, ColorChoice::never())
    }

    #[test]
    fn is_never_interactive() {
        assert!(!ui().is_interactive());
    }

    #[test]
    fn keeps_output_mode() {
        let ui = NonInteractiveUI::new(OutputMode::Quiet, ColorChoice::never());
        assert_eq!(ui.output_mode(), OutputMode::Quiet);
    }

    #[test]
    fn prompt_without_default_is_an_error() {
        let prompt = Prompt {
            key: "hostname".to_string(),
            question: "Hostname?".to_string(),
            prompt_type: PromptType::Input,
            default: None,
        };

        let err = ui().prompt(&prompt).unwrap_err();
        assert!(err.to_string().contains("hostname"));
    }

    #[test]
    fn prompt_uses_default() {
        let prompt = Prompt {
            key: "continue".to_string(),
            question: "Continue?".to_string(),
            prompt_type: PromptType::Confirm,
            default: Some("yes".to_string()),
        };

        let result = ui().prompt(&prompt).unwrap();
        assert_eq!(result.as_bool(), Some(true));
    }
}
