//! Mock UI implementation for testing.
//!
//! `MockUI` implements the `UserInterface` trait and captures all
//! interactions for later assertion. It can be configured with
//! pre-determined prompt responses.
//!
//! # Example
//!
//! ```
//! use workstrap::ui::{MockUI, UserInterface};
//!
//! let mut ui = MockUI::new();
//! ui.set_prompt_response("hostname", "studio");
//!
//! // Use ui in code under test...
//! ui.message("Starting setup");
//! ui.success("Done!");
//!
//! // Assert on captured interactions
//! assert!(ui.messages().contains(&"Starting setup".to_string()));
//! assert!(ui.successes().contains(&"Done!".to_string()));
//! ```

use std::collections::HashMap;

use crate::error::{Result, WorkstrapError};
use crate::steps::StepResult;

use super::prompts::parse_bool;
use super::{OutputMode, Prompt, PromptResult, PromptType, RunSummary, UserInterface};

/// Mock UI implementation for testing.
///
/// Non-interactive unless [`MockUI::set_interactive`] says otherwise.
#[derive(Debug, Default)]
pub struct MockUI {
    mode: OutputMode,
    interactive: bool,
    messages: Vec<String>,
    successes: Vec<String>,
    warnings: Vec<String>,
    errors: Vec<String>,
    headers: Vec<String>,
    announced: Vec<(usize, usize, String)>,
    handovers: Vec<String>,
    reports: Vec<StepResult>,
    summaries: Vec<RunSummary>,
    prompt_responses: HashMap<String, String>,
    prompts_shown: Vec<String>,
    password_prompts: Vec<String>,
}

impl MockUI {
    /// Create a new MockUI with Normal output mode.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new MockUI with a specific output mode.
    pub fn with_mode(mode: OutputMode) -> Self {
        Self {
            mode,
            ..Default::default()
        }
    }

    /// Set a response for a prompt key.
    ///
    /// Confirm prompts read "true", "yes", "y" and "1" as yes.
    pub fn set_prompt_response(&mut self, key: &str, response: &str) {
        self.prompt_responses
            .insert(key.to_string(), response.to_string());
    }

    /// Set whether this mock behaves as interactive.
    pub fn set_interactive(&mut self, interactive: bool) {
        self.interactive = interactive;
    }

    /// Get all captured messages.
    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    /// Get all captured success messages.
    pub fn successes(&self) -> &[String] {
        &self.successes
    }

    /// Get all captured warning messages.
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Get all captured error messages.
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// Get all captured headers.
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Names of announced steps, in order.
    pub fn announced_steps(&self) -> Vec<&str> {
        self.announced.iter().map(|(_, _, name)| name.as_str()).collect()
    }

    /// Announced steps as (index, total, name).
    pub fn announcements(&self) -> &[(usize, usize, String)] {
        &self.announced
    }

    /// Steps that were given the terminal, in order.
    pub fn terminal_handovers(&self) -> &[String] {
        &self.handovers
    }

    /// Every step result reported, in order.
    pub fn reports(&self) -> &[StepResult] {
        &self.reports
    }

    /// Get all captured run summaries.
    pub fn summaries(&self) -> &[RunSummary] {
        &self.summaries
    }

    /// Get all prompts that were shown (by key).
    pub fn prompts_shown(&self) -> &[String] {
        &self.prompts_shown
    }

    /// Keys of prompts shown with hidden input.
    pub fn password_prompts(&self) -> &[String] {
        &self.password_prompts
    }

    /// Check if a specific warning was shown.
    pub fn has_warning(&self, msg: &str) -> bool {
        self.warnings.iter().any(|m| m.contains(msg))
    }
}

impl UserInterface for MockUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn message(&mut self, msg: &str) {
        self.messages.push(msg.to_string());
    }

    fn success(&mut self, msg: &str) {
        self.successes.push(msg.to_string());
    }

    fn warning(&mut self, msg: &str) {
        self.warnings.push(msg.to_string());
    }

    fn error(&mut self, msg: &str) {
        self.errors.push(msg.to_string());
    }

    fn prompt(&mut self, prompt: &Prompt) -> Result<PromptResult> {
        self.prompts_shown.push(prompt.key.clone());
        if prompt.prompt_type == PromptType::Password {
            self.password_prompts.push(prompt.key.clone());
        }

        let response = self
            .prompt_responses
            .get(&prompt.key)
            .or(prompt.default.as_ref())
            .ok_or_else(|| WorkstrapError::ConfigValidationError {
                message: format!("MockUI has no response for prompt '{}'", prompt.key),
            })?;

        Ok(match prompt.prompt_type {
            PromptType::Confirm => PromptResult::Bool(parse_bool(response)),
            PromptType::Input | PromptType::Password => PromptResult::String(response.clone()),
        })
    }

    fn show_header(&mut self, title: &str) {
        self.headers.push(title.to_string());
    }

    fn announce_step(&mut self, index: usize, total: usize, name: &str, _description: Option<&str>) {
        self.announced.push((index, total, name.to_string()));
    }

    fn hand_over_terminal(&mut self, name: &str) {
        self.handovers.push(name.to_string());
    }

    fn report_step(&mut self, result: &StepResult) {
        self.reports.push(result.clone());
    }

    fn show_run_summary(&mut self, summary: &RunSummary) {
        self.summaries.push(summary.clone());
    }

    fn is_interactive(&self) -> bool {
        self.interactive
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::steps::StepOutcome;
    use std::time::Duration;

    fn prompt(key: &str, prompt_type: PromptType, default: Option<&str>) -> Prompt {
        Prompt {
            key: key.to_string(),
            question: format!("{}?", key),
            prompt_type,
            default: default.map(str::to_string),
        }
    }

    #[test]
    fn captures_messages() {
        let mut ui = MockUI::new();
        ui.message("hello");
        ui.warning("careful");
        ui.error("broken");

        assert_eq!(ui.messages(), &["hello"]);
        assert!(ui.has_warning("care"));
        assert_eq!(ui.errors(), &["broken"]);
    }

    #[test]
    fn defaults_to_non_interactive() {
        assert!(!MockUI::new().is_interactive());
    }

    #[test]
    fn returns_configured_response() {
        let mut ui = MockUI::new();
        ui.set_prompt_response("hostname", "studio");

        let result = ui
            .prompt(&prompt("hostname", PromptType::Input, None))
            .unwrap();
        assert_eq!(result.as_string(), "studio");
        assert_eq!(ui.prompts_shown(), &["hostname"]);
        assert!(ui.password_prompts().is_empty());
    }

    #[test]
    fn records_password_prompts() {
        let mut ui = MockUI::new();
        ui.set_prompt_response("token", "ghp_x");

        ui.prompt(&prompt("token", PromptType::Password, None))
            .unwrap();
        assert_eq!(ui.password_prompts(), &["token"]);
    }

    #[test]
    fn confirm_parses_response() {
        let mut ui = MockUI::new();
        ui.set_prompt_response("pause", "no");

        let result = ui
            .prompt(&prompt("pause", PromptType::Confirm, Some("yes")))
            .unwrap();
        assert_eq!(result.as_bool(), Some(false));
    }

    #[test]
    fn falls_back_to_prompt_default() {
        let mut ui = MockUI::new();
        let result = ui
            .prompt(&prompt("pause", PromptType::Confirm, Some("yes")))
            .unwrap();
        assert_eq!(result.as_bool(), Some(true));
    }

    #[test]
    fn unanswerable_prompt_is_an_error() {
        let mut ui = MockUI::new();
        assert!(ui
            .prompt(&prompt("version", PromptType::Input, None))
            .is_err());
    }

    #[test]
    fn captures_step_reports() {
        let mut ui = MockUI::new();
        ui.announce_step(1, 2, "homebrew", Some("Install Homebrew"));
        ui.report_step(&StepResult {
            name: "homebrew".to_string(),
            outcome: StepOutcome::AlreadySatisfied,
            duration: Duration::ZERO,
            detail: None,
        });

        assert_eq!(ui.announced_steps(), vec!["homebrew"]);
        assert_eq!(ui.announcements()[0].0, 1);
        assert_eq!(ui.reports().len(), 1);
    }
}
