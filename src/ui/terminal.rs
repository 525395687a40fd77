//! Interactive terminal UI.

use console::Term;
use std::io::Write;

use crate::error::Result;
use crate::steps::{StepOutcome, StepResult};

use super::theme::{ColorChoice, WorkstrapTheme};
use super::{
    prompt_user, NonInteractiveUI, OutputMode, ProgressSpinner, Prompt, PromptResult, RunSummary,
    UserInterface,
};

/// Interactive terminal UI implementation.
///
/// A spinner runs while a step is checked or applied. It is taken off the
/// screen for prompts and replaced by the step's result line when the
/// step ends. Interactive steps stop it before their command starts.
pub struct TerminalUI {
    term: Term,
    theme: WorkstrapTheme,
    mode: OutputMode,
    spinner: Option<ProgressSpinner>,
}

impl TerminalUI {
    /// Create a new terminal UI.
    pub fn new(mode: OutputMode, colors: ColorChoice) -> Self {
        Self {
            term: Term::stdout(),
            theme: WorkstrapTheme::for_choice(colors),
            mode,
            spinner: None,
        }
    }

    fn write_line(&self, line: &str) {
        match &self.spinner {
            Some(spinner) => spinner.suspend(|| writeln!(&self.term, "{}", line).ok()),
            None => writeln!(&self.term, "{}", line).ok(),
        };
    }
}

impl UserInterface for TerminalUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn message(&mut self, msg: &str) {
        self.write_line(msg);
    }

    fn success(&mut self, msg: &str) {
        let line = self.theme.format_success(msg);
        self.write_line(&line);
    }

    fn warning(&mut self, msg: &str) {
        let line = self.theme.format_warning(msg);
        self.write_line(&line);
    }

    fn error(&mut self, msg: &str) {
        let line = self.theme.format_error(msg);
        match &self.spinner {
            Some(spinner) => spinner.suspend(|| writeln!(Term::stderr(), "{}", line).ok()),
            None => writeln!(Term::stderr(), "{}", line).ok(),
        };
    }

    fn prompt(&mut self, prompt: &Prompt) -> Result<PromptResult> {
        match &self.spinner {
            Some(spinner) => spinner.suspend(|| prompt_user(prompt, &self.term)),
            None => prompt_user(prompt, &self.term),
        }
    }

    fn show_header(&mut self, title: &str) {
        if self.mode.shows_satisfied_steps() {
            writeln!(self.term, "\n{}\n", self.theme.format_header(title)).ok();
        }
    }

    fn announce_step(&mut self, index: usize, total: usize, name: &str, description: Option<&str>) {
        let line = self.theme.format_step(index, total, name, description);
        if self.mode.shows_spinners() {
            self.spinner = Some(ProgressSpinner::new(&line));
        } else if self.mode.shows_satisfied_steps() {
            writeln!(self.term, "{}", line).ok();
        }
    }

    fn hand_over_terminal(&mut self, _name: &str) {
        if let Some(spinner) = self.spinner.take() {
            spinner.stop();
        }
    }

    fn report_step(&mut self, result: &StepResult) {
        let hidden = matches!(result.outcome, StepOutcome::AlreadySatisfied)
            && !self.mode.shows_satisfied_steps();
        let line = self.theme.format_step_result(result);

        match self.spinner.take() {
            Some(spinner) if hidden => spinner.clear(),
            Some(spinner) => spinner.finish_with(line),
            None if hidden => {}
            None => {
                writeln!(self.term, "{}", line).ok();
            }
        }
    }

    fn show_run_summary(&mut self, summary: &RunSummary) {
        if let Some(spinner) = self.spinner.take() {
            spinner.clear();
        }
        for line in self.theme.format_run_summary(summary) {
            writeln!(self.term, "{}", line).ok();
        }
    }

    fn is_interactive(&self) -> bool {
        true
    }
}

/// Create the appropriate UI based on context.
pub fn create_ui(
    interactive: bool,
    mode: OutputMode,
    colors: ColorChoice,
) -> Box<dyn UserInterface> {
    if interactive {
        Box::new(TerminalUI::new(mode, colors))
    } else {
        Box::new(NonInteractiveUI::new(mode, colors))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_ui_output_mode() {
        let ui = TerminalUI::new(OutputMode::Quiet, ColorChoice::never());
        assert_eq!(ui.output_mode(), OutputMode::Quiet);
    }

    #[test]
    fn terminal_ui_is_interactive() {
        let ui = TerminalUI::new(OutputMode::Normal, ColorChoice::never());
        assert!(ui.is_interactive());
    }

    #[test]
    fn hand_over_stops_the_spinner() {
        let mut ui = TerminalUI::new(OutputMode::Normal, ColorChoice::never());
        ui.announce_step(1, 1, "homebrew", None);
        assert!(ui.spinner.is_some());

        ui.hand_over_terminal("homebrew");
        assert!(ui.spinner.is_none());
    }

    #[test]
    fn create_ui_non_interactive() {
        let ui = create_ui(false, OutputMode::Normal, ColorChoice::never());
        assert!(!ui.is_interactive());
    }

    #[test]
    fn create_ui_respects_mode() {
        let ui = create_ui(false, OutputMode::Verbose, ColorChoice::never());
        assert_eq!(ui.output_mode(), OutputMode::Verbose);
    }
}
