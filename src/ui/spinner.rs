//! Progress spinners.

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// A progress spinner shown while a step is checked or applied.
pub struct ProgressSpinner {
    bar: ProgressBar,
}

impl ProgressSpinner {
    /// Create a new spinner with a message.
    pub fn new(message: &str) -> Self {
        let bar = ProgressBar::new_spinner();
        let style = ProgressStyle::default_spinner()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ ")
            .template("{spinner:.magenta} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        bar.set_style(style);
        bar.set_message(message.to_string());
        bar.enable_steady_tick(Duration::from_millis(80));

        Self { bar }
    }

    /// Run `f` with the spinner taken off the screen, e.g. around a prompt.
    pub fn suspend<F: FnOnce() -> R, R>(&self, f: F) -> R {
        self.bar.suspend(f)
    }

    /// Replace the spinner with a final, already-formatted line.
    pub fn finish_with(self, line: String) {
        self.bar.set_style(message_only());
        self.bar.finish_with_message(line);
    }

    /// Stop ticking and leave the current message on screen.
    pub fn stop(self) {
        self.bar.set_style(message_only());
        self.bar.finish();
    }

    /// Remove the spinner without leaving a line behind.
    pub fn clear(self) {
        self.bar.finish_and_clear();
    }
}

fn message_only() -> ProgressStyle {
    ProgressStyle::default_spinner()
        .template("{msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suspend_returns_closure_value() {
        let spinner = ProgressSpinner::new("checking homebrew");
        let answer = spinner.suspend(|| 42);
        assert_eq!(answer, 42);
        spinner.finish_with("✓ homebrew applied".to_string());
    }

    #[test]
    fn spinner_can_be_stopped_or_cleared() {
        ProgressSpinner::new("[1/2] homebrew").stop();
        ProgressSpinner::new("[2/2] fonts").clear();
    }
}
