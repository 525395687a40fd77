//! Visual theme and styling.

use console::Style;

use super::progress::format_duration;
use super::{RunSummary, StatusKind};
use crate::steps::{StepOutcome, StepResult};

/// Whether output may carry colour escapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorChoice {
    pub enabled: bool,
}

impl ColorChoice {
    /// Colours are on only for a terminal, and only when neither
    /// `--no-color` nor `NO_COLOR` asked for them to be off.
    pub fn resolve(no_color_flag: bool, no_color_env: bool, is_term: bool) -> Self {
        Self {
            enabled: is_term && !no_color_flag && !no_color_env,
        }
    }

    /// Resolve against the live environment and stdout.
    pub fn detect(no_color_flag: bool) -> Self {
        // https://no-color.org/: any non-empty value disables colour
        let no_color_env = std::env::var_os("NO_COLOR").is_some_and(|v| !v.is_empty());
        Self::resolve(no_color_flag, no_color_env, console::Term::stdout().is_term())
    }

    /// Colours off.
    pub fn never() -> Self {
        Self { enabled: false }
    }

    /// Make the `console` crate agree with this choice.
    ///
    /// dialoguer and indicatif style through `console`, so this also
    /// covers prompts and spinners.
    pub fn apply_globally(self) {
        console::set_colors_enabled(self.enabled);
        console::set_colors_enabled_stderr(self.enabled);
    }
}

/// Visual theme for all workstrap output.
#[derive(Debug, Clone)]
pub struct WorkstrapTheme {
    /// Style for success messages (green).
    pub success: Style,
    /// Style for warning messages (orange).
    pub warning: Style,
    /// Style for error messages (red bold).
    pub error: Style,
    /// Style for informational/running elements (magenta).
    pub info: Style,
    /// Style for dim/secondary text.
    pub dim: Style,
    /// Style for highlighted/important text (bold).
    pub highlight: Style,
    /// Style for step titles (bold).
    pub step_title: Style,
    /// Style for headers (magenta bold).
    pub header: Style,
    /// Style for step numbers and counters (dim).
    pub step_number: Style,
    /// Style for durations (dim).
    pub duration: Style,
    /// Style for box-drawing borders (dim).
    pub border: Style,
}

impl Default for WorkstrapTheme {
    fn default() -> Self {
        Self::new()
    }
}

impl WorkstrapTheme {
    /// Create the coloured theme.
    pub fn new() -> Self {
        Self {
            success: Style::new().green(),
            warning: Style::new().color256(208),
            error: Style::new().red().bold(),
            info: Style::new().magenta(),
            dim: Style::new().dim(),
            highlight: Style::new().bold(),
            step_title: Style::new().bold(),
            header: Style::new().bold().magenta(),
            step_number: Style::new().dim(),
            duration: Style::new().dim(),
            border: Style::new().dim(),
        }
    }

    /// Create a theme without colors (for non-TTY or --no-color).
    pub fn plain() -> Self {
        Self {
            success: Style::new(),
            warning: Style::new(),
            error: Style::new(),
            info: Style::new(),
            dim: Style::new(),
            highlight: Style::new(),
            step_title: Style::new(),
            header: Style::new(),
            step_number: Style::new(),
            duration: Style::new(),
            border: Style::new(),
        }
    }

    /// Pick the theme matching a colour choice.
    pub fn for_choice(choice: ColorChoice) -> Self {
        if choice.enabled {
            Self::new()
        } else {
            Self::plain()
        }
    }

    /// Format a success message (icon + text in green).
    pub fn format_success(&self, msg: &str) -> String {
        format!("{}", self.success.apply_to(format!("✓ {}", msg)))
    }

    /// Format a warning message (icon + text in orange).
    pub fn format_warning(&self, msg: &str) -> String {
        format!("{}", self.warning.apply_to(format!("⚠ {}", msg)))
    }

    /// Format an error message (icon + text in red bold).
    pub fn format_error(&self, msg: &str) -> String {
        format!("{}", self.error.apply_to(format!("✗ {}", msg)))
    }

    /// Format a header banner.
    pub fn format_header(&self, title: &str) -> String {
        format!(
            "{} {}",
            self.header.apply_to("⚙"),
            self.highlight.apply_to(title)
        )
    }

    /// Format the line announcing a step, e.g. `[3/15] homebrew - Install Homebrew`.
    pub fn format_step(
        &self,
        index: usize,
        total: usize,
        name: &str,
        description: Option<&str>,
    ) -> String {
        let counter = self.step_number.apply_to(format!("[{}/{}]", index, total));
        match description {
            Some(description) => format!(
                "{} {} {}",
                counter,
                self.step_title.apply_to(name),
                self.dim.apply_to(format!("- {}", description))
            ),
            None => format!("{} {}", counter, self.step_title.apply_to(name)),
        }
    }

    /// Format the line reporting how a step ended.
    ///
    /// A failure reason spanning several lines keeps its first line on the
    /// status line; the rest (captured command output) follows as a block.
    pub fn format_step_result(&self, result: &StepResult) -> String {
        let status = StatusKind::from(&result.outcome);
        let text = match &result.outcome {
            StepOutcome::AlreadySatisfied => {
                let mut text = format!("{} already satisfied", result.name);
                if let Some(detail) = &result.detail {
                    text.push_str(&format!(" {}", self.dim.apply_to(format!("({})", detail))));
                }
                text
            }
            StepOutcome::Applied => format!(
                "{} applied {}",
                result.name,
                self.duration
                    .apply_to(format!("({})", format_duration(result.duration)))
            ),
            StepOutcome::WouldApply => match &result.detail {
                Some(detail) => format!(
                    "{} would apply {}",
                    result.name,
                    self.dim.apply_to(format!("({})", detail))
                ),
                None => format!("{} would apply", result.name),
            },
            StepOutcome::Failed(reason) => {
                let mut lines = reason.lines();
                let head = format!(
                    "{} {}",
                    self.error.apply_to(format!("{} failed:", result.name)),
                    lines.next().unwrap_or_default()
                );
                let block: Vec<String> = lines
                    .map(|line| {
                        format!("    {} {}", self.border.apply_to("│"), self.dim.apply_to(line))
                    })
                    .collect();
                if block.is_empty() {
                    head
                } else {
                    return format!("{}\n{}", status.format(self, &head), block.join("\n"));
                }
            }
        };
        status.format(self, &text)
    }

    /// Format the end-of-run summary box.
    pub fn format_run_summary(&self, summary: &RunSummary) -> Vec<String> {
        let b = &self.border;
        let mut lines = vec![
            String::new(),
            format!(
                "  {} {}",
                b.apply_to("┌─"),
                b.apply_to("Summary ──────────────────────────")
            ),
        ];

        for step in &summary.step_results {
            let right_side = match (step.duration, step.detail.as_deref()) {
                (Some(duration), _) => self
                    .duration
                    .apply_to(format_duration(duration))
                    .to_string(),
                (None, Some(detail)) => self.dim.apply_to(detail).to_string(),
                (None, None) => String::new(),
            };
            lines.push(
                format!(
                    "  {} {} {:<20} {}",
                    b.apply_to("│"),
                    step.status.styled(self),
                    step.name,
                    right_side
                )
                .trim_end()
                .to_string(),
            );
        }

        lines.push(format!(
            "  {}",
            b.apply_to("├────────────────────────────────────")
        ));
        lines.push(format!(
            "  {} Total: {} {} {}",
            b.apply_to("│"),
            self.duration
                .apply_to(format_duration(summary.total_duration)),
            self.dim.apply_to("·"),
            summary.totals_line(),
        ));
        lines.push(format!(
            "  {}",
            b.apply_to("└────────────────────────────────────")
        ));

        lines.push(match &summary.failed_step {
            Some(step) => format!("  {}", self.format_error(&format!("Setup failed at {}", step))),
            None if summary.dry_run => {
                format!("  {}", self.format_success("Dry run complete, nothing was changed"))
            }
            None => format!("  {}", self.format_success("Setup complete!")),
        });
        lines
    }
}
