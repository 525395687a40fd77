//! Status vocabulary shared by step lines and the run summary.

use super::theme::WorkstrapTheme;
use crate::steps::StepOutcome;

/// Canonical status kinds used across all output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusKind {
    /// The step's action ran and succeeded.
    Applied,
    /// The goal state already held; nothing ran.
    Satisfied,
    /// Dry run: the action would have run.
    WouldApply,
    /// The step's check or action failed.
    Failed,
    /// The step is being checked or applied.
    Running,
    /// Non-fatal warning.
    Warning,
}

impl StatusKind {
    /// Unicode icon.
    pub fn icon(self) -> &'static str {
        match self {
            Self::Applied => "✓",
            Self::Satisfied => "○",
            Self::WouldApply => "◌",
            Self::Failed => "✗",
            Self::Running => "◆",
            Self::Warning => "⚠",
        }
    }

    /// Styled icon string using the given theme.
    pub fn styled(self, theme: &WorkstrapTheme) -> String {
        let icon = self.icon();
        match self {
            Self::Applied => theme.success.apply_to(icon).to_string(),
            Self::Satisfied => theme.dim.apply_to(icon).to_string(),
            Self::WouldApply => theme.info.apply_to(icon).to_string(),
            Self::Failed => theme.error.apply_to(icon).to_string(),
            Self::Running => theme.info.apply_to(icon).to_string(),
            Self::Warning => theme.warning.apply_to(icon).to_string(),
        }
    }

    /// Format a status line: styled icon + message.
    pub fn format(self, theme: &WorkstrapTheme, msg: &str) -> String {
        format!("{} {}", self.styled(theme), msg)
    }
}

impl From<&StepOutcome> for StatusKind {
    fn from(outcome: &StepOutcome) -> Self {
        match outcome {
            StepOutcome::AlreadySatisfied => Self::Satisfied,
            StepOutcome::Applied => Self::Applied,
            StepOutcome::WouldApply => Self::WouldApply,
            StepOutcome::Failed(_) => Self::Failed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_outcome_has_a_distinct_icon() {
        let outcomes = [
            StepOutcome::AlreadySatisfied,
            StepOutcome::Applied,
            StepOutcome::WouldApply,
            StepOutcome::Failed("boom".to_string()),
        ];
        let icons: std::collections::HashSet<_> = outcomes
            .iter()
            .map(|o| StatusKind::from(o).icon())
            .collect();
        assert_eq!(icons.len(), outcomes.len());
    }

    #[test]
    fn plain_theme_format_has_no_escapes() {
        let line = StatusKind::Failed.format(&WorkstrapTheme::plain(), "python");
        assert_eq!(line, "✗ python");
    }
}
