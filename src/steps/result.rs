//! Step states and results.

use std::time::Duration;

/// Where a step is in its check-then-apply lifecycle.
///
/// ```text
/// Pending ─check─> Satisfied
///    │
///    └─check─> Applying ─apply─> Applied
///                  │
///                  └──────────> Failed
/// ```
///
/// A broken check also ends in `Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepState {
    /// Step has not been checked yet.
    Pending,

    /// Goal state already held; the action was skipped.
    Satisfied,

    /// The action is running.
    Applying,

    /// The action ran and succeeded.
    Applied,

    /// The check or the action failed.
    Failed,
}

impl StepState {
    /// Check if this is a terminal state (no more changes expected).
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            StepState::Satisfied | StepState::Applied | StepState::Failed
        )
    }
}

impl std::fmt::Display for StepState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            StepState::Pending => "pending",
            StepState::Satisfied => "satisfied",
            StepState::Applying => "applying",
            StepState::Applied => "applied",
            StepState::Failed => "failed",
        };
        write!(f, "{}", s)
    }
}

/// How a step ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// The check said the goal state already holds.
    AlreadySatisfied,
    /// The action ran and succeeded.
    Applied,
    /// Dry run: the check said the action is needed.
    WouldApply,
    /// The check broke or the action failed, with a short reason.
    Failed(String),
}

impl StepOutcome {
    /// The terminal state matching this outcome.
    ///
    /// A dry-run step never leaves `Pending`.
    pub fn state(&self) -> StepState {
        match self {
            StepOutcome::AlreadySatisfied => StepState::Satisfied,
            StepOutcome::Applied => StepState::Applied,
            StepOutcome::WouldApply => StepState::Pending,
            StepOutcome::Failed(_) => StepState::Failed,
        }
    }
}

/// Result of running one step.
#[derive(Debug, Clone)]
pub struct StepResult {
    /// Step name.
    pub name: String,

    /// How the step ended.
    pub outcome: StepOutcome,

    /// Time spent on the check and, when it ran, the action.
    pub duration: Duration,

    /// What the check observed (e.g. the satisfied path), when available.
    pub detail: Option<String>,
}

impl StepResult {
    /// Whether the run may continue past this step.
    pub fn is_ok(&self) -> bool {
        !matches!(self.outcome, StepOutcome::Failed(_))
    }
}
