//! The step abstraction.
//!
//! A step pairs an idempotency check with an action. The check asks
//! whether the goal state already holds on this machine; the action makes
//! it hold. Neither remembers anything between runs.

use std::path::PathBuf;

use crate::config::{ConfigKey, InterpolationContext, RunConfiguration};
use crate::error::Result;

use super::completed_check::CheckResult;

/// Everything a step may read while it is checked or applied.
pub struct StepContext<'a> {
    /// Resolved run configuration.
    pub config: &'a RunConfiguration,

    /// `${...}` values derived from `config`.
    pub variables: InterpolationContext,

    /// Directory commands and relative paths are resolved against.
    pub working_dir: PathBuf,

    /// Let commands write straight to the terminal instead of capturing.
    pub stream_output: bool,
}

impl<'a> StepContext<'a> {
    /// Create a context for one run.
    pub fn new(config: &'a RunConfiguration, working_dir: impl Into<PathBuf>) -> Self {
        Self {
            config,
            variables: InterpolationContext::from_config(config),
            working_dir: working_dir.into(),
            stream_output: false,
        }
    }

    /// Set whether command output is streamed.
    pub fn with_stream_output(mut self, stream_output: bool) -> Self {
        self.stream_output = stream_output;
        self
    }
}

/// One idempotent provisioning task.
pub trait Step {
    /// Unique name, used for `--only` and in every report line.
    fn name(&self) -> &str;

    /// One-line description.
    fn description(&self) -> Option<&str> {
        None
    }

    /// Run configuration values this step reads.
    fn requires(&self) -> &[ConfigKey] {
        &[]
    }

    /// Whether the action needs the terminal to itself, e.g. an installer
    /// that asks for a password or waits for RETURN.
    fn interactive(&self) -> bool {
        false
    }

    /// Message to confirm before the action runs (a manual install, say).
    fn pause_message(&self, _ctx: &StepContext<'_>) -> Result<Option<String>> {
        Ok(None)
    }

    /// Decide whether the goal state already holds.
    ///
    /// Must not change the machine. An `Err` means the probe itself broke.
    fn check(&self, ctx: &StepContext<'_>) -> Result<CheckResult>;

    /// Bring the machine to the goal state.
    fn apply(&self, ctx: &StepContext<'_>) -> Result<()>;
}

/// A step built from two closures.
///
/// ```
/// use workstrap::steps::{FnStep, Step, StepContext};
/// use workstrap::config::RunConfiguration;
///
/// let step = FnStep::new("noop", |_ctx| Ok(true), |_ctx| Ok(()));
/// let config = RunConfiguration::default();
/// let ctx = StepContext::new(&config, ".");
/// assert!(step.check(&ctx).unwrap().complete);
/// ```
pub struct FnStep<C, A> {
    name: String,
    description: Option<String>,
    requires: Vec<ConfigKey>,
    check: C,
    apply: A,
}

impl<C, A> FnStep<C, A>
where
    C: Fn(&StepContext<'_>) -> Result<bool>,
    A: Fn(&StepContext<'_>) -> Result<()>,
{
    /// `check` returns `true` when the goal state already holds.
    pub fn new(name: impl Into<String>, check: C, apply: A) -> Self {
        Self {
            name: name.into(),
            description: None,
            requires: Vec::new(),
            check,
            apply,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn requiring(mut self, keys: &[ConfigKey]) -> Self {
        self.requires = keys.to_vec();
        self
    }
}

impl<C, A> Step for FnStep<C, A>
where
    C: Fn(&StepContext<'_>) -> Result<bool>,
    A: Fn(&StepContext<'_>) -> Result<()>,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    fn requires(&self) -> &[ConfigKey] {
        &self.requires
    }

    fn check(&self, ctx: &StepContext<'_>) -> Result<CheckResult> {
        Ok(if (self.check)(ctx)? {
            CheckResult::complete(format!("Check passed: {}", self.name))
        } else {
            CheckResult::incomplete(format!("Check pending: {}", self.name), "not done yet")
        })
    }

    fn apply(&self, ctx: &StepContext<'_>) -> Result<()> {
        (self.apply)(ctx)
    }
}
