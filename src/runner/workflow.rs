//! Sequential, fail-fast step execution.

use std::collections::HashSet;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::config::RunConfiguration;
use crate::error::{Result, WorkstrapError};
use crate::steps::{Step, StepContext, StepOutcome, StepRegistry, StepResult, StepState};
use crate::ui::{Prompt, PromptType, RunSummary, StepSummary, UserInterface};

/// Progress events emitted during a run.
#[derive(Debug)]
pub enum RunProgress<'a> {
    /// A step is about to be checked. `index` is 1-based.
    StepStarting {
        name: &'a str,
        index: usize,
        total: usize,
    },
    /// A step moved to a new state.
    StateChanged { name: &'a str, state: StepState },
    /// A step finished.
    StepFinished { result: &'a StepResult },
}

/// State of the run as a whole.
///
/// `Aborted` is terminal: once a step fails no further step is touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Running,
    Completed,
    Aborted,
}

/// Options for one run.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Only run these steps. Empty means every step.
    pub only: HashSet<String>,
    /// Check every step but apply none.
    pub dry_run: bool,
    /// Directory commands run in. Defaults to the current directory.
    pub working_dir: Option<PathBuf>,
}

/// Result of a run.
#[derive(Debug)]
pub struct RunOutcome {
    /// One result per step reached, in run order.
    pub results: Vec<StepResult>,
    pub state: RunState,
    pub duration: Duration,
    /// The error that aborted the run.
    pub failure: Option<WorkstrapError>,
    /// Number of steps selected for this run.
    pub selected: usize,
    pub dry_run: bool,
}

impl RunOutcome {
    /// Whether every selected step ended satisfied, applied or planned.
    pub fn success(&self) -> bool {
        self.state == RunState::Completed
    }

    pub fn failed_step(&self) -> Option<&str> {
        self.results
            .iter()
            .find(|r| !r.is_ok())
            .map(|r| r.name.as_str())
    }

    pub fn applied(&self) -> usize {
        self.count(|o| matches!(o, StepOutcome::Applied))
    }

    pub fn satisfied(&self) -> usize {
        self.count(|o| matches!(o, StepOutcome::AlreadySatisfied))
    }

    pub fn would_apply(&self) -> usize {
        self.count(|o| matches!(o, StepOutcome::WouldApply))
    }

    fn count(&self, pred: impl Fn(&StepOutcome) -> bool) -> usize {
        self.results.iter().filter(|r| pred(&r.outcome)).count()
    }

    /// Totals for the end-of-run summary.
    pub fn summary(&self) -> RunSummary {
        RunSummary {
            step_results: self.results.iter().map(StepSummary::from).collect(),
            total_duration: self.duration,
            applied: self.applied(),
            satisfied: self.satisfied(),
            would_apply: self.would_apply(),
            failed_step: self.failed_step().map(str::to_string),
            not_run: self.selected - self.results.len(),
            dry_run: self.dry_run,
        }
    }
}

/// Runs the steps of a registry in order, stopping at the first failure.
pub struct Runner<'a> {
    registry: &'a StepRegistry,
}

impl<'a> Runner<'a> {
    /// Create a new runner.
    pub fn new(registry: &'a StepRegistry) -> Self {
        Self { registry }
    }

    /// Run every selected step.
    ///
    /// Step failures do not make this an `Err`: they end up in
    /// [`RunOutcome::failure`] next to the results gathered so far.
    ///
    /// # Errors
    ///
    /// Returned before any step is touched, when `--only` names an unknown
    /// step or a selected step needs a configuration value that is absent.
    pub fn run(
        &self,
        config: &RunConfiguration,
        options: &RunOptions,
        ui: &mut dyn UserInterface,
    ) -> Result<RunOutcome> {
        self.run_with_progress(config, options, ui, |_| {})
    }

    /// Run every selected step with a progress callback.
    pub fn run_with_progress(
        &self,
        config: &RunConfiguration,
        options: &RunOptions,
        ui: &mut dyn UserInterface,
        mut on_progress: impl FnMut(RunProgress<'_>),
    ) -> Result<RunOutcome> {
        let start = Instant::now();
        let selected = self.select(options)?;
        check_configuration(&selected, config)?;

        let working_dir = options
            .working_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("."));
        let ctx = StepContext::new(config, working_dir)
            .with_stream_output(ui.output_mode().shows_command_output());

        let total = selected.len();
        let mut results = Vec::with_capacity(total);
        let mut failure = None;
        let mut state = RunState::Running;

        for (i, step) in selected.iter().enumerate() {
            if state != RunState::Running {
                break;
            }
            let name = step.name();
            on_progress(RunProgress::StepStarting {
                name,
                index: i + 1,
                total,
            });
            on_progress(RunProgress::StateChanged {
                name,
                state: StepState::Pending,
            });
            ui.announce_step(i + 1, total, name, step.description());

            let (result, error) = run_step(*step, &ctx, options.dry_run, ui, &mut on_progress);

            if error.is_none() && result.outcome != StepOutcome::WouldApply {
                debug!("Step {} ended {}", name, result.outcome.state());
            }
            on_progress(RunProgress::StepFinished { result: &result });
            ui.report_step(&result);
            results.push(result);

            if let Some(err) = error {
                warn!("Aborting run: {}", err);
                failure = Some(err);
                state = RunState::Aborted;
            }
        }

        if state == RunState::Running {
            state = RunState::Completed;
        }

        Ok(RunOutcome {
            results,
            state,
            duration: start.elapsed(),
            failure,
            selected: total,
            dry_run: options.dry_run,
        })
    }

    fn select(&self, options: &RunOptions) -> Result<Vec<&'a dyn Step>> {
        let unknown = self.registry.unknown_names(&options.only);
        if !unknown.is_empty() {
            return Err(WorkstrapError::ConfigValidationError {
                message: format!("Unknown step(s) in --only: {}", unknown.join(", ")),
            });
        }

        Ok(self
            .registry
            .all()
            .filter(|step| options.only.is_empty() || options.only.contains(step.name()))
            .collect())
    }
}

/// Every key a selected step declares must be resolved before it runs.
fn check_configuration(selected: &[&dyn Step], config: &RunConfiguration) -> Result<()> {
    for step in selected {
        if let Some(key) = step.requires().iter().find(|k| config.get(**k).is_none()) {
            return Err(WorkstrapError::MissingConfiguration {
                key: key.to_string(),
                message: format!("required by step '{}' (pass {})", step.name(), key.flag()),
            });
        }
    }
    Ok(())
}

/// Check one step and, unless satisfied or a dry run, apply it.
fn run_step(
    step: &dyn Step,
    ctx: &StepContext<'_>,
    dry_run: bool,
    ui: &mut dyn UserInterface,
    on_progress: &mut impl FnMut(RunProgress<'_>),
) -> (StepResult, Option<WorkstrapError>) {
    let start = Instant::now();
    let name = step.name();
    let finish = |outcome: StepOutcome, detail: Option<String>| StepResult {
        name: name.to_string(),
        outcome,
        duration: start.elapsed(),
        detail,
    };

    let check = match step.check(ctx) {
        Ok(check) => check,
        Err(e) => {
            let err = as_check_error(name, e);
            on_progress(RunProgress::StateChanged {
                name,
                state: StepState::Failed,
            });
            return (finish(StepOutcome::Failed(reason(&err)), None), Some(err));
        }
    };

    if check.complete {
        on_progress(RunProgress::StateChanged {
            name,
            state: StepState::Satisfied,
        });
        let detail = check.short_description().to_string();
        return (finish(StepOutcome::AlreadySatisfied, Some(detail)), None);
    }

    if dry_run {
        return (finish(StepOutcome::WouldApply, Some(check.description)), None);
    }

    let paused = match step.pause_message(ctx) {
        Ok(Some(message)) => confirm_pause(name, &message, ui),
        Ok(None) => Ok(()),
        Err(e) => Err(e),
    };
    if let Err(e) = paused {
        let err = as_action_error(name, e);
        on_progress(RunProgress::StateChanged {
            name,
            state: StepState::Failed,
        });
        return (finish(StepOutcome::Failed(reason(&err)), None), Some(err));
    }

    on_progress(RunProgress::StateChanged {
        name,
        state: StepState::Applying,
    });
    if step.interactive() {
        debug!("Step {} takes over the terminal", name);
        ui.hand_over_terminal(name);
    }
    match step.apply(ctx) {
        Ok(()) => {
            on_progress(RunProgress::StateChanged {
                name,
                state: StepState::Applied,
            });
            (finish(StepOutcome::Applied, None), None)
        }
        Err(e) => {
            let err = as_action_error(name, e);
            on_progress(RunProgress::StateChanged {
                name,
                state: StepState::Failed,
            });
            (finish(StepOutcome::Failed(reason(&err)), None), Some(err))
        }
    }
}

/// Wait for the user to acknowledge a step's pause message.
///
/// Without a terminal there is nobody to wait for, so the message is shown
/// as a warning and the step goes ahead.
fn confirm_pause(name: &str, message: &str, ui: &mut dyn UserInterface) -> Result<()> {
    if !ui.is_interactive() {
        warn!("Not pausing for step {}: no terminal", name);
        ui.warning(&format!("{}: {}", name, message));
        return Ok(());
    }

    ui.message(message);
    let answer = ui.prompt(&Prompt {
        key: format!("continue_{}", name),
        question: "Continue?".to_string(),
        prompt_type: PromptType::Confirm,
        default: Some("yes".to_string()),
    })?;

    if answer.as_bool() == Some(true) {
        Ok(())
    } else {
        Err(WorkstrapError::StepAction {
            step: name.to_string(),
            message: "cancelled at confirmation prompt".to_string(),
        })
    }
}

fn as_check_error(name: &str, err: WorkstrapError) -> WorkstrapError {
    match err {
        WorkstrapError::StepCheck { .. } => err,
        other => WorkstrapError::StepCheck {
            step: name.to_string(),
            message: other.to_string(),
        },
    }
}

fn as_action_error(name: &str, err: WorkstrapError) -> WorkstrapError {
    match err {
        WorkstrapError::StepAction { .. } => err,
        other => WorkstrapError::StepAction {
            step: name.to_string(),
            message: other.to_string(),
        },
    }
}

/// Short reason shown next to a failed step.
fn reason(err: &WorkstrapError) -> String {
    match err {
        WorkstrapError::StepCheck { message, .. } => format!("check failed: {}", message),
        WorkstrapError::StepAction { message, .. } => message.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigKey;
    use crate::steps::{CheckResult, FnStep};
    use crate::ui::MockUI;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    type Log = Rc<RefCell<Vec<String>>>;

    /// A step whose goal state is a flag it flips when applied.
    struct FlagStep {
        name: String,
        done: Rc<Cell<bool>>,
        fail: bool,
        pause: Option<String>,
        interactive: bool,
        log: Log,
    }

    impl FlagStep {
        fn new(name: &str, log: &Log) -> Self {
            Self {
                name: name.to_string(),
                done: Rc::new(Cell::new(false)),
                fail: false,
                pause: None,
                interactive: false,
                log: Rc::clone(log),
            }
        }

        fn satisfied(self) -> Self {
            self.done.set(true);
            self
        }

        fn failing(mut self) -> Self {
            self.fail = true;
            self
        }

        fn pausing(mut self, message: &str) -> Self {
            self.pause = Some(message.to_string());
            self
        }

        fn needing_terminal(mut self) -> Self {
            self.interactive = true;
            self
        }
    }

    impl Step for FlagStep {
        fn name(&self) -> &str {
            &self.name
        }

        fn interactive(&self) -> bool {
            self.interactive
        }

        fn pause_message(&self, _ctx: &StepContext<'_>) -> Result<Option<String>> {
            Ok(self.pause.clone())
        }

        fn check(&self, _ctx: &StepContext<'_>) -> Result<CheckResult> {
            self.log.borrow_mut().push(format!("check {}", self.name));
            Ok(if self.done.get() {
                CheckResult::complete(format!("File exists: {}", self.name))
            } else {
                CheckResult::incomplete(format!("File missing: {}", self.name), "missing")
            })
        }

        fn apply(&self, _ctx: &StepContext<'_>) -> Result<()> {
            self.log.borrow_mut().push(format!("apply {}", self.name));
            if self.fail {
                return Err(WorkstrapError::StepAction {
                    step: self.name.clone(),
                    message: "command exited with code 1".to_string(),
                });
            }
            self.done.set(true);
            Ok(())
        }
    }

    fn registry(steps: Vec<FlagStep>) -> StepRegistry {
        let mut registry = StepRegistry::new();
        for step in steps {
            registry.register(Box::new(step)).unwrap();
        }
        registry
    }

    fn log() -> Log {
        Rc::new(RefCell::new(Vec::new()))
    }

    #[test]
    fn failure_stops_the_run() {
        let log = log();
        let registry = registry(vec![
            FlagStep::new("a", &log),
            FlagStep::new("b", &log).failing(),
            FlagStep::new("c", &log),
        ]);
        let mut ui = MockUI::new();

        let outcome = Runner::new(&registry)
            .run(&RunConfiguration::default(), &RunOptions::default(), &mut ui)
            .unwrap();

        assert_eq!(
            *log.borrow(),
            vec!["check a", "apply a", "check b", "apply b"]
        );
        assert_eq!(outcome.state, RunState::Aborted);
        assert!(!outcome.success());
        assert_eq!(outcome.failed_step(), Some("b"));
        assert_eq!(outcome.results.len(), 2);
        assert!(matches!(
            outcome.failure,
            Some(WorkstrapError::StepAction { ref step, .. }) if step == "b"
        ));
        assert_eq!(ui.announced_steps(), vec!["a", "b"]);
        assert_eq!(outcome.summary().not_run, 1);
    }

    #[test]
    fn satisfied_steps_are_not_applied() {
        let log = log();
        let registry = registry(vec![
            FlagStep::new("a", &log).satisfied(),
            FlagStep::new("b", &log).satisfied(),
        ]);
        let mut ui = MockUI::new();

        let outcome = Runner::new(&registry)
            .run(&RunConfiguration::default(), &RunOptions::default(), &mut ui)
            .unwrap();

        assert_eq!(*log.borrow(), vec!["check a", "check b"]);
        assert!(outcome.success());
        assert_eq!(outcome.satisfied(), 2);
        assert_eq!(outcome.applied(), 0);
        assert_eq!(outcome.results[0].detail.as_deref(), Some("a"));
    }

    #[test]
    fn second_run_applies_nothing() {
        let log = log();
        let registry = registry(vec![FlagStep::new("a", &log), FlagStep::new("b", &log)]);
        let runner = Runner::new(&registry);
        let config = RunConfiguration::default();

        let first = runner
            .run(&config, &RunOptions::default(), &mut MockUI::new())
            .unwrap();
        assert_eq!(first.applied(), 2);

        log.borrow_mut().clear();
        let second = runner
            .run(&config, &RunOptions::default(), &mut MockUI::new())
            .unwrap();
        assert_eq!(second.applied(), 0);
        assert_eq!(second.satisfied(), 2);
        assert!(log.borrow().iter().all(|entry| entry.starts_with("check")));
    }

    #[test]
    fn broken_check_aborts_without_applying() {
        let mut registry = StepRegistry::new();
        registry
            .register(Box::new(FnStep::new(
                "probe",
                |_| Err(WorkstrapError::Other(anyhow::anyhow!("xcode-select not found"))),
                |_| panic!("must not apply"),
            )))
            .unwrap();
        registry
            .register(Box::new(FnStep::new(
                "later",
                |_| panic!("must not check"),
                |_| Ok(()),
            )))
            .unwrap();

        let outcome = Runner::new(&registry)
            .run(
                &RunConfiguration::default(),
                &RunOptions::default(),
                &mut MockUI::new(),
            )
            .unwrap();

        assert_eq!(outcome.state, RunState::Aborted);
        assert!(matches!(
            outcome.failure,
            Some(WorkstrapError::StepCheck { ref step, .. }) if step == "probe"
        ));
        match &outcome.results[0].outcome {
            StepOutcome::Failed(reason) => assert!(reason.contains("xcode-select")),
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn dry_run_checks_but_never_applies() {
        let log = log();
        let registry = registry(vec![
            FlagStep::new("a", &log).satisfied(),
            FlagStep::new("b", &log),
        ]);
        let options = RunOptions {
            dry_run: true,
            ..Default::default()
        };

        let outcome = Runner::new(&registry)
            .run(&RunConfiguration::default(), &options, &mut MockUI::new())
            .unwrap();

        assert_eq!(*log.borrow(), vec!["check a", "check b"]);
        assert_eq!(outcome.would_apply(), 1);
        assert!(outcome.summary().dry_run);
    }

    #[test]
    fn only_runs_selected_steps_in_registry_order() {
        let log = log();
        let registry = registry(vec![
            FlagStep::new("a", &log),
            FlagStep::new("b", &log),
            FlagStep::new("c", &log),
        ]);
        let options = RunOptions {
            only: ["c".to_string(), "a".to_string()].into(),
            ..Default::default()
        };
        let mut ui = MockUI::new();

        let outcome = Runner::new(&registry)
            .run(&RunConfiguration::default(), &options, &mut ui)
            .unwrap();

        assert_eq!(
            *log.borrow(),
            vec!["check a", "apply a", "check c", "apply c"]
        );
        assert_eq!(outcome.selected, 2);
        assert_eq!(ui.announcements()[1], (2, 2, "c".to_string()));
    }

    #[test]
    fn unknown_only_name_is_rejected_before_running() {
        let log = log();
        let registry = registry(vec![FlagStep::new("a", &log)]);
        let options = RunOptions {
            only: ["nope".to_string()].into(),
            ..Default::default()
        };

        let err = Runner::new(&registry)
            .run(&RunConfiguration::default(), &options, &mut MockUI::new())
            .unwrap_err();

        assert!(err.to_string().contains("nope"));
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn missing_configuration_is_rejected_before_running() {
        let mut registry = StepRegistry::new();
        registry
            .register(Box::new(
                FnStep::new("python", |_| Ok(false), |_| Ok(())).requiring(&[ConfigKey::Version]),
            ))
            .unwrap();

        let err = Runner::new(&registry)
            .run(
                &RunConfiguration::default(),
                &RunOptions::default(),
                &mut MockUI::new(),
            )
            .unwrap_err();

        assert!(matches!(err, WorkstrapError::MissingConfiguration { .. }));
        assert!(err.to_string().contains("--python-version"));
    }

    #[test]
    fn progress_reports_state_transitions() {
        let log = log();
        let registry = registry(vec![
            FlagStep::new("a", &log).satisfied(),
            FlagStep::new("b", &log),
        ]);
        let mut transitions = Vec::new();

        Runner::new(&registry)
            .run_with_progress(
                &RunConfiguration::default(),
                &RunOptions::default(),
                &mut MockUI::new(),
                |event| {
                    if let RunProgress::StateChanged { name, state } = event {
                        transitions.push(format!("{} {}", name, state));
                    }
                },
            )
            .unwrap();

        assert_eq!(
            transitions,
            vec![
                "a pending",
                "a satisfied",
                "b pending",
                "b applying",
                "b applied"
            ]
        );
    }

    #[test]
    fn pause_is_confirmed_when_interactive() {
        let log = log();
        let registry = registry(vec![FlagStep::new("clt", &log).pausing("Finish the installer")]);
        let mut ui = MockUI::new();
        ui.set_interactive(true);
        ui.set_prompt_response("continue_clt", "yes");

        let outcome = Runner::new(&registry)
            .run(&RunConfiguration::default(), &RunOptions::default(), &mut ui)
            .unwrap();

        assert!(outcome.success());
        assert_eq!(ui.prompts_shown(), &["continue_clt"]);
        assert_eq!(ui.messages(), &["Finish the installer"]);
    }

    #[test]
    fn declined_pause_aborts() {
        let log = log();
        let registry = registry(vec![
            FlagStep::new("clt", &log).pausing("Finish the installer"),
            FlagStep::new("brew", &log),
        ]);
        let mut ui = MockUI::new();
        ui.set_interactive(true);
        ui.set_prompt_response("continue_clt", "no");

        let outcome = Runner::new(&registry)
            .run(&RunConfiguration::default(), &RunOptions::default(), &mut ui)
            .unwrap();

        assert_eq!(outcome.state, RunState::Aborted);
        assert_eq!(*log.borrow(), vec!["check clt"]);
    }

    #[test]
    fn pause_warns_and_continues_without_terminal() {
        let log = log();
        let registry = registry(vec![FlagStep::new("clt", &log).pausing("Finish the installer")]);
        let mut ui = MockUI::new();

        let outcome = Runner::new(&registry)
            .run(&RunConfiguration::default(), &RunOptions::default(), &mut ui)
            .unwrap();

        assert!(outcome.success());
        assert!(ui.prompts_shown().is_empty());
        assert!(ui.has_warning("Finish the installer"));
    }

    #[test]
    fn interactive_step_gets_the_terminal_before_applying() {
        let log = log();
        let registry = registry(vec![
            FlagStep::new("clt", &log),
            FlagStep::new("homebrew", &log).needing_terminal(),
            FlagStep::new("fonts", &log).needing_terminal().satisfied(),
        ]);
        let mut ui = MockUI::new();

        let outcome = Runner::new(&registry)
            .run(&RunConfiguration::default(), &RunOptions::default(), &mut ui)
            .unwrap();

        assert!(outcome.success());
        // Satisfied steps never run their command, so keep the spinner.
        assert_eq!(ui.terminal_handovers(), &["homebrew".to_string()]);
    }

    #[test]
    fn dry_run_keeps_the_terminal() {
        let log = log();
        let registry = registry(vec![FlagStep::new("homebrew", &log).needing_terminal()]);
        let mut ui = MockUI::new();
        let options = RunOptions {
            dry_run: true,
            ..Default::default()
        };

        Runner::new(&registry)
            .run(&RunConfiguration::default(), &options, &mut ui)
            .unwrap();

        assert!(ui.terminal_handovers().is_empty());
    }

    #[test]
    fn empty_registry_completes() {
        let registry = StepRegistry::new();
        let outcome = Runner::new(&registry)
            .run(
                &RunConfiguration::default(),
                &RunOptions::default(),
                &mut MockUI::new(),
            )
            .unwrap();

        assert!(outcome.success());
        assert!(outcome.results.is_empty());
    }
}
