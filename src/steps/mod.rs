//! Steps, their checks and the registry that orders them.
//!
//! - [`Step`] - An idempotent task: a check plus an action
//! - [`ShellStep`] - A step defined in the catalogue as shell commands
//! - [`FnStep`] - A step built from closures
//! - [`StepRegistry`] - Ordered, name-unique collection of steps
//! - [`run_check`] - Evaluate a catalogue check against the live system
//! - [`StepResult`] - How a step ended
//!
//! # Example
//!
//! ```
//! use workstrap::config::RunConfiguration;
//! use workstrap::steps::{FnStep, StepContext, StepRegistry};
//!
//! let mut registry = StepRegistry::new();
//! registry
//!     .register(Box::new(FnStep::new("noop", |_| Ok(true), |_| Ok(()))))
//!     .unwrap();
//!
//! let config = RunConfiguration::default();
//! let ctx = StepContext::new(&config, ".");
//! for step in registry.all() {
//!     assert!(step.check(&ctx).unwrap().complete);
//! }
//! ```

pub mod completed_check;
pub mod registry;
pub mod result;
pub mod shell;
pub mod step;

pub use completed_check::{expand_home, run_check, CheckResult};
pub use registry::StepRegistry;
pub use result::{StepOutcome, StepResult, StepState};
pub use shell::ShellStep;
pub use step::{FnStep, Step, StepContext};
