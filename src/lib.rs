//! workstrap - Idempotent workstation bootstrap.
//!
//! workstrap runs an ordered catalogue of provisioning steps. Each step
//! checks whether its goal already holds on this machine and only acts when
//! it does not, so running it again is always safe.
//!
//! # Modules
//!
//! - [`cli`] - Command-line flags and the run/list commands
//! - [`config`] - Step catalogue loading and run configuration
//! - [`error`] - Error types and result aliases
//! - [`runner`] - Sequential, fail-fast step execution
//! - [`shell`] - Shell command execution and platform probes
//! - [`steps`] - The step abstraction and the step registry
//! - [`ui`] - Prompts, spinners, and terminal output
//!
//! # Example
//!
//! ```
//! use workstrap::config::RunConfiguration;
//! use workstrap::runner::{RunOptions, Runner};
//! use workstrap::steps::{FnStep, StepOutcome, StepRegistry};
//! use workstrap::ui::MockUI;
//!
//! let mut registry = StepRegistry::new();
//! registry
//!     .register(Box::new(FnStep::new("already-there", |_| Ok(true), |_| Ok(()))))
//!     .unwrap();
//!
//! let mut ui = MockUI::new();
//! let outcome = Runner::new(&registry)
//!     .run(&RunConfiguration::default(), &RunOptions::default(), &mut ui)
//!     .unwrap();
//!
//! assert!(outcome.success());
//! assert_eq!(outcome.results[0].outcome, StepOutcome::AlreadySatisfied);
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod runner;
pub mod shell;
pub mod steps;
pub mod ui;

pub use error::{Result, WorkstrapError};
