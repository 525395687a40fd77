//! Step execution orchestration.

pub mod workflow;

pub use workflow::{RunOptions, RunOutcome, RunProgress, RunState, Runner};
