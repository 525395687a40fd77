//! Error types for workstrap operations.
//!
//! This module defines [`WorkstrapError`], the primary error type used
//! throughout the application, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Every variant is fatal to the run; nothing is retried automatically
//! - Use `anyhow::Error` (via `WorkstrapError::Other`) for unexpected errors
//! - Messages name the step or key involved so the user can fix and re-run

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for workstrap operations.
#[derive(Debug, Error)]
pub enum WorkstrapError {
    /// A command-line flag was not recognised or was malformed.
    #[error("{message}")]
    UnknownFlag { message: String },

    /// A run configuration value is absent and cannot be prompted for.
    #[error("Missing configuration '{key}': {message}")]
    MissingConfiguration { key: String, message: String },

    /// Two steps were registered under the same name.
    #[error("Step '{name}' is already registered")]
    DuplicateName { name: String },

    /// A step's idempotency probe failed unexpectedly.
    #[error("Check for step '{step}' failed: {message}")]
    StepCheck { step: String, message: String },

    /// A step's action failed.
    #[error("Step '{step}' failed: {message}")]
    StepAction { step: String, message: String },

    /// A safety precondition for running at all was not met.
    #[error("Precondition failed: {message}")]
    PreconditionFailed { message: String },

    /// Catalogue file not found at expected location.
    #[error("Configuration not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Failed to parse catalogue file.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// Invalid catalogue structure or values.
    #[error("Invalid configuration: {message}")]
    ConfigValidationError { message: String },

    /// Shell command could not be started.
    #[error("Command failed with exit code {code:?}: {command}")]
    CommandFailed { command: String, code: Option<i32> },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for workstrap operations.
pub type Result<T> = std::result::Result<T, WorkstrapError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_flag_displays_message_verbatim() {
        let err = WorkstrapError::UnknownFlag {
            message: "unexpected argument '--bogus' found".into(),
        };
        assert_eq!(err.to_string(), "unexpected argument '--bogus' found");
    }

    #[test]
    fn missing_configuration_displays_key() {
        let err = WorkstrapError::MissingConfiguration {
            key: "hostname".into(),
            message: "no terminal to prompt on".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("hostname"));
        assert!(msg.contains("no terminal"));
    }

    #[test]
    fn duplicate_name_displays_name() {
        let err = WorkstrapError::DuplicateName {
            name: "homebrew".into(),
        };
        assert!(err.to_string().contains("homebrew"));
    }

    #[test]
    fn step_check_displays_step_and_message() {
        let err = WorkstrapError::StepCheck {
            step: "fonts".into(),
            message: "sh not found".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("fonts"));
        assert!(msg.contains("sh not found"));
    }

    #[test]
    fn step_action_displays_step_and_message() {
        let err = WorkstrapError::StepAction {
            step: "oh_my_zsh".into(),
            message: "exit code 1".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("oh_my_zsh"));
        assert!(msg.contains("exit code 1"));
    }

    #[test]
    fn config_parse_error_displays_path_and_message() {
        let err = WorkstrapError::ConfigParseError {
            path: PathBuf::from("/workstrap.yml"),
            message: "invalid syntax".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("/workstrap.yml"));
        assert!(msg.contains("invalid syntax"));
    }

    #[test]
    fn io_error_converts_from_std() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err: WorkstrapError = io_err.into();
        assert!(matches!(err, WorkstrapError::Io(_)));
    }

    #[test]
    fn anyhow_error_converts() {
        let err: WorkstrapError = anyhow::anyhow!("boom").into();
        assert!(matches!(err, WorkstrapError::Other(_)));
        assert_eq!(err.to_string(), "boom");
    }
}
