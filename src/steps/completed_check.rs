//! Completed check implementations.
//!
//! Completed checks decide whether a step's goal state already holds
//! on this machine. They are re-derived from the live system on every run;
//! nothing is remembered between runs.

use crate::config::interpolation::{resolve_command, resolve_string, InterpolationContext};
use crate::config::CompletedCheck;
use crate::error::{Result, WorkstrapError};
use crate::shell::{execute, CommandOptions};
use std::path::{Path, PathBuf};

/// Result of running a completed check.
///
/// The `description` field is user-visible: it appears next to steps that
/// are already satisfied (e.g. "File exists: ~/.oh-my-zsh").
#[derive(Debug, Clone)]
pub struct CheckResult {
    /// Whether the check passed (goal state already holds).
    pub complete: bool,

    /// Description of what was checked.
    pub description: String,

    /// Details about the check result.
    pub details: Option<String>,
}

impl CheckResult {
    /// Create a complete result.
    pub fn complete(description: impl Into<String>) -> Self {
        Self {
            complete: true,
            description: description.into(),
            details: None,
        }
    }

    /// Create an incomplete result.
    pub fn incomplete(description: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            complete: false,
            description: description.into(),
            details: Some(details.into()),
        }
    }

    /// Result for a step with no check at all.
    pub fn unchecked() -> Self {
        Self::incomplete("No check", "Step has no check and always applies")
    }

    /// Get a short, display-friendly description with common prefixes stripped.
    pub fn short_description(&self) -> &str {
        const PREFIXES: &[&str] = &[
            "Command succeeded: ",
            "Command failed: ",
            "Output matches: ",
            "File exists: ",
            "File missing: ",
            "Check passed: ",
        ];
        for prefix in PREFIXES {
            if let Some(rest) = self.description.strip_prefix(prefix) {
                return rest;
            }
        }
        &self.description
    }
}

/// Run a completed check.
///
/// Relative paths and check commands are resolved against `base_dir`.
///
/// # Errors
///
/// An `Err` means the probe itself broke (the shell could not start, a
/// variable could not be resolved, `~` has no home directory), not that
/// the goal state is missing.
pub fn run_check(
    check: &CompletedCheck,
    context: &InterpolationContext,
    base_dir: &Path,
) -> Result<CheckResult> {
    match check {
        CompletedCheck::FileExists { path } => check_file_exists(path, context, base_dir),
        CompletedCheck::CommandSucceeds { command } => {
            check_command_succeeds(command, context, base_dir)
        }
        CompletedCheck::CommandOutput { command, equals } => {
            check_command_output(command, equals, context, base_dir)
        }
        CompletedCheck::All { checks } => check_all(checks, context, base_dir),
        CompletedCheck::Any { checks } => check_any(checks, context, base_dir),
    }
}

/// Expand a leading `~` to the home directory.
pub fn expand_home(path: &str) -> Result<PathBuf> {
    let rest = match path.strip_prefix('~') {
        Some(rest) if rest.is_empty() || rest.starts_with('/') => rest.trim_start_matches('/'),
        _ => return Ok(PathBuf::from(path)),
    };

    let home = dirs::home_dir().ok_or_else(|| {
        WorkstrapError::Other(anyhow::anyhow!(
            "cannot expand '{}': home directory is unknown",
            path
        ))
    })?;

    Ok(if rest.is_empty() { home } else { home.join(rest) })
}

/// Check if a file or directory exists.
fn check_file_exists(
    path: &str,
    context: &InterpolationContext,
    base_dir: &Path,
) -> Result<CheckResult> {
    let display = resolve_string(path, context)?;
    let expanded = expand_home(&display)?;
    let full_path = if expanded.is_absolute() {
        expanded
    } else {
        base_dir.join(expanded)
    };

    if full_path.exists() {
        Ok(CheckResult::complete(format!("File exists: {}", display)))
    } else {
        Ok(CheckResult::incomplete(
            format!("File missing: {}", display),
            format!("Expected at: {}", full_path.display()),
        ))
    }
}

fn probe_options(context: &InterpolationContext, base_dir: &Path) -> CommandOptions {
    CommandOptions {
        cwd: Some(base_dir.to_path_buf()),
        env: context.command_env(),
        ..CommandOptions::probe()
    }
}

/// Check if a command succeeds (exit code 0).
fn check_command_succeeds(
    command: &str,
    context: &InterpolationContext,
    base_dir: &Path,
) -> Result<CheckResult> {
    let resolved = resolve_command(command, context)?;
    let succeeded = execute(&resolved, &probe_options(context, base_dir))?.success;

    // Descriptions use the unresolved command so tokens never reach output.
    if succeeded {
        Ok(CheckResult::complete(format!(
            "Command succeeded: {}",
            truncate(command, 50)
        )))
    } else {
        Ok(CheckResult::incomplete(
            format!("Command failed: {}", truncate(command, 50)),
            "Exit code was non-zero".to_string(),
        ))
    }
}

/// Check that a command prints the expected value.
///
/// A non-zero exit counts as a mismatch: `defaults read` exits 1 when
/// the key has never been written.
fn check_command_output(
    command: &str,
    equals: &str,
    context: &InterpolationContext,
    base_dir: &Path,
) -> Result<CheckResult> {
    let resolved = resolve_command(command, context)?;
    let expected = resolve_string(equals, context)?;
    let result = execute(&resolved, &probe_options(context, base_dir))?;
    let actual = result.stdout.trim();

    if result.success && actual == expected.trim() {
        Ok(CheckResult::complete(format!(
            "Output matches: {}",
            truncate(command, 50)
        )))
    } else if result.success {
        Ok(CheckResult::incomplete(
            format!("Output differs: {}", truncate(command, 50)),
            format!("Expected '{}', got '{}'", expected.trim(), actual),
        ))
    } else {
        Ok(CheckResult::incomplete(
            format!("Command failed: {}", truncate(command, 50)),
            format!("Exit code {:?}", result.exit_code),
        ))
    }
}

/// All checks must pass.
fn check_all(
    checks: &[CompletedCheck],
    context: &InterpolationContext,
    base_dir: &Path,
) -> Result<CheckResult> {
    let results = checks
        .iter()
        .map(|c| run_check(c, context, base_dir))
        .collect::<Result<Vec<_>>>()?;

    if results.iter().all(|r| r.complete) {
        Ok(CheckResult::complete(format!(
            "All {} checks passed",
            checks.len()
        )))
    } else {
        let failed: Vec<_> = results
            .iter()
            .filter(|r| !r.complete)
            .map(|r| r.description.clone())
            .collect();

        Ok(CheckResult::incomplete(
            format!("{}/{} checks failed", failed.len(), checks.len()),
            failed.join("; "),
        ))
    }
}

/// Any check passing is sufficient.
fn check_any(
    checks: &[CompletedCheck],
    context: &InterpolationContext,
    base_dir: &Path,
) -> Result<CheckResult> {
    let mut descriptions = Vec::new();

    for check in checks {
        let result = run_check(check, context, base_dir)?;
        if result.complete {
            return Ok(CheckResult::complete(format!(
                "Check passed: {}",
                result.description
            )));
        }
        descriptions.push(result.description);
    }

    Ok(CheckResult::incomplete(
        format!("None of {} checks passed", checks.len()),
        descriptions.join("; "),
    ))
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len - 3).collect();
        format!("{}...", kept)
    }
}
