//! Shell command execution.

use crate::error::{Result, WorkstrapError};
use std::collections::HashMap;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};
use tracing::debug;

/// Result of executing a shell command.
#[derive(Debug, Clone)]
pub struct CommandResult {
    /// Exit code (None if killed by signal).
    pub exit_code: Option<i32>,

    /// Standard output.
    pub stdout: String,

    /// Standard error.
    pub stderr: String,

    /// Execution duration.
    pub duration: Duration,

    /// Whether command succeeded (exit code 0).
    pub success: bool,
}

impl CommandResult {
    /// Last `max` non-empty lines of stderr, falling back to stdout.
    ///
    /// Shown under a failed step so the user sees why the command failed.
    pub fn output_tail(&self, max: usize) -> Vec<&str> {
        let stream = if self.stderr.trim().is_empty() {
            &self.stdout
        } else {
            &self.stderr
        };
        let lines: Vec<&str> = stream
            .lines()
            .map(str::trim_end)
            .filter(|line| !line.trim().is_empty())
            .collect();
        lines[lines.len().saturating_sub(max)..].to_vec()
    }
}

/// Options for command execution.
#[derive(Debug, Clone, Default)]
pub struct CommandOptions {
    /// Working directory.
    pub cwd: Option<PathBuf>,

    /// Environment variables (merged with system env).
    pub env: HashMap<String, String>,

    /// Capture stdout (if false, inherits from parent).
    pub capture_stdout: bool,

    /// Capture stderr (if false, inherits from parent).
    pub capture_stderr: bool,

    /// Let the command read the terminal (installers asking for a password).
    pub inherit_stdin: bool,
}

impl CommandOptions {
    /// Options for a side-effect-free probe: everything captured, no stdin.
    pub fn probe() -> Self {
        Self {
            capture_stdout: true,
            capture_stderr: true,
            ..Default::default()
        }
    }
}

/// Execute a shell command.
///
/// A command that runs and exits non-zero is `Ok` with `success == false`.
/// Only a shell that cannot be started at all is an `Err`.
pub fn execute(command: &str, options: &CommandOptions) -> Result<CommandResult> {
    let start = Instant::now();

    let (shell, flag) = shell_invocation();
    let mut cmd = Command::new(shell);
    cmd.arg(flag);
    cmd.arg(command);

    if let Some(cwd) = &options.cwd {
        cmd.current_dir(cwd);
    }

    for (key, value) in &options.env {
        cmd.env(key, value);
    }

    cmd.stdin(if options.inherit_stdin {
        Stdio::inherit()
    } else {
        Stdio::null()
    });
    cmd.stdout(if options.capture_stdout {
        Stdio::piped()
    } else {
        Stdio::inherit()
    });
    cmd.stderr(if options.capture_stderr {
        Stdio::piped()
    } else {
        Stdio::inherit()
    });

    // Command text is not logged: it may contain an interpolated token.
    debug!("Executing command via {} {}", shell, flag);

    let output = cmd.output().map_err(|e| {
        debug!("Failed to start {}: {}", shell, e);
        WorkstrapError::CommandFailed {
            command: format!("{} {}", shell, flag),
            code: None,
        }
    })?;

    let duration = start.elapsed();

    let stdout = if options.capture_stdout {
        String::from_utf8_lossy(&output.stdout).to_string()
    } else {
        String::new()
    };

    let stderr = if options.capture_stderr {
        String::from_utf8_lossy(&output.stderr).to_string()
    } else {
        String::new()
    };

    debug!(
        "Command exited with {:?} after {:?}",
        output.status.code(),
        duration
    );

    Ok(CommandResult {
        exit_code: output.status.code(),
        stdout,
        stderr,
        duration,
        success: output.status.success(),
    })
}

/// Shell and flag used to run catalogue commands.
///
/// Catalogue commands are POSIX shell, so Unix always uses `/bin/sh`
/// rather than the user's login shell, which may not be set up yet.
fn shell_invocation() -> (&'static str, &'static str) {
    if cfg!(target_os = "windows") {
        ("cmd.exe", "/C")
    } else {
        ("/bin/sh", "-c")
    }
}
