//! Output verbosity.

/// Output verbosity mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Show everything, including the output of step commands.
    Verbose,
    /// Show progress and status for every step.
    #[default]
    Normal,
    /// Show only steps that changed something, failures and the summary.
    Quiet,
}

impl OutputMode {
    /// Check if step commands write straight to the terminal.
    pub fn shows_command_output(&self) -> bool {
        matches!(self, Self::Verbose)
    }

    /// Check if this mode shows progress spinners.
    ///
    /// Verbose mode streams command output, which a spinner would overdraw.
    pub fn shows_spinners(&self) -> bool {
        matches!(self, Self::Normal)
    }

    /// Check if steps that were already satisfied are listed.
    pub fn shows_satisfied_steps(&self) -> bool {
        !matches!(self, Self::Quiet)
    }
}
