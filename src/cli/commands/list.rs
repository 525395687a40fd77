//! List command implementation.
//!
//! `workstrap --list` prints the catalogue in run order without touching
//! the machine.

use std::path::{Path, PathBuf};

use crate::config::{load_catalogue, validate, CatalogueConfig};
use crate::error::Result;
use crate::steps::StepRegistry;
use crate::ui::{ColorChoice, UserInterface, WorkstrapTheme};

use super::dispatcher::{Command, CommandResult};

/// The list command implementation.
pub struct ListCommand {
    working_dir: PathBuf,
    config_path: Option<PathBuf>,
    theme: WorkstrapTheme,
}

impl ListCommand {
    /// Create a new list command.
    pub fn new(working_dir: &Path, config_path: Option<PathBuf>, colors: ColorChoice) -> Self {
        Self {
            working_dir: working_dir.to_path_buf(),
            config_path,
            theme: WorkstrapTheme::for_choice(colors),
        }
    }

    /// Lines describing each step: number, name and description, then
    /// requirements and ordering notes when present.
    fn step_lines(&self, catalogue: &CatalogueConfig) -> Vec<String> {
        let theme = &self.theme;
        let width = catalogue.steps.len().to_string().len();
        let mut lines = Vec::new();

        for (i, step) in catalogue.steps.iter().enumerate() {
            let number = theme
                .step_number
                .apply_to(format!("{:>width$}.", i + 1, width = width));
            let mut line = format!("  {} {}", number, theme.highlight.apply_to(&step.name));
            if let Some(description) = &step.description {
                line.push_str(&format!(" {}", theme.dim.apply_to(format!("- {}", description))));
            }
            lines.push(line);

            let indent = " ".repeat(width + 4);
            if !step.requires.is_empty() {
                let keys: Vec<&str> = step.requires.iter().map(|k| k.as_str()).collect();
                lines.push(format!(
                    "{}{} {}",
                    indent,
                    theme.dim.apply_to("requires:"),
                    keys.join(", ")
                ));
            }
            if !step.after.is_empty() {
                lines.push(format!(
                    "{}{} {}",
                    indent,
                    theme.dim.apply_to("after:"),
                    step.after.join(", ")
                ));
            }
            if step.check.is_none() {
                lines.push(format!("{}{}", indent, theme.dim.apply_to("no check, always runs")));
            }
        }
        lines
    }
}

impl Command for ListCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let (catalogue, source) = load_catalogue(&self.working_dir, self.config_path.as_deref())?;
        validate(&catalogue)?;
        // Listing accepts exactly the catalogues a run accepts.
        StepRegistry::from_catalogue(&catalogue)?;

        ui.message(&format!(
            "{} {}",
            self.theme.header.apply_to(catalogue.display_name()),
            self.theme.dim.apply_to(format!("({})", source))
        ));
        if catalogue.steps.is_empty() {
            ui.message("  No steps defined.");
        }
        for line in self.step_lines(&catalogue) {
            ui.message(&line);
        }

        Ok(CommandResult::success())
    }
}
