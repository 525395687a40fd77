//! Catalogue validation rules.
//!
//! This module validates a catalogue for correctness:
//! - Steps must have a name and a command
//! - `after` must name steps earlier in the catalogue
//! - `${...}` references must be declared in `requires` (or be `${home}`)
//!
//! Duplicate step names are rejected later, by the step registry.

use crate::config::interpolation::{extract_variables, HOME_VARIABLE};
use crate::config::run_config::ConfigKey;
use crate::config::schema::{CatalogueConfig, StepConfig};
use crate::error::{Result, WorkstrapError};
use std::collections::HashSet;

/// Validation error with context.
#[derive(Debug, Clone)]
pub struct ValidationError {
    /// Rule identifier
    pub rule: String,
    /// Human-readable error message
    pub message: String,
    /// Step name if error is step-specific
    pub step: Option<String>,
}

impl ValidationError {
    fn for_step(rule: &str, step: &str, message: String) -> Self {
        Self {
            rule: rule.to_string(),
            message,
            step: Some(step.to_string()),
        }
    }
}

/// Validate a catalogue and return all errors.
///
/// Collects every error rather than stopping at the first one.
pub fn validate_config(config: &CatalogueConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();

    for step in &config.steps {
        errors.extend(validate_step(step, &seen, config));
        seen.insert(step.name.as_str());
    }

    errors
}

fn validate_step(
    step: &StepConfig,
    earlier: &HashSet<&str>,
    config: &CatalogueConfig,
) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let name = step.name.as_str();

    if name.trim().is_empty() {
        errors.push(ValidationError {
            rule: "missing-name".to_string(),
            message: "Every step must have a non-empty 'name'".to_string(),
            step: None,
        });
    }

    if step.command.trim().is_empty() {
        errors.push(ValidationError::for_step(
            "missing-command",
            name,
            format!("Step '{}' has an empty 'command'", name),
        ));
    }

    for prerequisite in &step.after {
        if earlier.contains(prerequisite.as_str()) {
            continue;
        }
        let message = if config.steps.iter().any(|s| &s.name == prerequisite) {
            format!(
                "Step '{}' runs after '{}' but is listed before it",
                name, prerequisite
            )
        } else {
            format!(
                "Step '{}' runs after '{}' which does not exist",
                name, prerequisite
            )
        };
        errors.push(ValidationError::for_step("prerequisite-order", name, message));
    }

    let mut templates: Vec<&str> = vec![step.command.as_str()];
    templates.extend(step.pause.as_deref());
    templates.extend(step.env.values().map(String::as_str));
    if let Some(check) = &step.check {
        templates.extend(check.templates());
    }

    let mut variables: Vec<String> = templates
        .iter()
        .flat_map(|t| extract_variables(t))
        .collect::<HashSet<_>>()
        .into_iter()
        .collect();
    variables.sort();

    for variable in variables {
        if variable == HOME_VARIABLE {
            continue;
        }
        match variable.parse::<ConfigKey>() {
            Ok(key) if step.requires.contains(&key) => {}
            Ok(key) => errors.push(ValidationError::for_step(
                "undeclared-requirement",
                name,
                format!(
                    "Step '{}' uses ${{{}}} but does not list '{}' in 'requires'",
                    name, variable, key
                ),
            )),
            Err(_) => errors.push(ValidationError::for_step(
                "unknown-variable",
                name,
                format!("Step '{}' uses unknown variable ${{{}}}", name, variable),
            )),
        }
    }

    errors
}

/// Validate a catalogue, returning the first batch of errors as one.
///
/// # Errors
///
/// Returns `ConfigValidationError` if any validation rules fail.
pub fn validate(config: &CatalogueConfig) -> Result<()> {
    let errors = validate_config(config);

    if errors.is_empty() {
        Ok(())
    } else {
        let messages: Vec<_> = errors.iter().map(|e| e.message.clone()).collect();
        Err(WorkstrapError::ConfigValidationError {
            message: messages.join("; "),
        })
    }
}
