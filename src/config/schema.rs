//! Catalogue schema definitions.
//!
//! These structs map to the YAML step catalogue. Steps are an ordered
//! list: the order in the file is the order they run in.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::run_config::ConfigKey;

/// Root structure of a step catalogue file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CatalogueConfig {
    /// Title shown in the run banner
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_name: Option<String>,

    /// Steps in execution order
    pub steps: Vec<StepConfig>,
}

impl CatalogueConfig {
    /// Banner title, falling back to the tool name.
    pub fn display_name(&self) -> &str {
        self.app_name.as_deref().unwrap_or("workstrap")
    }
}

/// A single provisioning step.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StepConfig {
    /// Unique step name
    pub name: String,

    /// Human-readable description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Run configuration values this step reads
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub requires: Vec<ConfigKey>,

    /// Idempotency check; a step without one is always applied
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub check: Option<CompletedCheck>,

    /// Shell command that applies the step
    pub command: String,

    /// Message shown before the command runs; waits for confirmation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pause: Option<String>,

    /// The command talks to the user: its output goes straight to the
    /// terminal and no spinner is drawn while it runs
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub interactive: bool,

    /// Earlier steps this one relies on (documentation, checked for order)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub after: Vec<String>,

    /// Extra environment variables for the command
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub env: HashMap<String, String>,
}

/// Check to determine if a step's goal state already holds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CompletedCheck {
    /// Check if a file or directory exists
    FileExists {
        /// Path to check; a leading `~` is the home directory
        path: String,
    },

    /// Check if a command succeeds (exit code 0)
    CommandSucceeds {
        /// Command to run
        command: String,
    },

    /// Check that a command's trimmed stdout equals a value
    CommandOutput {
        /// Command to run
        command: String,
        /// Expected output
        equals: String,
    },

    /// All checks must pass
    All {
        /// List of checks that must all pass
        checks: Vec<CompletedCheck>,
    },

    /// Any check passing is sufficient
    Any {
        /// List of checks where at least one must pass
        checks: Vec<CompletedCheck>,
    },
}

impl CompletedCheck {
    /// Every string in this check that may contain `${...}` references.
    pub fn templates(&self) -> Vec<&str> {
        match self {
            CompletedCheck::FileExists { path } => vec![path.as_str()],
            CompletedCheck::CommandSucceeds { command } => vec![command.as_str()],
            CompletedCheck::CommandOutput { command, equals } => {
                vec![command.as_str(), equals.as_str()]
            }
            CompletedCheck::All { checks } | CompletedCheck::Any { checks } => {
                checks.iter().flat_map(|c| c.templates()).collect()
            }
        }
    }
}
