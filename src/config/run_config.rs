//! Run configuration: the values a run needs from the user.
//!
//! Hostname, version and token come from command-line flags when given,
//! otherwise from interactive prompts. Once resolved the
//! [`RunConfiguration`] is immutable and shared read-only with every step.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, WorkstrapError};
use crate::ui::{Prompt, PromptType, UserInterface};

/// A run configuration value a step can declare it needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigKey {
    /// Target hostname for the machine.
    Hostname,
    /// Version identifier (the Python version to install).
    Version,
    /// Access credential (a GitHub token).
    Token,
}

impl ConfigKey {
    /// All keys, in prompt order.
    pub const ALL: [ConfigKey; 3] = [ConfigKey::Hostname, ConfigKey::Version, ConfigKey::Token];

    /// Name used in catalogue files and `${...}` interpolation.
    pub fn as_str(self) -> &'static str {
        match self {
            ConfigKey::Hostname => "hostname",
            ConfigKey::Version => "version",
            ConfigKey::Token => "token",
        }
    }

    /// Command-line flag that supplies this key.
    pub fn flag(self) -> &'static str {
        match self {
            ConfigKey::Hostname => "--hostname",
            ConfigKey::Version => "--python-version",
            ConfigKey::Token => "--github-token",
        }
    }

    fn question(self) -> &'static str {
        match self {
            ConfigKey::Hostname => "Hostname for this machine",
            ConfigKey::Version => "Python version to install",
            ConfigKey::Token => "GitHub access token",
        }
    }

    fn is_secret(self) -> bool {
        matches!(self, ConfigKey::Token)
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConfigKey {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "hostname" => Ok(ConfigKey::Hostname),
            "version" => Ok(ConfigKey::Version),
            "token" => Ok(ConfigKey::Token),
            _ => Err(format!("unknown configuration key: {}", s)),
        }
    }
}

/// Raw values as supplied on the command line, before resolution.
#[derive(Clone, Default)]
pub struct ConfigValues {
    pub hostname: Option<String>,
    pub version: Option<String>,
    pub token: Option<String>,
}

impl ConfigValues {
    fn get(&self, key: ConfigKey) -> Option<&str> {
        let value = match key {
            ConfigKey::Hostname => self.hostname.as_deref(),
            ConfigKey::Version => self.version.as_deref(),
            ConfigKey::Token => self.token.as_deref(),
        };
        value.filter(|v| !v.trim().is_empty())
    }
}

/// Resolved, immutable configuration for one run.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct RunConfiguration {
    hostname: Option<String>,
    version: Option<String>,
    token: Option<String>,
}

impl RunConfiguration {
    /// Build a configuration directly from known values.
    pub fn new(
        hostname: Option<String>,
        version: Option<String>,
        token: Option<String>,
    ) -> Self {
        Self {
            hostname,
            version,
            token,
        }
    }

    /// Look up a resolved value.
    pub fn get(&self, key: ConfigKey) -> Option<&str> {
        match key {
            ConfigKey::Hostname => self.hostname.as_deref(),
            ConfigKey::Version => self.version.as_deref(),
            ConfigKey::Token => self.token.as_deref(),
        }
    }

    pub fn hostname(&self) -> Option<&str> {
        self.hostname.as_deref()
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    fn set(&mut self, key: ConfigKey, value: String) {
        match key {
            ConfigKey::Hostname => self.hostname = Some(value),
            ConfigKey::Version => self.version = Some(value),
            ConfigKey::Token => self.token = Some(value),
        }
    }
}

impl fmt::Debug for ConfigValues {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigValues")
            .field("hostname", &self.hostname)
            .field("version", &self.version)
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl fmt::Debug for RunConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunConfiguration")
            .field("hostname", &self.hostname)
            .field("version", &self.version)
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// Resolve every key in `required`, preferring flag values over prompts.
///
/// A value given on the command line wins when it is non-empty. Otherwise
/// the user is prompted through `ui`. When `ui` is not interactive there is
/// nobody to ask, so a missing value is an error instead of a silent empty
/// string.
pub fn resolve_configuration(
    values: &ConfigValues,
    required: &BTreeSet<ConfigKey>,
    ui: &mut dyn UserInterface,
) -> Result<RunConfiguration> {
    let mut config = RunConfiguration::default();

    for key in ConfigKey::ALL.iter().copied().filter(|k| required.contains(k)) {
        if let Some(value) = values.get(key) {
            debug!("Using {} from command line", key);
            config.set(key, value.to_string());
            continue;
        }

        if !ui.is_interactive() {
            return Err(WorkstrapError::MissingConfiguration {
                key: key.to_string(),
                message: format!(
                    "not running interactively; pass {} <{}>",
                    key.flag(),
                    key.as_str().to_uppercase()
                ),
            });
        }

        let prompt = Prompt {
            key: key.as_str().to_string(),
            question: key.question().to_string(),
            prompt_type: if key.is_secret() {
                PromptType::Password
            } else {
                PromptType::Input
            },
            default: None,
        };

        let answer = ui.prompt(&prompt)?.as_string();
        let answer = answer.trim();
        if answer.is_empty() {
            return Err(WorkstrapError::MissingConfiguration {
                key: key.to_string(),
                message: "no value entered".to_string(),
            });
        }

        debug!("Using {} from prompt", key);
        config.set(key, answer.to_string());
    }

    Ok(config)
}
