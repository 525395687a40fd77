//! Ordered, name-unique collection of steps.

use std::collections::{BTreeSet, HashSet};

use crate::config::{CatalogueConfig, ConfigKey};
use crate::error::{Result, WorkstrapError};

use super::shell::ShellStep;
use super::step::Step;

/// Steps in the order they run.
///
/// Names are unique. Registration order is run order and never changes.
#[derive(Default)]
pub struct StepRegistry {
    steps: Vec<Box<dyn Step>>,
}

impl StepRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from a catalogue, one shell step per entry.
    pub fn from_catalogue(catalogue: &CatalogueConfig) -> Result<Self> {
        let mut registry = Self::new();
        for config in &catalogue.steps {
            registry.register(Box::new(ShellStep::from_config(config)))?;
        }
        Ok(registry)
    }

    /// Append a step.
    ///
    /// # Errors
    ///
    /// `DuplicateName` if a step with the same name is already registered.
    /// The registry is unchanged in that case.
    pub fn register(&mut self, step: Box<dyn Step>) -> Result<()> {
        if self.contains(step.name()) {
            return Err(WorkstrapError::DuplicateName {
                name: step.name().to_string(),
            });
        }
        self.steps.push(step);
        Ok(())
    }

    /// Every step, in registration order.
    pub fn all(&self) -> impl ExactSizeIterator<Item = &dyn Step> + '_ {
        self.steps.iter().map(|step| step.as_ref() as &dyn Step)
    }

    /// Look up a step by name.
    pub fn get(&self, name: &str) -> Option<&dyn Step> {
        self.all().find(|step| step.name() == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Step names, in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.all().map(|step| step.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Names in `only` that match no registered step, sorted.
    pub fn unknown_names<'a>(&self, only: &'a HashSet<String>) -> Vec<&'a str> {
        let mut unknown: Vec<&str> = only
            .iter()
            .map(String::as_str)
            .filter(|name| !self.contains(name))
            .collect();
        unknown.sort_unstable();
        unknown
    }

    /// Configuration keys needed by the steps that will run.
    ///
    /// An empty `only` selects every step.
    pub fn required_keys(&self, only: &HashSet<String>) -> BTreeSet<ConfigKey> {
        self.all()
            .filter(|step| only.is_empty() || only.contains(step.name()))
            .flat_map(|step| step.requires().iter().copied())
            .collect()
    }
}

impl std::fmt::Debug for StepRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StepRegistry")
            .field("steps", &self.names())
            .finish()
    }
}
