//! Configuration for a run.
//!
//! Two kinds of configuration live here:
//! - The step catalogue: schema in [`schema`], discovery and loading in
//!   [`loader`], checks in [`validator`], `${...}` handling in [`interpolation`]
//! - The [`RunConfiguration`] values resolved from flags or prompts in
//!   [`run_config`]
//!
//! # Example
//!
//! ```
//! use workstrap::config::{parse_catalogue, validate};
//! use std::path::Path;
//!
//! let yaml = "steps:\n  - name: hello\n    command: echo hello\n";
//! let catalogue = parse_catalogue(yaml, Path::new("inline.yml")).unwrap();
//! validate(&catalogue).unwrap();
//! assert_eq!(catalogue.steps[0].name, "hello");
//! ```

pub mod interpolation;
pub mod loader;
pub mod run_config;
pub mod schema;
pub mod validator;

pub use interpolation::{
    env_name, extract_variables, parse_interpolation, resolve_command, resolve_string,
    InterpolationContext, Segment,
};
pub use loader::{
    load_catalogue, load_catalogue_file, parse_catalogue, CataloguePaths, CatalogueSource,
};
pub use run_config::{resolve_configuration, ConfigKey, ConfigValues, RunConfiguration};
pub use schema::{CatalogueConfig, CompletedCheck, StepConfig};
pub use validator::{validate, validate_config, ValidationError};
