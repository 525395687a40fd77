//! Catalogue file discovery and loading.
//!
//! The first catalogue found wins; catalogues are never merged.
//!
//! Discovery order:
//! 1. `--config PATH` (must exist)
//! 2. `./workstrap.yml`
//! 3. `~/.config/workstrap/config.yml`
//! 4. The built-in default catalogue

use crate::config::schema::CatalogueConfig;
use crate::error::{Result, WorkstrapError};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// File name looked up in the working directory.
pub const LOCAL_CATALOGUE: &str = "workstrap.yml";

/// Built-in catalogue used when no file is found.
pub const DEFAULT_CATALOGUE: &str = include_str!("default.yml");

/// Where a loaded catalogue came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogueSource {
    /// Loaded from a file on disk.
    File(PathBuf),
    /// The built-in default catalogue.
    Builtin,
}

impl std::fmt::Display for CatalogueSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogueSource::File(path) => write!(f, "{}", path.display()),
            CatalogueSource::Builtin => f.write_str("built-in catalogue"),
        }
    }
}

/// Candidate catalogue locations, in priority order.
#[derive(Debug, Clone)]
pub struct CataloguePaths {
    /// `workstrap.yml` in the working directory
    pub local: Option<PathBuf>,

    /// `~/.config/workstrap/config.yml`
    pub user: Option<PathBuf>,
}

impl CataloguePaths {
    /// Discover existing catalogue files relative to `cwd`.
    pub fn discover(cwd: &Path) -> Self {
        Self {
            local: Self::existing(cwd.join(LOCAL_CATALOGUE)),
            user: dirs::home_dir()
                .and_then(|home| Self::existing(home.join(".config/workstrap/config.yml"))),
        }
    }

    fn existing(path: PathBuf) -> Option<PathBuf> {
        if path.is_file() {
            Some(path)
        } else {
            None
        }
    }

    /// The highest-priority existing file, if any.
    pub fn first(&self) -> Option<&PathBuf> {
        self.local.as_ref().or(self.user.as_ref())
    }
}

/// Load a single catalogue file.
///
/// # Errors
///
/// Returns `ConfigNotFound` if the file doesn't exist.
/// Returns `ConfigParseError` if the YAML is invalid.
pub fn load_catalogue_file(path: &Path) -> Result<CatalogueConfig> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            WorkstrapError::ConfigNotFound {
                path: path.to_path_buf(),
            }
        } else {
            WorkstrapError::Io(e)
        }
    })?;

    parse_catalogue(&content, path)
}

/// Parse YAML content into a catalogue.
///
/// `source_path` is only used for error reporting.
pub fn parse_catalogue(content: &str, source_path: &Path) -> Result<CatalogueConfig> {
    serde_yaml::from_str(content).map_err(|e| WorkstrapError::ConfigParseError {
        path: source_path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Load the catalogue for this run.
///
/// An explicit override must exist; otherwise discovery falls back to the
/// built-in catalogue.
pub fn load_catalogue(
    cwd: &Path,
    config_override: Option<&Path>,
) -> Result<(CatalogueConfig, CatalogueSource)> {
    if let Some(path) = config_override {
        debug!("Loading catalogue from --config {}", path.display());
        let catalogue = load_catalogue_file(path)?;
        return Ok((catalogue, CatalogueSource::File(path.to_path_buf())));
    }

    let paths = CataloguePaths::discover(cwd);
    if let Some(path) = paths.first() {
        debug!("Loading catalogue from {}", path.display());
        let catalogue = load_catalogue_file(path)?;
        return Ok((catalogue, CatalogueSource::File(path.clone())));
    }

    debug!("No catalogue file found, using built-in catalogue");
    let catalogue = parse_catalogue(DEFAULT_CATALOGUE, Path::new("<built-in>"))?;
    Ok((catalogue, CatalogueSource::Builtin))
}
