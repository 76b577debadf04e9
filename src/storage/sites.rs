//! Site catalog files.
//!
//! A catalog is either JSON (a bare array, or `{"sites": [...]}`) or TOML
//! (`[[sites]]` tables). The format is picked from the file extension;
//! anything that is not `.toml` is read as JSON.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::core::provider::ProviderRegistry;
use crate::core::site_directory::{SiteDirectory, SiteRecordConfig};
use crate::error::{RelayError, Result};

/// On-disk catalog encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogFormat {
    Json,
    Toml,
}

impl CatalogFormat {
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Self::Toml,
            _ => Self::Json,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum JsonCatalog {
    Bare(Vec<SiteRecordConfig>),
    Wrapped { sites: Vec<SiteRecordConfig> },
}

#[derive(Deserialize)]
struct TomlCatalog {
    #[serde(default)]
    sites: Vec<SiteRecordConfig>,
}

/// Parse catalog text. `origin` names the source in errors.
pub fn parse_catalog(
    content: &str,
    format: CatalogFormat,
    origin: &str,
) -> Result<Vec<SiteRecordConfig>> {
    let parse_error = |message: String| RelayError::ConfigParse {
        path: origin.to_string(),
        message,
    };

    match format {
        CatalogFormat::Json => {
            let catalog: JsonCatalog =
                serde_json::from_str(content).map_err(|e| parse_error(e.to_string()))?;
            Ok(match catalog {
                JsonCatalog::Bare(sites) | JsonCatalog::Wrapped { sites } => sites,
            })
        }
        CatalogFormat::Toml => {
            let catalog: TomlCatalog =
                toml::from_str(content).map_err(|e| parse_error(e.to_string()))?;
            Ok(catalog.sites)
        }
    }
}

/// Read raw records from a catalog file.
pub fn load_catalog(path: &Path) -> Result<Vec<SiteRecordConfig>> {
    if !path.exists() {
        return Err(RelayError::ConfigNotFound {
            path: path.display().to_string(),
        });
    }
    tracing::debug!(?path, "Loading site catalog");
    let content = fs::read_to_string(path)?;
    parse_catalog(
        &content,
        CatalogFormat::from_path(path),
        &path.display().to_string(),
    )
}

/// Load and validate a catalog into a directory.
///
/// With `required = false` a missing file yields an empty directory.
pub fn load_directory(
    path: &Path,
    registry: &ProviderRegistry,
    required: bool,
) -> Result<SiteDirectory> {
    if !required && !path.exists() {
        tracing::debug!(?path, "No site catalog, using empty directory");
        return Ok(SiteDirectory::default());
    }
    SiteDirectory::load(load_catalog(path)?, registry)
}
