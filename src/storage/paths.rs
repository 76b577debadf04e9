//! Application paths for config and catalog files.

use directories::ProjectDirs;
use std::path::PathBuf;

const CONFIG_FILE: &str = "config.toml";
const REGISTRY_FILE: &str = "providers.toml";
const SITES_FILE: &str = "sites.json";

/// Application paths.
#[derive(Debug, Clone)]
pub struct AppPaths {
    /// Configuration directory.
    pub config: PathBuf,
}

impl AppPaths {
    /// Resolve the platform config directory, falling back to
    /// `~/.config/relaydash` when no home directory can be determined.
    #[must_use]
    pub fn new() -> Self {
        let config = ProjectDirs::from("com", "relaydash", "relaydash").map_or_else(
            || {
                directories::BaseDirs::new()
                    .map_or_else(|| PathBuf::from("."), |d| d.home_dir().to_path_buf())
                    .join(".config/relaydash")
            },
            |dirs| dirs.config_dir().to_path_buf(),
        );
        Self { config }
    }

    /// Rooted at an explicit directory.
    #[must_use]
    pub fn with_config_dir(config: impl Into<PathBuf>) -> Self {
        Self {
            config: config.into(),
        }
    }

    #[must_use]
    pub fn config_file(&self) -> PathBuf {
        self.config.join(CONFIG_FILE)
    }

    /// Registry override; the built-in table is used when absent.
    #[must_use]
    pub fn registry_file(&self) -> PathBuf {
        self.config.join(REGISTRY_FILE)
    }

    /// Default site catalog location.
    #[must_use]
    pub fn sites_file(&self) -> PathBuf {
        self.config.join(SITES_FILE)
    }

    pub fn ensure_dirs(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.config)
    }
}

impl Default for AppPaths {
    fn default() -> Self {
        Self::new()
    }
}
