//! Storage for configuration, paths, and site catalog files.

pub mod config;
pub mod paths;
pub mod sites;

pub use config::{
    Config, ConfigSource, ConfigSources, ENV_CONFIG, ENV_FORMAT, ENV_NO_COLOR, ENV_NO_COLOR_STD,
    ENV_PRETTY, ENV_REGISTRY, ENV_SITES, ENV_TIMEOUT, ENV_VERBOSE, ResolvedConfig,
};
pub use paths::AppPaths;
pub use sites::{CatalogFormat, load_catalog, load_directory, parse_catalog};
