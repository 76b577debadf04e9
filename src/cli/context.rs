//! Per-invocation state shared by command handlers.

use std::time::Duration;

use crate::cli::args::OutputFormat;
use crate::core::provider::ProviderRegistry;
use crate::core::site_directory::SiteDirectory;
use crate::error::Result;
use crate::render::theme::should_use_rich_output;
use crate::storage::config::ResolvedConfig;
use crate::storage::paths::AppPaths;
use crate::storage::sites;

/// Resolved settings plus lazy access to the registry and site catalog.
#[derive(Debug)]
pub struct CommandContext {
    pub format: OutputFormat,
    pub pretty: bool,
    /// True when human output must be plain text.
    pub no_color: bool,
    pub timeout: Duration,
    config: ResolvedConfig,
}

impl CommandContext {
    #[must_use]
    pub fn new(config: ResolvedConfig) -> Self {
        let no_color = config.no_color || !should_use_rich_output(config.format, config.no_color);
        Self {
            format: config.format,
            pretty: config.pretty,
            no_color,
            timeout: config.timeout,
            config,
        }
    }

    /// Registry from `--registry`/env/config, then the user override file,
    /// then the built-in table.
    pub fn registry(&self) -> Result<ProviderRegistry> {
        if let Some(path) = &self.config.registry_file {
            return ProviderRegistry::load_from(path);
        }

        let override_file = AppPaths::new().registry_file();
        if override_file.exists() {
            tracing::debug!(path = %override_file.display(), "Using registry override");
            return ProviderRegistry::load_from(&override_file);
        }

        ProviderRegistry::builtin()
    }

    /// Site catalog, validated against `registry`.
    ///
    /// A catalog named explicitly must exist; the default location may be
    /// absent, giving an empty directory.
    pub fn sites(&self, registry: &ProviderRegistry) -> Result<SiteDirectory> {
        sites::load_directory(
            &self.config.sites_file,
            registry,
            self.config.sites_required,
        )
    }
}

/// Write rendered output to stdout, adding a trailing newline if missing.
pub fn emit(output: &str) {
    if output.ends_with('\n') {
        print!("{output}");
    } else {
        println!("{output}");
    }
}
