//! Configuration file loading and management.
//!
//! Loads configuration from the platform config directory
//! (`~/.config/relaydash/config.toml` on Linux).
//!
//! ## Precedence
//!
//! Settings are resolved with the following precedence (highest first):
//! 1. CLI flags
//! 2. Environment variables
//! 3. Config file
//! 4. Built-in defaults
//!
//! ## Environment Variables
//!
//! - `RELAYDASH_CONFIG`: Override config file path
//! - `RELAYDASH_FORMAT`: Output format (human, json, md)
//! - `RELAYDASH_TIMEOUT`: Default timeout in seconds
//! - `RELAYDASH_NO_COLOR` or `NO_COLOR`: Disable colors
//! - `RELAYDASH_PRETTY`: Pretty-print JSON output
//! - `RELAYDASH_VERBOSE`: Enable verbose output
//! - `RELAYDASH_REGISTRY`: Provider registry file
//! - `RELAYDASH_SITES`: Site catalog file

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::AppPaths;
use crate::cli::args::{Cli, OutputFormat};
use crate::error::{RelayError, Result};
use crate::util::env::is_env_truthy;

// =============================================================================
// Environment Variable Names
// =============================================================================

pub const ENV_CONFIG: &str = "RELAYDASH_CONFIG";
pub const ENV_FORMAT: &str = "RELAYDASH_FORMAT";
pub const ENV_TIMEOUT: &str = "RELAYDASH_TIMEOUT";
pub const ENV_NO_COLOR: &str = "RELAYDASH_NO_COLOR";
/// Standard environment variable to disable colors.
pub const ENV_NO_COLOR_STD: &str = "NO_COLOR";
pub const ENV_PRETTY: &str = "RELAYDASH_PRETTY";
pub const ENV_VERBOSE: &str = "RELAYDASH_VERBOSE";
pub const ENV_REGISTRY: &str = "RELAYDASH_REGISTRY";
pub const ENV_SITES: &str = "RELAYDASH_SITES";

const MAX_TIMEOUT_SECONDS: u64 = 300;

// =============================================================================
// Resolved Configuration
// =============================================================================

/// Final configuration after merging CLI, env vars, and config file.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub format: OutputFormat,
    /// Timeout applied to each token fetch.
    pub timeout: Duration,
    pub no_color: bool,
    pub verbose: bool,
    pub pretty: bool,
    /// Log level from the config file; CLI and env are handled by logging.
    pub log_level: Option<String>,
    /// Explicit registry file; `None` means the user-dir override if it
    /// exists, else the built-in table.
    pub registry_file: Option<PathBuf>,
    /// Site catalog path.
    pub sites_file: PathBuf,
    /// Whether the catalog path was chosen explicitly (and so must exist).
    pub sites_required: bool,
    pub sources: ConfigSources,
}

/// Tracks the source of each configuration value.
#[derive(Debug, Clone, Default)]
pub struct ConfigSources {
    pub format: ConfigSource,
    pub timeout: ConfigSource,
    pub no_color: ConfigSource,
    pub verbose: ConfigSource,
    pub pretty: ConfigSource,
    pub registry_file: ConfigSource,
    pub sites_file: ConfigSource,
}

/// Where a configuration value came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConfigSource {
    Cli,
    Env,
    ConfigFile,
    #[default]
    Default,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cli => write!(f, "CLI flag"),
            Self::Env => write!(f, "environment variable"),
            Self::ConfigFile => write!(f, "config file"),
            Self::Default => write!(f, "default"),
        }
    }
}

impl ResolvedConfig {
    /// Resolve final configuration.
    ///
    /// `timeout_arg` is the command-level `--timeout`, when the command has one.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicit config file is missing or invalid, or
    /// if any env value fails to parse.
    pub fn resolve(cli: &Cli, timeout_arg: Option<u64>) -> Result<Self> {
        let (config, config_dir) = Self::load_config(cli)?;
        config.validate()?;

        let mut sources = ConfigSources::default();

        let format = Self::resolve_format(cli, &config, &mut sources.format)?;
        let timeout = Self::resolve_timeout(timeout_arg, &config, &mut sources.timeout)?;
        let no_color = Self::resolve_no_color(cli, &config, &mut sources.no_color);
        let verbose = Self::resolve_verbose(cli, &mut sources.verbose);
        let pretty = Self::resolve_pretty(cli, &config, &mut sources.pretty);
        let registry_file = Self::resolve_path(
            cli.registry.as_deref(),
            ENV_REGISTRY,
            config.catalog.registry_file.as_deref(),
            &config_dir,
            &mut sources.registry_file,
        );
        let sites_file = Self::resolve_path(
            cli.sites.as_deref(),
            ENV_SITES,
            config.catalog.sites_file.as_deref(),
            &config_dir,
            &mut sources.sites_file,
        );
        let sites_required = sites_file.is_some();
        let sites_file = sites_file.unwrap_or_else(|| AppPaths::new().sites_file());

        tracing::debug!(
            format = ?format,
            format_source = %sources.format,
            timeout_secs = timeout.as_secs(),
            timeout_source = %sources.timeout,
            sites = %sites_file.display(),
            sites_source = %sources.sites_file,
            "Resolved configuration"
        );

        Ok(Self {
            format,
            timeout,
            no_color,
            verbose,
            pretty,
            log_level: config.general.log_level,
            registry_file,
            sites_file,
            sites_required,
            sources,
        })
    }

    /// Load the config file named by `--config`, `RELAYDASH_CONFIG`, or the
    /// default location. Also returns the directory relative catalog paths
    /// resolve against.
    fn load_config(cli: &Cli) -> Result<(Config, PathBuf)> {
        let explicit = cli
            .config
            .clone()
            .or_else(|| std::env::var(ENV_CONFIG).ok().map(PathBuf::from));

        match explicit {
            Some(path) => {
                if !path.exists() {
                    return Err(RelayError::ConfigNotFound {
                        path: path.display().to_string(),
                    });
                }
                let dir = path
                    .parent()
                    .map_or_else(|| PathBuf::from("."), Path::to_path_buf);
                Ok((Config::load_from(&path)?, dir))
            }
            None => {
                let paths = AppPaths::new();
                Ok((Config::load_from(&paths.config_file())?, paths.config))
            }
        }
    }

    fn resolve_format(
        cli: &Cli,
        config: &Config,
        source: &mut ConfigSource,
    ) -> Result<OutputFormat> {
        // 1. CLI --json or a non-default --format
        if let Some(format) = cli.explicit_format() {
            *source = ConfigSource::Cli;
            return Ok(format);
        }

        // 2. Environment variable
        if let Ok(format_env) = std::env::var(ENV_FORMAT) {
            *source = ConfigSource::Env;
            return Self::parse_format(ENV_FORMAT, &format_env);
        }

        // 3. Config file
        if let Some(ref format_str) = config.output.format {
            *source = ConfigSource::ConfigFile;
            return Self::parse_format("output.format", format_str);
        }

        *source = ConfigSource::Default;
        Ok(OutputFormat::Human)
    }

    fn parse_format(key: &str, s: &str) -> Result<OutputFormat> {
        OutputFormat::from_arg(s).ok_or_else(|| RelayError::ConfigInvalid {
            key: key.to_string(),
            value: s.to_string(),
            message: "valid formats: human, json, md".to_string(),
        })
    }

    fn resolve_timeout(
        timeout_arg: Option<u64>,
        config: &Config,
        source: &mut ConfigSource,
    ) -> Result<Duration> {
        // 1. CLI --timeout
        if let Some(timeout) = timeout_arg {
            *source = ConfigSource::Cli;
            return Self::checked_timeout("--timeout", &timeout.to_string());
        }

        // 2. Environment variable
        if let Ok(timeout_env) = std::env::var(ENV_TIMEOUT) {
            *source = ConfigSource::Env;
            return Self::checked_timeout(ENV_TIMEOUT, &timeout_env);
        }

        // 3. Config file (defaulted when the file omits it)
        *source = ConfigSource::ConfigFile;
        Ok(Duration::from_secs(config.general.timeout_seconds))
    }

    fn checked_timeout(key: &str, raw: &str) -> Result<Duration> {
        let invalid = || RelayError::ConfigInvalid {
            key: key.to_string(),
            value: raw.to_string(),
            message: format!("timeout must be between 1 and {MAX_TIMEOUT_SECONDS} seconds"),
        };
        let secs: u64 = raw.trim().parse().map_err(|_| invalid())?;
        if secs == 0 || secs > MAX_TIMEOUT_SECONDS {
            return Err(invalid());
        }
        Ok(Duration::from_secs(secs))
    }

    fn resolve_no_color(cli: &Cli, config: &Config, source: &mut ConfigSource) -> bool {
        if cli.no_color {
            *source = ConfigSource::Cli;
            return true;
        }

        if is_env_truthy(ENV_NO_COLOR) || std::env::var_os(ENV_NO_COLOR_STD).is_some() {
            *source = ConfigSource::Env;
            return true;
        }

        // config.output.color = false means no_color = true
        if !config.output.color {
            *source = ConfigSource::ConfigFile;
            return true;
        }

        *source = ConfigSource::Default;
        false
    }

    fn resolve_verbose(cli: &Cli, source: &mut ConfigSource) -> bool {
        if cli.verbose {
            *source = ConfigSource::Cli;
            return true;
        }

        if is_env_truthy(ENV_VERBOSE) {
            *source = ConfigSource::Env;
            return true;
        }

        *source = ConfigSource::Default;
        false
    }

    fn resolve_pretty(cli: &Cli, config: &Config, source: &mut ConfigSource) -> bool {
        if cli.pretty {
            *source = ConfigSource::Cli;
            return true;
        }

        if is_env_truthy(ENV_PRETTY) {
            *source = ConfigSource::Env;
            return true;
        }

        if config.output.pretty {
            *source = ConfigSource::ConfigFile;
            return true;
        }

        *source = ConfigSource::Default;
        false
    }

    /// CLI path, env path, or config path (relative to the config dir).
    fn resolve_path(
        cli_value: Option<&Path>,
        env_key: &str,
        config_value: Option<&str>,
        config_dir: &Path,
        source: &mut ConfigSource,
    ) -> Option<PathBuf> {
        if let Some(path) = cli_value {
            *source = ConfigSource::Cli;
            return Some(path.to_path_buf());
        }

        if let Some(path) = std::env::var(env_key).ok().filter(|v| !v.trim().is_empty()) {
            *source = ConfigSource::Env;
            return Some(PathBuf::from(path.trim()));
        }

        if let Some(path) = config_value.filter(|v| !v.trim().is_empty()) {
            *source = ConfigSource::ConfigFile;
            let path = PathBuf::from(path.trim());
            return Some(if path.is_relative() {
                config_dir.join(path)
            } else {
                path
            });
        }

        *source = ConfigSource::Default;
        None
    }
}

// =============================================================================
// Config File
// =============================================================================

/// Application configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,
    /// Registry and site catalog locations.
    pub catalog: CatalogConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Timeout for each token fetch in seconds.
    pub timeout_seconds: u64,
    /// Default log level (error, warn, info, debug, trace).
    pub log_level: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Provider registry TOML; relative paths resolve against the config dir.
    pub registry_file: Option<String>,
    /// Site catalog JSON/TOML; relative paths resolve against the config dir.
    pub sites_file: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Default output format (human, json, md).
    pub format: Option<String>,
    pub color: bool,
    pub pretty: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
            log_level: None,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: None,
            color: true,
            pretty: false,
        }
    }
}

impl Config {
    /// Load from the default config file path.
    ///
    /// Returns defaults if the file doesn't exist.
    pub fn load() -> Result<Self> {
        Self::load_from(&AppPaths::new().config_file())
    }

    /// Load from a specific path.
    ///
    /// Returns defaults if the file doesn't exist; errors only if the file
    /// exists but cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(?path, "Config file not found, using defaults");
            return Ok(Self::default());
        }

        tracing::debug!(?path, "Loading config file");
        let content = fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| RelayError::ConfigParse {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Save to a specific path, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| RelayError::Config(format!("Failed to serialize config: {e}")))?;

        fs::write(path, content)?;
        tracing::debug!(?path, "Config file saved");
        Ok(())
    }

    /// Validate configuration values.
    ///
    /// Checks that the output format is one of human/json/md, the timeout is
    /// within 1..=300 seconds, and the log level is recognized.
    pub fn validate(&self) -> Result<()> {
        if let Some(format) = &self.output.format {
            if OutputFormat::from_arg(format).is_none() {
                return Err(RelayError::ConfigInvalid {
                    key: "output.format".to_string(),
                    value: format.clone(),
                    message: "valid formats: human, json, md".to_string(),
                });
            }
        }

        if self.general.timeout_seconds == 0 || self.general.timeout_seconds > MAX_TIMEOUT_SECONDS
        {
            return Err(RelayError::ConfigInvalid {
                key: "general.timeout_seconds".to_string(),
                value: self.general.timeout_seconds.to_string(),
                message: format!("timeout must be between 1 and {MAX_TIMEOUT_SECONDS} seconds"),
            });
        }

        if let Some(level) = &self.general.log_level {
            if crate::core::logging::LogLevel::from_arg(level).is_none() {
                return Err(RelayError::ConfigInvalid {
                    key: "general.log_level".to_string(),
                    value: level.clone(),
                    message: "valid levels: trace, debug, info, warn, error".to_string(),
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::io::Write;
    use tempfile::NamedTempFile;

    static ENV_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());

    const ALL_ENV: [&str; 9] = [
        ENV_CONFIG,
        ENV_FORMAT,
        ENV_TIMEOUT,
        ENV_NO_COLOR,
        ENV_NO_COLOR_STD,
        ENV_PRETTY,
        ENV_VERBOSE,
        ENV_REGISTRY,
        ENV_SITES,
    ];

    /// Run with every relaydash env var cleared, then `vars` applied.
    #[allow(unsafe_code)]
    fn with_env(vars: &[(&str, &str)], f: impl FnOnce()) {
        let _guard = ENV_LOCK.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        let prior: Vec<_> = ALL_ENV.iter().map(|k| (*k, std::env::var(k).ok())).collect();
        for key in ALL_ENV {
            unsafe { std::env::remove_var(key) };
        }
        for (key, value) in vars {
            unsafe { std::env::set_var(key, value) };
        }
        f();
        for (key, value) in prior {
            match value {
                Some(v) => unsafe { std::env::set_var(key, v) },
                None => unsafe { std::env::remove_var(key) },
            }
        }
    }

    fn config_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{content}").unwrap();
        file
    }

    fn cli(args: &[&str]) -> Cli {
        let mut argv = vec!["relaydash"];
        argv.extend_from_slice(args);
        argv.push("auth-methods");
        Cli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn default_config_is_valid() {
        let config = Config::default();
        assert_eq!(config.general.timeout_seconds, 30);
        assert!(config.output.color);
        assert!(config.catalog.sites_file.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn load_missing_file_returns_default() {
        let config = Config::load_from(Path::new("/nonexistent/path/config.toml")).unwrap();
        assert_eq!(config.general.timeout_seconds, 30);
    }

    #[test]
    fn load_valid_toml() {
        let file = config_file(
            r#"
[general]
timeout_seconds = 60
log_level = "debug"

[catalog]
sites_file = "sites.toml"

[output]
color = false
pretty = true
unknown_key = 1
"#,
        );

        let config = Config::load_from(file.path()).unwrap();
        assert_eq!(config.general.timeout_seconds, 60);
        assert_eq!(config.general.log_level.as_deref(), Some("debug"));
        assert_eq!(config.catalog.sites_file.as_deref(), Some("sites.toml"));
        assert!(!config.output.color);
        assert!(config.output.pretty);
    }

    #[test]
    fn load_invalid_toml_returns_parse_error() {
        let file = config_file("this is not valid toml {{{{");
        assert!(matches!(
            Config::load_from(file.path()),
            Err(RelayError::ConfigParse { .. })
        ));
    }

    #[test]
    fn roundtrip_save_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/config.toml");

        let mut config = Config::default();
        config.general.timeout_seconds = 120;
        config.catalog.registry_file = Some("providers.toml".to_string());

        config.save_to(&path).unwrap();
        let loaded = Config::load_from(&path).unwrap();

        assert_eq!(loaded.general.timeout_seconds, 120);
        assert_eq!(loaded.catalog.registry_file.as_deref(), Some("providers.toml"));
    }

    #[test]
    fn validate_rejects_bad_values() {
        let mut config = Config::default();
        config.general.timeout_seconds = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.general.timeout_seconds = 301;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.output.format = Some("yaml".to_string());
        let err = config.validate().unwrap_err();
        assert!(matches!(err, RelayError::ConfigInvalid { ref key, .. } if key == "output.format"));

        let mut config = Config::default();
        config.general.log_level = Some("loud".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn cli_beats_env_beats_file() {
        let file = config_file("[output]\nformat = \"md\"\n");
        let path = file.path().to_str().unwrap().to_string();

        with_env(&[(ENV_FORMAT, "json")], || {
            let resolved = ResolvedConfig::resolve(&cli(&["--config", path.as_str()]), None).unwrap();
            assert_eq!(resolved.format, OutputFormat::Json);
            assert_eq!(resolved.sources.format, ConfigSource::Env);

            let resolved =
                ResolvedConfig::resolve(&cli(&["--config", path.as_str(), "--format", "md"]), None)
                    .unwrap();
            assert_eq!(resolved.format, OutputFormat::Md);
            assert_eq!(resolved.sources.format, ConfigSource::Cli);
        });

        with_env(&[], || {
            let resolved = ResolvedConfig::resolve(&cli(&["--config", path.as_str()]), None).unwrap();
            assert_eq!(resolved.format, OutputFormat::Md);
            assert_eq!(resolved.sources.format, ConfigSource::ConfigFile);
        });
    }

    #[test]
    fn timeout_precedence_and_bounds() {
        let file = config_file("[general]\ntimeout_seconds = 45\n");
        let path = file.path().to_str().unwrap().to_string();

        with_env(&[], || {
            let resolved = ResolvedConfig::resolve(&cli(&["--config", path.as_str()]), None).unwrap();
            assert_eq!(resolved.timeout, Duration::from_secs(45));
            let resolved = ResolvedConfig::resolve(&cli(&["--config", path.as_str()]), Some(5)).unwrap();
            assert_eq!(resolved.timeout, Duration::from_secs(5));
            assert_eq!(resolved.sources.timeout, ConfigSource::Cli);
            assert!(ResolvedConfig::resolve(&cli(&["--config", path.as_str()]), Some(0)).is_err());
        });

        with_env(&[(ENV_TIMEOUT, "abc")], || {
            let err = ResolvedConfig::resolve(&cli(&["--config", path.as_str()]), None).unwrap_err();
            assert!(matches!(err, RelayError::ConfigInvalid { .. }));
        });
    }

    #[test]
    fn explicit_missing_config_is_an_error() {
        with_env(&[], || {
            let err = ResolvedConfig::resolve(&cli(&["--config", "/nonexistent/relaydash.toml"]), None)
                .unwrap_err();
            assert!(matches!(err, RelayError::ConfigNotFound { .. }));
        });
    }

    #[test]
    fn relative_catalog_paths_resolve_against_config_dir() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("config.toml");
        fs::write(&config_path, "[catalog]\nsites_file = \"sites.toml\"\n").unwrap();
        let path = config_path.to_str().unwrap().to_string();

        with_env(&[], || {
            let resolved = ResolvedConfig::resolve(&cli(&["--config", path.as_str()]), None).unwrap();
            assert_eq!(resolved.sites_file, dir.path().join("sites.toml"));
            assert!(resolved.sites_required);
            assert_eq!(resolved.sources.sites_file, ConfigSource::ConfigFile);
            assert!(resolved.registry_file.is_none());
        });

        with_env(&[(ENV_SITES, "/srv/sites.json")], || {
            let resolved = ResolvedConfig::resolve(&cli(&["--config", path.as_str()]), None).unwrap();
            assert_eq!(resolved.sites_file, PathBuf::from("/srv/sites.json"));
            assert_eq!(resolved.sources.sites_file, ConfigSource::Env);
        });
    }

    #[test]
    fn no_color_sources() {
        let file = config_file("");
        let path = file.path().to_str().unwrap().to_string();

        with_env(&[(ENV_NO_COLOR_STD, "")], || {
            let resolved = ResolvedConfig::resolve(&cli(&["--config", path.as_str()]), None).unwrap();
            assert!(resolved.no_color);
            assert_eq!(resolved.sources.no_color, ConfigSource::Env);
        });

        with_env(&[], || {
            let resolved = ResolvedConfig::resolve(&cli(&["--config", path.as_str()]), None).unwrap();
            assert!(!resolved.no_color);
            let resolved =
                ResolvedConfig::resolve(&cli(&["--config", path.as_str(), "--no-color"]), None).unwrap();
            assert_eq!(resolved.sources.no_color, ConfigSource::Cli);
        });
    }
}
