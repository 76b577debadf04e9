//! Diagnostic logging to stderr (or a file).
//!
//! Stdout is reserved for command output, so every subscriber here writes to
//! stderr unless `RELAYDASH_LOG_FILE` redirects it.

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Arc;

use tracing::Level;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::fmt::writer::BoxMakeWriter;

pub const LOG_LEVEL_ENV: &str = "RELAYDASH_LOG";
pub const LOG_FORMAT_ENV: &str = "RELAYDASH_LOG_FORMAT";
pub const LOG_FILE_ENV: &str = "RELAYDASH_LOG_FILE";

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Human,
    /// One JSON object per line.
    Json,
    Compact,
}

impl LogFormat {
    /// Parse from string (case-insensitive).
    #[must_use]
    pub fn from_arg(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "human" | "pretty" => Some(Self::Human),
            "json" | "jsonl" => Some(Self::Json),
            "compact" => Some(Self::Compact),
            _ => None,
        }
    }
}

/// Log verbosity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    #[default]
    Warn,
    Error,
}

impl LogLevel {
    /// Parse from CLI argument or config value.
    #[must_use]
    pub fn from_arg(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "trace" => Some(Self::Trace),
            "debug" | "verbose" => Some(Self::Debug),
            "info" => Some(Self::Info),
            "warn" | "warning" => Some(Self::Warn),
            "error" | "critical" => Some(Self::Error),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_filter(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }

    #[must_use]
    pub const fn as_tracing_level(self) -> Level {
        match self {
            Self::Trace => Level::TRACE,
            Self::Debug => Level::DEBUG,
            Self::Info => Level::INFO,
            Self::Warn => Level::WARN,
            Self::Error => Level::ERROR,
        }
    }
}

/// Fully resolved logging settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogSettings {
    pub level: LogLevel,
    pub format: LogFormat,
    pub file: Option<PathBuf>,
}

impl LogSettings {
    /// Combine CLI flags, environment, and the configured level.
    ///
    /// Precedence: `--log-level`, then `RELAYDASH_LOG`, then the config
    /// file, then `warn`. `--verbose` bumps an unset level to `debug`.
    /// `--json-output` forces JSON lines regardless of `RELAYDASH_LOG_FORMAT`.
    #[must_use]
    pub fn resolve(
        cli_level: Option<&str>,
        config_level: Option<&str>,
        json_output: bool,
        verbose: bool,
    ) -> Self {
        let explicit = cli_level
            .and_then(LogLevel::from_arg)
            .or_else(|| env_value(LOG_LEVEL_ENV).as_deref().and_then(LogLevel::from_arg))
            .or_else(|| config_level.and_then(LogLevel::from_arg));

        let level = match explicit {
            Some(level) => level,
            None if verbose => LogLevel::Debug,
            None => LogLevel::default(),
        };

        let format = if json_output {
            LogFormat::Json
        } else {
            env_value(LOG_FORMAT_ENV)
                .as_deref()
                .and_then(LogFormat::from_arg)
                .unwrap_or_default()
        };

        Self {
            level,
            format,
            file: env_value(LOG_FILE_ENV).map(PathBuf::from),
        }
    }
}

fn env_value(key: &str) -> Option<String> {
    std::env::var(key).ok().and_then(|value| {
        let trimmed = value.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    })
}

/// Install the global subscriber. Later calls are no-ops.
pub fn init(settings: &LogSettings) {
    let file = settings.file.as_ref().and_then(|path| {
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .ok()
            .map(Arc::new)
    });

    let writer = || -> BoxMakeWriter {
        match file.as_ref() {
            Some(f) => BoxMakeWriter::new(Arc::clone(f)),
            None => BoxMakeWriter::new(std::io::stderr),
        }
    };

    let filter = || {
        EnvFilter::try_from_env(LOG_LEVEL_ENV)
            .ok()
            .filter(|_| !is_plain_level(LOG_LEVEL_ENV))
            .unwrap_or_else(|| EnvFilter::new(format!("relaydash={}", settings.level.as_filter())))
    };

    match settings.format {
        LogFormat::Json => {
            tracing_subscriber::fmt()
                .with_env_filter(filter())
                .json()
                .with_writer(writer())
                .with_span_events(FmtSpan::CLOSE)
                .try_init()
                .ok();
        }
        LogFormat::Compact => {
            tracing_subscriber::fmt()
                .with_env_filter(filter())
                .compact()
                .with_writer(writer())
                .with_target(true)
                .try_init()
                .ok();
        }
        LogFormat::Human => {
            tracing_subscriber::fmt()
                .with_env_filter(filter())
                .with_writer(writer())
                .with_target(false)
                .without_time()
                .try_init()
                .ok();
        }
    }
}

/// A bare level such as `debug` is scoped to this crate; anything else is
/// treated as a full filter directive.
fn is_plain_level(key: &str) -> bool {
    env_value(key).is_some_and(|v| LogLevel::from_arg(&v).is_some())
}

#[cfg(test)]
mod tests {
    use super::*;

    static ENV_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());

    #[allow(unsafe_code)]
    fn with_env_vars(vars: &[(&str, Option<&str>)], f: impl FnOnce()) {
        let _guard = ENV_LOCK.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        let prior: Vec<_> = vars.iter().map(|(k, _)| (*k, std::env::var(k).ok())).collect();
        for (key, value) in vars {
            match value {
                Some(v) => unsafe { std::env::set_var(key, v) },
                None => unsafe { std::env::remove_var(key) },
            }
        }
        f();
        for (key, value) in prior {
            match value {
                Some(v) => unsafe { std::env::set_var(key, v) },
                None => unsafe { std::env::remove_var(key) },
            }
        }
    }

    const CLEAN: [(&str, Option<&str>); 3] = [
        (LOG_LEVEL_ENV, None),
        (LOG_FORMAT_ENV, None),
        (LOG_FILE_ENV, None),
    ];

    #[test]
    fn defaults_to_warn_human() {
        with_env_vars(&CLEAN, || {
            let settings = LogSettings::resolve(None, None, false, false);
            assert_eq!(settings.level, LogLevel::Warn);
            assert_eq!(settings.format, LogFormat::Human);
            assert!(settings.file.is_none());
        });
    }

    #[test]
    fn cli_beats_env_beats_config() {
        with_env_vars(&[(LOG_LEVEL_ENV, Some("info"))], || {
            assert_eq!(
                LogSettings::resolve(Some("trace"), Some("error"), false, false).level,
                LogLevel::Trace
            );
            assert_eq!(
                LogSettings::resolve(None, Some("error"), false, false).level,
                LogLevel::Info
            );
        });
        with_env_vars(&CLEAN, || {
            assert_eq!(
                LogSettings::resolve(None, Some("error"), false, false).level,
                LogLevel::Error
            );
        });
    }

    #[test]
    fn verbose_only_applies_when_unset() {
        with_env_vars(&CLEAN, || {
            assert_eq!(
                LogSettings::resolve(None, None, false, true).level,
                LogLevel::Debug
            );
            assert_eq!(
                LogSettings::resolve(Some("error"), None, false, true).level,
                LogLevel::Error
            );
        });
    }

    #[test]
    fn json_output_overrides_env_format() {
        with_env_vars(&[(LOG_FORMAT_ENV, Some("compact"))], || {
            assert_eq!(
                LogSettings::resolve(None, None, false, false).format,
                LogFormat::Compact
            );
            assert_eq!(
                LogSettings::resolve(None, None, true, false).format,
                LogFormat::Json
            );
        });
    }

    #[test]
    fn log_file_env_is_picked_up() {
        with_env_vars(&[(LOG_FILE_ENV, Some("/tmp/relaydash.log"))], || {
            assert_eq!(
                LogSettings::resolve(None, None, false, false).file,
                Some(PathBuf::from("/tmp/relaydash.log"))
            );
        });
    }

    #[test]
    fn level_aliases_parse() {
        assert_eq!(LogLevel::from_arg("WARNING"), Some(LogLevel::Warn));
        assert_eq!(LogLevel::from_arg("verbose"), Some(LogLevel::Debug));
        assert_eq!(LogLevel::from_arg("loud"), None);
        assert_eq!(LogFormat::from_arg("JSONL"), Some(LogFormat::Json));
    }
}
