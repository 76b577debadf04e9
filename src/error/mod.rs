//! Error types for relaydash.
//!
//! Uses `thiserror` for structured error types that map to exit codes.
//!
//! ## Error Taxonomy
//!
//! Errors are categorized into five main categories:
//! - **Validation**: Unknown provider families, unknown auth methods, or
//!   unsupported provider/auth combinations
//! - **Upstream**: Upstream reported failure or returned an unrecognized shape
//! - **Configuration**: Config, registry, or site catalog files that fail to load
//! - **Network**: Timeouts while waiting on a caller-supplied fetch
//! - **Internal**: I/O, serialization, or unclassified issues
//!
//! Each error has a stable error code (e.g., `RELAY-V001`) for programmatic handling.
//!
//! Query predicates on the registry and directory never produce these errors;
//! they answer `false`/`None`. Only orchestration code (CLI, pipeline) turns a
//! negative answer into a [`RelayError`].

pub mod suggestions;

use thiserror::Error;

pub use suggestions::FixSuggestion;

use crate::core::normalizer::NormalizeError;

// =============================================================================
// Error Categories
// =============================================================================

/// High-level error categories for classification and routing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Unknown keys or unsupported provider/auth combinations.
    Validation,
    /// Upstream failures and unrecognized response shapes.
    Upstream,
    /// Configuration, registry, and site catalog issues.
    Configuration,
    /// Timeouts.
    Network,
    /// Internal errors (I/O, serialization, unclassified).
    Internal,
}

impl ErrorCategory {
    /// Returns a human-readable description of the category.
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::Validation => "Validation error",
            Self::Upstream => "Upstream error",
            Self::Configuration => "Configuration error",
            Self::Network => "Network error",
            Self::Internal => "Internal error",
        }
    }

    /// Returns a short code prefix for this category.
    #[must_use]
    pub const fn code_prefix(&self) -> &'static str {
        match self {
            Self::Validation => "V",
            Self::Upstream => "U",
            Self::Configuration => "C",
            Self::Network => "N",
            Self::Internal => "X",
        }
    }
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.description())
    }
}

// =============================================================================
// Exit Codes
// =============================================================================

/// Process exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitCode {
    /// Success
    Success = 0,
    /// Unexpected failure, upstream failure
    GeneralError = 1,
    /// Validation, parse, or configuration errors
    ParseError = 3,
    /// Timeout
    Timeout = 4,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code as Self
    }
}

/// Main error type for relaydash operations.
#[derive(Error, Debug)]
pub enum RelayError {
    // ==========================================================================
    // Validation errors (Category: Validation)
    // ==========================================================================
    /// Provider family key is not registered.
    #[error("invalid provider type: {0}")]
    InvalidProviderType(String),

    /// Auth method key is not one of the known methods.
    #[error("invalid auth method: {0}")]
    InvalidAuthMethod(String),

    /// Provider family exists but does not accept the auth method.
    #[error("provider {provider} does not support auth method {auth}")]
    UnsupportedAuthMethod { provider: String, auth: String },

    /// Provider/auth combination needs a subject (user) identifier.
    #[error("provider {provider} requires a user id when using {auth} auth")]
    SubjectIdRequired { provider: String, auth: String },

    // ==========================================================================
    // Upstream errors (Category: Upstream)
    // ==========================================================================
    /// Upstream reported failure or returned a non-object payload.
    #[error("upstream failure: {message}")]
    UpstreamFailure { message: String },

    /// Upstream payload did not match any known token list shape.
    #[error("unrecognized upstream response shape: {raw}")]
    UpstreamShape { raw: String },

    /// Caller-supplied fetch returned an error.
    #[error("fetch failed for {provider}: {reason}")]
    FetchFailed { provider: String, reason: String },

    // ==========================================================================
    // Configuration errors (Category: Configuration)
    // ==========================================================================
    /// Configuration file not found at expected path.
    #[error("config file not found: {path}")]
    ConfigNotFound { path: String },

    /// Error parsing a configuration, registry, or catalog file.
    #[error("parse error at {path}: {message}")]
    ConfigParse { path: String, message: String },

    /// Invalid value in configuration.
    #[error("invalid config value for '{key}': {message}")]
    ConfigInvalid {
        key: String,
        value: String,
        message: String,
    },

    /// Generic configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Provider registry table violates its structural invariants.
    #[error("invalid provider registry entry {provider}: {reason}")]
    RegistryInvalid { provider: String, reason: String },

    /// Site catalog record is malformed.
    #[error("invalid site record '{site}': {reason}")]
    SiteCatalogInvalid { site: String, reason: String },

    /// Site catalog record references an unregistered provider family.
    #[error("site '{site}' references unknown provider type '{provider}'")]
    UnknownSiteProvider { site: String, provider: String },

    /// Two catalog records claim to be the default for the same family.
    #[error("provider type {provider} has more than one default site: '{first}' and '{second}'")]
    DuplicateDefaultSite {
        provider: String,
        first: String,
        second: String,
    },

    /// No default site is designated for the provider family.
    #[error("no default site for provider type: {0}")]
    NoDefaultSite(String),

    // ==========================================================================
    // Network errors (Category: Network)
    // ==========================================================================
    /// Fetch did not complete within the caller-supplied timeout.
    #[error("request timeout after {seconds}s for {provider}")]
    TimeoutWithProvider { provider: String, seconds: u64 },

    // ==========================================================================
    // Internal errors (Category: Internal)
    // ==========================================================================
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Catch-all for other errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<NormalizeError> for RelayError {
    fn from(err: NormalizeError) -> Self {
        match err {
            NormalizeError::UpstreamFailure { message } => Self::UpstreamFailure { message },
            NormalizeError::UnrecognizedShape { raw } => Self::UpstreamShape { raw },
        }
    }
}

impl RelayError {
    /// Map error to process exit code.
    #[must_use]
    pub const fn exit_code(&self) -> ExitCode {
        match self {
            Self::InvalidProviderType(_)
            | Self::InvalidAuthMethod(_)
            | Self::UnsupportedAuthMethod { .. }
            | Self::SubjectIdRequired { .. }
            | Self::UpstreamShape { .. }
            | Self::ConfigNotFound { .. }
            | Self::ConfigParse { .. }
            | Self::ConfigInvalid { .. }
            | Self::Config(_)
            | Self::RegistryInvalid { .. }
            | Self::SiteCatalogInvalid { .. }
            | Self::UnknownSiteProvider { .. }
            | Self::DuplicateDefaultSite { .. }
            | Self::NoDefaultSite(_) => ExitCode::ParseError,

            Self::TimeoutWithProvider { .. } => ExitCode::Timeout,

            Self::UpstreamFailure { .. }
            | Self::FetchFailed { .. }
            | Self::Io(_)
            | Self::Json(_)
            | Self::Other(_) => ExitCode::GeneralError,
        }
    }

    /// Returns the error category for classification and routing.
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidProviderType(_)
            | Self::InvalidAuthMethod(_)
            | Self::UnsupportedAuthMethod { .. }
            | Self::SubjectIdRequired { .. } => ErrorCategory::Validation,

            Self::UpstreamFailure { .. } | Self::UpstreamShape { .. } | Self::FetchFailed { .. } => {
                ErrorCategory::Upstream
            }

            Self::ConfigNotFound { .. }
            | Self::ConfigParse { .. }
            | Self::ConfigInvalid { .. }
            | Self::Config(_)
            | Self::RegistryInvalid { .. }
            | Self::SiteCatalogInvalid { .. }
            | Self::UnknownSiteProvider { .. }
            | Self::DuplicateDefaultSite { .. }
            | Self::NoDefaultSite(_) => ErrorCategory::Configuration,

            Self::TimeoutWithProvider { .. } => ErrorCategory::Network,

            Self::Io(_) | Self::Json(_) | Self::Other(_) => ErrorCategory::Internal,
        }
    }

    /// Returns a stable error code for programmatic handling.
    ///
    /// Format: `RELAY-{category}{number}` where category is:
    /// - V: Validation
    /// - U: Upstream
    /// - C: Configuration
    /// - N: Network
    /// - X: Internal
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidProviderType(_) => "RELAY-V001",
            Self::InvalidAuthMethod(_) => "RELAY-V002",
            Self::UnsupportedAuthMethod { .. } => "RELAY-V003",
            Self::SubjectIdRequired { .. } => "RELAY-V004",

            Self::UpstreamFailure { .. } => "RELAY-U001",
            Self::UpstreamShape { .. } => "RELAY-U002",
            Self::FetchFailed { .. } => "RELAY-U010",

            Self::ConfigNotFound { .. } => "RELAY-C001",
            Self::ConfigParse { .. } => "RELAY-C002",
            Self::ConfigInvalid { .. } => "RELAY-C003",
            Self::Config(_) => "RELAY-C004",
            Self::RegistryInvalid { .. } => "RELAY-C010",
            Self::SiteCatalogInvalid { .. } => "RELAY-C020",
            Self::UnknownSiteProvider { .. } => "RELAY-C021",
            Self::DuplicateDefaultSite { .. } => "RELAY-C022",
            Self::NoDefaultSite(_) => "RELAY-C023",

            Self::TimeoutWithProvider { .. } => "RELAY-N001",

            Self::Io(_) => "RELAY-X001",
            Self::Json(_) => "RELAY-X002",
            Self::Other(_) => "RELAY-X099",
        }
    }

    /// Returns whether the orchestration layer may retry the operation.
    ///
    /// Upstream failures are retryable because relay sites report transient
    /// conditions (maintenance, session refresh) through the same envelope.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::TimeoutWithProvider { .. } | Self::FetchFailed { .. } | Self::UpstreamFailure { .. }
        )
    }

    /// Returns the provider family associated with this error, if any.
    #[must_use]
    pub fn provider(&self) -> Option<&str> {
        match self {
            Self::InvalidProviderType(provider)
            | Self::NoDefaultSite(provider)
            | Self::UnsupportedAuthMethod { provider, .. }
            | Self::SubjectIdRequired { provider, .. }
            | Self::FetchFailed { provider, .. }
            | Self::RegistryInvalid { provider, .. }
            | Self::UnknownSiteProvider { provider, .. }
            | Self::DuplicateDefaultSite { provider, .. }
            | Self::TimeoutWithProvider { provider, .. } => Some(provider),
            _ => None,
        }
    }

    /// Returns actionable fix suggestions for this error.
    #[must_use]
    pub fn fix_suggestions(&self) -> Vec<FixSuggestion> {
        match self {
            Self::InvalidProviderType(name) => suggestions::invalid_provider_suggestions(name),
            Self::InvalidAuthMethod(name) => suggestions::invalid_auth_method_suggestions(name),
            Self::UnsupportedAuthMethod { provider, auth } => {
                suggestions::unsupported_auth_suggestions(provider, auth)
            }
            Self::SubjectIdRequired { provider, auth } => {
                suggestions::subject_id_required_suggestions(provider, auth)
            }
            Self::UpstreamFailure { message } => suggestions::upstream_failure_suggestions(message),
            Self::UpstreamShape { .. } => suggestions::upstream_shape_suggestions(),
            Self::FetchFailed { provider, reason } => vec![FixSuggestion::new(
                vec![format!("relaydash providers show {provider}")],
                format!("Fetching tokens from {provider} failed: {reason}"),
            )],
            Self::ConfigNotFound { path } => suggestions::config_not_found_suggestions(path),
            Self::ConfigParse { path, message } => {
                suggestions::config_parse_suggestions(path, message)
            }
            Self::ConfigInvalid {
                key,
                value,
                message,
            } => suggestions::config_invalid_suggestions(key, value, message),
            Self::Config(msg) => vec![FixSuggestion::new(
                vec!["relaydash --config <path> providers list".to_string()],
                format!("Configuration error: {msg}"),
            )],
            Self::RegistryInvalid { provider, reason } => {
                suggestions::registry_invalid_suggestions(provider, reason)
            }
            Self::SiteCatalogInvalid { site, reason } => {
                suggestions::site_catalog_suggestions(site, reason)
            }
            Self::UnknownSiteProvider { site, provider } => {
                suggestions::unknown_site_provider_suggestions(site, provider)
            }
            Self::DuplicateDefaultSite {
                provider,
                first,
                second,
            } => suggestions::duplicate_default_suggestions(provider, first, second),
            Self::NoDefaultSite(provider) => vec![FixSuggestion::new(
                vec![format!("relaydash sites list --provider {provider}")],
                format!("No site in the catalog is marked as the default for {provider}."),
            )
            .with_prevention("Set \"default\": true on one record per provider type.")],
            Self::TimeoutWithProvider { provider, seconds } => {
                suggestions::timeout_suggestions(provider, *seconds)
            }
            Self::Io(err) => vec![FixSuggestion::new(
                Vec::new(),
                format!("An I/O operation failed: {err}"),
            )],
            Self::Json(err) => vec![FixSuggestion::new(
                Vec::new(),
                format!("Input is not valid JSON: {err}"),
            )],
            Self::Other(err) => vec![FixSuggestion::new(
                vec!["relaydash --verbose <command>".to_string()],
                format!("Unexpected error: {err}"),
            )],
        }
    }
}

/// Result type alias for relaydash operations.
pub type Result<T> = std::result::Result<T, RelayError>;
