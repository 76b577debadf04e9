//! Output data models.
//!
//! Serializable payloads shared by the robot (JSON/Markdown) and human
//! renderers. Field names are camelCase on the wire.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::auth_method::AuthMethod;
use super::normalizer::{NormalizedTokens, Pagination, ResponseShape};
use super::provider::ProviderSpec;
use crate::error::{FixSuggestion, RelayError};

/// Schema identifier stamped on every robot envelope.
pub const SCHEMA_VERSION: &str = "relaydash.v1";

// =============================================================================
// Registry payloads
// =============================================================================

/// One provider family as reported by `providers list|show`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProviderPayload {
    pub provider_type: String,
    pub display_name: String,
    pub supported_auth_methods: Vec<String>,
    /// Auth method key to whether a user id is required.
    pub requires_user_id: BTreeMap<String, bool>,
    pub default_auto_checkin: bool,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
}

impl From<&ProviderSpec> for ProviderPayload {
    fn from(spec: &ProviderSpec) -> Self {
        Self {
            provider_type: spec.provider_type.key().to_string(),
            display_name: spec.display_name.clone(),
            supported_auth_methods: spec
                .supported_auth_methods
                .iter()
                .map(|m| m.key().to_string())
                .collect(),
            requires_user_id: spec
                .requirement_keys()
                .filter_map(|m| spec.requires_user_id(m).map(|r| (m.key().to_string(), r)))
                .collect(),
            default_auto_checkin: spec.default_auto_checkin,
            description: spec.description.clone(),
        }
    }
}

/// Result of `providers check`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CombinationPayload {
    pub provider_type: String,
    pub auth_method: String,
    pub supported: bool,
    pub requires_user_id: bool,
    pub user_id_supplied: bool,
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// One auth method as reported by `auth-methods`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AuthMethodPayload {
    pub key: String,
    pub display_name: String,
    pub description: String,
    /// Provider families that accept this method.
    pub providers: Vec<String>,
}

impl AuthMethodPayload {
    #[must_use]
    pub fn new(method: AuthMethod, providers: Vec<String>) -> Self {
        Self {
            key: method.key().to_string(),
            display_name: method.display_name().to_string(),
            description: method.description().to_string(),
            providers,
        }
    }
}

// =============================================================================
// Token payloads
// =============================================================================

/// Normalized token list for one provider.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TokenListPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    pub shape: ResponseShape,
    pub count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
    pub tokens: Vec<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fetched_at: Option<DateTime<Utc>>,
}

impl TokenListPayload {
    #[must_use]
    pub fn from_normalized(provider: Option<String>, normalized: NormalizedTokens) -> Self {
        Self {
            provider,
            shape: normalized.shape,
            count: normalized.count,
            pagination: normalized.pagination,
            tokens: normalized.tokens,
            fetched_at: None,
        }
    }

    #[must_use]
    pub fn with_fetched_at(mut self, fetched_at: DateTime<Utc>) -> Self {
        self.fetched_at = Some(fetched_at);
        self
    }
}

// =============================================================================
// Error reports
// =============================================================================

/// Serializable fix suggestion.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FixSuggestionReport {
    pub commands: Vec<String>,
    pub context: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub prevention: Option<String>,
}

impl From<&FixSuggestion> for FixSuggestionReport {
    fn from(s: &FixSuggestion) -> Self {
        Self {
            commands: s.commands.clone(),
            context: s.context.clone(),
            prevention: s.prevention.clone(),
        }
    }
}

/// Structured error report.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ErrorReport {
    pub error_code: String,
    pub category: String,
    pub message: String,
    pub retryable: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<FixSuggestionReport>,
}

impl ErrorReport {
    #[must_use]
    pub fn from_error(err: &RelayError) -> Self {
        Self {
            error_code: err.error_code().to_string(),
            category: err.category().to_string(),
            message: err.to_string(),
            retryable: err.is_retryable(),
            provider: err.provider().map(ToString::to_string),
            suggestions: err.fix_suggestions().iter().map(Into::into).collect(),
        }
    }
}

// =============================================================================
// Robot envelope
// =============================================================================

/// Top-level JSON envelope for robot mode output.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RobotOutput<T> {
    pub schema_version: String,
    pub generated_at: DateTime<Utc>,
    pub command: String,
    pub data: T,

    #[serde(default)]
    pub errors: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub error_details: Vec<ErrorReport>,

    pub meta: RobotMeta,
}

/// Metadata for robot output.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RobotMeta {
    pub format: String,
    pub version: String,
}

impl<T> RobotOutput<T> {
    pub fn new(command: impl Into<String>, data: T) -> Self {
        Self {
            schema_version: SCHEMA_VERSION.to_string(),
            generated_at: Utc::now(),
            command: command.into(),
            data,
            errors: Vec::new(),
            error_details: Vec::new(),
            meta: RobotMeta {
                format: "json".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
        }
    }

    /// Attach error reports; `errors` mirrors their messages.
    #[must_use]
    pub fn with_error_details(mut self, details: Vec<ErrorReport>) -> Self {
        self.errors = details.iter().map(|d| d.message.clone()).collect();
        self.error_details = details;
        self
    }
}
