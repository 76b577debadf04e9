//! Provider type registry.
//!
//! Describes, for every upstream provider family, which auth methods it
//! accepts and whether each method needs a subject (user) identifier.
//! The table is loaded once from its TOML shape, validated, and read-only
//! afterwards.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::auth_method::AuthMethod;
use crate::error::{RelayError, Result};

/// Built-in registry table.
const BUILTIN_PROVIDERS: &str = include_str!("providers.toml");

// =============================================================================
// Provider Type Enum
// =============================================================================

/// Upstream provider families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ProviderType {
    NewApi,
    Veloera,
    OneHub,
    DoneHub,
    VoApi,
    AnyRouter,
}

impl ProviderType {
    /// All provider types in display order.
    pub const ALL: &'static [Self] = &[
        Self::NewApi,
        Self::Veloera,
        Self::OneHub,
        Self::DoneHub,
        Self::VoApi,
        Self::AnyRouter,
    ];

    /// Stable key used in registry files, site catalogs, and the CLI.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::NewApi => "NewApi",
            Self::Veloera => "Veloera",
            Self::OneHub => "OneHub",
            Self::DoneHub => "DoneHub",
            Self::VoApi => "VoApi",
            Self::AnyRouter => "AnyRouter",
        }
    }

    /// Resolve an exact key.
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|p| p.key() == key)
    }

    /// Parse from a CLI argument (case-insensitive).
    pub fn from_cli_name(name: &str) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|p| p.key().eq_ignore_ascii_case(name.trim()))
            .ok_or_else(|| RelayError::InvalidProviderType(name.to_string()))
    }
}

impl std::fmt::Display for ProviderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

// =============================================================================
// Registry File Shape
// =============================================================================

/// One provider entry as written in a registry file.
///
/// Auth method keys stay as strings here so that validation can report
/// unknown keys by name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderTypeConfig {
    #[serde(alias = "displayName")]
    pub display_name: String,
    #[serde(alias = "supportedAuthMethods")]
    pub supported_auth_methods: Vec<String>,
    #[serde(alias = "requiresUserId", default)]
    pub requires_user_id: BTreeMap<String, bool>,
    #[serde(alias = "defaultAutoCheckin", default)]
    pub default_auto_checkin: bool,
    #[serde(default)]
    pub description: String,
}

// =============================================================================
// Provider Spec
// =============================================================================

/// Validated capability record for one provider family.
#[derive(Debug, Clone, Serialize)]
pub struct ProviderSpec {
    pub provider_type: ProviderType,
    pub display_name: String,
    /// Supported methods in [`AuthMethod::ALL`] order.
    pub supported_auth_methods: Vec<AuthMethod>,
    requires_user_id: BTreeMap<AuthMethod, bool>,
    pub default_auto_checkin: bool,
    pub description: String,
}

impl ProviderSpec {
    /// Whether this provider accepts the auth method.
    #[must_use]
    pub fn supports(&self, auth: AuthMethod) -> bool {
        self.supported_auth_methods.contains(&auth)
    }

    /// Declared subject identifier requirement, `None` for unsupported methods.
    #[must_use]
    pub fn requires_user_id(&self, auth: AuthMethod) -> Option<bool> {
        self.requires_user_id.get(&auth).copied()
    }

    /// Auth methods that have a declared requirement.
    pub fn requirement_keys(&self) -> impl Iterator<Item = AuthMethod> + '_ {
        self.requires_user_id.keys().copied()
    }

    fn from_config(provider_type: ProviderType, config: ProviderTypeConfig) -> Result<Self> {
        let invalid = |reason: String| RelayError::RegistryInvalid {
            provider: provider_type.key().to_string(),
            reason,
        };

        if config.display_name.trim().is_empty() {
            return Err(invalid("display_name must not be empty".to_string()));
        }
        if config.supported_auth_methods.is_empty() {
            return Err(invalid(
                "supported_auth_methods must not be empty".to_string(),
            ));
        }

        let mut supported = BTreeSet::new();
        for key in &config.supported_auth_methods {
            let method = AuthMethod::from_key(key)
                .ok_or_else(|| invalid(format!("unknown auth method '{key}'")))?;
            if !supported.insert(method) {
                return Err(invalid(format!("auth method '{key}' listed twice")));
            }
        }

        let mut requires_user_id = BTreeMap::new();
        for (key, required) in &config.requires_user_id {
            let method = AuthMethod::from_key(key).ok_or_else(|| {
                invalid(format!("requires_user_id has unknown auth method '{key}'"))
            })?;
            if !supported.contains(&method) {
                return Err(invalid(format!(
                    "requires_user_id has entry for unsupported auth method '{key}'"
                )));
            }
            requires_user_id.insert(method, *required);
        }
        if let Some(missing) = supported.iter().find(|m| !requires_user_id.contains_key(*m)) {
            return Err(invalid(format!(
                "requires_user_id is missing auth method '{}'",
                missing.key()
            )));
        }

        Ok(Self {
            provider_type,
            display_name: config.display_name,
            supported_auth_methods: supported.into_iter().collect(),
            requires_user_id,
            default_auto_checkin: config.default_auto_checkin,
            description: config.description,
        })
    }
}

// =============================================================================
// Provider Registry
// =============================================================================

/// Registry of all provider families.
///
/// Holds exactly one [`ProviderSpec`] per [`ProviderType`]. Every query is a
/// pure read, so a single registry can be shared across threads.
#[derive(Debug, Clone)]
pub struct ProviderRegistry {
    specs: Vec<ProviderSpec>,
}

impl ProviderRegistry {
    /// Load the built-in table.
    pub fn builtin() -> Result<Self> {
        Self::from_toml_str(BUILTIN_PROVIDERS, "<builtin>")
    }

    /// Load a registry file.
    pub fn load_from(path: &Path) -> Result<Self> {
        tracing::debug!(?path, "Loading provider registry");
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content, &path.display().to_string())
    }

    /// Parse a registry from TOML. `origin` names the source in errors.
    pub fn from_toml_str(content: &str, origin: &str) -> Result<Self> {
        let entries: BTreeMap<String, ProviderTypeConfig> =
            toml::from_str(content).map_err(|e| RelayError::ConfigParse {
                path: origin.to_string(),
                message: e.to_string(),
            })?;
        Self::from_configs(entries)
    }

    /// Build and validate a registry from per-key config entries.
    ///
    /// Fails unless every provider type appears exactly once and every entry
    /// satisfies the requirement-map invariant.
    pub fn from_configs(
        entries: impl IntoIterator<Item = (String, ProviderTypeConfig)>,
    ) -> Result<Self> {
        let mut by_type: BTreeMap<ProviderType, ProviderSpec> = BTreeMap::new();

        for (key, config) in entries {
            let provider_type =
                ProviderType::from_key(&key).ok_or_else(|| RelayError::RegistryInvalid {
                    provider: key.clone(),
                    reason: "unknown provider type".to_string(),
                })?;
            if by_type.contains_key(&provider_type) {
                return Err(RelayError::RegistryInvalid {
                    provider: key,
                    reason: "defined more than once".to_string(),
                });
            }
            let spec = ProviderSpec::from_config(provider_type, config)?;
            by_type.insert(provider_type, spec);
        }

        let mut specs = Vec::with_capacity(ProviderType::ALL.len());
        for provider_type in ProviderType::ALL {
            let spec = by_type
                .remove(provider_type)
                .ok_or_else(|| RelayError::RegistryInvalid {
                    provider: provider_type.key().to_string(),
                    reason: "missing from registry".to_string(),
                })?;
            specs.push(spec);
        }

        tracing::debug!(providers = specs.len(), "Provider registry loaded");
        Ok(Self { specs })
    }

    /// All registered provider keys in display order.
    #[must_use]
    pub fn list_provider_types(&self) -> Vec<&'static str> {
        self.specs.iter().map(|s| s.provider_type.key()).collect()
    }

    /// Look up a provider family by key. Unknown keys yield `None`.
    #[must_use]
    pub fn get_provider_type(&self, key: &str) -> Option<&ProviderSpec> {
        ProviderType::from_key(key).and_then(|p| self.get(p))
    }

    /// Look up a provider family by type.
    #[must_use]
    pub fn get(&self, provider_type: ProviderType) -> Option<&ProviderSpec> {
        self.specs.iter().find(|s| s.provider_type == provider_type)
    }

    /// Iterate all specs in display order.
    pub fn iter(&self) -> impl Iterator<Item = &ProviderSpec> {
        self.specs.iter()
    }

    #[must_use]
    pub fn is_valid_provider_type(&self, key: &str) -> bool {
        self.get_provider_type(key).is_some()
    }

    #[must_use]
    pub fn is_valid_auth_method(&self, key: &str) -> bool {
        AuthMethod::from_key(key).is_some()
    }

    /// Whether the provider accepts the auth method. Unknown keys are simply
    /// "not supported".
    #[must_use]
    pub fn is_auth_method_supported(&self, provider_key: &str, auth_key: &str) -> bool {
        match (
            self.get_provider_type(provider_key),
            AuthMethod::from_key(auth_key),
        ) {
            (Some(spec), Some(auth)) => spec.supports(auth),
            _ => false,
        }
    }

    /// Whether a subject identifier must accompany the credential.
    ///
    /// Returns `false` when the combination itself is unsupported.
    #[must_use]
    pub fn requires_subject_identifier(&self, provider_key: &str, auth_key: &str) -> bool {
        match (
            self.get_provider_type(provider_key),
            AuthMethod::from_key(auth_key),
        ) {
            (Some(spec), Some(auth)) => spec.requires_user_id(auth).unwrap_or(false),
            _ => false,
        }
    }

    /// Default automated check-in flag; `false` for unknown providers.
    #[must_use]
    pub fn default_auto_checkin_enabled(&self, provider_key: &str) -> bool {
        self.get_provider_type(provider_key)
            .is_some_and(|spec| spec.default_auto_checkin)
    }

    /// Turn the query predicates into a typed verdict for orchestration code.
    ///
    /// A blank `subject_id` counts as missing.
    pub fn validate_combination(
        &self,
        provider_key: &str,
        auth_key: &str,
        subject_id: Option<&str>,
    ) -> Result<(ProviderType, AuthMethod)> {
        let spec = self
            .get_provider_type(provider_key)
            .ok_or_else(|| RelayError::InvalidProviderType(provider_key.to_string()))?;
        let auth = AuthMethod::from_key(auth_key)
            .ok_or_else(|| RelayError::InvalidAuthMethod(auth_key.to_string()))?;

        if !spec.supports(auth) {
            return Err(RelayError::UnsupportedAuthMethod {
                provider: provider_key.to_string(),
                auth: auth_key.to_string(),
            });
        }

        let has_subject = subject_id.is_some_and(|id| !id.trim().is_empty());
        if spec.requires_user_id(auth).unwrap_or(false) && !has_subject {
            return Err(RelayError::SubjectIdRequired {
                provider: provider_key.to_string(),
                auth: auth_key.to_string(),
            });
        }

        Ok((spec.provider_type, auth))
    }
}
