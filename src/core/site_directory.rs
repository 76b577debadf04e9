//! Site directory.
//!
//! Catalog of concrete relay sites, each tagged with the provider family it
//! runs. Records are validated against the registry once, at load time;
//! queries afterwards are plain reads.

use serde::{Deserialize, Serialize};

use super::provider::{ProviderRegistry, ProviderType};
use crate::error::{RelayError, Result};

/// A site record as written in a catalog file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteRecordConfig {
    #[serde(rename = "providerType", alias = "provider_type")]
    pub provider_type: String,
    pub name: String,
    pub url: String,
    #[serde(rename = "affiliatePath", alias = "affiliate_path", default)]
    pub affiliate_path: String,
    #[serde(default)]
    pub default: bool,
}

/// A validated site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteRecord {
    pub provider_type: ProviderType,
    pub name: String,
    pub url: String,
    pub affiliate_path: String,
    #[serde(rename = "default")]
    pub is_default: bool,
}

impl SiteRecord {
    /// Base URL joined with the affiliate path.
    #[must_use]
    pub fn registration_url(&self) -> String {
        let path = self.affiliate_path.trim_start_matches('/');
        if path.is_empty() {
            return self.url.clone();
        }
        format!("{}/{}", self.url.trim_end_matches('/'), path)
    }

    fn matches_keyword(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
            || self.url.to_lowercase().contains(needle)
            || self.provider_type.key().to_lowercase().contains(needle)
    }
}

/// Read-only catalog of known sites, in input order.
#[derive(Debug, Clone, Default)]
pub struct SiteDirectory {
    records: Vec<SiteRecord>,
}

impl SiteDirectory {
    /// Validate records against the registry and build the directory.
    ///
    /// Rejects unknown provider keys, blank names, non-HTTP URLs, and more
    /// than one default per provider family.
    pub fn load(
        records: impl IntoIterator<Item = SiteRecordConfig>,
        registry: &ProviderRegistry,
    ) -> Result<Self> {
        let mut validated: Vec<SiteRecord> = Vec::new();

        for raw in records {
            let name = raw.name.trim().to_string();
            if name.is_empty() {
                return Err(RelayError::SiteCatalogInvalid {
                    site: raw.url,
                    reason: "name must not be empty".to_string(),
                });
            }

            let url = raw.url.trim().to_string();
            if !(url.starts_with("https://") || url.starts_with("http://")) {
                return Err(RelayError::SiteCatalogInvalid {
                    site: name,
                    reason: format!("url '{url}' must start with http:// or https://"),
                });
            }

            let provider_type = registry
                .get_provider_type(&raw.provider_type)
                .map(|spec| spec.provider_type)
                .ok_or_else(|| RelayError::UnknownSiteProvider {
                    site: name.clone(),
                    provider: raw.provider_type.clone(),
                })?;

            if raw.default {
                if let Some(existing) = validated
                    .iter()
                    .find(|r| r.is_default && r.provider_type == provider_type)
                {
                    return Err(RelayError::DuplicateDefaultSite {
                        provider: provider_type.key().to_string(),
                        first: existing.name.clone(),
                        second: name,
                    });
                }
            }

            validated.push(SiteRecord {
                provider_type,
                name,
                url,
                affiliate_path: raw.affiliate_path.trim().to_string(),
                is_default: raw.default,
            });
        }

        tracing::debug!(sites = validated.len(), "Site directory loaded");
        Ok(Self { records: validated })
    }

    /// All records in input order.
    #[must_use]
    pub fn all(&self) -> &[SiteRecord] {
        &self.records
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records of one provider family, in input order. Unknown keys yield an
    /// empty list.
    #[must_use]
    pub fn list_by_provider_type(&self, key: &str) -> Vec<&SiteRecord> {
        ProviderType::from_key(key).map_or_else(Vec::new, |p| self.list_by(p))
    }

    /// Records of one provider family, in input order.
    #[must_use]
    pub fn list_by(&self, provider_type: ProviderType) -> Vec<&SiteRecord> {
        self.records
            .iter()
            .filter(|r| r.provider_type == provider_type)
            .collect()
    }

    /// Case-insensitive substring search over name, URL, and provider key.
    ///
    /// The keyword is trimmed; an empty keyword returns every record.
    #[must_use]
    pub fn search(&self, keyword: &str) -> Vec<&SiteRecord> {
        let needle = keyword.trim().to_lowercase();
        if needle.is_empty() {
            return self.records.iter().collect();
        }
        self.records
            .iter()
            .filter(|r| r.matches_keyword(&needle))
            .collect()
    }

    /// The record designated as default for a provider family.
    #[must_use]
    pub fn get_default_for_type(&self, key: &str) -> Option<&SiteRecord> {
        let provider_type = ProviderType::from_key(key)?;
        self.records
            .iter()
            .find(|r| r.is_default && r.provider_type == provider_type)
    }
}
