//! Fix suggestion database for relaydash errors.
//!
//! Provides actionable fix suggestions mapped to specific error types,
//! including commands, context explanations, and prevention tips.

use crate::core::auth_method::AuthMethod;
use crate::core::provider::ProviderType;

// =============================================================================
// Fix Suggestion Types
// =============================================================================

/// A fix suggestion for an error.
#[derive(Debug, Clone)]
pub struct FixSuggestion {
    /// Primary fix commands in order of preference.
    /// These should be copy-paste ready for the terminal.
    pub commands: Vec<String>,

    /// Explanation of why this error occurred.
    pub context: String,

    /// Tips to prevent this error in the future.
    pub prevention: Option<String>,
}

impl FixSuggestion {
    /// Creates a new fix suggestion with required fields.
    #[must_use]
    pub fn new(commands: Vec<String>, context: impl Into<String>) -> Self {
        Self {
            commands,
            context: context.into(),
            prevention: None,
        }
    }

    /// Builder: adds prevention tips.
    #[must_use]
    pub fn with_prevention(mut self, prevention: impl Into<String>) -> Self {
        self.prevention = Some(prevention.into());
        self
    }
}

fn known_provider_keys() -> String {
    ProviderType::ALL
        .iter()
        .map(|p| p.key())
        .collect::<Vec<_>>()
        .join(", ")
}

fn known_auth_keys() -> String {
    AuthMethod::ALL
        .iter()
        .map(|a| a.key())
        .collect::<Vec<_>>()
        .join(", ")
}

// =============================================================================
// Validation
// =============================================================================

/// Suggestions for an unknown provider family key.
#[must_use]
pub fn invalid_provider_suggestions(name: &str) -> Vec<FixSuggestion> {
    vec![
        FixSuggestion::new(
            vec!["relaydash providers list".to_string()],
            format!(
                "'{name}' is not a registered provider type. Known types: {}",
                known_provider_keys()
            ),
        )
        .with_prevention("Provider type keys are case-sensitive (e.g. NewApi, AnyRouter)."),
    ]
}

/// Suggestions for an unknown auth method key.
#[must_use]
pub fn invalid_auth_method_suggestions(name: &str) -> Vec<FixSuggestion> {
    vec![FixSuggestion::new(
        vec!["relaydash auth-methods".to_string()],
        format!(
            "'{name}' is not a known auth method. Known methods: {}",
            known_auth_keys()
        ),
    )]
}

/// Suggestions for a provider that does not accept the requested auth method.
#[must_use]
pub fn unsupported_auth_suggestions(provider: &str, auth: &str) -> Vec<FixSuggestion> {
    vec![FixSuggestion::new(
        vec![format!("relaydash providers show {provider}")],
        format!("{provider} does not accept '{auth}' credentials."),
    )
    .with_prevention("Check the supported auth methods before saving an account.")]
}

/// Suggestions for a missing subject identifier.
#[must_use]
pub fn subject_id_required_suggestions(provider: &str, auth: &str) -> Vec<FixSuggestion> {
    vec![
        FixSuggestion::new(
            vec![format!(
                "relaydash providers check {provider} --auth {auth} --user-id <ID>"
            )],
            format!(
                "{provider} rejects {auth} credentials unless the account's user id is sent alongside them."
            ),
        )
        .with_prevention("The user id is shown on the site's profile page."),
    ]
}

// =============================================================================
// Upstream
// =============================================================================

/// Suggestions for an upstream-reported failure.
#[must_use]
pub fn upstream_failure_suggestions(message: &str) -> Vec<FixSuggestion> {
    vec![
        FixSuggestion::new(
            Vec::new(),
            format!("The relay site answered but reported failure: {message}"),
        )
        .with_prevention("Expired sessions are the most common cause; sign in again to refresh the cookie."),
    ]
}

/// Suggestions for an unrecognized upstream shape.
#[must_use]
pub fn upstream_shape_suggestions() -> Vec<FixSuggestion> {
    vec![FixSuggestion::new(
        vec!["relaydash --verbose tokens normalize --input <FILE>".to_string()],
        "The token list was not found under data.records, data.items, data.data, or data. \
         The site may run an unsupported version.",
    )]
}

// =============================================================================
// Configuration
// =============================================================================

/// Suggestions for a missing config file.
#[must_use]
pub fn config_not_found_suggestions(path: &str) -> Vec<FixSuggestion> {
    vec![FixSuggestion::new(
        vec![format!("touch {path}")],
        format!("No configuration file exists at {path}."),
    )]
}

/// Suggestions for a file that failed to parse.
#[must_use]
pub fn config_parse_suggestions(path: &str, message: &str) -> Vec<FixSuggestion> {
    vec![
        FixSuggestion::new(
            vec![format!("$EDITOR {path}")],
            format!("{path} could not be parsed: {message}"),
        )
        .with_prevention("Validate the file with a TOML or JSON linter after editing."),
    ]
}

/// Suggestions for an invalid config value.
#[must_use]
pub fn config_invalid_suggestions(key: &str, value: &str, message: &str) -> Vec<FixSuggestion> {
    vec![FixSuggestion::new(
        Vec::new(),
        format!("'{value}' is not valid for {key}: {message}"),
    )]
}

/// Suggestions for a registry table that violates its invariants.
#[must_use]
pub fn registry_invalid_suggestions(provider: &str, reason: &str) -> Vec<FixSuggestion> {
    vec![
        FixSuggestion::new(
            vec!["relaydash providers list".to_string()],
            format!("The registry entry for {provider} is inconsistent: {reason}"),
        )
        .with_prevention(
            "Every supported auth method needs exactly one requires_user_id entry, and no others.",
        ),
    ]
}

/// Suggestions for a malformed site catalog record.
#[must_use]
pub fn site_catalog_suggestions(site: &str, reason: &str) -> Vec<FixSuggestion> {
    vec![FixSuggestion::new(
        Vec::new(),
        format!("Site record '{site}' was rejected: {reason}"),
    )]
}

/// Suggestions for a site whose provider type is unknown.
#[must_use]
pub fn unknown_site_provider_suggestions(site: &str, provider: &str) -> Vec<FixSuggestion> {
    vec![FixSuggestion::new(
        vec!["relaydash providers list".to_string()],
        format!(
            "Site '{site}' is tagged with '{provider}', which is not registered. Known types: {}",
            known_provider_keys()
        ),
    )]
}

/// Suggestions for duplicate default sites.
#[must_use]
pub fn duplicate_default_suggestions(
    provider: &str,
    first: &str,
    second: &str,
) -> Vec<FixSuggestion> {
    vec![FixSuggestion::new(
        vec![format!("relaydash sites list --provider {provider}")],
        format!("Both '{first}' and '{second}' are marked as the default for {provider}."),
    )
    .with_prevention("Keep \"default\": true on a single record per provider type.")]
}

// =============================================================================
// Network
// =============================================================================

/// Suggestions for a fetch timeout.
#[must_use]
pub fn timeout_suggestions(provider: &str, seconds: u64) -> Vec<FixSuggestion> {
    vec![
        FixSuggestion::new(
            vec![format!("relaydash tokens normalize --timeout {}", seconds * 2)],
            format!("{provider} did not answer within {seconds}s."),
        )
        .with_prevention("Set general.timeout_seconds in config.toml for slow sites."),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_provider_lists_known_keys() {
        let suggestions = invalid_provider_suggestions("Foo");
        assert!(suggestions[0].context.contains("AnyRouter"));
        assert!(suggestions[0].context.contains("NewApi"));
    }

    #[test]
    fn subject_id_suggestion_includes_provider_in_command() {
        let suggestions = subject_id_required_suggestions("Veloera", "sessions");
        assert!(suggestions[0].commands[0].contains("Veloera"));
        assert!(suggestions[0].commands[0].contains("--user-id"));
    }

    #[test]
    fn timeout_suggests_doubled_timeout() {
        let suggestions = timeout_suggestions("NewApi", 10);
        assert!(suggestions[0].commands[0].contains("--timeout 20"));
    }
}
