//! Auth method catalog.
//!
//! The two credential mechanisms relay sites accept.

use serde::{Deserialize, Serialize};

/// Credential mechanism used against a provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthMethod {
    /// Browser session cookie.
    Sessions,
    /// Bearer access token.
    Token,
}

impl AuthMethod {
    /// All auth methods in display order.
    pub const ALL: &'static [Self] = &[Self::Sessions, Self::Token];

    /// Stable key used in config files and on the command line.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Sessions => "sessions",
            Self::Token => "token",
        }
    }

    /// Display name for human output.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Sessions => "Session Cookie",
            Self::Token => "Access Token",
        }
    }

    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Sessions => "Authenticate with the session cookie of a signed-in browser",
            Self::Token => "Authenticate with a system access token sent as a bearer header",
        }
    }

    /// Resolve a key. Keys are case-sensitive.
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|method| method.key() == key)
    }
}

impl std::fmt::Display for AuthMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_key_roundtrips_all_methods() {
        for method in AuthMethod::ALL {
            assert_eq!(AuthMethod::from_key(method.key()), Some(*method));
        }
    }

    #[test]
    fn from_key_rejects_unknown_and_wrong_case() {
        assert_eq!(AuthMethod::from_key("oauth"), None);
        assert_eq!(AuthMethod::from_key("Token"), None);
        assert_eq!(AuthMethod::from_key(""), None);
    }

    #[test]
    fn serde_uses_lowercase_keys() {
        let json = serde_json::to_string(&AuthMethod::Sessions).unwrap();
        assert_eq!(json, "\"sessions\"");
    }
}
