//! Typed read-only view over canonical token elements.
//!
//! The normalizer keeps tokens as raw JSON so unknown fields round-trip
//! untouched. [`Token::from_value`] extracts the fields the dashboard
//! displays and never fails: absent or mistyped fields become `None`.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::util::time::from_unix_seconds;

/// Sentinel `expired_time` meaning the token never expires.
pub const NEVER_EXPIRES: i64 = -1;

/// Token status codes used by relay sites.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenStatus {
    Enabled,
    Disabled,
    Expired,
    Exhausted,
    Other(i64),
}

impl TokenStatus {
    #[must_use]
    pub const fn from_code(code: i64) -> Self {
        match code {
            1 => Self::Enabled,
            2 => Self::Disabled,
            3 => Self::Expired,
            4 => Self::Exhausted,
            other => Self::Other(other),
        }
    }

    #[must_use]
    pub fn label(self) -> String {
        match self {
            Self::Enabled => "enabled".to_string(),
            Self::Disabled => "disabled".to_string(),
            Self::Expired => "expired".to_string(),
            Self::Exhausted => "exhausted".to_string(),
            Self::Other(code) => format!("status {code}"),
        }
    }
}

/// Token expiry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Expiry {
    Never,
    At(DateTime<Utc>),
    Unknown,
}

/// Quota figures.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Quota {
    pub remaining: Option<i64>,
    pub used: Option<i64>,
    pub unlimited: bool,
}

/// Heartbeat sub-setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Heartbeat {
    pub enabled: bool,
    pub timeout_seconds: Option<i64>,
}

/// Display view of one token element.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Token {
    pub id: Option<i64>,
    pub name: Option<String>,
    #[serde(skip)]
    pub key: Option<String>,
    pub status: Option<TokenStatus>,
    pub quota: Quota,
    pub group: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub accessed_at: Option<DateTime<Utc>>,
    pub expiry: Expiry,
    pub model_limits_enabled: bool,
    pub heartbeat: Option<Heartbeat>,
}

impl Token {
    /// Extract a token view from a raw element.
    #[must_use]
    pub fn from_value(value: &Value) -> Self {
        let empty = Map::new();
        let obj = value.as_object().unwrap_or(&empty);

        let heartbeat = obj
            .get("setting")
            .and_then(|s| s.get("heartbeat"))
            .and_then(Value::as_object)
            .map(|hb| Heartbeat {
                enabled: bool_field(hb, "enabled").unwrap_or(false),
                timeout_seconds: int_field(hb, "timeout_seconds"),
            });

        let expiry = match int_field(obj, "expired_time") {
            Some(NEVER_EXPIRES) => Expiry::Never,
            Some(secs) if secs > 0 => from_unix_seconds(secs).map_or(Expiry::Unknown, Expiry::At),
            _ => Expiry::Unknown,
        };

        Self {
            id: int_field(obj, "id"),
            name: str_field(obj, "name"),
            key: str_field(obj, "key"),
            status: int_field(obj, "status").map(TokenStatus::from_code),
            quota: Quota {
                remaining: int_field(obj, "remain_quota"),
                used: int_field(obj, "used_quota"),
                unlimited: bool_field(obj, "unlimited_quota").unwrap_or(false),
            },
            group: str_field(obj, "group").filter(|g| !g.is_empty()),
            created_at: int_field(obj, "created_time").and_then(from_unix_seconds),
            accessed_at: int_field(obj, "accessed_time").and_then(from_unix_seconds),
            expiry,
            model_limits_enabled: bool_field(obj, "model_limits_enabled").unwrap_or(false),
            heartbeat,
        }
    }

    /// Key with the middle hidden, for display.
    #[must_use]
    pub fn masked_key(&self) -> Option<String> {
        let key = self.key.as_deref()?;
        let chars: Vec<char> = key.chars().collect();
        if chars.len() <= 8 {
            return Some("****".to_string());
        }
        let head: String = chars[..4].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        Some(format!("{head}****{tail}"))
    }
}

/// Integer field; accepts integral floats and numeric strings.
fn int_field(obj: &Map<String, Value>, name: &str) -> Option<i64> {
    match obj.get(name)? {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && f.abs() < 9.0e15)
                .map(|f| f as i64)
        }),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Boolean field; accepts `0`/`1`.
fn bool_field(obj: &Map<String, Value>, name: &str) -> Option<bool> {
    match obj.get(name)? {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_i64().map(|v| v != 0),
        _ => None,
    }
}

fn str_field(obj: &Map<String, Value>, name: &str) -> Option<String> {
    obj.get(name).and_then(Value::as_str).map(ToString::to_string)
}
