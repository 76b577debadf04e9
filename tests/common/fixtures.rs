//! Test fixtures and factory functions for integration tests.
//!
//! ```rust,ignore
//! use common::fixtures::*;
//!
//! let payload: serde_json::Value = load_fixture("tokens/nested.json");
//! let wrapped = wrap_flat(vec![token(1, "t1")]);
//! ```

use std::fs;
use std::path::PathBuf;

use serde::de::DeserializeOwned;
use serde_json::{Value, json};

/// Path to `tests/fixtures`.
pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

/// Absolute path of a fixture file.
pub fn fixture_path(path: &str) -> PathBuf {
    fixtures_dir().join(path)
}

/// Load a JSON fixture file and deserialize it.
///
/// # Panics
///
/// Panics if the file cannot be read or parsed.
pub fn load_fixture<T: DeserializeOwned>(path: &str) -> T {
    let full_path = fixture_path(path);
    let content = fs::read_to_string(&full_path)
        .unwrap_or_else(|e| panic!("Failed to read fixture {}: {}", full_path.display(), e));
    serde_json::from_str(&content)
        .unwrap_or_else(|e| panic!("Failed to parse fixture {}: {}", full_path.display(), e))
}

/// Load a fixture as text.
pub fn load_fixture_text(path: &str) -> String {
    let full_path = fixture_path(path);
    fs::read_to_string(&full_path)
        .unwrap_or_else(|e| panic!("Failed to read fixture {}: {}", full_path.display(), e))
}

// =============================================================================
// Token payload factories
// =============================================================================

/// Minimal token element.
pub fn token(id: i64, name: &str) -> Value {
    json!({ "id": id, "name": name, "status": 1, "expired_time": -1 })
}

/// `{ success, data: { records } }`
pub fn wrap_records(tokens: Vec<Value>) -> Value {
    json!({ "success": true, "data": { "records": tokens } })
}

/// `{ success, data: { items } }`
pub fn wrap_items(tokens: Vec<Value>) -> Value {
    json!({ "success": true, "data": { "items": tokens } })
}

/// `{ success, data: { data, page, size, total_count } }`
pub fn wrap_nested(tokens: Vec<Value>, page: i64, size: i64) -> Value {
    let total = tokens.len();
    json!({
        "success": true,
        "data": { "data": tokens, "page": page, "size": size, "total_count": total }
    })
}

/// `{ success, data: [...] }`
pub fn wrap_flat(tokens: Vec<Value>) -> Value {
    json!({ "success": true, "data": tokens })
}
