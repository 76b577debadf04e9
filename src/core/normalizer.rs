//! Upstream "list tokens" response normalizer.
//!
//! Relay sites return the same token list nested at different JSON paths
//! depending on the software and its version. This module probes the
//! payload's `data` field against a fixed priority list and reduces any
//! recognized variant to one canonical [`NormalizedTokens`] value.
//!
//! Token elements are kept as raw JSON; see [`super::token::Token`] for a
//! typed read-only view.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::util::format::truncate_chars;

/// Maximum characters of the raw `data` value attached to shape errors.
pub const MAX_DEBUG_CHARS: usize = 512;

const NON_OBJECT_MESSAGE: &str = "malformed upstream response: expected a JSON object";
const UNSUCCESSFUL_MESSAGE: &str = "upstream reported failure without a message";
const UNRECOGNIZED_MESSAGE: &str = "unrecognized token list format";

// =============================================================================
// Shapes
// =============================================================================

/// Observed nesting patterns of the token list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResponseShape {
    /// `data.records` (paginated wrapper).
    Records,
    /// `data.items`.
    Items,
    /// `data.data`, optionally with `page`/`size`/`total_count` siblings.
    NestedArray,
    /// `data` is the array.
    FlatArray,
}

impl ResponseShape {
    /// Stable label used in output and logs.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Records => "records",
            Self::Items => "items",
            Self::NestedArray => "nested-array",
            Self::FlatArray => "flat-array",
        }
    }
}

impl std::fmt::Display for ResponseShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A shape predicate paired with its extractor.
#[derive(Clone, Copy)]
pub struct ShapeProbe {
    pub shape: ResponseShape,
    extract: fn(&Value) -> Option<&Vec<Value>>,
}

/// Probes in priority order. The first match wins.
pub const SHAPE_PRIORITY: &[ShapeProbe] = &[
    ShapeProbe {
        shape: ResponseShape::Records,
        extract: |data| data.as_object()?.get("records")?.as_array(),
    },
    ShapeProbe {
        shape: ResponseShape::Items,
        extract: |data| data.as_object()?.get("items")?.as_array(),
    },
    ShapeProbe {
        shape: ResponseShape::NestedArray,
        extract: |data| data.as_object()?.get("data")?.as_array(),
    },
    ShapeProbe {
        shape: ResponseShape::FlatArray,
        extract: Value::as_array,
    },
];

// =============================================================================
// Results
// =============================================================================

/// Pagination figures exposed by the nested-array wrapper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub page: i64,
    pub size: i64,
    pub total_count: i64,
}

impl Pagination {
    fn from_wrapper(data: &Value) -> Option<Self> {
        let wrapper = data.as_object()?;
        Some(Self {
            page: wrapper.get("page")?.as_i64()?,
            size: wrapper.get("size")?.as_i64()?,
            total_count: wrapper.get("total_count")?.as_i64()?,
        })
    }
}

/// Canonical token list extracted from an upstream payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedTokens {
    pub shape: ResponseShape,
    pub tokens: Vec<Value>,
    pub count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
}

impl NormalizedTokens {
    /// Re-wrap the tokens in the flat-array shape.
    #[must_use]
    pub fn to_flat_payload(&self) -> Value {
        serde_json::json!({
            "success": true,
            "data": self.tokens,
        })
    }
}

/// Why a payload could not be normalized.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormalizeError {
    /// Upstream said `success: false`, or the payload was not an object.
    #[error("{message}")]
    UpstreamFailure { message: String },

    /// No probe matched. `raw` is a bounded rendering of `data`.
    #[error("unrecognized token list format")]
    UnrecognizedShape { raw: String },
}

/// Flat, serializable outcome of one normalization call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizationResult {
    pub success: bool,
    pub message: String,
    /// Token list on success, `None` on failure.
    pub data: Option<Vec<Value>>,
    pub meta: NormalizationMeta,
    /// Bounded rendering of the raw `data` value on shape failures.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug: Option<String>,
}

/// Metadata attached to a [`NormalizationResult`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizationMeta {
    pub shape: Option<ResponseShape>,
    pub count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
}

impl From<std::result::Result<NormalizedTokens, NormalizeError>> for NormalizationResult {
    fn from(outcome: std::result::Result<NormalizedTokens, NormalizeError>) -> Self {
        match outcome {
            Ok(normalized) => Self {
                success: true,
                message: format!(
                    "found {} token(s) in {} format",
                    normalized.count, normalized.shape
                ),
                meta: NormalizationMeta {
                    shape: Some(normalized.shape),
                    count: normalized.count,
                    pagination: normalized.pagination,
                },
                data: Some(normalized.tokens),
                debug: None,
            },
            Err(NormalizeError::UpstreamFailure { message }) => Self {
                success: false,
                message,
                data: None,
                meta: NormalizationMeta::empty(),
                debug: None,
            },
            Err(NormalizeError::UnrecognizedShape { raw }) => Self {
                success: false,
                message: UNRECOGNIZED_MESSAGE.to_string(),
                data: None,
                meta: NormalizationMeta::empty(),
                debug: Some(raw),
            },
        }
    }
}

impl NormalizationMeta {
    const fn empty() -> Self {
        Self {
            shape: None,
            count: 0,
            pagination: None,
        }
    }
}

// =============================================================================
// Normalization
// =============================================================================

/// Normalize an upstream "list tokens" payload.
///
/// Total over any JSON value: every input yields either a token list or a
/// [`NormalizeError`].
pub fn normalize(payload: &Value) -> std::result::Result<NormalizedTokens, NormalizeError> {
    let Some(object) = payload.as_object() else {
        return Err(NormalizeError::UpstreamFailure {
            message: NON_OBJECT_MESSAGE.to_string(),
        });
    };

    if object.get("success").and_then(Value::as_bool) != Some(true) {
        let message = object
            .get("message")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .unwrap_or(UNSUCCESSFUL_MESSAGE);
        tracing::debug!(upstream_message = message, "Upstream reported failure");
        return Err(NormalizeError::UpstreamFailure {
            message: message.to_string(),
        });
    }

    let data = object.get("data").unwrap_or(&Value::Null);
    let matched = SHAPE_PRIORITY
        .iter()
        .find_map(|probe| (probe.extract)(data).map(|tokens| (probe.shape, tokens)));

    let Some((shape, tokens)) = matched else {
        let raw = if object.contains_key("data") {
            truncate_chars(&data.to_string(), MAX_DEBUG_CHARS)
        } else {
            "<absent>".to_string()
        };
        tracing::warn!(raw = %raw, "Unrecognized token list format");
        return Err(NormalizeError::UnrecognizedShape { raw });
    };

    let pagination = match shape {
        ResponseShape::NestedArray => Pagination::from_wrapper(data),
        _ => None,
    };

    tracing::debug!(shape = %shape, count = tokens.len(), "Normalized token list");

    Ok(NormalizedTokens {
        shape,
        count: tokens.len(),
        tokens: tokens.clone(),
        pagination,
    })
}

/// Normalize and flatten into a [`NormalizationResult`].
#[must_use]
pub fn normalize_response(payload: &Value) -> NormalizationResult {
    normalize(payload).into()
}
