//! Token collection pipeline.
//!
//! Combines registry validation, a caller-supplied fetch, and normalization.
//! The fetch future is the only suspension point and runs under the
//! caller's timeout. Nothing here holds state across calls, so dropping a
//! pipeline future mid-flight leaves nothing behind.

use std::future::Future;
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde_json::Value;
use tokio::time::{Duration, timeout};

use super::auth_method::AuthMethod;
use super::normalizer::{NormalizedTokens, normalize};
use super::provider::{ProviderRegistry, ProviderType};
use crate::error::{RelayError, Result};

/// What the caller wants to list tokens for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenRequest {
    /// Provider family key.
    pub provider: String,
    /// Auth method key.
    pub auth: String,
    /// Subject (user) identifier, when the account has one.
    pub subject_id: Option<String>,
}

impl TokenRequest {
    pub fn new(provider: impl Into<String>, auth: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            auth: auth.into(),
            subject_id: None,
        }
    }

    #[must_use]
    pub fn with_subject_id(mut self, subject_id: impl Into<String>) -> Self {
        self.subject_id = Some(subject_id.into());
        self
    }
}

/// Validated request handed to the fetch closure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchContext {
    pub provider_type: ProviderType,
    pub auth: AuthMethod,
    /// Present whenever the provider requires it.
    pub subject_id: Option<String>,
}

/// Result of collecting tokens for one request.
#[derive(Debug)]
pub struct TokenFetchOutcome {
    pub provider: String,
    pub fetched_at: DateTime<Utc>,
    pub duration_ms: u64,
    pub result: Result<NormalizedTokens>,
}

impl TokenFetchOutcome {
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Validate, fetch, and normalize for one request.
///
/// Validation failures return immediately without polling `fetch`.
pub async fn collect_tokens<F, Fut>(
    registry: &ProviderRegistry,
    request: &TokenRequest,
    timeout_duration: Duration,
    fetch: F,
) -> TokenFetchOutcome
where
    F: FnOnce(FetchContext) -> Fut,
    Fut: Future<Output = Result<Value>>,
{
    let fetched_at = Utc::now();
    let start = Instant::now();
    let result = run(registry, request, timeout_duration, fetch).await;
    let duration_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

    match &result {
        Ok(tokens) => tracing::info!(
            provider = %request.provider,
            shape = %tokens.shape,
            count = tokens.count,
            duration_ms,
            "Collected tokens"
        ),
        Err(e) => tracing::warn!(
            provider = %request.provider,
            error = %e,
            code = e.error_code(),
            duration_ms,
            "Token collection failed"
        ),
    }

    TokenFetchOutcome {
        provider: request.provider.clone(),
        fetched_at,
        duration_ms,
        result,
    }
}

async fn run<F, Fut>(
    registry: &ProviderRegistry,
    request: &TokenRequest,
    timeout_duration: Duration,
    fetch: F,
) -> Result<NormalizedTokens>
where
    F: FnOnce(FetchContext) -> Fut,
    Fut: Future<Output = Result<Value>>,
{
    let (provider_type, auth) = registry.validate_combination(
        &request.provider,
        &request.auth,
        request.subject_id.as_deref(),
    )?;

    let context = FetchContext {
        provider_type,
        auth,
        subject_id: request.subject_id.clone(),
    };

    tracing::debug!(provider = %provider_type, auth = %auth, "Fetching token list");

    let payload = timeout(timeout_duration, fetch(context))
        .await
        .map_err(|_| RelayError::TimeoutWithProvider {
            provider: request.provider.clone(),
            seconds: timeout_duration.as_secs(),
        })??;

    Ok(normalize(&payload)?)
}

/// Collect tokens for several requests concurrently.
///
/// Each request gets its own timeout; one failure never affects the others.
/// Outcomes are returned in request order.
pub async fn collect_many<F, Fut>(
    registry: &ProviderRegistry,
    requests: &[TokenRequest],
    timeout_duration: Duration,
    fetch: F,
) -> Vec<TokenFetchOutcome>
where
    F: Fn(FetchContext) -> Fut,
    Fut: Future<Output = Result<Value>>,
{
    let futures: Vec<_> = requests
        .iter()
        .map(|request| collect_tokens(registry, request, timeout_duration, &fetch))
        .collect();

    futures::future::join_all(futures).await
}
