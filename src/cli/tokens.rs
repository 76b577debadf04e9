//! `tokens` command implementation.

use std::path::{Path, PathBuf};

use serde_json::Value;
use tokio::io::AsyncReadExt;

use crate::cli::args::{NormalizeArgs, TokensCommand};
use crate::cli::context::{CommandContext, emit};
use crate::core::models::TokenListPayload;
use crate::core::normalizer::normalize;
use crate::core::pipeline::{TokenRequest, collect_tokens};
use crate::core::provider::ProviderType;
use crate::error::{RelayError, Result};
use crate::render;

/// Source label used in timeouts when no provider was named.
const INPUT_LABEL: &str = "input";

/// Execute a `tokens` subcommand.
pub async fn execute(cmd: &TokensCommand, ctx: &CommandContext) -> Result<()> {
    match cmd {
        TokensCommand::Normalize(args) => {
            let payload = normalize_input(args, ctx).await?;
            emit(&render::render_tokens(
                &payload,
                ctx.format,
                ctx.pretty,
                ctx.no_color,
            )?);
            Ok(())
        }
    }
}

/// Read a response and normalize it.
///
/// With `--provider`/`--auth` the combination is validated first and the
/// read runs as the pipeline's fetch step; otherwise the payload is
/// normalized directly. A provider name that matches no family is passed
/// through as typed, so validation rejects it as an invalid provider type
/// before any input is read.
async fn normalize_input(args: &NormalizeArgs, ctx: &CommandContext) -> Result<TokenListPayload> {
    let input = args.input_path().cloned();

    let (Some(provider), Some(auth)) = (&args.provider, &args.auth) else {
        let payload = tokio::time::timeout(ctx.timeout, read_payload(input.as_deref()))
            .await
            .map_err(|_| RelayError::TimeoutWithProvider {
                provider: INPUT_LABEL.to_string(),
                seconds: ctx.timeout.as_secs(),
            })??;
        let normalized = normalize(&payload)?;
        return Ok(TokenListPayload::from_normalized(None, normalized));
    };

    let registry = ctx.registry()?;
    let provider = ProviderType::from_cli_name(provider)
        .map_or_else(|_| provider.trim().to_string(), |p| p.key().to_string());
    let mut request = TokenRequest::new(provider, auth.trim().to_lowercase());
    if let Some(user_id) = &args.user_id {
        request = request.with_subject_id(user_id.clone());
    }

    let outcome = collect_tokens(&registry, &request, ctx.timeout, |fetch_ctx| {
        tracing::debug!(
            provider = %fetch_ctx.provider_type,
            auth = %fetch_ctx.auth,
            "Reading token list response"
        );
        read_owned(input)
    })
    .await;

    let fetched_at = outcome.fetched_at;
    let normalized = outcome.result?;
    Ok(TokenListPayload::from_normalized(Some(outcome.provider), normalized)
        .with_fetched_at(fetched_at))
}

async fn read_owned(path: Option<PathBuf>) -> Result<Value> {
    read_payload(path.as_deref()).await
}

/// Read JSON from a file, or stdin when `path` is `None`.
async fn read_payload(path: Option<&Path>) -> Result<Value> {
    let content = match path {
        Some(path) => {
            tracing::debug!(path = %path.display(), "Reading response file");
            tokio::fs::read_to_string(path).await?
        }
        None => {
            let mut buf = String::new();
            tokio::io::stdin().read_to_string(&mut buf).await?;
            buf
        }
    };
    Ok(serde_json::from_str(&content)?)
}
