//! `providers` and `auth-methods` command implementations.

use crate::cli::args::{CheckArgs, ProvidersCommand};
use crate::cli::context::{CommandContext, emit};
use crate::core::auth_method::AuthMethod;
use crate::core::models::{AuthMethodPayload, CombinationPayload, ErrorReport, ProviderPayload};
use crate::core::provider::{ProviderRegistry, ProviderType};
use crate::error::{RelayError, Result};
use crate::render;

/// Execute a `providers` subcommand.
///
/// Returns `false` when `providers check` found the combination unusable,
/// so the caller can exit non-zero after the verdict is printed.
pub fn execute(cmd: &ProvidersCommand, ctx: &CommandContext) -> Result<bool> {
    let registry = ctx.registry()?;

    match cmd {
        ProvidersCommand::List => {
            let payloads: Vec<ProviderPayload> =
                registry.iter().map(ProviderPayload::from).collect();
            emit(&render::render_providers(
                "providers list",
                &payloads,
                ctx.format,
                ctx.pretty,
                ctx.no_color,
            )?);
            Ok(true)
        }
        ProvidersCommand::Show { provider } => {
            let provider_type = ProviderType::from_cli_name(provider)?;
            let payload = registry
                .get(provider_type)
                .map(ProviderPayload::from)
                .ok_or_else(|| RelayError::InvalidProviderType(provider.clone()))?;
            emit(&render::render_providers(
                "providers show",
                std::slice::from_ref(&payload),
                ctx.format,
                ctx.pretty,
                ctx.no_color,
            )?);
            Ok(true)
        }
        ProvidersCommand::Check(args) => {
            let (payload, failure) = check_combination(&registry, args);
            emit(&render::render_check(
                &payload,
                failure,
                ctx.format,
                ctx.pretty,
                ctx.no_color,
            )?);
            Ok(payload.valid)
        }
    }
}

/// Evaluate a provider/auth/user-id combination.
///
/// Provider names are matched case-insensitively and auth keys are
/// lowercased before the registry predicates run.
#[must_use]
pub fn check_combination(
    registry: &ProviderRegistry,
    args: &CheckArgs,
) -> (CombinationPayload, Option<ErrorReport>) {
    let provider = ProviderType::from_cli_name(&args.provider)
        .map_or_else(|_| args.provider.trim().to_string(), |p| p.key().to_string());
    let auth = args.auth.trim().to_lowercase();
    let user_id = args.user_id.as_deref();

    let verdict = registry.validate_combination(&provider, &auth, user_id);
    tracing::debug!(
        provider = %provider,
        auth = %auth,
        valid = verdict.is_ok(),
        "Checked provider combination"
    );

    let payload = CombinationPayload {
        supported: registry.is_auth_method_supported(&provider, &auth),
        requires_user_id: registry.requires_subject_identifier(&provider, &auth),
        user_id_supplied: user_id.is_some_and(|id| !id.trim().is_empty()),
        valid: verdict.is_ok(),
        reason: verdict.as_ref().err().map(ToString::to_string),
        provider_type: provider,
        auth_method: auth,
    };
    (payload, verdict.err().map(|e| ErrorReport::from_error(&e)))
}

/// Execute `auth-methods`.
pub fn auth_methods(ctx: &CommandContext) -> Result<()> {
    let registry = ctx.registry()?;
    let payloads = auth_method_payloads(&registry);
    emit(&render::render_auth_methods(
        &payloads,
        ctx.format,
        ctx.pretty,
        ctx.no_color,
    )?);
    Ok(())
}

/// Every auth method with the provider families that accept it.
#[must_use]
pub fn auth_method_payloads(registry: &ProviderRegistry) -> Vec<AuthMethodPayload> {
    AuthMethod::ALL
        .iter()
        .map(|&method| {
            let providers = registry
                .iter()
                .filter(|spec| spec.supports(method))
                .map(|spec| spec.provider_type.key().to_string())
                .collect();
            AuthMethodPayload::new(method, providers)
        })
        .collect()
}
