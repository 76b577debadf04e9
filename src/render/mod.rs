//! Output rendering for human and robot modes.

pub mod error;
pub mod human;
pub mod robot;
pub mod theme;

use crate::cli::args::OutputFormat;
use crate::core::models::{
    AuthMethodPayload, CombinationPayload, ErrorReport, ProviderPayload, RobotOutput,
    TokenListPayload,
};
use crate::core::site_directory::SiteRecord;
use crate::error::Result;

/// Render provider families.
pub fn render_providers(
    command: &str,
    providers: &[ProviderPayload],
    format: OutputFormat,
    pretty: bool,
    no_color: bool,
) -> Result<String> {
    match format {
        OutputFormat::Human => human::render_providers(providers, no_color),
        OutputFormat::Json => robot::render_json(&RobotOutput::new(command, providers), pretty),
        OutputFormat::Md => Ok(robot::render_providers_md(providers)),
    }
}

/// Render a combination check. `failure` lands in the envelope's error
/// details when the combination is invalid.
pub fn render_check(
    check: &CombinationPayload,
    failure: Option<ErrorReport>,
    format: OutputFormat,
    pretty: bool,
    no_color: bool,
) -> Result<String> {
    match format {
        OutputFormat::Human => human::render_check(check, no_color),
        OutputFormat::Json => {
            let output = RobotOutput::new("providers check", check)
                .with_error_details(failure.into_iter().collect());
            robot::render_json(&output, pretty)
        }
        OutputFormat::Md => Ok(robot::render_check_md(check)),
    }
}

/// Render the auth method catalog.
pub fn render_auth_methods(
    methods: &[AuthMethodPayload],
    format: OutputFormat,
    pretty: bool,
    no_color: bool,
) -> Result<String> {
    match format {
        OutputFormat::Human => human::render_auth_methods(methods, no_color),
        OutputFormat::Json => robot::render_json(&RobotOutput::new("auth-methods", methods), pretty),
        OutputFormat::Md => Ok(robot::render_auth_methods_md(methods)),
    }
}

/// Render a site listing.
pub fn render_sites(
    command: &str,
    title: &str,
    sites: &[&SiteRecord],
    format: OutputFormat,
    pretty: bool,
    no_color: bool,
) -> Result<String> {
    match format {
        OutputFormat::Human => human::render_sites(title, sites, no_color),
        OutputFormat::Json => robot::render_json(&RobotOutput::new(command, sites), pretty),
        OutputFormat::Md => Ok(robot::render_sites_md(title, sites)),
    }
}

/// Render a normalized token list.
pub fn render_tokens(
    list: &TokenListPayload,
    format: OutputFormat,
    pretty: bool,
    no_color: bool,
) -> Result<String> {
    match format {
        OutputFormat::Human => human::render_tokens(list, no_color),
        OutputFormat::Json => robot::render_json(&RobotOutput::new("tokens normalize", list), pretty),
        OutputFormat::Md => Ok(robot::render_tokens_md(list)),
    }
}
