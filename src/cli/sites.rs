//! `sites` command implementation.

use crate::cli::args::SitesCommand;
use crate::cli::context::{CommandContext, emit};
use crate::core::provider::ProviderType;
use crate::core::site_directory::{SiteDirectory, SiteRecord};
use crate::error::{RelayError, Result};
use crate::render;

/// Execute a `sites` subcommand.
pub fn execute(cmd: &SitesCommand, ctx: &CommandContext) -> Result<()> {
    let registry = ctx.registry()?;
    let directory = ctx.sites(&registry)?;

    let (command, title, sites) = select(cmd, &directory)?;
    tracing::debug!(command, matched = sites.len(), "Selected sites");

    emit(&render::render_sites(
        command,
        &title,
        &sites,
        ctx.format,
        ctx.pretty,
        ctx.no_color,
    )?);
    Ok(())
}

/// Run the directory query a subcommand asks for.
///
/// Provider arguments are case-insensitive. An unknown provider is an
/// error here even though the directory itself just returns nothing.
fn select<'a>(
    cmd: &SitesCommand,
    directory: &'a SiteDirectory,
) -> Result<(&'static str, String, Vec<&'a SiteRecord>)> {
    match cmd {
        SitesCommand::List { provider: None } => {
            Ok(("sites list", "Sites".to_string(), directory.all().iter().collect()))
        }
        SitesCommand::List {
            provider: Some(provider),
        } => {
            let provider_type = ProviderType::from_cli_name(provider)?;
            Ok((
                "sites list",
                format!("{provider_type} sites"),
                directory.list_by(provider_type),
            ))
        }
        SitesCommand::Search { keyword } => {
            let title = if keyword.trim().is_empty() {
                "Sites".to_string()
            } else {
                format!("Sites matching '{}'", keyword.trim())
            };
            Ok(("sites search", title, directory.search(keyword)))
        }
        SitesCommand::Default { provider } => {
            let provider_type = ProviderType::from_cli_name(provider)?;
            let site = directory
                .get_default_for_type(provider_type.key())
                .ok_or_else(|| RelayError::NoDefaultSite(provider_type.key().to_string()))?;
            Ok((
                "sites default",
                format!("Default {provider_type} site"),
                vec![site],
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::provider::ProviderRegistry;
    use crate::core::site_directory::SiteRecordConfig;

    fn directory() -> SiteDirectory {
        let registry = ProviderRegistry::builtin().unwrap();
        let record = |provider: &str, name: &str, default: bool| SiteRecordConfig {
            provider_type: provider.to_string(),
            name: name.to_string(),
            url: format!("https://{}.example.com", name.to_lowercase()),
            affiliate_path: String::new(),
            default,
        };
        SiteDirectory::load(
            vec![
                record("NewApi", "Alpha", true),
                record("OneHub", "Beta", false),
                record("NewApi", "Gamma", false),
            ],
            &registry,
        )
        .unwrap()
    }

    #[test]
    fn list_by_provider_is_case_insensitive() {
        let directory = directory();
        let cmd = SitesCommand::List {
            provider: Some("newapi".to_string()),
        };
        let (command, title, sites) = select(&cmd, &directory).unwrap();
        assert_eq!(command, "sites list");
        assert_eq!(title, "NewApi sites");
        let names: Vec<_> = sites.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Alpha", "Gamma"]);
    }

    #[test]
    fn unknown_provider_is_an_error() {
        let cmd = SitesCommand::List {
            provider: Some("Mystery".to_string()),
        };
        let err = select(&cmd, &directory()).unwrap_err();
        assert!(matches!(err, RelayError::InvalidProviderType(_)));
    }

    #[test]
    fn empty_search_returns_everything() {
        let directory = directory();
        let cmd = SitesCommand::Search {
            keyword: "  ".to_string(),
        };
        let (_, title, sites) = select(&cmd, &directory).unwrap();
        assert_eq!(title, "Sites");
        assert_eq!(sites.len(), 3);
    }

    #[test]
    fn default_site_or_error() {
        let directory = directory();
        let cmd = SitesCommand::Default {
            provider: "NewApi".to_string(),
        };
        let (_, _, sites) = select(&cmd, &directory).unwrap();
        assert_eq!(sites[0].name, "Alpha");

        let cmd = SitesCommand::Default {
            provider: "OneHub".to_string(),
        };
        let err = select(&cmd, &directory).unwrap_err();
        assert_eq!(err.error_code(), "RELAY-C023");
    }
}
