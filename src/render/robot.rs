//! Robot-mode output (JSON and Markdown).
//!
//! JSON output is always wrapped in a [`RobotOutput`] envelope. Markdown is a
//! terse list meant for pasting into agent transcripts.

use std::fmt::Write as _;

use serde::Serialize;

use crate::core::models::{
    AuthMethodPayload, CombinationPayload, ProviderPayload, RobotOutput, TokenListPayload,
};
use crate::core::site_directory::SiteRecord;
use crate::error::Result;

/// Render an envelope as JSON.
pub fn render_json<T: Serialize>(output: &RobotOutput<T>, pretty: bool) -> Result<String> {
    if pretty {
        Ok(serde_json::to_string_pretty(output)?)
    } else {
        Ok(serde_json::to_string(output)?)
    }
}

pub fn render_providers_md(providers: &[ProviderPayload]) -> String {
    let mut out = String::new();
    for p in providers {
        let _ = writeln!(out, "## {} ({})", p.display_name, p.provider_type);
        for method in &p.supported_auth_methods {
            let required = p.requires_user_id.get(method).copied().unwrap_or(false);
            let _ = writeln!(out, "- {method}: requires_user_id={required}");
        }
        let _ = writeln!(out, "- default_auto_checkin: {}", p.default_auto_checkin);
        out.push('\n');
    }
    out
}

pub fn render_check_md(check: &CombinationPayload) -> String {
    let mut out = format!("## {} + {}\n", check.provider_type, check.auth_method);
    let _ = writeln!(out, "- valid: {}", check.valid);
    let _ = writeln!(out, "- supported: {}", check.supported);
    let _ = writeln!(out, "- requires_user_id: {}", check.requires_user_id);
    let _ = writeln!(out, "- user_id_supplied: {}", check.user_id_supplied);
    if let Some(reason) = &check.reason {
        let _ = writeln!(out, "- reason: {reason}");
    }
    out
}

pub fn render_auth_methods_md(methods: &[AuthMethodPayload]) -> String {
    let mut out = String::from("## Auth methods\n");
    for m in methods {
        let _ = writeln!(out, "- {}: {} ({})", m.key, m.description, m.providers.join(", "));
    }
    out
}

pub fn render_sites_md(title: &str, sites: &[&SiteRecord]) -> String {
    let mut out = format!("## {title}\n");
    if sites.is_empty() {
        out.push_str("- (none)\n");
    }
    for site in sites {
        let marker = if site.is_default { " (default)" } else { "" };
        let _ = writeln!(
            out,
            "- {} [{}]{marker}: {}",
            site.name,
            site.provider_type,
            site.registration_url()
        );
    }
    out
}

/// Tokens are listed by id and name only; keys never appear in Markdown.
pub fn render_tokens_md(list: &TokenListPayload) -> String {
    let title = list.provider.as_deref().unwrap_or("Tokens");
    let mut out = format!("## {title}\n");
    let _ = writeln!(out, "- shape: {}", list.shape);
    let _ = writeln!(out, "- count: {}", list.count);
    if let Some(p) = &list.pagination {
        let _ = writeln!(
            out,
            "- page: {} (size {}, total {})",
            p.page, p.size, p.total_count
        );
    }
    for token in &list.tokens {
        let id = token
            .get("id")
            .map_or_else(|| "?".to_string(), ToString::to_string);
        let name = token.get("name").and_then(|n| n.as_str()).unwrap_or("");
        let _ = writeln!(out, "  - {id} {name}");
    }
    out
}
