//! Human-readable output using rich_rust panels.

use rich_rust::prelude::*;
use rich_rust::{Segment, Style};

use super::theme::{Theme, segments_to_string};
use crate::core::models::{
    AuthMethodPayload, CombinationPayload, ProviderPayload, TokenListPayload,
};
use crate::core::site_directory::SiteRecord;
use crate::core::token::{Expiry, Token, TokenStatus};
use crate::error::Result;
use crate::util::{format_countdown, format_quota, format_relative_time, truncate_chars};

const PANEL_WIDTH: usize = 96;
const MAX_NAME_CHARS: usize = 24;

fn panel(
    title_text: &str,
    lines: Vec<Vec<Segment<'static>>>,
    border: &Style,
    theme: &Theme,
    no_color: bool,
) -> String {
    let title = Text::styled(title_text, theme.primary.clone());
    let mut panel = Panel::new(lines).title(title).padding((0, 1));
    if !no_color {
        panel = panel.border_style(border.clone());
    }
    let mut out = segments_to_string(&panel.render(PANEL_WIDTH), no_color);
    out.push('\n');
    out
}

fn field(label: &str, value: String, theme: &Theme) -> Vec<Segment<'static>> {
    vec![
        Segment::styled(format!("{label}: "), theme.label.clone()),
        Segment::plain(value),
    ]
}

fn yes_no(value: bool) -> String {
    (if value { "yes" } else { "no" }).to_string()
}

// =============================================================================
// Registry
// =============================================================================

/// Render provider families, one panel each.
pub fn render_providers(providers: &[ProviderPayload], no_color: bool) -> Result<String> {
    Ok(providers
        .iter()
        .map(|p| render_provider(p, no_color))
        .collect())
}

/// Render one provider family.
#[must_use]
pub fn render_provider(provider: &ProviderPayload, no_color: bool) -> String {
    let theme = Theme::for_output(no_color);
    let mut lines = Vec::new();

    for method in &provider.supported_auth_methods {
        let user_id = match provider.requires_user_id.get(method) {
            Some(true) => "user id required",
            _ => "no user id",
        };
        lines.push(vec![
            Segment::styled(format!("{method:<9}"), theme.success.clone()),
            Segment::styled(format!(" {user_id}"), theme.muted.clone()),
        ]);
    }
    lines.push(field(
        "Auto check-in",
        yes_no(provider.default_auto_checkin),
        &theme,
    ));
    if !provider.description.is_empty() {
        lines.push(vec![Segment::styled(
            provider.description.clone(),
            theme.muted.clone(),
        )]);
    }

    let title = format!("{} ({})", provider.display_name, provider.provider_type);
    panel(&title, lines, &theme.panel_border, &theme, no_color)
}

/// Render a combination check.
pub fn render_check(check: &CombinationPayload, no_color: bool) -> Result<String> {
    let theme = Theme::for_output(no_color);
    let verdict = if check.valid {
        Segment::styled("valid".to_string(), theme.success.clone())
    } else {
        Segment::styled("invalid".to_string(), theme.error.clone())
    };

    let mut lines = vec![
        vec![Segment::styled("Result: ".to_string(), theme.label.clone()), verdict],
        field("Supported", yes_no(check.supported), &theme),
        field("User id required", yes_no(check.requires_user_id), &theme),
        field("User id supplied", yes_no(check.user_id_supplied), &theme),
    ];
    if let Some(reason) = &check.reason {
        lines.push(vec![Segment::styled(reason.clone(), theme.muted.clone())]);
    }

    let title = format!("{} + {}", check.provider_type, check.auth_method);
    let border = if check.valid {
        &theme.panel_border
    } else {
        &theme.panel_error_border
    };
    Ok(panel(&title, lines, border, &theme, no_color))
}

/// Render the auth method catalog.
pub fn render_auth_methods(methods: &[AuthMethodPayload], no_color: bool) -> Result<String> {
    let theme = Theme::for_output(no_color);
    let mut lines = Vec::new();
    for method in methods {
        lines.push(vec![
            Segment::styled(format!("{:<9}", method.key), theme.success.clone()),
            Segment::plain(format!(" {}", method.description)),
        ]);
        lines.push(vec![Segment::styled(
            format!("          {}", method.providers.join(", ")),
            theme.muted.clone(),
        )]);
    }
    Ok(panel("Auth methods", lines, &theme.panel_border, &theme, no_color))
}

// =============================================================================
// Sites
// =============================================================================

/// Render a list of sites under a title.
pub fn render_sites(title: &str, sites: &[&SiteRecord], no_color: bool) -> Result<String> {
    let theme = Theme::for_output(no_color);
    let mut lines = Vec::new();

    if sites.is_empty() {
        lines.push(vec![Segment::styled(
            "No sites found".to_string(),
            theme.muted.clone(),
        )]);
    }

    for site in sites {
        let mut name = vec![
            Segment::styled(truncate_chars(&site.name, MAX_NAME_CHARS), theme.label.clone()),
            Segment::styled(format!("  {}", site.provider_type), theme.secondary.clone()),
        ];
        if site.is_default {
            name.push(Segment::styled("  default".to_string(), theme.success.clone()));
        }
        lines.push(name);
        lines.push(vec![Segment::plain(format!("  {}", site.registration_url()))]);
    }

    let title = format!("{title} ({})", sites.len());
    Ok(panel(&title, lines, &theme.panel_border, &theme, no_color))
}

// =============================================================================
// Tokens
// =============================================================================

/// Render a normalized token list.
pub fn render_tokens(list: &TokenListPayload, no_color: bool) -> Result<String> {
    let theme = Theme::for_output(no_color);
    let mut lines = Vec::new();

    let mut summary = format!("{} token(s), shape {}", list.count, list.shape);
    if let Some(p) = &list.pagination {
        summary.push_str(&format!(
            ", page {} (size {}, total {})",
            p.page, p.size, p.total_count
        ));
    }
    lines.push(vec![Segment::styled(summary, theme.muted.clone())]);

    for value in &list.tokens {
        lines.push(token_line(&Token::from_value(value), &theme));
    }

    let title = list
        .provider
        .as_ref()
        .map_or_else(|| "Tokens".to_string(), |p| format!("{p} tokens"));
    Ok(panel(&title, lines, &theme.panel_border, &theme, no_color))
}

fn token_line(token: &Token, theme: &Theme) -> Vec<Segment<'static>> {
    let name = token.name.as_deref().map_or_else(
        || token.id.map_or_else(|| "(unnamed)".to_string(), |id| format!("#{id}")),
        |n| truncate_chars(n, MAX_NAME_CHARS),
    );

    let status_style = match token.status {
        Some(TokenStatus::Enabled) => theme.success.clone(),
        Some(TokenStatus::Disabled | TokenStatus::Other(_)) | None => theme.muted.clone(),
        Some(TokenStatus::Expired | TokenStatus::Exhausted) => theme.error.clone(),
    };
    let status = token.status.map_or_else(|| "unknown".to_string(), TokenStatus::label);

    let quota = if token.quota.unlimited {
        "unlimited".to_string()
    } else {
        token
            .quota
            .remaining
            .map_or_else(|| "-".to_string(), |q| format!("{} left", format_quota(q)))
    };

    let expiry = match token.expiry {
        Expiry::Never => "never expires".to_string(),
        Expiry::At(at) => format!("expires {}", format_countdown(at)),
        Expiry::Unknown => String::new(),
    };

    let mut segments = vec![
        Segment::styled(format!("{name:<24}"), theme.label.clone()),
        Segment::styled(format!(" {status:<9}"), status_style),
        Segment::plain(format!(" {quota}")),
    ];
    if let Some(key) = token.masked_key() {
        segments.push(Segment::styled(format!("  {key}"), theme.muted.clone()));
    }
    if !expiry.is_empty() {
        segments.push(Segment::styled(format!("  {expiry}"), theme.muted.clone()));
    }
    if let Some(group) = &token.group {
        segments.push(Segment::styled(format!("  [{group}]"), theme.secondary.clone()));
    }
    if let Some(at) = token.accessed_at {
        segments.push(Segment::styled(
            format!("  used {}", format_relative_time(at)),
            theme.muted.clone(),
        ));
    }
    segments
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::normalizer::normalize;
    use crate::core::provider::{ProviderRegistry, ProviderType};
    use crate::render::theme::contains_ansi;
    use serde_json::json;

    fn provider(provider_type: ProviderType) -> ProviderPayload {
        let registry = ProviderRegistry::builtin().unwrap();
        ProviderPayload::from(registry.get(provider_type).unwrap())
    }

    #[test]
    fn provider_panel_lists_methods() {
        let out = render_provider(&provider(ProviderType::NewApi), true);
        assert!(out.contains("NewApi"));
        assert!(out.contains("sessions"));
        assert!(out.contains("user id required"));
        assert!(out.contains("token"));
        assert!(!contains_ansi(&out));
    }

    #[test]
    fn providers_render_every_panel() {
        let all = vec![provider(ProviderType::OneHub), provider(ProviderType::AnyRouter)];
        let out = render_providers(&all, true).unwrap();
        assert!(out.contains("OneHub"));
        assert!(out.contains("AnyRouter"));
    }

    #[test]
    fn invalid_check_shows_reason() {
        let check = CombinationPayload {
            provider_type: "AnyRouter".to_string(),
            auth_method: "token".to_string(),
            supported: false,
            requires_user_id: false,
            user_id_supplied: false,
            valid: false,
            reason: Some("token auth is not supported".to_string()),
        };
        let out = render_check(&check, true).unwrap();
        assert!(out.contains("invalid"));
        assert!(out.contains("not supported"));
    }

    #[test]
    fn empty_site_list_says_so() {
        let out = render_sites("Sites", &[], true).unwrap();
        assert!(out.contains("No sites found"));
        assert!(out.contains("(0)"));
    }

    #[test]
    fn token_list_shows_masked_key_and_pagination() {
        let normalized = normalize(&json!({
            "success": true,
            "data": {
                "data": [{
                    "id": 3,
                    "name": "ci",
                    "key": "sk-1234567890abcd",
                    "status": 1,
                    "remain_quota": 2_500_000,
                    "unlimited_quota": false,
                    "expired_time": -1
                }],
                "page": 1, "size": 20, "total_count": 1
            }
        }))
        .unwrap();
        let list = TokenListPayload::from_normalized(Some("OneHub".to_string()), normalized);
        let out = render_tokens(&list, true).unwrap();
        assert!(out.contains("OneHub tokens"));
        assert!(out.contains("ci"));
        assert!(out.contains("sk-1****abcd"));
        assert!(!out.contains("sk-1234567890abcd"));
        assert!(out.contains("never expires"));
        assert!(out.contains("total 1"));
    }
}
