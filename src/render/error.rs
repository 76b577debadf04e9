//! Error rendering.
//!
//! Robot formats get a JSON object; humans get a panel with fix suggestions
//! at a terminal and two plain lines otherwise.

use rich_rust::prelude::*;
use rich_rust::Segment;
use serde::Serialize;

use super::theme::{Theme, segments_to_string, should_use_rich_output};
use crate::cli::args::OutputFormat;
use crate::error::{FixSuggestion, RelayError};
use crate::util::env::stderr_is_tty;

const PANEL_WIDTH: usize = 70;
/// Panel width less borders and horizontal padding, with a little slack.
const WRAP_WIDTH: usize = 60;
/// Width of the `  1. ` / `     Or: ` command prefixes.
const COMMAND_INDENT: usize = 9;

/// Render an error for stderr.
#[must_use]
pub fn render_error(error: &RelayError, format: OutputFormat, no_color: bool, pretty: bool) -> String {
    match format {
        OutputFormat::Json => render_error_json(error, pretty),
        OutputFormat::Md => render_error_json(error, true),
        OutputFormat::Human => {
            if should_use_rich_output(format, no_color) && stderr_is_tty() {
                render_rich(error)
            } else {
                render_simple(error)
            }
        }
    }
}

/// Render as a JSON object.
#[must_use]
pub fn render_error_json(error: &RelayError, pretty: bool) -> String {
    let json = ErrorJson::from_error(error);
    let rendered = if pretty {
        serde_json::to_string_pretty(&json)
    } else {
        serde_json::to_string(&json)
    };
    rendered.unwrap_or_else(|_| render_simple(error))
}

// =============================================================================
// Rich Terminal Rendering
// =============================================================================

fn render_rich(error: &RelayError) -> String {
    let theme = Theme::colored();
    let suggestions = error.fix_suggestions();

    let mut lines: Vec<Vec<Segment>> = wrap_text(&error.to_string(), WRAP_WIDTH)
        .into_iter()
        .map(|line| vec![Segment::styled(line, theme.error.clone())])
        .collect();
    lines.push(vec![Segment::styled(
        format!("[{}]", error.error_code()),
        theme.muted.clone(),
    )]);
    lines.push(Vec::new());

    if !suggestions.is_empty() {
        lines.extend(suggestion_lines(&suggestions, &theme));
    }

    if let Some(first) = suggestions.first() {
        if !first.context.is_empty() {
            lines.push(Vec::new());
            lines.push(vec![Segment::styled(
                "Why this happened:".to_string(),
                theme.secondary.clone(),
            )]);
            for line in wrap_text(&first.context, WRAP_WIDTH) {
                lines.push(vec![Segment::plain(format!("  {line}"))]);
            }
        }
        if let Some(prevention) = &first.prevention {
            lines.push(Vec::new());
            lines.push(vec![Segment::styled(
                "Prevention:".to_string(),
                theme.success.clone(),
            )]);
            for line in wrap_text(prevention, WRAP_WIDTH) {
                lines.push(vec![Segment::plain(format!("  {line}"))]);
            }
        }
    }

    let panel = Panel::new(lines)
        .title(Text::new(error.category().to_string()))
        .border_style(theme.panel_error_border.clone())
        .padding((1, 2));
    segments_to_string(&panel.render(PANEL_WIDTH), false)
}

fn suggestion_lines(suggestions: &[FixSuggestion], theme: &Theme) -> Vec<Vec<Segment<'static>>> {
    let mut lines = vec![vec![Segment::styled(
        "How to fix:".to_string(),
        theme.primary.clone(),
    )]];

    for (i, suggestion) in suggestions.iter().enumerate() {
        for (j, cmd) in suggestion.commands.iter().enumerate() {
            let prefix = if j == 0 {
                format!("  {}. ", i + 1)
            } else {
                "     Or: ".to_string()
            };
            // Long commands continue on indented lines rather than being clipped.
            for (k, part) in wrap_text(cmd, WRAP_WIDTH - COMMAND_INDENT).into_iter().enumerate() {
                let lead = if k == 0 {
                    prefix.clone()
                } else {
                    " ".repeat(COMMAND_INDENT)
                };
                lines.push(vec![
                    Segment::plain(lead),
                    Segment::styled(part, theme.command.clone()),
                ]);
            }
        }
    }
    lines
}

// =============================================================================
// Simple Text Rendering
// =============================================================================

/// Plain text: the error line, then the first suggested command if any.
fn render_simple(error: &RelayError) -> String {
    let mut lines = vec![format!("Error [{}]: {error}", error.error_code())];

    let first_command = error
        .fix_suggestions()
        .into_iter()
        .flat_map(|s| s.commands)
        .find(|cmd| !cmd.starts_with('#'));
    if let Some(cmd) = first_command {
        lines.push(format!("Fix: {cmd}"));
    }

    lines.join("\n")
}

// =============================================================================
// JSON Rendering
// =============================================================================

#[derive(Serialize)]
struct ErrorJson {
    code: String,
    category: String,
    message: String,
    retryable: bool,
    exit_code: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    provider: Option<String>,
    suggestions: Vec<SuggestionJson>,
}

#[derive(Serialize)]
struct SuggestionJson {
    commands: Vec<String>,
    context: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    prevention: Option<String>,
}

impl ErrorJson {
    fn from_error(error: &RelayError) -> Self {
        Self {
            code: error.error_code().to_string(),
            category: error.category().to_string(),
            message: error.to_string(),
            retryable: error.is_retryable(),
            exit_code: error.exit_code().into(),
            provider: error.provider().map(String::from),
            suggestions: error
                .fix_suggestions()
                .into_iter()
                .map(|s| SuggestionJson {
                    commands: s.commands,
                    context: s.context,
                    prevention: s.prevention,
                })
                .collect(),
        }
    }
}

/// Greedy word wrap.
fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.is_empty() {
            current = word.to_string();
        } else if current.len() + 1 + word.len() <= width {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(std::mem::take(&mut current));
            current = word.to_string();
        }
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::theme::contains_ansi;

    fn timeout() -> RelayError {
        RelayError::TimeoutWithProvider {
            provider: "OneHub".to_string(),
            seconds: 30,
        }
    }

    #[test]
    fn simple_render_includes_code_and_fix() {
        let err = RelayError::InvalidProviderType("Mystery".to_string());
        let output = render_simple(&err);
        assert!(output.contains(err.error_code()));
        assert!(output.contains("Mystery"));
        assert!(output.contains("Fix: relaydash"));
        assert!(!contains_ansi(&output));
    }

    #[test]
    fn json_render_has_expected_fields() {
        let parsed: serde_json::Value =
            serde_json::from_str(&render_error_json(&timeout(), false)).unwrap();
        assert_eq!(parsed["code"], timeout().error_code());
        assert_eq!(parsed["retryable"], true);
        assert_eq!(parsed["provider"], "OneHub");
        assert_eq!(parsed["exit_code"], 4);
        assert!(parsed["message"].as_str().unwrap().contains("30s"));
        assert!(parsed["suggestions"].is_array());
    }

    #[test]
    fn json_render_omits_absent_provider() {
        let err = RelayError::Config("bad".to_string());
        let parsed: serde_json::Value =
            serde_json::from_str(&render_error_json(&err, false)).unwrap();
        assert!(parsed.get("provider").is_none());
    }

    #[test]
    fn format_selection() {
        let json = render_error(&timeout(), OutputFormat::Json, false, false);
        assert!(serde_json::from_str::<serde_json::Value>(&json).is_ok());
        assert!(!json.contains("\n  "));
        assert!(render_error(&timeout(), OutputFormat::Md, false, false).contains("\n  "));
        assert!(!contains_ansi(&render_error(&timeout(), OutputFormat::Human, true, false)));
    }

    #[test]
    fn rich_render_includes_suggestions() {
        let err = RelayError::SubjectIdRequired {
            provider: "NewApi".to_string(),
            auth: "sessions".to_string(),
        };
        let output = render_rich(&err);
        assert!(output.contains("How to fix"));
        assert!(output.contains(err.error_code()));
        assert!(output.contains("<ID>"));
    }

    #[test]
    fn rich_render_keeps_long_lines_inside_panel() {
        let err = RelayError::UpstreamFailure {
            message: "the relay rejected the session cookie because the account was \
                      signed out from another device earlier today"
                .to_string(),
        };
        let output = render_rich(&err);
        assert!(output.contains("[RELAY-U001]"));
        for word in err.to_string().split_whitespace() {
            assert!(output.contains(word), "missing {word}");
        }
    }

    #[test]
    fn wrap_text_behaviour() {
        for line in wrap_text("a somewhat long line that should wrap at twenty", 20) {
            assert!(line.len() <= 20);
        }
        assert_eq!(wrap_text("", 60), vec![String::new()]);
        assert_eq!(wrap_text("one two three", 100), vec!["one two three"]);
    }
}
