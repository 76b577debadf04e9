//! Styling and the rich-output gate.
//!
//! Rich (ANSI-colored) output is only used for humans at a terminal. Agents
//! and pipes get plain text, so every check below must pass before color is
//! emitted.

use rich_rust::{Color, ColorSystem, Segment, Style};

use crate::cli::args::OutputFormat;
use crate::util::env as env_util;

/// Set to any value to force plain output.
const PLAIN_ENV: &str = "RELAYDASH_PLAIN";

/// Styles shared by the human renderers.
#[derive(Debug, Clone)]
pub struct Theme {
    pub primary: Style,
    pub secondary: Style,
    pub success: Style,
    pub warning: Style,
    pub error: Style,
    pub muted: Style,
    pub label: Style,
    pub command: Style,
    pub panel_border: Style,
    pub panel_error_border: Style,
}

impl Theme {
    /// Colored theme.
    #[must_use]
    pub fn colored() -> Self {
        Self {
            primary: Style::new().color(parse_color("cyan")).bold(),
            secondary: Style::new().color(parse_color("blue")),
            success: Style::new().color(parse_color("green")).bold(),
            warning: Style::new().color(parse_color("yellow")).bold(),
            error: Style::new().color(parse_color("red")).bold(),
            muted: Style::new().dim(),
            label: Style::new().bold(),
            command: Style::new().color(parse_color("cyan")),
            panel_border: Style::new().color(parse_color("blue")),
            panel_error_border: Style::new().color(parse_color("red")),
        }
    }

    /// Theme with every style empty.
    #[must_use]
    pub fn plain() -> Self {
        Self {
            primary: Style::new(),
            secondary: Style::new(),
            success: Style::new(),
            warning: Style::new(),
            error: Style::new(),
            muted: Style::new(),
            label: Style::new(),
            command: Style::new(),
            panel_border: Style::new(),
            panel_error_border: Style::new(),
        }
    }

    #[must_use]
    pub fn for_output(no_color: bool) -> Self {
        if no_color { Self::plain() } else { Self::colored() }
    }
}

/// Parse a color name, falling back to white.
#[must_use]
pub fn parse_color(name: &str) -> Color {
    Color::parse(name).unwrap_or_else(|_| Color::parse("white").unwrap())
}

/// Whether rich output should be used.
///
/// Disabled for robot formats, `--no-color`, `NO_COLOR`, `RELAYDASH_PLAIN`,
/// non-TTY stdout, `TERM=dumb`, and CI environments.
#[must_use]
pub fn should_use_rich_output(format: OutputFormat, no_color_flag: bool) -> bool {
    let reason = if format != OutputFormat::Human {
        Some("robot_mode")
    } else if no_color_flag {
        Some("no_color_flag")
    } else if std::env::var_os("NO_COLOR").is_some() {
        Some("no_color_env")
    } else if std::env::var_os(PLAIN_ENV).is_some() {
        Some("plain_env")
    } else if !env_util::stdout_is_tty() {
        Some("not_tty")
    } else if std::env::var("TERM").is_ok_and(|t| t == "dumb") {
        Some("term_dumb")
    } else if std::env::var_os("CI").is_some() || std::env::var_os("GITHUB_ACTIONS").is_some() {
        Some("ci_environment")
    } else {
        None
    };

    match reason {
        Some(reason) => {
            tracing::debug!(reason, decision = "disabled", "Rich output disabled");
            false
        }
        None => {
            tracing::debug!(decision = "enabled", "Rich output enabled");
            true
        }
    }
}

/// Convert segments to a string, with ANSI codes unless `no_color`.
#[must_use]
pub fn segments_to_string(segments: &[Segment], no_color: bool) -> String {
    segments
        .iter()
        .map(|seg| match (&seg.style, no_color) {
            (Some(style), false) => style.render(&seg.text, ColorSystem::TrueColor),
            _ => seg.text.to_string(),
        })
        .collect()
}

/// Check if text contains ANSI escape codes.
#[must_use]
pub fn contains_ansi(text: &str) -> bool {
    text.contains("\x1b[")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn robot_formats_never_use_rich_output() {
        assert!(!should_use_rich_output(OutputFormat::Json, false));
        assert!(!should_use_rich_output(OutputFormat::Md, false));
        assert!(!should_use_rich_output(OutputFormat::Human, true));
    }

    #[test]
    fn plain_segments_have_no_ansi() {
        let theme = Theme::colored();
        let segments = vec![
            Segment::styled("Name: ".to_string(), theme.label.clone()),
            Segment::plain("relay".to_string()),
        ];
        let plain = segments_to_string(&segments, true);
        assert_eq!(plain, "Name: relay");
        assert!(!contains_ansi(&plain));
        assert!(contains_ansi(&segments_to_string(&segments, false)));
    }
}
