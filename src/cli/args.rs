//! CLI argument definitions using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Relay dashboard - inspect relay provider families, sites, and token lists.
#[derive(Parser, Debug)]
#[command(name = "relaydash")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    // === Global flags ===
    /// Output format
    #[arg(long, value_enum, default_value = "human", global = true)]
    pub format: OutputFormat,

    /// Shorthand for --format json
    #[arg(long, global = true)]
    pub json: bool,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, value_name = "LEVEL", global = true)]
    pub log_level: Option<String>,

    /// Emit JSONL logs to stderr
    #[arg(long, global = true)]
    pub json_output: bool,

    /// Verbose output (sets log level to debug)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file path
    #[arg(long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Provider registry file (overrides the built-in table)
    #[arg(long, value_name = "FILE", global = true)]
    pub registry: Option<PathBuf>,

    /// Site catalog file (JSON or TOML)
    #[arg(long, value_name = "FILE", global = true)]
    pub sites: Option<PathBuf>,
}

impl Cli {
    /// Format requested on the command line, if any.
    ///
    /// `--format human` is the clap default and so counts as unset.
    #[must_use]
    pub fn explicit_format(&self) -> Option<OutputFormat> {
        if self.json {
            Some(OutputFormat::Json)
        } else if self.format == OutputFormat::Human {
            None
        } else {
            Some(self.format)
        }
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Inspect provider families and their auth capabilities
    #[command(subcommand)]
    Providers(ProvidersCommand),

    /// List known auth methods
    AuthMethods,

    /// Browse the site catalog
    #[command(subcommand)]
    Sites(SitesCommand),

    /// Work with upstream token list responses
    #[command(subcommand)]
    Tokens(TokensCommand),
}

impl Commands {
    /// Command label used in output envelopes.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Providers(ProvidersCommand::List) => "providers list",
            Self::Providers(ProvidersCommand::Show { .. }) => "providers show",
            Self::Providers(ProvidersCommand::Check(_)) => "providers check",
            Self::AuthMethods => "auth-methods",
            Self::Sites(SitesCommand::List { .. }) => "sites list",
            Self::Sites(SitesCommand::Search { .. }) => "sites search",
            Self::Sites(SitesCommand::Default { .. }) => "sites default",
            Self::Tokens(TokensCommand::Normalize(_)) => "tokens normalize",
        }
    }
}

/// `providers` subcommands.
#[derive(Subcommand, Debug)]
pub enum ProvidersCommand {
    /// List every provider family
    List,

    /// Show one provider family
    Show {
        /// Provider type key (e.g. NewApi)
        provider: String,
    },

    /// Check whether a provider/auth combination is usable
    Check(CheckArgs),
}

/// Arguments for `providers check`.
#[derive(Parser, Debug)]
pub struct CheckArgs {
    /// Provider type key
    pub provider: String,

    /// Auth method key (sessions, token)
    #[arg(long, value_name = "AUTH")]
    pub auth: String,

    /// Subject (user) identifier
    #[arg(long, value_name = "ID")]
    pub user_id: Option<String>,
}

/// `sites` subcommands.
#[derive(Subcommand, Debug)]
pub enum SitesCommand {
    /// List sites, optionally for one provider family
    List {
        /// Provider type key
        #[arg(long, value_name = "PROVIDER")]
        provider: Option<String>,
    },

    /// Search sites by name, URL, or provider
    Search {
        /// Keyword (empty matches everything)
        #[arg(default_value = "")]
        keyword: String,
    },

    /// Show the default site for a provider family
    Default {
        /// Provider type key
        provider: String,
    },
}

/// `tokens` subcommands.
#[derive(Subcommand, Debug)]
pub enum TokensCommand {
    /// Normalize a token list response into the canonical shape
    Normalize(NormalizeArgs),
}

/// Arguments for `tokens normalize`.
#[derive(Parser, Debug)]
pub struct NormalizeArgs {
    /// Response file; `-` or absent reads stdin
    #[arg(long, short, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Provider type the response came from
    #[arg(long, value_name = "PROVIDER", requires = "auth")]
    pub provider: Option<String>,

    /// Auth method used for the request
    #[arg(long, value_name = "AUTH", requires = "provider")]
    pub auth: Option<String>,

    /// Subject (user) identifier
    #[arg(long, value_name = "ID", requires = "provider")]
    pub user_id: Option<String>,

    /// Read timeout in seconds
    #[arg(long, value_name = "SECONDS")]
    pub timeout: Option<u64>,
}

impl NormalizeArgs {
    /// Input path, `None` meaning stdin.
    #[must_use]
    pub fn input_path(&self) -> Option<&PathBuf> {
        self.input.as_ref().filter(|p| p.as_os_str() != "-")
    }
}

/// Output format options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable rich output
    #[default]
    Human,
    /// JSON output
    Json,
    /// Markdown output
    Md,
}

impl OutputFormat {
    /// Parse from config or env value.
    #[must_use]
    pub fn from_arg(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "human" => Some(Self::Human),
            "json" => Some(Self::Json),
            "md" | "markdown" => Some(Self::Md),
            _ => None,
        }
    }

    /// Whether this is a machine-oriented format.
    #[must_use]
    pub const fn is_robot(self) -> bool {
        matches!(self, Self::Json | Self::Md)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_parses() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["relaydash", "providers", "list", "--json", "--pretty"])
            .unwrap();
        assert_eq!(cli.explicit_format(), Some(OutputFormat::Json));
        assert!(cli.pretty);
        assert_eq!(cli.command.name(), "providers list");
    }

    #[test]
    fn default_format_counts_as_unset() {
        let cli = Cli::try_parse_from(["relaydash", "auth-methods"]).unwrap();
        assert_eq!(cli.explicit_format(), None);
        let cli = Cli::try_parse_from(["relaydash", "auth-methods", "--format", "md"]).unwrap();
        assert_eq!(cli.explicit_format(), Some(OutputFormat::Md));
    }

    #[test]
    fn check_requires_auth() {
        assert!(Cli::try_parse_from(["relaydash", "providers", "check", "NewApi"]).is_err());
        let cli = Cli::try_parse_from([
            "relaydash", "providers", "check", "NewApi", "--auth", "sessions", "--user-id", "7",
        ])
        .unwrap();
        match cli.command {
            Commands::Providers(ProvidersCommand::Check(args)) => {
                assert_eq!(args.provider, "NewApi");
                assert_eq!(args.user_id.as_deref(), Some("7"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn search_keyword_defaults_to_empty() {
        let cli = Cli::try_parse_from(["relaydash", "sites", "search"]).unwrap();
        match cli.command {
            Commands::Sites(SitesCommand::Search { keyword }) => assert!(keyword.is_empty()),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn normalize_provider_needs_auth() {
        assert!(
            Cli::try_parse_from(["relaydash", "tokens", "normalize", "--provider", "OneHub"])
                .is_err()
        );
        let cli = Cli::try_parse_from(["relaydash", "tokens", "normalize", "--input", "-"]).unwrap();
        match cli.command {
            Commands::Tokens(TokensCommand::Normalize(args)) => {
                assert!(args.input_path().is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn output_format_from_arg() {
        assert_eq!(OutputFormat::from_arg("Markdown"), Some(OutputFormat::Md));
        assert_eq!(OutputFormat::from_arg("yaml"), None);
        assert!(OutputFormat::Json.is_robot());
        assert!(!OutputFormat::Human.is_robot());
    }
}
