//! relaydash - relay provider dashboard core
//!
//! CLI entry point.

#![forbid(unsafe_code)]
#![warn(clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

use clap::Parser;
use std::process::ExitCode;

use relaydash::cli::args::TokensCommand;
use relaydash::cli::{Cli, CommandContext, Commands, OutputFormat};
use relaydash::core::logging::{self, LogSettings};
use relaydash::error::RelayError;
use relaydash::storage::config::ResolvedConfig;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match ResolvedConfig::resolve(&cli, timeout_arg(&cli)) {
        Ok(config) => config,
        Err(e) => {
            // Config could not be read; log with CLI/env settings only.
            logging::init(&LogSettings::resolve(
                cli.log_level.as_deref(),
                None,
                cli.json_output,
                cli.verbose,
            ));
            let format = cli.explicit_format().unwrap_or(OutputFormat::Human);
            return report(&e, format, cli.no_color, cli.pretty);
        }
    };

    logging::init(&LogSettings::resolve(
        cli.log_level.as_deref(),
        config.log_level.as_deref(),
        cli.json_output,
        config.verbose,
    ));

    let ctx = CommandContext::new(config);
    match run(&cli.command, &ctx).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(relaydash::ExitCode::ParseError as u8),
        Err(e) => report(&e, ctx.format, ctx.no_color, ctx.pretty),
    }
}

/// Run a command. `Ok(false)` means the command printed its result but the
/// result itself is a failure (an invalid `providers check`).
async fn run(command: &Commands, ctx: &CommandContext) -> relaydash::Result<bool> {
    tracing::debug!(command = command.name(), "Running command");

    match command {
        Commands::Providers(cmd) => relaydash::cli::providers::execute(cmd, ctx),
        Commands::AuthMethods => relaydash::cli::providers::auth_methods(ctx).map(|()| true),
        Commands::Sites(cmd) => relaydash::cli::sites::execute(cmd, ctx).map(|()| true),
        Commands::Tokens(cmd) => relaydash::cli::tokens::execute(cmd, ctx).await.map(|()| true),
    }
}

fn timeout_arg(cli: &Cli) -> Option<u64> {
    match &cli.command {
        Commands::Tokens(TokensCommand::Normalize(args)) => args.timeout,
        _ => None,
    }
}

fn report(error: &RelayError, format: OutputFormat, no_color: bool, pretty: bool) -> ExitCode {
    tracing::debug!(code = error.error_code(), error = %error, "Command failed");
    eprintln!(
        "{}",
        relaydash::render::error::render_error(error, format, no_color, pretty)
    );
    ExitCode::from(error.exit_code() as u8)
}
