//! Letter CLI - seal multi-paragraph messages behind per-paragraph passwords
//!
//! This is the command-line interface for Letter. It provides a user-friendly
//! interface to the core library functionality.

mod app;
mod cli;
mod commands;
mod config;
mod constants;
mod errors;
mod helpers;
mod ui;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::app::AppContext;
use crate::cli::{Cli, Commands};
use crate::commands::{config as config_cmd, inspect, misc, open, seal};
use crate::constants::{exit_codes, DEFAULT_LOG_FILTER, LOG_ENV};
use crate::errors::CliError;
use crate::ui::print_error;

#[tokio::main]
async fn main() {
    init_tracing();

    let cli = Cli::parse();
    let ctx = match AppContext::new(&cli) {
        Ok(ctx) => ctx,
        Err(e) => exit_with(&AppContext::fallback(&cli), &cli, e),
    };

    if let Err(e) = run(&ctx, &cli).await {
        exit_with(&ctx, &cli, e);
    }
}

/// Logs go to stderr so stdout stays clean for tokens and JSON.
fn init_tracing() {
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn exit_with(ctx: &AppContext, cli: &Cli, e: anyhow::Error) -> ! {
    let ui_ctx = ctx.ui_context(wants_json(cli));

    let error_msg = format!("{}", e);
    let (message, hint) = split_hint(&error_msg);
    let hint = hint.or_else(|| contextual_hint(message));

    print_error(&ui_ctx, message, hint.as_deref());

    let code = e
        .downcast_ref::<CliError>()
        .map(CliError::exit_code)
        .unwrap_or(exit_codes::GENERAL);
    std::process::exit(code);
}

fn wants_json(cli: &Cli) -> bool {
    match &cli.command {
        Commands::Seal(args) => args.json,
        Commands::Open(args) => args.json,
        Commands::Inspect(args) => args.json,
        _ => false,
    }
}

/// Separate an embedded "\nHint: ..." line from the error message.
fn split_hint(error: &str) -> (&str, Option<String>) {
    for marker in ["\nHint:", "\nhint:"] {
        if let Some(idx) = error.find(marker) {
            let hint = error[idx + marker.len()..].trim().to_string();
            return (&error[..idx], Some(hint));
        }
    }
    (error, None)
}

/// Provide contextual hints for common error types.
fn contextual_hint(error: &str) -> Option<String> {
    let error_lower = error.to_lowercase();

    if error_lower.contains("invalid or corrupted link") {
        return Some(
            "Copy the whole link; chat apps sometimes cut long links short.".to_string(),
        );
    }
    if error_lower.contains("failed to parse config") {
        return Some("Run `letter config init --force` to rewrite the config file.".to_string());
    }
    if error_lower.contains("cannot be empty") && error_lower.contains("paragraph") {
        return Some("Every paragraph needs a message and a password.".to_string());
    }

    None
}

async fn run(ctx: &AppContext, cli: &Cli) -> anyhow::Result<()> {
    match &cli.command {
        Commands::Seal(args) => seal::handle_seal(ctx, args).await,
        Commands::Open(args) => open::handle_open(ctx, args).await,
        Commands::Inspect(args) => inspect::handle_inspect(ctx, args),
        Commands::Config { subcommand } => config_cmd::handle_config(ctx, subcommand),
        Commands::Completions { shell } => misc::handle_completions(*shell),
    }
}
