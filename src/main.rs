//! Entry point for the `shopify-data` command.

mod cli;
mod commands;
mod logging;

use clap::Parser;

use crate::cli::Cli;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = logging::init(cli.log_level.as_deref(), cli.log_file.as_deref()) {
        eprintln!("Error: {e:#}");
        std::process::exit(2);
    }

    // Variables already set in the environment win over .env
    match dotenvy::dotenv() {
        Ok(path) => tracing::debug!(path = %path.display(), "loaded dotenv file"),
        Err(e) if e.not_found() => {}
        Err(e) => tracing::warn!(error = %e, "ignoring unreadable dotenv file"),
    }

    if let Err(e) = commands::run(cli.command).await {
        tracing::error!(error = %format!("{e:#}"), "command failed");
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
