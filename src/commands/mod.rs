//! Subcommand implementations.

mod events;
mod generate;
mod products;
mod setup;
mod webhook;

use anyhow::{Context, Result};
use shopify_data::batch::BatchReport;
use shopify_data::report::{failures_table, successes_table, summary_line};
use shopify_data::{EngineSettings, StoreConfig};

use crate::cli::Commands;

pub async fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Setup {
            shop,
            access_token,
            env_file,
        } => setup::run(&shop, &access_token, &env_file),
        Commands::GenerateOrders { count } => generate::orders(count).await,
        Commands::GenerateProducts { count } => generate::products(count).await,
        Commands::FetchProducts { output, page_size } => products::run(&output, page_size).await,
        Commands::FetchEvents {
            format,
            output_dir,
            limit,
        } => events::run(format, output_dir, limit).await,
        Commands::CreateWebhook { topic, url } => webhook::run(&topic, &url).await,
    }
}

/// Connection and engine settings from the environment.
fn load_settings() -> Result<(StoreConfig, EngineSettings)> {
    let config = StoreConfig::from_env()
        .context("store connection is not configured; run `shopify-data setup` first")?;
    let settings = EngineSettings::from_env().context("invalid engine settings")?;
    Ok((config, settings))
}

fn print_report(report: &BatchReport, label_header: &str) {
    if report.succeeded() > 0 {
        println!("{}", successes_table(report, label_header));
    }
    if report.failed() > 0 {
        println!("{}", failures_table(report));
    }
    if let Some(reason) = report.halted() {
        println!("halted: {reason}");
    }
    println!("{}", summary_line(report));
}
