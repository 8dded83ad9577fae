use std::path::Path;

use anyhow::{Context, Result};
use serde_json::json;
use shopify_data::store::fetch_all_products;
use shopify_data::{CostTracker, GraphqlClient, Paginator};

use super::load_settings;

pub async fn run(output: &Path, page_size: u32) -> Result<()> {
    let (config, settings) = load_settings()?;
    let client = GraphqlClient::new(&config).context("failed to build GraphQL client")?;
    let paginator = Paginator::new(CostTracker::new(settings.throttle));

    let products = fetch_all_products(&client, &paginator, page_size.max(1))
        .await
        .context("failed to fetch products")?;

    let body = serde_json::to_string_pretty(&json!({
        "count": products.len(),
        "products": products,
    }))?;
    std::fs::write(output, body).with_context(|| format!("failed to write {}", output.display()))?;

    println!("Wrote {} products to {}", products.len(), output.display());
    Ok(())
}
