use std::sync::Arc;

use anyhow::{Context, Result};
use shopify_data::seed::SeedGenerator;
use shopify_data::store::{OrderSubmitter, ProductSubmitter};
use shopify_data::{BatchSubmitter, CostTracker, GraphqlClient};

use super::{load_settings, print_report};

pub async fn orders(count: usize) -> Result<()> {
    let (config, settings) = load_settings()?;
    let client = Arc::new(GraphqlClient::new(&config).context("failed to build GraphQL client")?);

    if settings.locations.is_empty() {
        tracing::warn!("no location ids configured; orders will not carry a fulfillment location");
    }

    let mut generator = SeedGenerator::from_entropy(settings.locations, settings.currency);
    let report = BatchSubmitter::new(settings.batch, CostTracker::new(settings.throttle))
        .run(
            count,
            |_| generator.order_input(),
            Arc::new(OrderSubmitter::new(client)),
        )
        .await;

    print_report(&report, "Order");
    Ok(())
}

pub async fn products(count: usize) -> Result<()> {
    let (config, settings) = load_settings()?;
    let client = Arc::new(GraphqlClient::new(&config).context("failed to build GraphQL client")?);

    let mut generator = SeedGenerator::from_entropy(settings.locations, settings.currency);
    let report = BatchSubmitter::new(settings.batch, CostTracker::new(settings.throttle))
        .run(
            count,
            |_| generator.product_input(),
            Arc::new(ProductSubmitter::new(client)),
        )
        .await;

    print_report(&report, "Product");
    Ok(())
}
