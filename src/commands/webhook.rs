use anyhow::{Context, Result};
use shopify_data::store::{create_webhook, WebhookTopic};
use shopify_data::GraphqlClient;

use super::load_settings;

pub async fn run(topic: &str, url: &str) -> Result<()> {
    let topic: WebhookTopic = topic.parse()?;
    let (config, _) = load_settings()?;
    let client = GraphqlClient::new(&config).context("failed to build GraphQL client")?;

    let id = create_webhook(&client, topic, url)
        .await
        .with_context(|| format!("failed to subscribe {url} to {topic}"))?;

    println!("Created webhook subscription {id} for {topic}");
    Ok(())
}
