//! Shared fixtures for integration tests.

#![allow(dead_code)]

use serde_json::{json, Value};
use shopify_data::{AccessToken, ApiVersion, BaseUrl, ShopDomain, StoreConfig};
use wiremock::MockServer;

pub const TEST_TOKEN: &str = "shpat_test_token";
pub const GRAPHQL_PATH: &str = "/admin/api/2024-10/graphql.json";
pub const EVENTS_PATH: &str = "/admin/api/2024-10/events.json";

/// A config pointing every client at `server`.
pub fn store_config(server: &MockServer, tries: u32) -> StoreConfig {
    StoreConfig::builder()
        .shop(ShopDomain::new("test-shop").unwrap())
        .access_token(AccessToken::new(TEST_TOKEN).unwrap())
        .api_version(ApiVersion::V2024_10)
        .base_url(BaseUrl::new(server.uri()).unwrap())
        .tries(tries)
        .build()
        .unwrap()
}

/// GraphQL cost extension with a comfortable budget.
pub fn full_bucket() -> Value {
    json!({
        "cost": {
            "requestedQueryCost": 10,
            "actualQueryCost": 10,
            "throttleStatus": {
                "maximumAvailable": 2000.0,
                "currentlyAvailable": 1990.0,
                "restoreRate": 100.0
            }
        }
    })
}
