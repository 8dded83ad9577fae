//! Store operations against a mocked Admin API.

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{full_bucket, store_config, GRAPHQL_PATH};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_json::json;
use shopify_data::batch::{BatchConfig, BatchSubmitter};
use shopify_data::clients::graphql::MutationOutcome;
use shopify_data::queue::QueueConfig;
use shopify_data::seed::SeedGenerator;
use shopify_data::store::{create_order, create_webhook, OrderSubmitter, StoreError, WebhookTopic};
use shopify_data::throttle::CostTracker;
use shopify_data::{GraphqlClient, RateSignal};
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn generator() -> SeedGenerator<StdRng> {
    SeedGenerator::new(
        StdRng::seed_from_u64(7),
        vec!["71234567890".to_string()],
        "EUR",
    )
}

fn quick_batches() -> BatchConfig {
    BatchConfig {
        burst_size: 2,
        inter_batch_delay: Duration::from_millis(20),
        queue: QueueConfig::new(2, Duration::from_millis(10), 2).unwrap(),
    }
}

// ============================================================================
// Orders
// ============================================================================

#[tokio::test]
async fn test_create_order_sends_bypass_options_and_reads_rate() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .and(body_partial_json(json!({
            "variables": {"options": {"inventoryBehaviour": "BYPASS", "sendReceipt": false}}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"orderCreate": {
                "userErrors": [],
                "order": {"id": "gid://shopify/Order/1", "name": "#1001"}
            }},
            "extensions": full_bucket()
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = GraphqlClient::new(&store_config(&server, 1)).unwrap();
    let order = generator().order_input();
    let (outcome, rate) = create_order(&client, &order).await;

    match outcome {
        MutationOutcome::Ok(created) => assert_eq!(created.name, "#1001"),
        other => panic!("expected success, got {other:?}"),
    }
    assert!(matches!(rate, Some(RateSignal::Cost { .. })));

    let requests = server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(
        body["variables"]["order"]["transactions"][0]["kind"],
        json!("SALE")
    );
}

#[tokio::test]
async fn test_order_batch_reports_successes_and_validation_failures() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"orderCreate": {
                "userErrors": [{"field": ["order", "email"], "message": "Email is invalid"}],
                "order": null
            }}
        })))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"orderCreate": {
                "userErrors": [],
                "order": {"id": "gid://shopify/Order/9", "name": "#1009"}
            }},
            "extensions": full_bucket()
        })))
        .mount(&server)
        .await;

    let client = Arc::new(GraphqlClient::new(&store_config(&server, 1)).unwrap());
    let mut generator = generator();
    let report = BatchSubmitter::new(quick_batches(), CostTracker::default())
        .run(
            3,
            |_| generator.order_input(),
            Arc::new(OrderSubmitter::new(client)),
        )
        .await;

    assert_eq!(report.attempted(), 3);
    assert_eq!(report.succeeded(), 2);
    assert_eq!(report.failures()[0].reason, "order.email: Email is invalid");
    assert!(report.successes().iter().all(|s| s.label == "#1009"));
}

#[tokio::test]
async fn test_order_batch_halts_on_invalid_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "errors": "[API] Invalid API key or access token (unrecognized login or wrong password)"
        })))
        .mount(&server)
        .await;

    let client = Arc::new(GraphqlClient::new(&store_config(&server, 1)).unwrap());
    let mut generator = generator();
    let config = BatchConfig {
        inter_batch_delay: Duration::from_secs(1),
        ..quick_batches()
    };
    let report = BatchSubmitter::new(config, CostTracker::default())
        .run(
            6,
            |_| generator.order_input(),
            Arc::new(OrderSubmitter::new(client)),
        )
        .await;

    assert_eq!(report.attempted(), 6);
    assert_eq!(report.succeeded(), 0);
    assert!(report.halted().is_some());
    assert_eq!(report.batch_sizes(), &[2]);
    assert_eq!(server.received_requests().await.unwrap().len(), 2);
}

// ============================================================================
// Webhooks
// ============================================================================

#[tokio::test]
async fn test_create_webhook_returns_subscription_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .and(body_partial_json(json!({
            "variables": {
                "topic": "ORDERS_CREATE",
                "webhookSubscription": {
                    "callbackUrl": "https://example.com/hooks/orders",
                    "format": "JSON"
                }
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"webhookSubscriptionCreate": {
                "webhookSubscription": {"id": "gid://shopify/WebhookSubscription/5"},
                "userErrors": []
            }}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = GraphqlClient::new(&store_config(&server, 1)).unwrap();
    let id = create_webhook(
        &client,
        WebhookTopic::OrdersCreate,
        "https://example.com/hooks/orders",
    )
    .await
    .unwrap();
    assert_eq!(id, "gid://shopify/WebhookSubscription/5");
}

#[tokio::test]
async fn test_create_webhook_surfaces_user_errors() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"webhookSubscriptionCreate": {
                "webhookSubscription": null,
                "userErrors": [{"field": ["webhookSubscription", "callbackUrl"], "message": "Address for this topic has already been taken"}]
            }}
        })))
        .mount(&server)
        .await;

    let client = GraphqlClient::new(&store_config(&server, 1)).unwrap();
    let err = create_webhook(&client, WebhookTopic::AppUninstalled, "https://example.com/x")
        .await
        .unwrap_err();

    match err {
        StoreError::UserErrors { operation, message } => {
            assert_eq!(operation, "webhookSubscriptionCreate");
            assert!(message.contains("already been taken"));
        }
        other => panic!("expected user errors, got {other:?}"),
    }
}

#[tokio::test]
async fn test_create_webhook_rejects_non_http_callback_without_a_request() {
    let server = MockServer::start().await;
    let client = GraphqlClient::new(&store_config(&server, 1)).unwrap();

    let err = create_webhook(&client, WebhookTopic::OrdersPaid, "ftp://example.com/hook")
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::InvalidCallbackUrl { .. }));
    assert!(server.received_requests().await.unwrap().is_empty());
}
