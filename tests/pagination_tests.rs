//! Integration tests for cursor traversal over GraphQL connections and REST links.

mod common;

use common::{full_bucket, store_config, EVENTS_PATH, GRAPHQL_PATH};
use serde_json::{json, Value};
use shopify_data::pagination::{PaginationError, Paginator, RestLinkSource};
use shopify_data::store::{fetch_all_events, fetch_all_products, StoreError};
use shopify_data::{GraphqlClient, RestClient};
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn product(n: u32) -> Value {
    json!({
        "id": format!("gid://shopify/Product/{n}"),
        "title": format!("Product {n}"),
        "handle": format!("product-{n}"),
        "status": "ACTIVE",
        "vendor": "Acme",
        "productType": "Home",
        "totalInventory": n,
        "createdAt": "2025-01-01T00:00:00Z",
        "updatedAt": "2025-01-01T00:00:00Z"
    })
}

fn products_page(ids: &[u32], has_next: bool, cursor: Option<&str>) -> ResponseTemplate {
    let nodes: Vec<Value> = ids.iter().copied().map(product).collect();
    ResponseTemplate::new(200).set_body_json(json!({
        "data": {"products": {
            "nodes": nodes,
            "pageInfo": {"hasNextPage": has_next, "endCursor": cursor}
        }},
        "extensions": full_bucket()
    }))
}

async fn mount_page(server: &MockServer, cursor: Value, response: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .and(body_partial_json(json!({"variables": {"cursor": cursor}})))
        .respond_with(response)
        .expect(1)
        .mount(server)
        .await;
}

// ============================================================================
// GraphQL connections
// ============================================================================

#[tokio::test]
async fn test_products_are_collected_across_three_pages_in_order() {
    let server = MockServer::start().await;
    mount_page(&server, Value::Null, products_page(&[1, 2], true, Some("c1"))).await;
    mount_page(&server, json!("c1"), products_page(&[3, 4], true, Some("c2"))).await;
    mount_page(&server, json!("c2"), products_page(&[5], false, None)).await;

    let client = GraphqlClient::new(&store_config(&server, 1)).unwrap();
    let products = fetch_all_products(&client, &Paginator::default(), 2)
        .await
        .unwrap();

    let ids: Vec<&str> = products.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(
        ids,
        vec![
            "gid://shopify/Product/1",
            "gid://shopify/Product/2",
            "gid://shopify/Product/3",
            "gid://shopify/Product/4",
            "gid://shopify/Product/5",
        ]
    );
}

#[tokio::test]
async fn test_empty_first_page_yields_no_products() {
    let server = MockServer::start().await;
    mount_page(&server, Value::Null, products_page(&[], false, None)).await;

    let client = GraphqlClient::new(&store_config(&server, 1)).unwrap();
    let products = fetch_all_products(&client, &Paginator::default(), 50)
        .await
        .unwrap();
    assert!(products.is_empty());
}

#[tokio::test]
async fn test_failed_page_discards_partial_results() {
    let server = MockServer::start().await;
    mount_page(&server, Value::Null, products_page(&[1], true, Some("c1"))).await;
    mount_page(
        &server,
        json!("c1"),
        ResponseTemplate::new(502).set_body_string("bad gateway"),
    )
    .await;

    let client = GraphqlClient::new(&store_config(&server, 1)).unwrap();
    let result = fetch_all_products(&client, &Paginator::default(), 1).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_page_limit_stops_runaway_traversal() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .and(body_partial_json(json!({"variables": {"cursor": null}})))
        .respond_with(products_page(&[1], true, Some("c1")))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .respond_with(products_page(&[2], true, Some("c2")))
        .mount(&server)
        .await;

    let client = GraphqlClient::new(&store_config(&server, 1)).unwrap();
    let err = fetch_all_products(&client, &Paginator::default().with_max_pages(2), 1)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("2 pages"), "unexpected error: {err}");
}

// ============================================================================
// REST Link headers
// ============================================================================

fn event(id: u64) -> Value {
    json!({
        "id": id,
        "subject_id": 42,
        "created_at": "2025-01-01T00:00:00Z",
        "subject_type": "Product",
        "verb": "create",
        "arguments": ["Chair"],
        "body": null,
        "message": "Product was created",
        "author": "Shopify",
        "description": "Product was created: Chair.",
        "path": "/admin/products/42"
    })
}

#[tokio::test]
async fn test_events_follow_link_header_with_only_limit_and_page_info() {
    let server = MockServer::start().await;
    let next = format!(
        "<{}{EVENTS_PATH}?limit=2&page_info=cDI%3D>; rel=\"next\"",
        server.uri()
    );

    Mock::given(method("GET"))
        .and(path(EVENTS_PATH))
        .and(query_param("page_info", "cDI="))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("X-Shopify-Shop-Api-Call-Limit", "2/40")
                .set_body_json(json!({"events": [event(3)]})),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(EVENTS_PATH))
        .and(query_param("verb", "create"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("X-Shopify-Shop-Api-Call-Limit", "1/40")
                .insert_header("Link", next.as_str())
                .set_body_json(json!({"events": [event(1), event(2)]})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = RestClient::new(&store_config(&server, 1)).unwrap();
    let source = RestLinkSource::<Value>::new(&client, "events", "events")
        .limit(2)
        .filter("verb", "create");
    let events = Paginator::default().fetch_all(&source).await.unwrap();

    let ids: Vec<u64> = events.iter().filter_map(|e| e["id"].as_u64()).collect();
    assert_eq!(ids, vec![1, 2, 3]);

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);
    let follow_up: Vec<(String, String)> = requests[1]
        .url
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    assert_eq!(follow_up.len(), 2);
    assert!(follow_up.contains(&("limit".to_string(), "2".to_string())));
    assert!(follow_up.contains(&("page_info".to_string(), "cDI=".to_string())));
}

#[tokio::test]
async fn test_fetch_all_events_decodes_store_events() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(EVENTS_PATH))
        .and(query_param("limit", "250"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("X-Shopify-Shop-Api-Call-Limit", "1/40")
                .set_body_json(json!({"events": [event(7)]})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = RestClient::new(&store_config(&server, 1)).unwrap();
    let events = fetch_all_events(&client, &Paginator::default(), 1000)
        .await
        .unwrap();

    assert_eq!(events.len(), 1);
    assert_eq!(events[0].id, 7);
    assert_eq!(events[0].subject_id, Some(42));
}

#[tokio::test]
async fn test_rest_page_decode_failure_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(EVENTS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"events": {"not": "a list"}})))
        .mount(&server)
        .await;

    let client = RestClient::new(&store_config(&server, 1)).unwrap();
    let source = RestLinkSource::<Value>::new(&client, "events", "events");
    let err = Paginator::default().fetch_all(&source).await.unwrap_err();
    assert!(matches!(err, PaginationError::Decode { .. }));
}

#[tokio::test]
async fn test_events_page_without_collection_key_aborts_traversal() {
    let server = MockServer::start().await;
    let next = format!(
        "<{}{EVENTS_PATH}?limit=250&page_info=cDI%3D>; rel=\"next\"",
        server.uri()
    );

    Mock::given(method("GET"))
        .and(path(EVENTS_PATH))
        .and(query_param("page_info", "cDI="))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("X-Shopify-Shop-Api-Call-Limit", "2/40")
                .set_body_json(json!({"errors": "Not Found"})),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(EVENTS_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("X-Shopify-Shop-Api-Call-Limit", "1/40")
                .insert_header("Link", next.as_str())
                .set_body_json(json!({"events": [event(1)]})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = RestClient::new(&store_config(&server, 1)).unwrap();
    let err = fetch_all_events(&client, &Paginator::default(), 250)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        StoreError::Pagination(PaginationError::Decode { ref collection, .. }) if collection == "events"
    ));
}
