//! Product creation and catalog export.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::batch::{BatchTask, RemoteRecord, Submission, Submit};
use crate::clients::graphql::{decode_mutation, MutationOutcome};
use crate::clients::GraphqlClient;
use crate::pagination::{ConnectionQuery, GraphqlConnectionSource, Paginator};
use crate::seed::ProductSetInput;
use crate::store::{into_submission, StoreError};
use crate::throttle::RateSignal;

/// Creates a product with its options and variants in one call.
pub const PRODUCT_SET_MUTATION: &str = r"mutation ProductSet($input: ProductSetInput!) {
  productSet(input: $input, synchronous: true) {
    product {
      id
      title
    }
    userErrors {
      field
      message
      code
    }
  }
}";

/// One page of the product catalog.
pub const PRODUCTS_QUERY: &str = r"query Products($first: Int!, $cursor: String) {
  products(first: $first, after: $cursor) {
    nodes {
      id
      title
      handle
      status
      vendor
      productType
      totalInventory
      createdAt
      updatedAt
    }
    pageInfo {
      hasNextPage
      endCursor
    }
  }
}";

/// The `product` selection of a `productSet` payload.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct CreatedProduct {
    pub id: String,
    pub title: String,
}

/// A product as exported by [`fetch_all_products`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSummary {
    pub id: String,
    pub title: String,
    pub handle: String,
    pub status: String,
    #[serde(default)]
    pub vendor: Option<String>,
    #[serde(default)]
    pub product_type: Option<String>,
    #[serde(default)]
    pub total_inventory: Option<i64>,
    pub created_at: String,
    pub updated_at: String,
}

/// Sends `productSet` for `input`.
pub async fn create_product(
    client: &GraphqlClient,
    input: &ProductSetInput,
) -> (MutationOutcome<CreatedProduct>, Option<RateSignal>) {
    let result = client
        .query(PRODUCT_SET_MUTATION, Some(json!({ "input": input })), None)
        .await;
    let rate = result.as_ref().ok().map(RateSignal::from_response);
    (decode_mutation(result, "productSet", "product"), rate)
}

/// Batch adapter for [`create_product`].
#[derive(Debug, Clone)]
pub struct ProductSubmitter {
    client: Arc<GraphqlClient>,
}

impl ProductSubmitter {
    /// Creates a submitter sharing `client`.
    #[must_use]
    pub const fn new(client: Arc<GraphqlClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Submit<ProductSetInput> for ProductSubmitter {
    async fn submit(&self, task: &BatchTask<ProductSetInput>) -> Submission {
        let (outcome, rate) = create_product(&self.client, &task.payload).await;
        into_submission(outcome, rate, |product| RemoteRecord {
            remote_id: product.id,
            display_name: product.title,
        })
    }
}

/// Fetches the whole product catalog, `page_size` products per request.
///
/// # Errors
///
/// Returns [`StoreError::Pagination`] if any page fails; no partial catalog
/// is returned.
pub async fn fetch_all_products(
    client: &GraphqlClient,
    paginator: &Paginator,
    page_size: u32,
) -> Result<Vec<ProductSummary>, StoreError> {
    let query = ConnectionQuery::new(PRODUCTS_QUERY, &["products"]).page_size(page_size);
    let source = GraphqlConnectionSource::<ProductSummary>::new(client, query);
    let products = paginator.fetch_all(&source).await?;
    tracing::info!(count = products.len(), "fetched product catalog");
    Ok(products)
}
