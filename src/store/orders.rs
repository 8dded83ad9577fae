//! Order creation.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use crate::batch::{BatchTask, RemoteRecord, Submission, Submit};
use crate::clients::graphql::{decode_mutation, MutationOutcome};
use crate::clients::GraphqlClient;
use crate::seed::OrderCreateInput;
use crate::store::into_submission;
use crate::throttle::RateSignal;

/// Creates one order without touching inventory or emailing the customer.
pub const ORDER_CREATE_MUTATION: &str = r"mutation CreateOrder($order: OrderCreateOrderInput!, $options: OrderCreateOptionsInput) {
  orderCreate(order: $order, options: $options) {
    userErrors {
      field
      message
    }
    order {
      id
      name
    }
  }
}";

/// The `order` selection of an `orderCreate` payload.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct CreatedOrder {
    /// Global ID, e.g. `gid://shopify/Order/1`.
    pub id: String,
    /// Order name, e.g. `#1001`.
    pub name: String,
}

/// Sends `orderCreate` for `order`.
///
/// Returns the decoded outcome together with the response's rate signal,
/// which is `None` when no response arrived.
pub async fn create_order(
    client: &GraphqlClient,
    order: &OrderCreateInput,
) -> (MutationOutcome<CreatedOrder>, Option<RateSignal>) {
    let variables = json!({
        "order": order,
        "options": {
            "inventoryBehaviour": "BYPASS",
            "sendReceipt": false
        }
    });

    let result = client
        .query(ORDER_CREATE_MUTATION, Some(variables), None)
        .await;
    let rate = result.as_ref().ok().map(RateSignal::from_response);
    (decode_mutation(result, "orderCreate", "order"), rate)
}

/// Batch adapter for [`create_order`].
#[derive(Debug, Clone)]
pub struct OrderSubmitter {
    client: Arc<GraphqlClient>,
}

impl OrderSubmitter {
    /// Creates a submitter sharing `client`.
    #[must_use]
    pub const fn new(client: Arc<GraphqlClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Submit<OrderCreateInput> for OrderSubmitter {
    async fn submit(&self, task: &BatchTask<OrderCreateInput>) -> Submission {
        let (outcome, rate) = create_order(&self.client, &task.payload).await;
        into_submission(outcome, rate, |order| RemoteRecord {
            remote_id: order.id,
            display_name: order.name,
        })
    }
}
