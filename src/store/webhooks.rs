//! Webhook subscriptions.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::clients::graphql::{decode_mutation, MutationOutcome};
use crate::clients::GraphqlClient;
use crate::store::StoreError;

/// Subscribes an HTTP endpoint to a topic.
pub const WEBHOOK_CREATE_MUTATION: &str = r"mutation WebhookCreate($topic: WebhookSubscriptionTopic!, $webhookSubscription: WebhookSubscriptionInput!) {
  webhookSubscriptionCreate(topic: $topic, webhookSubscription: $webhookSubscription) {
    webhookSubscription {
      id
    }
    userErrors {
      field
      message
    }
  }
}";

macro_rules! webhook_topics {
    ($($(#[$doc:meta])* $variant:ident => $name:literal,)+) => {
        /// A webhook topic.
        ///
        /// Serializes to the REST form (`orders/create`); [`WebhookTopic::as_graphql`]
        /// gives the GraphQL enum value (`ORDERS_CREATE`).
        ///
        /// ```rust
        /// use shopify_data::store::WebhookTopic;
        ///
        /// let topic: WebhookTopic = "orders/create".parse().unwrap();
        /// assert_eq!(topic.as_graphql(), "ORDERS_CREATE");
        /// assert_eq!("PRODUCTS_UPDATE".parse::<WebhookTopic>().unwrap(), WebhookTopic::ProductsUpdate);
        /// ```
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum WebhookTopic {
            $(
                $(#[$doc])*
                #[serde(rename = $name)]
                $variant,
            )+
        }

        impl WebhookTopic {
            /// Every supported topic.
            pub const ALL: &'static [Self] = &[$(Self::$variant,)+];

            /// The REST form, e.g. `orders/create`.
            #[must_use]
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $name,)+
                }
            }
        }
    };
}

webhook_topics! {
    AppUninstalled => "app/uninstalled",
    CartsCreate => "carts/create",
    CartsUpdate => "carts/update",
    CheckoutsCreate => "checkouts/create",
    CheckoutsDelete => "checkouts/delete",
    CheckoutsUpdate => "checkouts/update",
    CollectionsCreate => "collections/create",
    CollectionsDelete => "collections/delete",
    CollectionsUpdate => "collections/update",
    CustomersCreate => "customers/create",
    CustomersDelete => "customers/delete",
    CustomersDisable => "customers/disable",
    CustomersEnable => "customers/enable",
    CustomersUpdate => "customers/update",
    DraftOrdersCreate => "draft_orders/create",
    DraftOrdersDelete => "draft_orders/delete",
    DraftOrdersUpdate => "draft_orders/update",
    FulfillmentsCreate => "fulfillments/create",
    FulfillmentsUpdate => "fulfillments/update",
    InventoryItemsCreate => "inventory_items/create",
    InventoryItemsDelete => "inventory_items/delete",
    InventoryItemsUpdate => "inventory_items/update",
    InventoryLevelsConnect => "inventory_levels/connect",
    InventoryLevelsDisconnect => "inventory_levels/disconnect",
    InventoryLevelsUpdate => "inventory_levels/update",
    LocationsCreate => "locations/create",
    LocationsDelete => "locations/delete",
    LocationsUpdate => "locations/update",
    /// Fired for every order, including ones created by `orderCreate`.
    OrdersCreate => "orders/create",
    OrdersCancelled => "orders/cancelled",
    OrdersDelete => "orders/delete",
    OrdersEdited => "orders/edited",
    OrdersFulfilled => "orders/fulfilled",
    OrdersPaid => "orders/paid",
    OrdersPartiallyFulfilled => "orders/partially_fulfilled",
    OrdersUpdated => "orders/updated",
    ProductsCreate => "products/create",
    ProductsDelete => "products/delete",
    ProductsUpdate => "products/update",
    RefundsCreate => "refunds/create",
    ShopUpdate => "shop/update",
    ThemesCreate => "themes/create",
    ThemesDelete => "themes/delete",
    ThemesPublish => "themes/publish",
    ThemesUpdate => "themes/update",
}

impl WebhookTopic {
    /// The GraphQL `WebhookSubscriptionTopic` value, e.g. `ORDERS_CREATE`.
    #[must_use]
    pub fn as_graphql(&self) -> String {
        self.as_str().replace('/', "_").to_ascii_uppercase()
    }
}

impl fmt::Display for WebhookTopic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WebhookTopic {
    type Err = StoreError;

    /// Accepts the REST form or the GraphQL form, in any case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|topic| {
                topic.as_str() == wanted || topic.as_graphql().to_ascii_lowercase() == wanted
            })
            .ok_or_else(|| StoreError::UnknownTopic {
                topic: s.to_string(),
            })
    }
}

#[derive(Deserialize)]
struct CreatedSubscription {
    id: String,
}

/// Subscribes `callback_url` to `topic` with JSON payloads.
///
/// Returns the new subscription's global ID.
///
/// # Errors
///
/// - [`StoreError::InvalidCallbackUrl`] unless the URL is absolute http(s)
/// - [`StoreError::UserErrors`] when the server rejects the subscription
/// - [`StoreError::Graphql`] for transport or decoding failures
pub async fn create_webhook(
    client: &GraphqlClient,
    topic: WebhookTopic,
    callback_url: &str,
) -> Result<String, StoreError> {
    let url = reqwest::Url::parse(callback_url.trim()).map_err(|_| StoreError::InvalidCallbackUrl {
        url: callback_url.to_string(),
    })?;
    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        return Err(StoreError::InvalidCallbackUrl {
            url: callback_url.to_string(),
        });
    }

    let variables = json!({
        "topic": topic.as_graphql(),
        "webhookSubscription": {
            "callbackUrl": url.as_str(),
            "format": "JSON"
        }
    });

    let result = client
        .query(WEBHOOK_CREATE_MUTATION, Some(variables), None)
        .await;

    match decode_mutation::<CreatedSubscription>(
        result,
        "webhookSubscriptionCreate",
        "webhookSubscription",
    ) {
        MutationOutcome::Ok(subscription) => {
            tracing::info!(%topic, id = %subscription.id, "created webhook subscription");
            Ok(subscription.id)
        }
        MutationOutcome::ValidationFailed(errors) => Err(StoreError::from_user_errors(
            "webhookSubscriptionCreate",
            &errors,
        )),
        MutationOutcome::TransportFailed(error) => Err(error.into()),
    }
}
