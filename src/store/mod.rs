//! Store operations built on the clients, the paginator and the batch submitter.
//!
//! - [`orders`]: `orderCreate` and the order batch submitter
//! - [`products`]: `productSet`, the product batch submitter and catalog export
//! - [`events`]: the REST store event log
//! - [`webhooks`]: `webhookSubscriptionCreate`

pub mod events;
pub mod orders;
pub mod products;
pub mod webhooks;

pub use events::{fetch_all_events, StoreEvent, EVENTS_PAGE_LIMIT};
pub use orders::{create_order, CreatedOrder, OrderSubmitter, ORDER_CREATE_MUTATION};
pub use products::{
    create_product, fetch_all_products, CreatedProduct, ProductSubmitter, ProductSummary,
    PRODUCTS_QUERY, PRODUCT_SET_MUTATION,
};
pub use webhooks::{create_webhook, WebhookTopic, WEBHOOK_CREATE_MUTATION};

use thiserror::Error;

use crate::batch::{RemoteRecord, SubmitFailure, Submission};
use crate::clients::graphql::{MutationOutcome, UserError};
use crate::clients::GraphqlError;
use crate::pagination::PaginationError;
use crate::throttle::RateSignal;

/// Errors from single store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The GraphQL request or its decoding failed.
    #[error(transparent)]
    Graphql(#[from] GraphqlError),

    /// A paginated read failed.
    #[error(transparent)]
    Pagination(#[from] PaginationError),

    /// The server rejected the input.
    #[error("{operation} rejected: {message}")]
    UserErrors {
        /// Mutation name.
        operation: &'static str,
        /// Joined `userErrors` messages.
        message: String,
    },

    /// The webhook callback is not an http(s) URL.
    #[error("Invalid webhook callback URL '{url}': expected an http or https URL")]
    InvalidCallbackUrl {
        /// The rejected URL.
        url: String,
    },

    /// The webhook topic name is not recognised.
    #[error("Unknown webhook topic '{topic}'")]
    UnknownTopic {
        /// The rejected topic.
        topic: String,
    },
}

impl StoreError {
    /// Returns `true` for authentication failures (HTTP 401/403).
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        match self {
            Self::Graphql(e) => e.is_fatal(),
            Self::Pagination(e) => e.is_fatal(),
            _ => false,
        }
    }

    pub(crate) fn from_user_errors(operation: &'static str, errors: &[UserError]) -> Self {
        Self::UserErrors {
            operation,
            message: errors
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; "),
        }
    }
}

/// Converts a decoded mutation into a batch submission.
pub(crate) fn into_submission<T>(
    outcome: MutationOutcome<T>,
    rate: Option<RateSignal>,
    record: impl FnOnce(T) -> RemoteRecord,
) -> Submission {
    let fatal = outcome.is_fatal();
    let result = match outcome.into_result() {
        Ok(payload) => Ok(record(payload)),
        Err(reason) if fatal => Err(SubmitFailure::fatal(reason)),
        Err(reason) => Err(SubmitFailure::recoverable(reason)),
    };
    Submission { result, rate }
}
