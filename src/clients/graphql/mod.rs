//! GraphQL Admin API client.
//!
//! # Overview
//!
//! - [`GraphqlClient`]: POSTs `{query, variables}` to `graphql.json`
//! - [`GraphqlError`]: transport, query-level and decoding failures
//! - [`MutationOutcome`]: the tagged result of one mutation, decided once by
//!   [`decode_mutation`] and consumed uniformly by callers
//!
//! # Example
//!
//! ```rust,ignore
//! use shopify_data::clients::graphql::{decode_mutation, GraphqlClient, MutationOutcome};
//! use serde_json::json;
//!
//! let client = GraphqlClient::new(&config)?;
//! let result = client
//!     .query(ORDER_CREATE_MUTATION, Some(json!({ "order": order })), None)
//!     .await;
//!
//! match decode_mutation::<CreatedOrder>(result, "orderCreate", "order") {
//!     MutationOutcome::Ok(order) => println!("created {}", order.name),
//!     MutationOutcome::ValidationFailed(errors) => println!("rejected: {errors:?}"),
//!     MutationOutcome::TransportFailed(error) => println!("failed: {error}"),
//! }
//! ```

mod client;
mod errors;
mod response;

pub use client::GraphqlClient;
pub use errors::GraphqlError;
pub use response::{data_at, decode_mutation, MutationOutcome, UserError};
