//! REST Admin API client.
//!
//! Only read access is needed: store events are not exposed through GraphQL
//! with the same shape, so [`RestClient::get`] walks `events.json` with
//! `Link` header cursors.
//!
//! - [`RestClient`]: GET requests with path normalization and retries
//! - [`RestError`]: Error type for REST API operations

mod client;
mod errors;

pub use client::RestClient;
pub use errors::RestError;
