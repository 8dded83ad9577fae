//! API clients for the Shopify Admin API.
//!
//! - [`HttpClient`]: authenticated transport with retry handling
//! - [`GraphqlClient`]: GraphQL queries and mutations
//! - [`RestClient`]: REST reads with `Link` header pagination
//!
//! Every response is an [`HttpResponse`], from which the pacing engine
//! derives its [`RateSignal`](crate::throttle::RateSignal).

mod errors;
pub mod graphql;
mod http_client;
mod http_request;
mod http_response;
pub mod rest;

pub use errors::{
    HttpError, HttpResponseError, InvalidHttpRequestError, MaxHttpRetriesExceededError,
};
pub use http_client::{HttpClient, CLIENT_VERSION, MAX_RETRY_WAIT, RETRY_WAIT_TIME};
pub use http_request::{HttpMethod, HttpRequest, HttpRequestBuilder};
pub use http_response::{ApiCallLimit, HttpResponse, PaginationInfo};

pub use graphql::{GraphqlClient, GraphqlError};
pub use rest::{RestClient, RestError};
