//! GraphQL-specific error types.
//!
//! HTTP failures arrive wrapped in [`GraphqlError::Http`]. A 200 response can
//! still fail: a top-level `errors` array becomes [`GraphqlError::Query`], and
//! a missing or malformed `data` substructure becomes
//! [`GraphqlError::MissingData`] or [`GraphqlError::Decode`].
//!
//! Mutation `userErrors` are not errors at this level; see
//! [`MutationOutcome::ValidationFailed`](super::MutationOutcome::ValidationFailed).

use crate::clients::HttpError;
use thiserror::Error;

/// Error type for GraphQL API operations.
///
/// # Example
///
/// ```rust
/// use shopify_data::clients::graphql::GraphqlError;
/// use shopify_data::clients::{HttpError, HttpResponseError};
///
/// let http_error = HttpError::Response(HttpResponseError {
///     code: 401,
///     message: r#"{"errors":"Invalid API key or access token"}"#.to_string(),
///     error_reference: None,
/// });
/// let graphql_error: GraphqlError = http_error.into();
/// assert!(graphql_error.is_fatal());
/// ```
#[derive(Debug, Error)]
pub enum GraphqlError {
    /// An HTTP-level error occurred.
    #[error(transparent)]
    Http(#[from] HttpError),

    /// The response carried a top-level `errors` field.
    #[error("GraphQL query failed: {message}")]
    Query {
        /// Messages of every reported error, joined with `; `.
        message: String,
    },

    /// An expected path under `data` was missing or null.
    #[error("GraphQL response is missing '{path}'")]
    MissingData {
        /// Dotted path that was expected.
        path: String,
    },

    /// A value was present but did not have the expected shape.
    #[error("Failed to decode '{path}': {message}")]
    Decode {
        /// Dotted path of the value.
        path: String,
        /// Deserializer message.
        message: String,
    },
}

impl GraphqlError {
    /// Returns `true` when the underlying HTTP response was 401 or 403.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        match self {
            Self::Http(e) => e.is_fatal(),
            Self::Query { .. } | Self::MissingData { .. } | Self::Decode { .. } => false,
        }
    }
}
