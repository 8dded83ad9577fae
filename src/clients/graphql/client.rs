//! GraphQL client for the Admin API.

use crate::clients::graphql::GraphqlError;
use crate::clients::{HttpClient, HttpMethod, HttpRequest, HttpResponse};
use crate::config::{ApiVersion, StoreConfig};

/// GraphQL client bound to one store and API version.
///
/// Requests default to the configured number of tries, so a stray 429 is
/// retried with exponential backoff by the underlying [`HttpClient`].
///
/// # Thread Safety
///
/// `GraphqlClient` is `Send + Sync`; batch tasks share one instance behind an `Arc`.
///
/// # Example
///
/// ```rust,ignore
/// use shopify_data::clients::GraphqlClient;
///
/// let client = GraphqlClient::new(&config)?;
/// let response = client.query("query { shop { name } }", None, None).await?;
/// println!("{}", response.body["data"]["shop"]["name"]);
/// ```
#[derive(Debug)]
pub struct GraphqlClient {
    http_client: HttpClient,
    api_version: ApiVersion,
    tries: u32,
}

// Verify GraphqlClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<GraphqlClient>();
};

impl GraphqlClient {
    /// Creates a client for the configured store and API version.
    ///
    /// # Errors
    ///
    /// Returns [`GraphqlError::Http`] if the HTTP client cannot be built.
    pub fn new(config: &StoreConfig) -> Result<Self, GraphqlError> {
        let api_version = config.api_version().clone();
        let http_client = HttpClient::new(api_version.admin_path(), config)?;

        Ok(Self {
            http_client,
            api_version,
            tries: config.tries(),
        })
    }

    /// Returns the API version for this client.
    #[must_use]
    pub const fn api_version(&self) -> &ApiVersion {
        &self.api_version
    }

    /// Returns the default number of tries per query.
    #[must_use]
    pub const fn tries(&self) -> u32 {
        self.tries
    }

    /// Executes a query or mutation.
    ///
    /// `tries` overrides the configured attempt count for this call.
    ///
    /// A 200 response is returned as-is even when its body carries `errors`;
    /// use [`decode_mutation`](super::decode_mutation) or
    /// [`data_at`](super::data_at) to interpret it.
    ///
    /// # Errors
    ///
    /// Returns [`GraphqlError::Http`] for network errors, non-2xx responses
    /// and retry exhaustion.
    pub async fn query(
        &self,
        query: &str,
        variables: Option<serde_json::Value>,
        tries: Option<u32>,
    ) -> Result<HttpResponse, GraphqlError> {
        let body = serde_json::json!({
            "query": query,
            "variables": variables
        });

        let request = HttpRequest::builder(HttpMethod::Post, "graphql.json")
            .body(body)
            .tries(tries.unwrap_or(self.tries))
            .build()
            .map_err(|e| GraphqlError::Http(e.into()))?;

        self.http_client.request(request).await.map_err(Into::into)
    }
}
