//! REST client for the Admin API.

use std::collections::HashMap;

use crate::clients::rest::RestError;
use crate::clients::{HttpClient, HttpMethod, HttpRequest, HttpResponse};
use crate::config::{ApiVersion, StoreConfig};

/// REST client bound to one store and API version.
///
/// # Example
///
/// ```rust,ignore
/// use std::collections::HashMap;
/// use shopify_data::clients::RestClient;
///
/// let client = RestClient::new(&config)?;
/// let query = HashMap::from([("limit".to_string(), "50".to_string())]);
/// let response = client.get("events", Some(query), None).await?;
/// if let Some(next) = &response.next_page_info {
///     println!("more events after {next}");
/// }
/// ```
#[derive(Debug)]
pub struct RestClient {
    http_client: HttpClient,
    api_version: ApiVersion,
    tries: u32,
}

// Verify RestClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<RestClient>();
};

impl RestClient {
    /// Creates a client for the configured store and API version.
    ///
    /// # Errors
    ///
    /// Returns [`RestError::Http`] if the HTTP client cannot be built.
    pub fn new(config: &StoreConfig) -> Result<Self, RestError> {
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

    /// Sends a GET request to `path`, normalized to `{path}.json`.
    ///
    /// `tries` overrides the configured attempt count for this call.
    ///
    /// # Errors
    ///
    /// Returns [`RestError::InvalidPath`] for an empty path and
    /// [`RestError::Http`] for transport failures.
    pub async fn get(
        &self,
        path: &str,
        query: Option<HashMap<String, String>>,
        tries: Option<u32>,
    ) -> Result<HttpResponse, RestError> {
        let normalized_path = normalize_path(path)?;

        let mut builder = HttpRequest::builder(HttpMethod::Get, normalized_path)
            .tries(tries.unwrap_or(self.tries));
        if let Some(query_params) = query {
            builder = builder.query(query_params);
        }

        let request = builder.build().map_err(|e| RestError::Http(e.into()))?;
        self.http_client.request(request).await.map_err(Into::into)
    }
}

/// Normalizes a REST API path.
///
/// Leading `/` characters and an existing `.json` suffix are stripped, then
/// `.json` is appended.
///
/// ```rust,ignore
/// assert_eq!(normalize_path("events")?, "events.json");
/// assert_eq!(normalize_path("/events.json")?, "events.json");
/// ```
fn normalize_path(path: &str) -> Result<String, RestError> {
    let trimmed = path.trim_start_matches('/');
    let trimmed = trimmed.strip_suffix(".json").unwrap_or(trimmed);

    if trimmed.is_empty() {
        return Err(RestError::InvalidPath {
            path: path.to_string(),
        });
    }

    Ok(format!("{trimmed}.json"))
}
