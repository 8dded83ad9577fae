//! HTTP client for Admin API communication.
//!
//! [`HttpClient`] owns the connection pool, the default headers and the
//! retry loop. The GraphQL and REST clients are thin layers on top of it.

use std::collections::HashMap;
use std::time::Duration;

use crate::clients::errors::{HttpError, HttpResponseError, MaxHttpRetriesExceededError};
use crate::clients::http_request::{HttpMethod, HttpRequest};
use crate::clients::http_response::HttpResponse;
use crate::config::StoreConfig;

/// Base wait between retries; one throttle restore interval.
pub const RETRY_WAIT_TIME: Duration = Duration::from_secs(1);

/// Upper bound for a single 429 backoff.
pub const MAX_RETRY_WAIT: Duration = Duration::from_secs(60);

/// Crate version from Cargo.toml.
pub const CLIENT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// HTTP client for making requests to one store.
///
/// The client handles:
/// - Base URI construction from the shop domain or a configured base URL
/// - Default headers including User-Agent and access token
/// - Retries for 429 (exponential backoff) and 500 (fixed delay) responses
/// - Shopify-specific header parsing
///
/// # Thread Safety
///
/// `HttpClient` is `Send + Sync`, making it safe to share across async tasks.
///
/// # Example
///
/// ```rust,ignore
/// use shopify_data::clients::{HttpClient, HttpMethod, HttpRequest};
///
/// let client = HttpClient::new(config.api_version().admin_path(), &config)?;
/// let request = HttpRequest::builder(HttpMethod::Get, "events.json").tries(3).build()?;
/// let response = client.request(request).await?;
/// ```
#[derive(Debug)]
pub struct HttpClient {
    client: reqwest::Client,
    /// Base URI (e.g., `https://my-store.myshopify.com`).
    base_uri: String,
    /// Base path (e.g., "/admin/api/2024-10").
    base_path: String,
    default_headers: HashMap<String, String>,
}

// Verify HttpClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<HttpClient>();
};

impl HttpClient {
    /// Creates a new HTTP client for the configured store.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::Network`] if the TLS backend cannot be initialized.
    pub fn new(base_path: impl Into<String>, config: &StoreConfig) -> Result<Self, HttpError> {
        let base_uri = config.base_url().map_or_else(
            || format!("https://{}", config.shop()),
            |url| url.as_ref().to_string(),
        );

        let user_agent_prefix = config
            .user_agent_prefix()
            .map_or(String::new(), |prefix| format!("{prefix} | "));
        let rust_version = env!("CARGO_PKG_RUST_VERSION");
        let user_agent =
            format!("{user_agent_prefix}shopify-data v{CLIENT_VERSION} | Rust {rust_version}");

        let mut default_headers = HashMap::new();
        default_headers.insert("User-Agent".to_string(), user_agent);
        default_headers.insert("Accept".to_string(), "application/json".to_string());
        default_headers.insert(
            "X-Shopify-Access-Token".to_string(),
            config.access_token().as_ref().to_string(),
        );

        let client = reqwest::Client::builder().use_rustls_tls().build()?;

        Ok(Self {
            client,
            base_uri,
            base_path: base_path.into(),
            default_headers,
        })
    }

    /// Returns the base URI for this client.
    #[must_use]
    pub fn base_uri(&self) -> &str {
        &self.base_uri
    }

    /// Returns the base path for this client.
    #[must_use]
    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    /// Returns the default headers for this client.
    #[must_use]
    pub const fn default_headers(&self) -> &HashMap<String, String> {
        &self.default_headers
    }

    /// Sends a request, retrying 429 and 500 responses up to `request.tries` times.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] if:
    /// - Request validation fails (`InvalidRequest`)
    /// - Network error occurs (`Network`)
    /// - Non-2xx response received (`Response`)
    /// - Max retries exceeded (`MaxRetries`)
    pub async fn request(&self, request: HttpRequest) -> Result<HttpResponse, HttpError> {
        request.verify()?;

        let path = request.path.trim_start_matches('/');
        let url = format!("{}{}/{}", self.base_uri, self.base_path, path);

        let mut headers = self.default_headers.clone();
        if request.body.is_some() {
            headers.insert("Content-Type".to_string(), "application/json".to_string());
        }
        if let Some(extra) = &request.extra_headers {
            headers.extend(extra.iter().map(|(k, v)| (k.clone(), v.clone())));
        }

        let mut tries: u32 = 0;
        loop {
            tries += 1;

            let mut req_builder = match request.http_method {
                HttpMethod::Get => self.client.get(&url),
                HttpMethod::Post => self.client.post(&url),
            };
            for (key, value) in &headers {
                req_builder = req_builder.header(key, value);
            }
            if let Some(query) = &request.query {
                req_builder = req_builder.query(query);
            }
            if let Some(body) = &request.body {
                req_builder = req_builder.body(body.to_string());
            }

            let res = req_builder.send().await?;

            let code = res.status().as_u16();
            let res_headers = Self::parse_response_headers(res.headers());
            let body_text = res.text().await?;
            let body = Self::parse_body(code, &body_text);

            let response = HttpResponse::new(code, res_headers, body);

            if let Some(reason) = response.deprecation_reason() {
                tracing::warn!(
                    "Deprecated request to Shopify API at {}, received reason: {}",
                    request.path,
                    reason
                );
            }

            if response.is_ok() {
                return Ok(response);
            }

            let error_message = Self::serialize_error(&response);
            let error_reference = response.request_id().map(String::from);

            let should_retry = code == 429 || code == 500;
            if !should_retry || request.tries == 1 {
                return Err(HttpError::Response(HttpResponseError {
                    code,
                    message: error_message,
                    error_reference,
                }));
            }

            if tries >= request.tries {
                return Err(HttpError::MaxRetries(MaxHttpRetriesExceededError {
                    code,
                    tries: request.tries,
                    message: error_message,
                    error_reference,
                }));
            }

            let delay = Self::calculate_retry_delay(&response, code, tries);
            tracing::warn!(
                status = code,
                attempt = tries,
                delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                "retrying request to {}",
                request.path
            );
            tokio::time::sleep(delay).await;
        }
    }

    fn parse_body(code: u16, body_text: &str) -> serde_json::Value {
        if body_text.is_empty() {
            return serde_json::json!({});
        }
        serde_json::from_str(body_text).unwrap_or_else(|_| {
            if code >= 500 {
                serde_json::json!({ "raw_body": body_text })
            } else {
                serde_json::json!({})
            }
        })
    }

    fn parse_response_headers(
        headers: &reqwest::header::HeaderMap,
    ) -> HashMap<String, Vec<String>> {
        let mut result: HashMap<String, Vec<String>> = HashMap::new();
        for (name, value) in headers {
            let key = name.as_str().to_lowercase();
            let value = value.to_str().unwrap_or_default().to_string();
            result.entry(key).or_default().push(value);
        }
        result
    }

    /// Delay before attempt `attempt + 1`.
    ///
    /// 429: `max(Retry-After, RETRY_WAIT_TIME) * 2^(attempt - 1)`, capped at
    /// [`MAX_RETRY_WAIT`]. 500: always [`RETRY_WAIT_TIME`].
    fn calculate_retry_delay(response: &HttpResponse, status: u16, attempt: u32) -> Duration {
        if status != 429 {
            return RETRY_WAIT_TIME;
        }

        let base = response
            .retry_request_after
            .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
            .map_or(RETRY_WAIT_TIME, |after| after.max(RETRY_WAIT_TIME));
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));

        base.saturating_mul(factor).min(MAX_RETRY_WAIT)
    }

    fn serialize_error(response: &HttpResponse) -> String {
        let mut error_body = serde_json::Map::new();

        if let Some(errors) = response.body.get("errors") {
            error_body.insert("errors".to_string(), errors.clone());
        }
        if let Some(error) = response.body.get("error") {
            error_body.insert("error".to_string(), error.clone());
            if let Some(desc) = response.body.get("error_description") {
                error_body.insert("error_description".to_string(), desc.clone());
            }
        }

        if let Some(request_id) = response.request_id() {
            error_body.insert(
                "error_reference".to_string(),
                serde_json::json!(format!(
                    "If you report this error, please include this id: {request_id}."
                )),
            );
        }

        serde_json::to_string(&error_body).unwrap_or_else(|_| "{}".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AccessToken, BaseUrl, ShopDomain};
    use serde_json::json;

    fn config() -> StoreConfig {
        StoreConfig::builder()
            .shop(ShopDomain::new("test-shop").unwrap())
            .access_token(AccessToken::new("test-access-token").unwrap())
            .build()
            .unwrap()
    }

    fn throttled(retry_after: Option<&str>) -> HttpResponse {
        let mut headers = HashMap::new();
        if let Some(value) = retry_after {
            headers.insert("retry-after".to_string(), vec![value.to_string()]);
        }
        HttpResponse::new(429, headers, json!({"errors": "Throttled"}))
    }

    #[test]
    fn test_client_uses_shop_domain_as_base_uri() {
        let client = HttpClient::new("/admin/api/2024-10", &config()).unwrap();
        assert_eq!(client.base_uri(), "https://test-shop.myshopify.com");
        assert_eq!(client.base_path(), "/admin/api/2024-10");
    }

    #[test]
    fn test_client_prefers_configured_base_url() {
        let config = StoreConfig::builder()
            .shop(ShopDomain::new("test-shop").unwrap())
            .access_token(AccessToken::new("token").unwrap())
            .base_url(BaseUrl::new("http://127.0.0.1:4010/").unwrap())
            .build()
            .unwrap();

        let client = HttpClient::new("/admin/api/2025-10", &config).unwrap();
        assert_eq!(client.base_uri(), "http://127.0.0.1:4010");
    }

    #[test]
    fn test_default_headers() {
        let config = StoreConfig::builder()
            .shop(ShopDomain::new("test-shop").unwrap())
            .access_token(AccessToken::new("test-access-token").unwrap())
            .user_agent_prefix("Seeder/2.0")
            .build()
            .unwrap();
        let client = HttpClient::new("/admin/api/2024-10", &config).unwrap();
        let headers = client.default_headers();

        assert_eq!(
            headers.get("X-Shopify-Access-Token").map(String::as_str),
            Some("test-access-token")
        );
        assert_eq!(
            headers.get("Accept").map(String::as_str),
            Some("application/json")
        );
        let user_agent = headers.get("User-Agent").unwrap();
        assert!(user_agent.starts_with("Seeder/2.0 | shopify-data v"));
    }

    #[test]
    fn test_429_backoff_doubles_per_attempt() {
        let response = throttled(None);
        assert_eq!(
            HttpClient::calculate_retry_delay(&response, 429, 1),
            Duration::from_secs(1)
        );
        assert_eq!(
            HttpClient::calculate_retry_delay(&response, 429, 2),
            Duration::from_secs(2)
        );
        assert_eq!(
            HttpClient::calculate_retry_delay(&response, 429, 3),
            Duration::from_secs(4)
        );
    }

    #[test]
    fn test_429_backoff_never_below_restore_interval() {
        let response = throttled(Some("0.2"));
        assert_eq!(
            HttpClient::calculate_retry_delay(&response, 429, 1),
            RETRY_WAIT_TIME
        );

        let response = throttled(Some("3"));
        assert_eq!(
            HttpClient::calculate_retry_delay(&response, 429, 2),
            Duration::from_secs(6)
        );
    }

    #[test]
    fn test_429_backoff_is_capped() {
        let response = throttled(Some("1e30"));
        assert_eq!(
            HttpClient::calculate_retry_delay(&response, 429, 1),
            RETRY_WAIT_TIME
        );
        assert_eq!(
            HttpClient::calculate_retry_delay(&throttled(None), 429, 40),
            MAX_RETRY_WAIT
        );
    }

    #[test]
    fn test_500_uses_fixed_delay() {
        let response = HttpResponse::new(500, HashMap::new(), json!({}));
        assert_eq!(
            HttpClient::calculate_retry_delay(&response, 500, 3),
            RETRY_WAIT_TIME
        );
    }

    #[test]
    fn test_serialize_error_includes_reference() {
        let mut headers = HashMap::new();
        headers.insert("x-request-id".to_string(), vec!["abc-123".to_string()]);
        let response = HttpResponse::new(401, headers, json!({"errors": "Invalid API key"}));

        let message = HttpClient::serialize_error(&response);
        assert!(message.contains("Invalid API key"));
        assert!(message.contains("abc-123"));
    }

    #[test]
    fn test_parse_body_keeps_raw_5xx_text() {
        assert_eq!(
            HttpClient::parse_body(502, "<html>bad gateway</html>"),
            json!({"raw_body": "<html>bad gateway</html>"})
        );
        assert_eq!(HttpClient::parse_body(404, "not json"), json!({}));
        assert_eq!(HttpClient::parse_body(200, ""), json!({}));
    }
}
