//! HTTP response types.
//!
//! [`HttpResponse`] carries the status, headers and JSON body of one API
//! response, plus the Shopify headers the pacing engine reads: the REST call
//! limit, the `Link` pagination cursors and `Retry-After`.

use std::collections::HashMap;

/// Rate limit information parsed from the `X-Shopify-Shop-Api-Call-Limit` header.
///
/// The header format is "X/Y" where X is the number of calls currently in the
/// leaky bucket and Y is the bucket size.
///
/// # Example
///
/// ```rust
/// use shopify_data::clients::ApiCallLimit;
///
/// let limit = ApiCallLimit::parse("39/40").unwrap();
/// assert_eq!(limit.request_count, 39);
/// assert_eq!(limit.bucket_size, 40);
/// assert_eq!(limit.remaining(), 1);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ApiCallLimit {
    /// Calls currently in the bucket.
    pub request_count: u32,
    /// Bucket capacity.
    pub bucket_size: u32,
}

impl ApiCallLimit {
    /// Parses the rate limit header value.
    ///
    /// Returns `None` unless the value is two unsigned integers separated by `/`.
    #[must_use]
    pub fn parse(header_value: &str) -> Option<Self> {
        let (used, size) = header_value.trim().split_once('/')?;

        Some(Self {
            request_count: used.trim().parse().ok()?,
            bucket_size: size.trim().parse().ok()?,
        })
    }

    /// Calls left before the bucket overflows.
    #[must_use]
    pub const fn remaining(&self) -> u32 {
        self.bucket_size.saturating_sub(self.request_count)
    }
}

/// Pagination cursors parsed from the `Link` header.
///
/// Shopify REST endpoints page with opaque `page_info` values embedded in
/// the `next` and `previous` link URLs.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PaginationInfo {
    /// The `page_info` value for the previous page, if available.
    pub prev_page_info: Option<String>,
    /// The `page_info` value for the next page, if available.
    pub next_page_info: Option<String>,
}

impl PaginationInfo {
    /// Parses pagination info from a Link header value.
    ///
    /// The format is `<url>; rel="next", <url>; rel="previous"`. Cursor
    /// values are percent-decoded.
    #[must_use]
    pub fn parse_link_header(header_value: &str) -> Self {
        let mut result = Self::default();

        for link in header_value.split(',') {
            let mut parts = link.split(';');
            let url = parts
                .next()
                .map(|s| s.trim().trim_start_matches('<').trim_end_matches('>'));
            let rel = parts.find_map(|part| {
                part.trim()
                    .strip_prefix("rel=")
                    .map(|rel| rel.trim_matches('"'))
            });

            let (Some(url), Some(rel)) = (url, rel) else {
                continue;
            };
            let Some(page_info) = Self::extract_page_info(url) else {
                continue;
            };

            match rel {
                "previous" => result.prev_page_info = Some(page_info),
                "next" => result.next_page_info = Some(page_info),
                _ => {}
            }
        }

        result
    }

    fn extract_page_info(url: &str) -> Option<String> {
        let (_, query) = url.split_once('?')?;

        query.split('&').find_map(|param| {
            let (key, value) = param.split_once('=')?;
            if key != "page_info" || value.is_empty() {
                return None;
            }
            Some(
                urlencoding::decode(value)
                    .map_or_else(|_| value.to_string(), std::borrow::Cow::into_owned),
            )
        })
    }
}

/// An HTTP response from the Admin API.
#[derive(Clone, Debug)]
pub struct HttpResponse {
    /// The HTTP status code.
    pub code: u16,
    /// Response headers, lowercased (headers may have multiple values).
    pub headers: HashMap<String, Vec<String>>,
    /// The parsed response body.
    pub body: serde_json::Value,
    /// Page info for the previous page (from Link header).
    pub prev_page_info: Option<String>,
    /// Page info for the next page (from Link header).
    pub next_page_info: Option<String>,
    /// Rate limit information (from `X-Shopify-Shop-Api-Call-Limit` header).
    pub api_call_limit: Option<ApiCallLimit>,
    /// Seconds to wait before retrying (from `Retry-After` header).
    pub retry_request_after: Option<f64>,
}

impl HttpResponse {
    /// Creates a new `HttpResponse`, parsing the Shopify headers.
    #[must_use]
    pub fn new(code: u16, headers: HashMap<String, Vec<String>>, body: serde_json::Value) -> Self {
        let first = |name: &str| headers.get(name).and_then(|values| values.first());

        let pagination = first("link")
            .map(|link| PaginationInfo::parse_link_header(link))
            .unwrap_or_default();
        let api_call_limit = first("x-shopify-shop-api-call-limit")
            .and_then(|value| ApiCallLimit::parse(value));
        let retry_request_after = first("retry-after")
            .and_then(|value| value.trim().parse::<f64>().ok())
            .filter(|secs| secs.is_finite() && *secs >= 0.0);

        Self {
            code,
            body,
            prev_page_info: pagination.prev_page_info,
            next_page_info: pagination.next_page_info,
            api_call_limit,
            retry_request_after,
            headers,
        }
    }

    /// Returns `true` if the response status code is in the 2xx range.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.code >= 200 && self.code <= 299
    }

    /// Returns the `X-Request-Id` header value, if present.
    #[must_use]
    pub fn request_id(&self) -> Option<&str> {
        self.header("x-request-id")
    }

    /// Returns the `X-Shopify-API-Deprecated-Reason` header value, if present.
    #[must_use]
    pub fn deprecation_reason(&self) -> Option<&str> {
        self.header("x-shopify-api-deprecated-reason")
    }

    fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(name)
            .and_then(|values| values.first())
            .map(String::as_str)
    }
}
