//! HTTP-level error types.
//!
//! - [`HttpResponseError`]: a non-2xx response that is not retried
//! - [`MaxHttpRetriesExceededError`]: a retryable status that outlived every attempt
//! - [`InvalidHttpRequestError`]: a request rejected before it is sent
//! - [`HttpError`]: the union of the above plus network failures
//!
//! [`HttpError::is_fatal`] singles out authentication failures, which the
//! batch engine treats as a reason to stop releasing work.

use thiserror::Error;

/// A non-2xx HTTP response from the API.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct HttpResponseError {
    /// The HTTP status code.
    pub code: u16,
    /// JSON-serialized error details from the response body.
    pub message: String,
    /// The `X-Request-Id` of the failed request, if present.
    pub error_reference: Option<String>,
}

/// Every allowed attempt ended in a retryable status (429 or 500).
#[derive(Debug, Error)]
#[error("Exceeded maximum retry count of {tries}. Last message: {message}")]
pub struct MaxHttpRetriesExceededError {
    /// The status code of the last attempt.
    pub code: u16,
    /// Number of attempts made.
    pub tries: u32,
    /// JSON-serialized error details from the last response.
    pub message: String,
    /// The `X-Request-Id` of the last attempt, if present.
    pub error_reference: Option<String>,
}

/// A request that failed validation before being sent.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvalidHttpRequestError {
    /// POST requires a body.
    #[error("Cannot use {method} without specifying data.")]
    MissingBody {
        /// The method that was used.
        method: String,
    },

    /// The request path is empty.
    #[error("Request path cannot be empty.")]
    EmptyPath,
}

/// Unified error type for HTTP operations.
#[derive(Debug, Error)]
pub enum HttpError {
    /// Non-retryable non-2xx response.
    #[error(transparent)]
    Response(#[from] HttpResponseError),

    /// Retries exhausted.
    #[error(transparent)]
    MaxRetries(#[from] MaxHttpRetriesExceededError),

    /// Request failed validation.
    #[error(transparent)]
    InvalidRequest(#[from] InvalidHttpRequestError),

    /// Connection or body transfer failure.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl HttpError {
    /// Returns the HTTP status code behind this error, if there was a response.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Response(e) => Some(e.code),
            Self::MaxRetries(e) => Some(e.code),
            Self::InvalidRequest(_) | Self::Network(_) => None,
        }
    }

    /// Returns `true` for 401 and 403 responses.
    ///
    /// No later request with the same credentials can succeed after one of these.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self.status(), Some(401 | 403))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response_error(code: u16) -> HttpError {
        HttpError::Response(HttpResponseError {
            code,
            message: r#"{"errors":"denied"}"#.to_string(),
            error_reference: None,
        })
    }

    #[test]
    fn test_http_response_error_displays_message() {
        let error = HttpResponseError {
            code: 404,
            message: r#"{"errors":"Not Found"}"#.to_string(),
            error_reference: None,
        };
        assert_eq!(error.to_string(), r#"{"errors":"Not Found"}"#);
    }

    #[test]
    fn test_max_retries_error_includes_retry_count() {
        let error = MaxHttpRetriesExceededError {
            code: 429,
            tries: 3,
            message: r#"{"errors":"Throttled"}"#.to_string(),
            error_reference: Some("req-9".to_string()),
        };
        let message = error.to_string();
        assert!(message.contains("Exceeded maximum retry count of 3"));
        assert!(message.contains("Throttled"));
    }

    #[test]
    fn test_invalid_request_messages() {
        let error = InvalidHttpRequestError::MissingBody {
            method: "post".to_string(),
        };
        assert_eq!(error.to_string(), "Cannot use post without specifying data.");
        assert_eq!(
            InvalidHttpRequestError::EmptyPath.to_string(),
            "Request path cannot be empty."
        );
    }

    #[test]
    fn test_auth_failures_are_fatal() {
        assert!(response_error(401).is_fatal());
        assert!(response_error(403).is_fatal());
        assert!(!response_error(404).is_fatal());
        assert!(!response_error(422).is_fatal());
    }

    #[test]
    fn test_exhausted_throttling_is_not_fatal() {
        let error = HttpError::MaxRetries(MaxHttpRetriesExceededError {
            code: 429,
            tries: 3,
            message: String::new(),
            error_reference: None,
        });
        assert_eq!(error.status(), Some(429));
        assert!(!error.is_fatal());
    }

    #[test]
    fn test_invalid_request_has_no_status() {
        let error: HttpError = InvalidHttpRequestError::EmptyPath.into();
        assert_eq!(error.status(), None);
        assert!(!error.is_fatal());
    }
}
