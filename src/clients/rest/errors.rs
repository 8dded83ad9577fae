//! REST-specific error types.

use crate::clients::HttpError;
use thiserror::Error;

/// Error type for REST API operations.
///
/// # Example
///
/// ```rust
/// use shopify_data::clients::RestError;
///
/// let error = RestError::InvalidPath { path: String::new() };
/// assert_eq!(error.to_string(), "Invalid REST API path: ");
/// ```
#[derive(Debug, Error)]
pub enum RestError {
    /// The path is empty after normalization.
    #[error("Invalid REST API path: {path}")]
    InvalidPath {
        /// The rejected path.
        path: String,
    },

    /// An HTTP-level error occurred.
    #[error(transparent)]
    Http(#[from] HttpError),
}

impl RestError {
    /// Returns `true` when the underlying HTTP response was 401 or 403.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        match self {
            Self::Http(e) => e.is_fatal(),
            Self::InvalidPath { .. } => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::HttpResponseError;

    #[test]
    fn test_invalid_path_message() {
        let error = RestError::InvalidPath {
            path: "/.json".to_string(),
        };
        assert_eq!(error.to_string(), "Invalid REST API path: /.json");
        assert!(!error.is_fatal());
    }

    #[test]
    fn test_http_variant_is_transparent_and_classified() {
        let error: RestError = HttpError::Response(HttpResponseError {
            code: 401,
            message: r#"{"errors":"[API] Invalid API key or access token"}"#.to_string(),
            error_reference: None,
        })
        .into();

        assert!(error.to_string().contains("Invalid API key"));
        assert!(error.is_fatal());
    }
}
