//! Configuration error types.
//!
//! All configuration constructors return `Result<T, ConfigError>` so that a
//! bad credential or malformed environment value fails before any request
//! leaves the process.
//!
//! # Example
//!
//! ```rust
//! use shopify_data::{AccessToken, ConfigError};
//!
//! let result = AccessToken::new("");
//! assert!(matches!(result, Err(ConfigError::EmptyAccessToken)));
//! ```

use thiserror::Error;

/// Errors that can occur while building or persisting configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Access token cannot be empty.
    #[error("Access token cannot be empty. Please provide a valid Admin API access token.")]
    EmptyAccessToken,

    /// Shop domain is invalid.
    #[error("Invalid shop domain '{domain}'. Expected format: 'shop-name' or 'shop-name.myshopify.com'.")]
    InvalidShopDomain {
        /// The invalid domain that was provided.
        domain: String,
    },

    /// API version is invalid.
    #[error("Invalid API version '{version}'. Expected format: 'YYYY-MM' (e.g., '2024-10') or 'unstable'.")]
    InvalidApiVersion {
        /// The invalid version string that was provided.
        version: String,
    },

    /// A required field is missing.
    #[error("Missing required field: '{field}'. Run `shopify-data setup` or set it in the environment.")]
    MissingRequiredField {
        /// The name of the missing field.
        field: &'static str,
    },

    /// Base URL is invalid.
    #[error("Invalid URL '{url}'. Please provide a valid URL with scheme (e.g., 'https://example.com').")]
    InvalidUrl {
        /// The invalid URL that was provided.
        url: String,
    },

    /// An environment variable holds a value that cannot be parsed.
    #[error("Invalid value '{value}' for {key}: {reason}")]
    InvalidEnvValue {
        /// The variable name.
        key: &'static str,
        /// The raw value found.
        value: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The dotenv file could not be read or written.
    #[error("Failed to update env file '{path}': {message}")]
    EnvFile {
        /// Path of the env file.
        path: String,
        /// Underlying I/O error message.
        message: String,
    },
}
