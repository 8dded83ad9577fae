//! Configuration for talking to one store.
//!
//! # Overview
//!
//! - [`StoreConfig`]: connection settings (shop, token, API version, retries)
//! - [`StoreConfigBuilder`]: a builder for [`StoreConfig`]
//! - [`EngineSettings`]: pacing, batching and synthetic-data tuning
//! - [`update_env_file`]: persists a `KEY=value` pair into a dotenv file
//! - [`AccessToken`], [`ShopDomain`], [`BaseUrl`], [`ApiVersion`]: validated values
//!
//! Both [`StoreConfig`] and [`EngineSettings`] can be read from the process
//! environment, or from any key lookup for tests.
//!
//! # Example
//!
//! ```rust
//! use shopify_data::{AccessToken, ApiVersion, ShopDomain, StoreConfig};
//!
//! let config = StoreConfig::builder()
//!     .shop(ShopDomain::new("my-store").unwrap())
//!     .access_token(AccessToken::new("shpat_123").unwrap())
//!     .api_version(ApiVersion::V2024_10)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.shop().as_ref(), "my-store.myshopify.com");
//! ```

mod env_file;
mod newtypes;
mod settings;
mod version;

pub use env_file::update_env_file;
pub use newtypes::{AccessToken, BaseUrl, ShopDomain};
pub use settings::EngineSettings;
pub use version::ApiVersion;

use crate::error::ConfigError;

/// Environment variable holding the shop domain.
pub const SHOP_VAR: &str = "SHOP";
/// Environment variable holding the Admin API access token.
pub const ACCESS_TOKEN_VAR: &str = "ACCESS_TOKEN";

const API_VERSION_VAR: &str = "SHOPIFY_API_VERSION";
const BASE_URL_VAR: &str = "SHOPIFY_API_BASE_URL";
const TRIES_VAR: &str = "SHOPIFY_TRIES";

/// Default number of attempts per request (first try plus retries).
pub const DEFAULT_TRIES: u32 = 3;

/// Connection settings for one store.
///
/// `StoreConfig` is `Clone`, `Send`, and `Sync`; clients copy what they need
/// out of it at construction time.
#[derive(Clone, Debug)]
pub struct StoreConfig {
    shop: ShopDomain,
    access_token: AccessToken,
    api_version: ApiVersion,
    base_url: Option<BaseUrl>,
    user_agent_prefix: Option<String>,
    tries: u32,
}

impl StoreConfig {
    /// Creates a new builder for constructing a `StoreConfig`.
    #[must_use]
    pub fn builder() -> StoreConfigBuilder {
        StoreConfigBuilder::new()
    }

    /// Reads the configuration from the process environment.
    ///
    /// Expects `SHOP` and `ACCESS_TOKEN`; `SHOPIFY_API_VERSION`,
    /// `SHOPIFY_API_BASE_URL` and `SHOPIFY_TRIES` are optional.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a required variable is missing or any
    /// variable fails validation.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the configuration through an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Same as [`StoreConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let mut builder = Self::builder();
        if let Some(shop) = non_empty(SHOP_VAR) {
            builder = builder.shop(ShopDomain::new(shop)?);
        }
        if let Some(token) = non_empty(ACCESS_TOKEN_VAR) {
            builder = builder.access_token(AccessToken::new(token)?);
        }
        if let Some(version) = non_empty(API_VERSION_VAR) {
            builder = builder.api_version(version.parse()?);
        }
        if let Some(url) = non_empty(BASE_URL_VAR) {
            builder = builder.base_url(BaseUrl::new(url)?);
        }
        if let Some(raw) = non_empty(TRIES_VAR) {
            let tries = raw
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|t| *t >= 1)
                .ok_or_else(|| ConfigError::InvalidEnvValue {
                    key: TRIES_VAR,
                    value: raw.clone(),
                    reason: "expected an integer of at least 1".to_string(),
                })?;
            builder = builder.tries(tries);
        }

        builder.build()
    }

    /// Returns the shop domain.
    #[must_use]
    pub const fn shop(&self) -> &ShopDomain {
        &self.shop
    }

    /// Returns the access token.
    #[must_use]
    pub const fn access_token(&self) -> &AccessToken {
        &self.access_token
    }

    /// Returns the API version.
    #[must_use]
    pub const fn api_version(&self) -> &ApiVersion {
        &self.api_version
    }

    /// Returns the base URL override, if configured.
    #[must_use]
    pub const fn base_url(&self) -> Option<&BaseUrl> {
        self.base_url.as_ref()
    }

    /// Returns the user agent prefix, if configured.
    #[must_use]
    pub fn user_agent_prefix(&self) -> Option<&str> {
        self.user_agent_prefix.as_deref()
    }

    /// Returns the number of attempts each request gets.
    #[must_use]
    pub const fn tries(&self) -> u32 {
        self.tries
    }
}

// Verify StoreConfig is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<StoreConfig>();
};

/// Builder for constructing [`StoreConfig`] instances.
///
/// `shop` and `access_token` are required.
///
/// # Defaults
///
/// - `api_version`: latest stable version
/// - `base_url`: `None` (requests go to `https://{shop}`)
/// - `user_agent_prefix`: `None`
/// - `tries`: [`DEFAULT_TRIES`]
#[derive(Debug, Default)]
pub struct StoreConfigBuilder {
    shop: Option<ShopDomain>,
    access_token: Option<AccessToken>,
    api_version: Option<ApiVersion>,
    base_url: Option<BaseUrl>,
    user_agent_prefix: Option<String>,
    tries: Option<u32>,
}

impl StoreConfigBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the shop domain (required).
    #[must_use]
    pub fn shop(mut self, shop: ShopDomain) -> Self {
        self.shop = Some(shop);
        self
    }

    /// Sets the access token (required).
    #[must_use]
    pub fn access_token(mut self, token: AccessToken) -> Self {
        self.access_token = Some(token);
        self
    }

    /// Sets the API version.
    #[must_use]
    pub fn api_version(mut self, version: ApiVersion) -> Self {
        self.api_version = Some(version);
        self
    }

    /// Routes every request to `base_url` instead of `https://{shop}`.
    #[must_use]
    pub fn base_url(mut self, base_url: BaseUrl) -> Self {
        self.base_url = Some(base_url);
        self
    }

    /// Sets the user agent prefix for HTTP requests.
    #[must_use]
    pub fn user_agent_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.user_agent_prefix = Some(prefix.into());
        self
    }

    /// Sets the number of attempts per request. Values below 1 are raised to 1.
    #[must_use]
    pub const fn tries(mut self, tries: u32) -> Self {
        self.tries = Some(tries);
        self
    }

    /// Builds the [`StoreConfig`], validating that required fields are set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingRequiredField`] if the shop or the
    /// access token is not set.
    pub fn build(self) -> Result<StoreConfig, ConfigError> {
        let shop = self
            .shop
            .ok_or(ConfigError::MissingRequiredField { field: SHOP_VAR })?;
        let access_token = self.access_token.ok_or(ConfigError::MissingRequiredField {
            field: ACCESS_TOKEN_VAR,
        })?;

        Ok(StoreConfig {
            shop,
            access_token,
            api_version: self.api_version.unwrap_or_else(ApiVersion::latest),
            base_url: self.base_url,
            user_agent_prefix: self.user_agent_prefix,
            tries: self.tries.unwrap_or(DEFAULT_TRIES).max(1),
        })
    }
}
