//! # Shopify store data engine
//!
//! Populates a Shopify store with synthetic orders and products, and exports
//! its catalog and event log, without exceeding the Admin API's rate limits.
//!
//! ## Overview
//!
//! - [`throttle`]: turns cost and call-limit telemetry into pause decisions
//! - [`queue`]: bounds concurrency and start rate beneath the adaptive pacing
//! - [`pagination`]: walks GraphQL connections and REST `Link` pages to exhaustion
//! - [`batch`]: drives a fixed number of writes and keeps a per-index ledger
//! - [`store`]: orders, products, events and webhooks on top of the above
//! - [`seed`]: synthetic mutation inputs
//! - [`clients`]: authenticated HTTP, GraphQL and REST clients with retries
//!
//! ## Quick Start
//!
//! ```rust
//! use shopify_data::{AccessToken, ApiVersion, ShopDomain, StoreConfig};
//!
//! let config = StoreConfig::builder()
//!     .shop(ShopDomain::new("my-store").unwrap())
//!     .access_token(AccessToken::new("shpat_example").unwrap())
//!     .api_version(ApiVersion::V2024_10)
//!     .build()
//!     .unwrap();
//! assert_eq!(config.shop().as_ref(), "my-store.myshopify.com");
//! ```
//!
//! ## Creating orders in batches
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use shopify_data::batch::BatchSubmitter;
//! use shopify_data::seed::SeedGenerator;
//! use shopify_data::store::OrderSubmitter;
//! use shopify_data::throttle::CostTracker;
//! use shopify_data::{EngineSettings, GraphqlClient, StoreConfig};
//!
//! let config = StoreConfig::from_env()?;
//! let settings = EngineSettings::from_env()?;
//! let client = Arc::new(GraphqlClient::new(&config)?);
//!
//! let mut generator = SeedGenerator::from_entropy(settings.locations.clone(), &settings.currency);
//! let report = BatchSubmitter::new(settings.batch, CostTracker::new(settings.throttle))
//!     .run(25, |_| generator.order_input(), Arc::new(OrderSubmitter::new(client)))
//!     .await;
//!
//! println!("attempted {}, succeeded {}", report.attempted(), report.succeeded());
//! ```
//!
//! ## Exporting the catalog
//!
//! ```rust,ignore
//! use shopify_data::pagination::Paginator;
//! use shopify_data::store::fetch_all_products;
//!
//! let products = fetch_all_products(&client, &Paginator::default(), 100).await?;
//! ```

pub mod batch;
pub mod clients;
pub mod config;
pub mod error;
pub mod money;
pub mod pagination;
pub mod queue;
pub mod report;
pub mod seed;
pub mod store;
pub mod throttle;

// Re-export configuration types at crate root for convenience
pub use config::{
    update_env_file, AccessToken, ApiVersion, BaseUrl, EngineSettings, ShopDomain, StoreConfig,
    StoreConfigBuilder,
};
pub use error::ConfigError;

// Re-export client types
pub use clients::{
    ApiCallLimit, GraphqlClient, GraphqlError, HttpClient, HttpError, HttpMethod, HttpRequest,
    HttpResponse, PaginationInfo, RestClient, RestError,
};

// Re-export engine types
pub use batch::{BatchConfig, BatchReport, BatchSubmitter};
pub use pagination::{PaginationError, Paginator};
pub use queue::{BoundedQueue, QueueConfig};
pub use throttle::{CostTracker, RateSignal, ThrottlePolicy, ThrottleStatus};
