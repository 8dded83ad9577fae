//! Command-line surface of `shopify-data`.
//!
//! # Usage
//!
//! ```bash
//! # Store credentials in .env
//! shopify-data setup --shop my-store --access-token shpat_xxx
//!
//! # Seed the store
//! shopify-data generate:orders -n 25
//! shopify-data generate:products -n 40
//!
//! # Export
//! shopify-data fetch:products --output products.json
//! shopify-data fetch:events --format csv
//!
//! # Subscribe an endpoint
//! shopify-data create:webhook --topic orders/create --url https://example.com/hooks
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use shopify_data::store::EVENTS_PAGE_LIMIT;

#[derive(Parser, Debug)]
#[command(name = "shopify-data")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Log filter such as `debug` or `shopify_data=trace` (overrides RUST_LOG)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Also append plain-text logs to this file
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Json,
    Csv,
}

impl ExportFormat {
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Csv => "csv",
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate credentials and save them to a dotenv file
    Setup {
        /// Shop name or `*.myshopify.com` domain
        #[arg(long)]
        shop: String,

        /// Admin API access token
        #[arg(long)]
        access_token: String,

        /// Dotenv file to update
        #[arg(long, default_value = ".env")]
        env_file: PathBuf,
    },

    /// Create synthetic orders in batches
    #[command(alias = "generate:orders")]
    GenerateOrders {
        /// Number of orders to create
        #[arg(short = 'n', long, default_value_t = 5)]
        count: usize,
    },

    /// Create synthetic products in batches
    #[command(alias = "generate:products")]
    GenerateProducts {
        /// Number of products to create
        #[arg(short = 'n', long, default_value_t = 10)]
        count: usize,
    },

    /// Export the whole product catalog as JSON
    #[command(alias = "fetch:products")]
    FetchProducts {
        /// Output file
        #[arg(long, default_value = "products.json")]
        output: PathBuf,

        /// Products per request
        #[arg(long, default_value_t = 50)]
        page_size: u32,
    },

    /// Export the store event log
    #[command(alias = "fetch:events")]
    FetchEvents {
        #[arg(long, value_enum, default_value_t = ExportFormat::Json)]
        format: ExportFormat,

        /// Directory for `store_events.<ext>` (defaults to ~/Downloads, then ~/Desktop)
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Events per request, at most 250
        #[arg(long, default_value_t = EVENTS_PAGE_LIMIT)]
        limit: u32,
    },

    /// Subscribe a callback URL to a webhook topic
    #[command(alias = "create:webhook")]
    CreateWebhook {
        /// Topic in REST (`orders/create`) or GraphQL (`ORDERS_CREATE`) form
        #[arg(long)]
        topic: String,

        /// HTTP(S) endpoint receiving the payloads
        #[arg(long)]
        url: String,
    },
}
