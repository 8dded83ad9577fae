//! The REST store event log.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::clients::RestClient;
use crate::pagination::{Paginator, RestLinkSource};
use crate::store::StoreError;

/// Largest page the events endpoint serves.
pub const EVENTS_PAGE_LIMIT: u32 = 250;

/// One entry of `events.json`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StoreEvent {
    pub id: u64,
    #[serde(default)]
    pub subject_id: Option<u64>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub subject_type: Option<String>,
    #[serde(default)]
    pub verb: Option<String>,
    /// Free-form arguments, usually a list of strings.
    #[serde(default)]
    pub arguments: Value,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub path: Option<String>,
}

/// Fetches every store event, `limit` per request.
///
/// # Errors
///
/// Returns [`StoreError::Pagination`] if any page fails.
pub async fn fetch_all_events(
    client: &RestClient,
    paginator: &Paginator,
    limit: u32,
) -> Result<Vec<StoreEvent>, StoreError> {
    let source =
        RestLinkSource::<StoreEvent>::new(client, "events", "events").limit(limit.min(EVENTS_PAGE_LIMIT));
    let events = paginator.fetch_all(&source).await?;
    tracing::info!(count = events.len(), "fetched store events");
    Ok(events)
}
