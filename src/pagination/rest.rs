//! REST collection pages linked through the `Link` header.

use std::collections::HashMap;
use std::marker::PhantomData;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::clients::{HttpResponse, RestClient};
use crate::pagination::{Page, PageInfo, PageSource, PaginationError};
use crate::throttle::RateSignal;

/// Largest `limit` REST collection endpoints accept.
pub const MAX_LIMIT: u32 = 250;

/// Pages through a REST collection such as `events.json`.
///
/// The first request carries `limit` plus any filters. Follow-up requests
/// carry only `limit` and the `page_info` cursor, as the API rejects other
/// parameters alongside a cursor.
///
/// # Example
///
/// ```rust,ignore
/// use shopify_data::pagination::{Paginator, RestLinkSource};
///
/// let source = RestLinkSource::<serde_json::Value>::new(&client, "events", "events")
///     .limit(250)
///     .filter("verb", "create");
/// let events = Paginator::default().fetch_all(&source).await?;
/// ```
#[derive(Debug)]
pub struct RestLinkSource<'a, T> {
    client: &'a RestClient,
    path: String,
    collection_key: String,
    limit: u32,
    filters: HashMap<String, String>,
    _item: PhantomData<fn() -> T>,
}

impl<'a, T> RestLinkSource<'a, T> {
    /// Creates a source for `path` whose items live under `collection_key`.
    #[must_use]
    pub fn new(
        client: &'a RestClient,
        path: impl Into<String>,
        collection_key: impl Into<String>,
    ) -> Self {
        Self {
            client,
            path: path.into(),
            collection_key: collection_key.into(),
            limit: 50,
            filters: HashMap::new(),
            _item: PhantomData,
        }
    }

    /// Sets the page size, clamped to `1..=250`.
    #[must_use]
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = limit.clamp(1, MAX_LIMIT);
        self
    }

    /// Adds a filter sent with the first request only.
    #[must_use]
    pub fn filter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.insert(key.into(), value.into());
        self
    }

    fn query_for(&self, cursor: Option<&str>) -> HashMap<String, String> {
        let mut query = HashMap::new();
        query.insert("limit".to_string(), self.limit.to_string());
        match cursor {
            Some(page_info) => {
                query.insert("page_info".to_string(), page_info.to_string());
            }
            None => query.extend(self.filters.clone()),
        }
        query
    }
}

#[async_trait]
impl<T> PageSource for RestLinkSource<'_, T>
where
    T: DeserializeOwned + Send,
{
    type Item = T;

    async fn fetch_page(&self, cursor: Option<&str>) -> Result<Page<T>, PaginationError> {
        let response = self
            .client
            .get(&self.path, Some(self.query_for(cursor)), None)
            .await?;
        decode_collection(&response, &self.collection_key)
    }
}

fn decode_collection<T: DeserializeOwned>(
    response: &HttpResponse,
    collection_key: &str,
) -> Result<Page<T>, PaginationError> {
    let raw = response
        .body
        .get(collection_key)
        .cloned()
        .ok_or_else(|| PaginationError::Decode {
            collection: collection_key.to_string(),
            message: format!("response has no '{collection_key}' key"),
        })?;

    let items: Vec<T> = serde_json::from_value(raw).map_err(|e| PaginationError::Decode {
        collection: collection_key.to_string(),
        message: e.to_string(),
    })?;

    Ok(Page {
        items,
        page_info: PageInfo {
            has_next_page: response.next_page_info.is_some(),
            end_cursor: response.next_page_info.clone(),
        },
        rate: RateSignal::from_response(response),
    })
}
