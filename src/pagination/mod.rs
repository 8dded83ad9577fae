//! Cursor pagination over the Admin API.
//!
//! A [`PageSource`] fetches one page for a cursor; [`Paginator::fetch_all`]
//! drives it from the first page until `has_next_page` is false and returns
//! every item in page order. Between pages the [`CostTracker`] is consulted
//! with the previous page's [`RateSignal`].
//!
//! Two sources ship with the crate:
//!
//! - [`GraphqlConnectionSource`]: a GraphQL connection with `pageInfo`
//! - [`RestLinkSource`]: a REST collection paged by `Link` header cursors
//!
//! A traversal is all-or-nothing: any error discards the items gathered so far.

mod graphql;
mod rest;

pub use graphql::{ConnectionQuery, GraphqlConnectionSource};
pub use rest::RestLinkSource;

use async_trait::async_trait;
use thiserror::Error;

use crate::clients::{GraphqlError, RestError};
use crate::throttle::{CostTracker, RateSignal};

/// Errors that abort a traversal.
#[derive(Debug, Error)]
pub enum PaginationError {
    /// A GraphQL page failed.
    #[error(transparent)]
    Graphql(#[from] GraphqlError),

    /// A REST page failed.
    #[error(transparent)]
    Rest(#[from] RestError),

    /// The server said there is a next page but gave no cursor.
    #[error("page {page} reported hasNextPage without an end cursor")]
    MissingCursor {
        /// 1-based page number.
        page: usize,
    },

    /// The server returned the same cursor twice in a row.
    #[error("page {page} repeated the previous cursor '{cursor}'")]
    RepeatedCursor {
        /// 1-based page number.
        page: usize,
        /// The repeated cursor.
        cursor: String,
    },

    /// A page's items could not be decoded.
    #[error("failed to decode {collection}: {message}")]
    Decode {
        /// Name or path of the collection.
        collection: String,
        /// Deserializer message.
        message: String,
    },

    /// The traversal exceeded the configured page limit.
    #[error("pagination stopped after {max_pages} pages")]
    PageLimit {
        /// The configured limit.
        max_pages: usize,
    },
}

impl PaginationError {
    /// Returns `true` when the failure came from a 401 or 403 response.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        match self {
            Self::Graphql(e) => e.is_fatal(),
            Self::Rest(e) => e.is_fatal(),
            _ => false,
        }
    }
}

/// Where a page sits in the collection.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PageInfo {
    /// Whether another page follows.
    pub has_next_page: bool,
    /// Cursor of the last item on this page.
    pub end_cursor: Option<String>,
}

/// One fetched page.
#[derive(Clone, Debug)]
pub struct Page<T> {
    /// Items in server order.
    pub items: Vec<T>,
    /// Position of this page.
    pub page_info: PageInfo,
    /// Rate telemetry from the page's response.
    pub rate: RateSignal,
}

/// Fetches one page of a collection.
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Item type of the collection.
    type Item: Send;

    /// Fetches the page that starts after `cursor`; `None` is the first page.
    async fn fetch_page(&self, cursor: Option<&str>) -> Result<Page<Self::Item>, PaginationError>;
}

/// Walks a [`PageSource`] to exhaustion.
#[derive(Clone, Copy, Debug, Default)]
pub struct Paginator {
    tracker: CostTracker,
    max_pages: Option<usize>,
}

impl Paginator {
    /// Creates a paginator that paces with `tracker`.
    #[must_use]
    pub const fn new(tracker: CostTracker) -> Self {
        Self {
            tracker,
            max_pages: None,
        }
    }

    /// Fails the traversal with [`PaginationError::PageLimit`] once more
    /// than `max_pages` pages would be fetched.
    #[must_use]
    pub const fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = Some(max_pages);
        self
    }

    /// Fetches every page and concatenates the items in cursor-visit order.
    ///
    /// An empty first page yields an empty `Vec`. Each call starts a fresh
    /// walk from the first page.
    ///
    /// # Errors
    ///
    /// Returns the first [`PaginationError`] encountered; partial results
    /// are discarded.
    pub async fn fetch_all<S>(&self, source: &S) -> Result<Vec<S::Item>, PaginationError>
    where
        S: PageSource + ?Sized,
    {
        let mut items = Vec::new();
        let mut cursor: Option<String> = None;
        let mut last_signal: Option<RateSignal> = None;
        let mut page_number = 0usize;

        loop {
            if self.max_pages.is_some_and(|max| page_number >= max) {
                return Err(PaginationError::PageLimit {
                    max_pages: page_number,
                });
            }
            page_number += 1;

            self.tracker.pace(last_signal.as_ref()).await;

            let page = source.fetch_page(cursor.as_deref()).await?;
            tracing::debug!(
                page = page_number,
                items = page.items.len(),
                has_next_page = page.page_info.has_next_page,
                "fetched page"
            );

            items.extend(page.items);
            last_signal = Some(page.rate);

            if !page.page_info.has_next_page {
                return Ok(items);
            }

            let next = page
                .page_info
                .end_cursor
                .filter(|c| !c.is_empty())
                .ok_or(PaginationError::MissingCursor { page: page_number })?;
            if cursor.as_deref() == Some(next.as_str()) {
                return Err(PaginationError::RepeatedCursor {
                    page: page_number,
                    cursor: next,
                });
            }
            cursor = Some(next);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::throttle::ThrottlePolicy;
    use std::sync::Mutex;
    use std::time::Duration;

    struct ScriptedSource {
        pages: Vec<Page<u32>>,
        seen: Mutex<Vec<Option<String>>>,
    }

    impl ScriptedSource {
        fn new(pages: Vec<Page<u32>>) -> Self {
            Self {
                pages,
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl PageSource for ScriptedSource {
        type Item = u32;

        async fn fetch_page(&self, cursor: Option<&str>) -> Result<Page<u32>, PaginationError> {
            let mut seen = self.seen.lock().unwrap();
            seen.push(cursor.map(String::from));
            let index = seen.len() - 1;
            Ok(self.pages[index].clone())
        }
    }

    fn page(items: &[u32], next: Option<&str>) -> Page<u32> {
        Page {
            items: items.to_vec(),
            page_info: PageInfo {
                has_next_page: next.is_some(),
                end_cursor: next.map(String::from),
            },
            rate: RateSignal::Absent,
        }
    }

    fn unpaced() -> Paginator {
        Paginator::new(CostTracker::new(ThrottlePolicy {
            fallback_delay: Duration::ZERO,
            ..ThrottlePolicy::default()
        }))
    }

    #[tokio::test]
    async fn test_empty_collection_yields_empty_vec() {
        let source = ScriptedSource::new(vec![page(&[], None)]);
        let items = unpaced().fetch_all(&source).await.unwrap();
        assert!(items.is_empty());
    }

    #[tokio::test]
    async fn test_pages_are_concatenated_in_order_and_cursors_threaded() {
        let source = ScriptedSource::new(vec![
            page(&[1, 2, 3], Some("c1")),
            page(&[4, 5], Some("c2")),
            page(&[6], None),
        ]);

        let items = unpaced().fetch_all(&source).await.unwrap();

        assert_eq!(items, vec![1, 2, 3, 4, 5, 6]);
        assert_eq!(
            *source.seen.lock().unwrap(),
            vec![None, Some("c1".to_string()), Some("c2".to_string())]
        );
    }

    #[tokio::test]
    async fn test_next_page_without_cursor_is_an_error() {
        let mut broken = page(&[1], None);
        broken.page_info.has_next_page = true;
        let source = ScriptedSource::new(vec![broken]);

        let err = unpaced().fetch_all(&source).await.unwrap_err();
        assert!(matches!(err, PaginationError::MissingCursor { page: 1 }));
    }

    #[tokio::test]
    async fn test_repeated_cursor_is_an_error() {
        let source = ScriptedSource::new(vec![
            page(&[1], Some("same")),
            page(&[2], Some("same")),
        ]);

        let err = unpaced().fetch_all(&source).await.unwrap_err();
        assert!(matches!(err, PaginationError::RepeatedCursor { page: 2, .. }));
    }

    #[tokio::test]
    async fn test_page_limit_guard() {
        let source = ScriptedSource::new(vec![
            page(&[1], Some("a")),
            page(&[2], Some("b")),
            page(&[3], Some("c")),
        ]);

        let err = unpaced().with_max_pages(2).fetch_all(&source).await.unwrap_err();
        assert!(matches!(err, PaginationError::PageLimit { max_pages: 2 }));
    }

    #[tokio::test(start_paused = true)]
    async fn test_absent_telemetry_paces_with_fallback_delay() {
        let source = ScriptedSource::new(vec![
            page(&[1], Some("a")),
            page(&[2], Some("b")),
            page(&[3], None),
        ]);
        let start = tokio::time::Instant::now();

        let items = Paginator::default().fetch_all(&source).await.unwrap();

        assert_eq!(items, vec![1, 2, 3]);
        // Two gaps between three pages, 500 ms each.
        assert_eq!(start.elapsed(), Duration::from_secs(1));
    }
}
