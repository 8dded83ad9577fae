//! GraphQL connection pages.

use std::marker::PhantomData;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::clients::graphql::data_at;
use crate::clients::{GraphqlClient, GraphqlError};
use crate::pagination::{Page, PageInfo, PageSource, PaginationError};
use crate::throttle::RateSignal;

/// Largest `first:` the Admin API accepts.
pub const MAX_PAGE_SIZE: u32 = 250;

/// A paginated GraphQL query.
///
/// The document must declare `$first: Int!` and `$cursor: String` and pass
/// them to the connection found at `connection_path` under `data`. The
/// connection must select `pageInfo { hasNextPage endCursor }` and either
/// `nodes` or `edges { node }`.
///
/// # Example
///
/// ```rust
/// use shopify_data::pagination::ConnectionQuery;
///
/// let query = ConnectionQuery::new(
///     "query($first: Int!, $cursor: String) { products(first: $first, after: $cursor) { nodes { id } pageInfo { hasNextPage endCursor } } }",
///     &["products"],
/// )
/// .page_size(100);
/// assert_eq!(query.get_page_size(), 100);
/// ```
#[derive(Clone, Debug)]
pub struct ConnectionQuery {
    document: String,
    connection_path: Vec<String>,
    page_size: u32,
    variables: Map<String, Value>,
}

impl ConnectionQuery {
    /// Creates a query with a page size of 50.
    #[must_use]
    pub fn new(document: impl Into<String>, connection_path: &[&str]) -> Self {
        Self {
            document: document.into(),
            connection_path: connection_path.iter().map(ToString::to_string).collect(),
            page_size: 50,
            variables: Map::new(),
        }
    }

    /// Sets the page size, clamped to `1..=250`.
    #[must_use]
    pub fn page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.clamp(1, MAX_PAGE_SIZE);
        self
    }

    /// Adds an extra variable sent with every page.
    #[must_use]
    pub fn variable(mut self, name: impl Into<String>, value: Value) -> Self {
        self.variables.insert(name.into(), value);
        self
    }

    /// Returns the page size.
    #[must_use]
    pub const fn get_page_size(&self) -> u32 {
        self.page_size
    }

    fn variables_for(&self, cursor: Option<&str>) -> Value {
        let mut variables = self.variables.clone();
        variables.insert("first".to_string(), Value::from(self.page_size));
        variables.insert(
            "cursor".to_string(),
            cursor.map_or(Value::Null, Value::from),
        );
        Value::Object(variables)
    }

    fn dotted_path(&self) -> String {
        format!("data.{}", self.connection_path.join("."))
    }
}

/// Pages through a GraphQL connection, decoding nodes as `T`.
#[derive(Debug)]
pub struct GraphqlConnectionSource<'a, T> {
    client: &'a GraphqlClient,
    query: ConnectionQuery,
    _item: PhantomData<fn() -> T>,
}

impl<'a, T> GraphqlConnectionSource<'a, T> {
    /// Creates a source for `query` using `client`.
    #[must_use]
    pub const fn new(client: &'a GraphqlClient, query: ConnectionQuery) -> Self {
        Self {
            client,
            query,
            _item: PhantomData,
        }
    }
}

#[async_trait]
impl<T> PageSource for GraphqlConnectionSource<'_, T>
where
    T: DeserializeOwned + Send,
{
    type Item = T;

    async fn fetch_page(&self, cursor: Option<&str>) -> Result<Page<T>, PaginationError> {
        let response = self
            .client
            .query(
                &self.query.document,
                Some(self.query.variables_for(cursor)),
                None,
            )
            .await?;
        let rate = RateSignal::from_response(&response);

        let path: Vec<&str> = self
            .query
            .connection_path
            .iter()
            .map(String::as_str)
            .collect();
        let connection = data_at(&response.body, &path)?;
        decode_connection(connection, &self.query.dotted_path(), rate)
    }
}

/// Decodes a connection object into a page.
fn decode_connection<T: DeserializeOwned>(
    connection: &Value,
    dotted_path: &str,
    rate: RateSignal,
) -> Result<Page<T>, PaginationError> {
    let nodes = if let Some(nodes) = connection.get("nodes") {
        nodes.clone()
    } else if let Some(edges) = connection.get("edges").and_then(Value::as_array) {
        Value::Array(
            edges
                .iter()
                .filter_map(|edge| edge.get("node").cloned())
                .collect(),
        )
    } else {
        return Err(GraphqlError::MissingData {
            path: format!("{dotted_path}.nodes"),
        }
        .into());
    };

    let items: Vec<T> = serde_json::from_value(nodes).map_err(|e| PaginationError::Decode {
        collection: dotted_path.to_string(),
        message: e.to_string(),
    })?;

    let page_info = connection
        .get("pageInfo")
        .ok_or_else(|| GraphqlError::MissingData {
            path: format!("{dotted_path}.pageInfo"),
        })?;
    let has_next_page = page_info
        .get("hasNextPage")
        .and_then(Value::as_bool)
        .ok_or_else(|| GraphqlError::MissingData {
            path: format!("{dotted_path}.pageInfo.hasNextPage"),
        })?;

    Ok(Page {
        items,
        page_info: PageInfo {
            has_next_page,
            end_cursor: page_info
                .get("endCursor")
                .and_then(Value::as_str)
                .map(String::from),
        },
        rate,
    })
}
