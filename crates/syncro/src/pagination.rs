//! Lazy traversal of paged list endpoints.
//!
//! List endpoints answer with the page's items under a collection key and a
//! `meta` object carrying `total_pages`. A traversal fetches one page at a
//! time, only when the consumer asks for more:
//!
//! ```text
//! Fetching(page) --items--> meta present, page < total --> Fetching(page + 1)
//!                          \--> otherwise ---------------> Done
//! ```
//!
//! The first page is always requested, whatever `total_pages` turns out to be.

use crate::http::HttpClient;
use async_stream::try_stream;
use futures::Stream;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;
use std::marker::PhantomData;
use syncro_core::{PaginationMeta, PaginationParams, QueryParams};
use syncro_error::{JsonError, JsonErrorKind, SyncroError, SyncroResult};
use tracing::{debug, instrument, warn};

/// A restartable, lazily fetched sequence over every item of a list
/// endpoint.
///
/// Each call to [`cursor`](Self::cursor), [`stream`](Self::stream) or
/// [`collect_all`](Self::collect_all) starts again from the first page.
///
/// # Examples
///
/// ```rust,no_run
/// use futures::{StreamExt, pin_mut};
/// use syncro::{ResourceKind, SyncroClient, SyncroConfig};
///
/// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
/// let client = SyncroClient::new(SyncroConfig::new("key").with_subdomain("acme"))?;
/// let customers = client.resource(ResourceKind::Customers).list_all(None, Default::default());
///
/// let stream = customers.stream();
/// pin_mut!(stream);
/// while let Some(customer) = stream.next().await {
///     println!("{}", customer?["business_name"]);
/// }
/// # Ok(())
/// # }
/// ```
pub struct Paginated<T> {
    client: HttpClient,
    path: String,
    items_key: String,
    params: PaginationParams,
    filters: QueryParams,
    _item: PhantomData<fn() -> T>,
}

impl<T> Clone for Paginated<T> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            path: self.path.clone(),
            items_key: self.items_key.clone(),
            params: self.params,
            filters: self.filters.clone(),
            _item: PhantomData,
        }
    }
}

impl<T> fmt::Debug for Paginated<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Paginated")
            .field("path", &self.path)
            .field("items_key", &self.items_key)
            .field("params", &self.params)
            .field("filters", &self.filters)
            .finish()
    }
}

impl<T: DeserializeOwned> Paginated<T> {
    /// A sequence over `path`, reading items from `items_key`.
    pub fn new(client: HttpClient, path: impl Into<String>, items_key: impl Into<String>) -> Self {
        Self {
            client,
            path: path.into(),
            items_key: items_key.into(),
            params: PaginationParams::default(),
            filters: QueryParams::new(),
            _item: PhantomData,
        }
    }

    /// Start page and page size.
    pub fn with_params(mut self, params: PaginationParams) -> Self {
        self.params = params;
        self
    }

    /// Extra query parameters sent with every page request.
    pub fn with_filters(mut self, filters: QueryParams) -> Self {
        self.filters = filters;
        self
    }

    /// A fresh cursor positioned before the start page.
    pub fn cursor(&self) -> PageCursor<T> {
        PageCursor {
            client: self.client.clone(),
            path: self.path.clone(),
            items_key: self.items_key.clone(),
            per_page: *self.params.per_page(),
            filters: self.filters.clone(),
            state: CursorState::Fetching(self.params.start_page()),
            _item: PhantomData,
        }
    }

    /// Every item, one at a time, fetching pages on demand.
    ///
    /// A failed page is yielded as a single error and ends the stream.
    pub fn stream(&self) -> impl Stream<Item = SyncroResult<T>> + Send + 'static
    where
        T: Send + 'static,
    {
        let mut cursor = self.cursor();
        try_stream! {
            while let Some(items) = cursor.next_page().await? {
                for item in items {
                    yield item;
                }
            }
        }
    }

    /// Drain every page into one vector.
    ///
    /// # Errors
    ///
    /// Returns the first page failure; items already fetched are dropped.
    pub async fn collect_all(&self) -> SyncroResult<Vec<T>> {
        let mut cursor = self.cursor();
        let mut all = Vec::new();
        while let Some(items) = cursor.next_page().await? {
            all.extend(items);
        }
        Ok(all)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CursorState {
    Fetching(u32),
    Done,
}

/// Explicit page-by-page traversal state.
pub struct PageCursor<T> {
    client: HttpClient,
    path: String,
    items_key: String,
    per_page: Option<u32>,
    filters: QueryParams,
    state: CursorState,
    _item: PhantomData<fn() -> T>,
}

impl<T> fmt::Debug for PageCursor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PageCursor")
            .field("path", &self.path)
            .field("state", &self.state)
            .finish()
    }
}

impl<T: DeserializeOwned> PageCursor<T> {
    /// The page the next call will fetch, or `None` once finished.
    pub fn next_page_number(&self) -> Option<u32> {
        match self.state {
            CursorState::Fetching(page) => Some(page),
            CursorState::Done => None,
        }
    }

    /// Whether the traversal has finished.
    pub fn is_done(&self) -> bool {
        self.state == CursorState::Done
    }

    /// Fetch the next page.
    ///
    /// Returns `Ok(None)` once the traversal is complete. After an error the
    /// cursor is finished.
    ///
    /// # Errors
    ///
    /// Returns the executor's error for the failed page, or a JSON error if
    /// an item does not decode into `T`.
    #[instrument(skip(self), fields(path = %self.path))]
    pub async fn next_page(&mut self) -> SyncroResult<Option<Vec<T>>> {
        let CursorState::Fetching(page) = self.state else {
            return Ok(None);
        };
        // Any early return below leaves the cursor finished.
        self.state = CursorState::Done;

        let mut query = QueryParams::new().with("page", page);
        query.push_opt("per_page", self.per_page);
        query.extend(&self.filters);
        let url = self.client.url(&self.path, &query)?;

        let response: Value = self.client.request_url(url.as_str()).await?;
        let items = extract_items(&response, &self.items_key)?;

        match page_meta(&response) {
            Some(meta) if page < *meta.total_pages() => {
                self.state = CursorState::Fetching(page + 1);
            }
            Some(_) => {}
            None => debug!(page, "No pagination metadata, stopping"),
        }

        debug!(page, count = items.len(), "Fetched page");
        Ok(Some(items))
    }
}

/// The `meta` object of a list response. Unreadable metadata is logged and
/// treated as absent.
pub(crate) fn page_meta(response: &Value) -> Option<PaginationMeta> {
    let meta = response.get("meta").filter(|meta| !meta.is_null())?;
    match serde_json::from_value(meta.clone()) {
        Ok(meta) => Some(meta),
        Err(e) => {
            warn!(error = %e, "Unreadable pagination metadata, ignoring");
            None
        }
    }
}

/// Decode the array under `key`. A missing or null key is an empty page.
pub(crate) fn extract_items<T: DeserializeOwned>(
    response: &Value,
    key: &str,
) -> SyncroResult<Vec<T>> {
    match response.get(key) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| {
                T::deserialize(item).map_err(|e| {
                    SyncroError::from(JsonError::new(JsonErrorKind::Decode(e.to_string())))
                })
            })
            .collect(),
        Some(other) => Err(JsonError::new(JsonErrorKind::Decode(format!(
            "expected an array under '{}', found {}",
            key,
            json_type(other)
        )))
        .into()),
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn items_under_key() {
        let items: Vec<u32> = extract_items(&json!({"ids": [1, 2, 3]}), "ids").unwrap();
        assert_eq!(items, vec![1, 2, 3]);
    }

    #[test]
    fn missing_or_null_key_is_empty() {
        let missing: Vec<Value> = extract_items(&json!({"meta": {}}), "customers").unwrap();
        let null: Vec<Value> = extract_items(&json!({"customers": null}), "customers").unwrap();
        assert!(missing.is_empty());
        assert!(null.is_empty());
    }

    #[test]
    fn non_array_is_an_error() {
        assert!(extract_items::<Value>(&json!({"customers": {"id": 1}}), "customers").is_err());
    }

    #[test]
    fn meta_parsing() {
        assert_eq!(page_meta(&json!({})), None);
        assert_eq!(page_meta(&json!({"meta": null})), None);
        assert_eq!(page_meta(&json!({"meta": "oops"})), None);
        assert_eq!(
            page_meta(&json!({"meta": {"total_pages": 4}})).map(|m| *m.total_pages()),
            Some(4)
        );
    }
}
