//! Generic CRUD access to Syncro resource collections.
//!
//! Every collection follows the same conventions: `GET /{path}` returns the
//! items under a plural key plus `meta`, while single-record endpoints wrap
//! the record under a singular key (`{"customer": {...}}`).

use crate::http::{HttpClient, RequestOptions};
use crate::pagination::{Paginated, extract_items, page_meta};
use reqwest::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::marker::PhantomData;
use syncro_core::{PaginationMeta, PaginationParams, QueryParams};
use syncro_error::{JsonError, JsonErrorKind, SyncroResult};
use tracing::instrument;

/// Resource collections exposed by the API.
///
/// The string form is the snake_case name used on the command line.
///
/// # Examples
///
/// ```
/// use std::str::FromStr;
/// use syncro::ResourceKind;
///
/// let kind = ResourceKind::from_str("customer_assets").unwrap();
/// assert_eq!(kind.path(), "/customer_assets");
/// assert_eq!(kind.collection_key(), "assets");
/// assert_eq!(kind.item_key(), "asset");
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::IntoStaticStr,
)]
#[strum(serialize_all = "snake_case")]
pub enum ResourceKind {
    /// Customers
    Customers,
    /// Customer contacts
    Contacts,
    /// Support tickets
    Tickets,
    /// Customer assets
    CustomerAssets,
    /// Invoices
    Invoices,
    /// Estimates
    Estimates,
    /// Invoice and estimate line items
    LineItems,
    /// Service contracts
    Contracts,
    /// Calendar appointments
    Appointments,
    /// Products
    Products,
    /// Payments
    Payments,
    /// Ticket timer entries
    TicketTimers,
    /// RMM alerts
    RmmAlerts,
    /// Leads
    Leads,
    /// Canned responses
    CannedResponses,
    /// Ticket problem types
    TicketProblemTypes,
    /// Wiki pages
    WikiPages,
}

impl ResourceKind {
    /// Endpoint path under the API prefix.
    pub fn path(&self) -> &'static str {
        match self {
            ResourceKind::Customers => "/customers",
            ResourceKind::Contacts => "/contacts",
            ResourceKind::Tickets => "/tickets",
            ResourceKind::CustomerAssets => "/customer_assets",
            ResourceKind::Invoices => "/invoices",
            ResourceKind::Estimates => "/estimates",
            ResourceKind::LineItems => "/line_items",
            ResourceKind::Contracts => "/contracts",
            ResourceKind::Appointments => "/appointments",
            ResourceKind::Products => "/products",
            ResourceKind::Payments => "/payments",
            ResourceKind::TicketTimers => "/ticket_timers",
            ResourceKind::RmmAlerts => "/rmm_alerts",
            ResourceKind::Leads => "/leads",
            ResourceKind::CannedResponses => "/canned_responses",
            ResourceKind::TicketProblemTypes => "/ticket_problem_types",
            ResourceKind::WikiPages => "/wiki_pages",
        }
    }

    /// Key holding the items of a list response.
    pub fn collection_key(&self) -> &'static str {
        match self {
            ResourceKind::CustomerAssets => "assets",
            other => &other.path()[1..],
        }
    }

    /// Key wrapping a single record.
    pub fn item_key(&self) -> &'static str {
        match self {
            ResourceKind::Customers => "customer",
            ResourceKind::Contacts => "contact",
            ResourceKind::Tickets => "ticket",
            ResourceKind::CustomerAssets => "asset",
            ResourceKind::Invoices => "invoice",
            ResourceKind::Estimates => "estimate",
            ResourceKind::LineItems => "line_item",
            ResourceKind::Contracts => "contract",
            ResourceKind::Appointments => "appointment",
            ResourceKind::Products => "product",
            ResourceKind::Payments => "payment",
            ResourceKind::TicketTimers => "ticket_timer",
            ResourceKind::RmmAlerts => "rmm_alert",
            ResourceKind::Leads => "lead",
            ResourceKind::CannedResponses => "canned_response",
            ResourceKind::TicketProblemTypes => "ticket_problem_type",
            ResourceKind::WikiPages => "wiki_page",
        }
    }
}

/// One page of a list response.
#[derive(Debug, Clone, PartialEq, derive_getters::Getters)]
pub struct ListPage<T> {
    /// Records on this page
    items: Vec<T>,
    /// Pagination metadata, when the server sent it
    meta: Option<PaginationMeta>,
}

impl<T> ListPage<T> {
    /// Take the records, dropping the metadata.
    pub fn into_items(self) -> Vec<T> {
        self.items
    }
}

/// Operations on one resource collection, decoding records as `T`.
#[derive(Debug, Clone)]
pub struct Resource<'a, T = Value> {
    http: &'a HttpClient,
    kind: ResourceKind,
    _item: PhantomData<fn() -> T>,
}

impl<'a, T: DeserializeOwned> Resource<'a, T> {
    pub(crate) fn new(http: &'a HttpClient, kind: ResourceKind) -> Self {
        Self {
            http,
            kind,
            _item: PhantomData,
        }
    }

    /// The collection this handle operates on.
    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    /// Fetch a single page.
    #[instrument(skip(self, filters), fields(resource = %self.kind))]
    pub async fn list(
        &self,
        params: PaginationParams,
        filters: QueryParams,
    ) -> SyncroResult<ListPage<T>> {
        let mut query = params.to_query();
        query.extend(&filters);
        let response: Value = self
            .http
            .request(self.kind.path(), RequestOptions::get().with_params(query))
            .await?;

        let items = extract_items(&response, self.kind.collection_key())?;
        let meta = page_meta(&response);
        Ok(ListPage { items, meta })
    }

    /// Lazily traverse every page.
    pub fn list_all(&self, per_page: Option<u32>, filters: QueryParams) -> Paginated<T> {
        let mut params = PaginationParams::default();
        if let Some(per_page) = per_page {
            params = params.with_per_page(per_page);
        }
        Paginated::new(
            self.http.clone(),
            self.kind.path(),
            self.kind.collection_key(),
        )
        .with_params(params)
        .with_filters(filters)
    }

    /// Fetch one record by id.
    #[instrument(skip(self), fields(resource = %self.kind))]
    pub async fn get(&self, id: u64) -> SyncroResult<T> {
        let path = format!("{}/{}", self.kind.path(), id);
        let response: Value = self.http.request(&path, RequestOptions::get()).await?;
        unwrap_key(response, self.kind.item_key())
    }

    /// Create a record. `body` is sent as-is.
    #[instrument(skip(self, body), fields(resource = %self.kind))]
    pub async fn create<B: Serialize + ?Sized>(&self, body: &B) -> SyncroResult<T> {
        let response: Value = self
            .http
            .request(self.kind.path(), RequestOptions::post(encode(body)?))
            .await?;
        unwrap_key(response, self.kind.item_key())
    }

    /// Update a record. `body` is sent as-is.
    #[instrument(skip(self, body), fields(resource = %self.kind))]
    pub async fn update<B: Serialize + ?Sized>(&self, id: u64, body: &B) -> SyncroResult<T> {
        let path = format!("{}/{}", self.kind.path(), id);
        let response: Value = self
            .http
            .request(&path, RequestOptions::put(encode(body)?))
            .await?;
        unwrap_key(response, self.kind.item_key())
    }

    /// Delete a record.
    #[instrument(skip(self), fields(resource = %self.kind))]
    pub async fn delete(&self, id: u64) -> SyncroResult<()> {
        let path = format!("{}/{}", self.kind.path(), id);
        let _: Value = self.http.request(&path, RequestOptions::delete()).await?;
        Ok(())
    }

    /// Call a record-level action such as `/invoices/{id}/mark_sent` and
    /// return the raw response.
    #[instrument(skip(self, body), fields(resource = %self.kind))]
    pub async fn action(
        &self,
        id: u64,
        action: &str,
        method: Method,
        body: Option<Value>,
    ) -> SyncroResult<Value> {
        let path = format!("{}/{}/{}", self.kind.path(), id, action);
        let mut options = RequestOptions::new(method);
        if let Some(body) = body {
            options = options.with_body(body);
        }
        self.http.request(&path, options).await
    }
}

fn encode<B: Serialize + ?Sized>(body: &B) -> SyncroResult<Value> {
    let value = serde_json::to_value(body)
        .map_err(|e| JsonError::new(JsonErrorKind::Encode(e.to_string())))?;
    Ok(value)
}

/// Decode the record wrapped under `key`.
pub(crate) fn unwrap_key<T: DeserializeOwned>(mut response: Value, key: &str) -> SyncroResult<T> {
    let inner = response
        .get_mut(key)
        .map(Value::take)
        .ok_or_else(|| JsonError::new(JsonErrorKind::MissingKey(key.to_string())))?;
    let value = serde_json::from_value(inner)
        .map_err(|e| JsonError::new(JsonErrorKind::Decode(e.to_string())))?;
    Ok(value)
}
