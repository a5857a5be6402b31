//! Client core for the Syncro MSP REST API.
//!
//! The client keeps requests inside Syncro's quota of 180 requests per
//! rolling minute, retries transient failures and turns failed responses into
//! typed errors:
//!
//! - [`QuotaTracker`] counts requests in the rolling window and throttles
//!   callers as the quota fills up.
//! - [`HttpClient`] executes calls: 429 responses are retried with
//!   exponential backoff, 5xx responses once after a fixed pause.
//! - [`classify`] maps failed responses onto [`ApiErrorKind`].
//! - [`Paginated`] walks list endpoints lazily, one page per demand.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use syncro::{ResourceKind, SyncroClient, SyncroConfig};
//! use syncro_core::QueryParams;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = SyncroClient::new(SyncroConfig::new("my-api-key").with_subdomain("acme"))?;
//!
//!     let open = client
//!         .resource(ResourceKind::Tickets)
//!         .list_all(Some(100), QueryParams::new().with("status", "Open"))
//!         .collect_all()
//!         .await?;
//!     println!("{} open tickets", open.len());
//!     Ok(())
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod classify;
mod client;
mod config;
mod http;
mod pagination;
mod resource;
pub mod telemetry;

pub use classify::{BASE_FIELD, classify, parse_error_body, parse_validation_errors};
pub use client::SyncroClient;
pub use config::{ResolvedConfig, SyncroConfig};
pub use http::{HttpClient, RequestOptions};
pub use pagination::{PageCursor, Paginated};
pub use resource::{ListPage, Resource, ResourceKind};

pub use syncro_core::{PaginationMeta, PaginationParams, QueryParams};
pub use syncro_error::{
    ApiError, ApiErrorKind, ConfigError, ConfigErrorKind, FieldError, HttpError, HttpErrorKind,
    JsonError, JsonErrorKind, SyncroError, SyncroErrorKind, SyncroResult,
};
pub use syncro_rate_limit::{QuotaConfig, QuotaTracker, backoff};
