//! Core data types for the Syncro MSP API client.
//!
//! These are the wire-level shapes shared by the quota tracker, the request
//! executor and the pagination sequence.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod pagination;
mod query;

pub use pagination::{PaginationMeta, PaginationParams};
pub use query::QueryParams;

/// Path prefix of every API resource under the configured base URL.
pub const API_PREFIX: &str = "/api/v1";

/// Name of the query parameter that carries the API key.
pub const API_KEY_PARAM: &str = "api_key";
