//! Error types for the Syncro MSP API client.
//!
//! # Error Hierarchy
//!
//! Errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum names the specific condition
//! - `*Error` struct wraps the kind with source location tracking
//! - constructors use `#[track_caller]` to capture the location
//!
//! [`ApiError`] is the classified form of a failed response. It always
//! carries the original status code and raw body.
//!
//! # Examples
//!
//! ```
//! use syncro_error::{ApiErrorKind, HttpError, HttpErrorKind, SyncroResult};
//!
//! fn fetch() -> SyncroResult<String> {
//!     Err(HttpError::new(HttpErrorKind::Connect("refused".into())))?
//! }
//!
//! match fetch() {
//!     Ok(body) => println!("Got: {}", body),
//!     Err(e) if e.api_kind() == Some(&ApiErrorKind::NotFound) => println!("gone"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod api;
mod config;
mod error;
mod http;
mod json;

pub use api::{ApiError, ApiErrorKind, FieldError};
pub use config::{ConfigError, ConfigErrorKind};
pub use error::{SyncroError, SyncroErrorKind, SyncroResult};
pub use http::{HttpError, HttpErrorKind};
pub use json::{JsonError, JsonErrorKind};
