//! Rolling-window quota tracking for the Syncro MSP API.
//!
//! Syncro enforces a fixed number of requests per rolling window (180 per
//! minute by default). The [`QuotaTracker`] keeps the client under that quota:
//! it slows callers down once utilization crosses a threshold and blocks them
//! outright when the window is full. The [`backoff`] module holds the delay
//! policy used between retries.
//!
//! ```rust,no_run
//! use syncro_rate_limit::{QuotaConfig, QuotaTracker};
//!
//! # async fn run() {
//! let tracker = QuotaTracker::new(QuotaConfig::default());
//! tracker.acquire().await;
//! // send the request...
//! println!("{} requests left in this window", tracker.remaining_requests());
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod backoff;
mod config;
mod tracker;

pub use config::{QuotaConfig, QuotaConfigBuilder};
pub use tracker::QuotaTracker;
