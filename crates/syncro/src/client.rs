//! Top-level Syncro client.

use crate::config::{ResolvedConfig, SyncroConfig};
use crate::http::{HttpClient, RequestOptions};
use crate::resource::{Resource, ResourceKind, unwrap_key};
use serde::de::DeserializeOwned;
use serde_json::Value;
use syncro_error::SyncroResult;
use tracing::{debug, instrument};

/// Entry point to the Syncro MSP API.
///
/// Each client owns one quota tracker; clones share it, separate clients do
/// not.
///
/// # Examples
///
/// ```rust,no_run
/// use syncro::{ResourceKind, SyncroClient, SyncroConfig};
///
/// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
/// let client = SyncroClient::new(SyncroConfig::new("key").with_subdomain("acme"))?;
///
/// let ticket = client.resource(ResourceKind::Tickets).get(42).await?;
/// println!("{}", ticket["subject"]);
/// println!("{} requests left this minute", client.remaining_requests());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct SyncroClient {
    http: HttpClient,
}

impl SyncroClient {
    /// Resolve `config` and create a client.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the settings do not resolve.
    pub fn new(config: SyncroConfig) -> SyncroResult<Self> {
        Self::from_resolved(config.resolve()?)
    }

    /// Create a client from layered configuration (see [`SyncroConfig::load`]).
    ///
    /// # Errors
    ///
    /// Returns a configuration error if loading or resolving fails.
    #[instrument]
    pub fn from_env() -> SyncroResult<Self> {
        Self::new(SyncroConfig::load()?)
    }

    /// Create a client from already validated settings.
    ///
    /// # Errors
    ///
    /// Returns an HTTP error if the underlying client cannot be built.
    pub fn from_resolved(config: ResolvedConfig) -> SyncroResult<Self> {
        debug!(base_url = %config.base_url(), "Creating Syncro client");
        Ok(Self {
            http: HttpClient::new(config)?,
        })
    }

    /// Settings the client runs with.
    pub fn config(&self) -> &ResolvedConfig {
        self.http.config()
    }

    /// The underlying request executor.
    pub fn http(&self) -> &HttpClient {
        &self.http
    }

    /// Requests still available in the current quota window.
    pub fn remaining_requests(&self) -> u32 {
        self.http.quota().remaining_requests()
    }

    /// Quota utilization in `[0, 1]`.
    pub fn current_rate(&self) -> f64 {
        self.http.quota().current_rate()
    }

    /// The user owning the API key (`GET /me`).
    pub async fn me<T: DeserializeOwned>(&self) -> SyncroResult<T> {
        let response: Value = self.http.request("/me", RequestOptions::get()).await?;
        unwrap_key(response, "user")
    }

    /// Account settings (`GET /settings`).
    pub async fn settings<T: DeserializeOwned>(&self) -> SyncroResult<T> {
        let response: Value = self
            .http
            .request("/settings", RequestOptions::get())
            .await?;
        unwrap_key(response, "settings")
    }

    /// Untyped access to a resource collection.
    pub fn resource(&self, kind: ResourceKind) -> Resource<'_> {
        Resource::new(&self.http, kind)
    }

    /// Access to a resource collection decoding records as `T`.
    pub fn resource_as<T: DeserializeOwned>(&self, kind: ResourceKind) -> Resource<'_, T> {
        Resource::new(&self.http, kind)
    }
}
