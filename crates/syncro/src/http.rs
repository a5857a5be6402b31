//! Request executor.
//!
//! Every call passes through [`HttpClient::execute`], which:
//! - waits for a quota slot and records the request,
//! - retries 429 responses with exponential backoff up to the configured
//!   budget,
//! - retries a 5xx response exactly once after a fixed pause,
//! - classifies any other failure without retrying.
//!
//! The API key travels as the `api_key` query parameter, so URLs are never
//! logged in full.

use crate::classify::{classify, parse_error_body};
use crate::config::ResolvedConfig;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Method, Response, Url};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::sync::Arc;
use syncro_core::{API_KEY_PARAM, API_PREFIX, QueryParams};
use syncro_error::{
    ApiErrorKind, HttpError, HttpErrorKind, JsonError, JsonErrorKind, SyncroResult,
};
use syncro_rate_limit::QuotaTracker;
use syncro_rate_limit::backoff::SERVER_ERROR_RETRY_DELAY;
use tracing::{debug, error, instrument, warn};

const JSON_MEDIA_TYPE: &str = "application/json";

/// Method, body and query parameters of a single API call.
///
/// # Examples
///
/// ```
/// use reqwest::Method;
/// use syncro::RequestOptions;
/// use syncro_core::QueryParams;
///
/// let options = RequestOptions::get().with_params(QueryParams::new().with("query", "acme"));
/// assert_eq!(options.method(), &Method::GET);
/// assert_eq!(options.params().get("query"), Some("acme"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, derive_getters::Getters, derive_setters::Setters)]
#[setters(prefix = "with_")]
pub struct RequestOptions {
    /// HTTP method
    method: Method,
    /// JSON body, sent only when present
    #[setters(strip_option)]
    body: Option<Value>,
    /// Extra query parameters appended after the API key
    params: QueryParams,
}

impl RequestOptions {
    /// Options for the given method with no body or parameters.
    pub fn new(method: Method) -> Self {
        Self {
            method,
            ..Self::default()
        }
    }

    /// A `GET` request.
    pub fn get() -> Self {
        Self::new(Method::GET)
    }

    /// A `POST` request carrying `body`.
    pub fn post(body: Value) -> Self {
        Self::new(Method::POST).with_body(body)
    }

    /// A `PUT` request carrying `body`.
    pub fn put(body: Value) -> Self {
        Self::new(Method::PUT).with_body(body)
    }

    /// A `DELETE` request.
    pub fn delete() -> Self {
        Self::new(Method::DELETE)
    }
}

/// Executes API calls under one quota tracker.
///
/// Cloning is cheap; clones share the tracker and the connection pool.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    config: Arc<ResolvedConfig>,
    quota: Arc<QuotaTracker>,
}

impl HttpClient {
    /// Create an executor with its own quota tracker.
    ///
    /// # Errors
    ///
    /// Returns an HTTP error if the underlying client cannot be built.
    pub fn new(config: ResolvedConfig) -> SyncroResult<Self> {
        let quota = Arc::new(QuotaTracker::new(config.rate_limit().clone()));
        Self::with_quota(Arc::new(config), quota)
    }

    /// Create an executor that admits requests through an existing tracker.
    ///
    /// # Errors
    ///
    /// Returns an HTTP error if the underlying client cannot be built.
    pub fn with_quota(config: Arc<ResolvedConfig>, quota: Arc<QuotaTracker>) -> SyncroResult<Self> {
        let client = Client::builder()
            .user_agent(concat!("syncro/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| HttpError::new(HttpErrorKind::Request(e.to_string())))?;
        debug!(base_url = %config.base_url(), "Creating Syncro HTTP client");
        Ok(Self {
            client,
            config,
            quota,
        })
    }

    /// Settings this executor runs with.
    pub fn config(&self) -> &ResolvedConfig {
        &self.config
    }

    /// The tracker every request is admitted through.
    pub fn quota(&self) -> &QuotaTracker {
        &self.quota
    }

    /// Build `{base_url}/api/v1{path}?api_key=...&{params}`.
    ///
    /// # Errors
    ///
    /// Returns [`HttpErrorKind::InvalidUrl`] if the result is not a valid URL.
    pub fn url(&self, path: &str, params: &QueryParams) -> SyncroResult<Url> {
        let raw = format!("{}{}{}", self.config.base_url(), API_PREFIX, path);
        let mut url = Url::parse(&raw)
            .map_err(|e| HttpError::new(HttpErrorKind::InvalidUrl(format!("{}: {}", raw, e))))?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair(API_KEY_PARAM, self.config.api_key());
            for (key, value) in params.iter() {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }

    /// Call `path` under the API prefix and decode the response into `T`.
    ///
    /// # Errors
    ///
    /// Returns the classified [`ApiError`](syncro_error::ApiError) for a
    /// failed response once retries are exhausted, an HTTP error for
    /// transport failures, or a JSON error if the body does not decode.
    pub async fn request<T: DeserializeOwned>(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> SyncroResult<T> {
        let url = self.url(path, &options.params)?;
        self.execute(options.method, url, options.body.as_ref()).await
    }

    /// `GET` a full URL, adding the API key unless it is already present.
    ///
    /// # Errors
    ///
    /// Same as [`request`](Self::request), plus
    /// [`HttpErrorKind::InvalidUrl`] for an unparseable URL.
    pub async fn request_url<T: DeserializeOwned>(&self, url: &str) -> SyncroResult<T> {
        let mut url = Url::parse(url)
            .map_err(|e| HttpError::new(HttpErrorKind::InvalidUrl(e.to_string())))?;
        if !url.query_pairs().any(|(key, _)| key == API_KEY_PARAM) {
            url.query_pairs_mut()
                .append_pair(API_KEY_PARAM, self.config.api_key());
        }
        self.execute(Method::GET, url, None).await
    }

    /// Run one call through admission, retries and classification.
    #[instrument(skip(self, method, url, body), fields(method = %method, path = %url.path()))]
    async fn execute<T: DeserializeOwned>(
        &self,
        method: Method,
        url: Url,
        body: Option<&Value>,
    ) -> SyncroResult<T> {
        let mut attempt: u32 = 0;
        loop {
            self.quota.acquire().await;
            let response = self.send(&method, &url, body).await?;
            let status = response.status();

            if status.is_success() {
                debug!(status = status.as_u16(), attempt, "Request succeeded");
                return decode_success(response).await;
            }

            let error_body = read_body(response).await?;
            let failure = classify(
                status.as_u16(),
                parse_error_body(&error_body),
                *self.config.rate_limit().base_retry_delay_ms(),
            );

            match failure.kind {
                ApiErrorKind::RateLimit { .. } if self.quota.should_retry(attempt) => {
                    let delay = self.quota.retry_delay(attempt);
                    warn!(
                        attempt = attempt + 1,
                        max_retries = *self.config.rate_limit().max_retries(),
                        delay_ms = delay.as_millis() as u64,
                        "Rate limited, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
                ApiErrorKind::Server if attempt == 0 => {
                    warn!(
                        status = status.as_u16(),
                        delay_ms = SERVER_ERROR_RETRY_DELAY.as_millis() as u64,
                        "Server error, retrying once"
                    );
                    tokio::time::sleep(SERVER_ERROR_RETRY_DELAY).await;
                }
                _ => {
                    error!(
                        status = failure.status,
                        kind = failure.kind.name(),
                        attempt,
                        "Request failed"
                    );
                    return Err(failure.into());
                }
            }
            attempt += 1;
        }
    }

    async fn send(&self, method: &Method, url: &Url, body: Option<&Value>) -> SyncroResult<Response> {
        let mut request = self
            .client
            .request(method.clone(), url.clone())
            .header(CONTENT_TYPE, JSON_MEDIA_TYPE)
            .header(ACCEPT, JSON_MEDIA_TYPE);
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request.send().await.map_err(transport_error)?;
        Ok(response)
    }
}

/// Decode a success body. Non-JSON bodies yield the empty success value.
async fn decode_success<T: DeserializeOwned>(response: Response) -> SyncroResult<T> {
    let is_json = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.contains(JSON_MEDIA_TYPE));
    if !is_json {
        return empty_success();
    }

    let bytes = read_body(response).await?;
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return empty_success();
    }
    let value = serde_json::from_slice(&bytes)
        .map_err(|e| JsonError::new(JsonErrorKind::Decode(e.to_string())))?;
    Ok(value)
}

/// `{}` decoded into `T`, falling back to `null` for unit-like types.
pub(crate) fn empty_success<T: DeserializeOwned>() -> SyncroResult<T> {
    let value = serde_json::from_value(Value::Object(Map::new()))
        .or_else(|_| serde_json::from_value(Value::Null))
        .map_err(|e| JsonError::new(JsonErrorKind::Decode(e.to_string())))?;
    Ok(value)
}

async fn read_body(response: Response) -> SyncroResult<Vec<u8>> {
    let bytes = response
        .bytes()
        .await
        .map_err(|e| HttpError::new(HttpErrorKind::Body(e.without_url().to_string())))?;
    Ok(bytes.to_vec())
}

/// Map a transport failure, dropping the URL so the API key is not echoed.
fn transport_error(err: reqwest::Error) -> HttpError {
    let timeout = err.is_timeout();
    let connect = err.is_connect();
    let message = err.without_url().to_string();
    let kind = if timeout {
        HttpErrorKind::Timeout(message)
    } else if connect {
        HttpErrorKind::Connect(message)
    } else {
        HttpErrorKind::Request(message)
    };
    HttpError::new(kind)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Optional {
        id: Option<u64>,
    }

    #[test]
    fn empty_success_decodes_maps_and_units() {
        let value: Value = empty_success().unwrap();
        assert_eq!(value, Value::Object(Map::new()));

        let optional: Optional = empty_success().unwrap();
        assert_eq!(optional, Optional { id: None });

        empty_success::<()>().unwrap();
    }

    #[test]
    fn empty_success_rejects_required_fields() {
        #[derive(Debug, Deserialize)]
        #[allow(dead_code)]
        struct Required {
            id: u64,
        }
        assert!(empty_success::<Required>().is_err());
    }
}
