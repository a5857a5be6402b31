//! Top-level error wrapper types.

use crate::{ApiError, ApiErrorKind, ConfigError, HttpError, JsonError};

/// Every failure the client can surface.
///
/// # Examples
///
/// ```
/// use syncro_error::{SyncroError, ConfigError, ConfigErrorKind};
///
/// let err: SyncroError = ConfigError::new(ConfigErrorKind::MissingApiKey).into();
/// assert!(format!("{}", err).contains("Configuration Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum SyncroErrorKind {
    /// The API answered with a failure status
    #[from(ApiError)]
    Api(ApiError),
    /// The request did not complete at the transport level
    #[from(HttpError)]
    Http(HttpError),
    /// A body could not be encoded or decoded
    #[from(JsonError)]
    Json(JsonError),
    /// Configuration was missing or invalid
    #[from(ConfigError)]
    Config(ConfigError),
}

/// Syncro client error with kind discrimination.
///
/// # Examples
///
/// ```
/// use syncro_error::{ApiError, ApiErrorKind, SyncroResult};
/// use serde_json::Value;
///
/// fn lookup() -> SyncroResult<()> {
///     Err(ApiError::new(ApiErrorKind::NotFound, 404, Value::Null))?
/// }
///
/// let err = lookup().unwrap_err();
/// assert_eq!(err.api().map(|e| e.status), Some(404));
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Syncro Error: {}", _0)]
pub struct SyncroError(Box<SyncroErrorKind>);

impl SyncroError {
    /// Create a new error from a kind.
    pub fn new(kind: SyncroErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &SyncroErrorKind {
        &self.0
    }

    /// The classified API failure, if this error came from a response.
    pub fn api(&self) -> Option<&ApiError> {
        match self.kind() {
            SyncroErrorKind::Api(err) => Some(err),
            _ => None,
        }
    }

    /// The API error kind, if any.
    pub fn api_kind(&self) -> Option<&ApiErrorKind> {
        self.api().map(ApiError::kind)
    }

    /// HTTP status code of the failed response, if any.
    pub fn status(&self) -> Option<u16> {
        self.api().map(|e| e.status)
    }
}

impl<T> From<T> for SyncroError
where
    T: Into<SyncroErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Syncro client operations.
pub type SyncroResult<T> = std::result::Result<T, SyncroError>;
