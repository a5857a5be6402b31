//! Classified API failures.
//!
//! Every non-success HTTP response from the Syncro API is mapped into an
//! [`ApiError`]. The [`ApiErrorKind`] tells callers what went wrong, while the
//! error itself keeps the original status code and raw response body for
//! diagnostics.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single field-level validation message returned with a 422 response.
///
/// # Examples
///
/// ```
/// use syncro_error::FieldError;
///
/// let err = FieldError::new("email", "is invalid");
/// assert_eq!(err.to_string(), "email: is invalid");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
#[display("{}: {}", field, message)]
pub struct FieldError {
    /// Name of the offending field (`base` for record-level messages)
    pub field: String,
    /// Human-readable message from the server
    pub message: String,
}

impl FieldError {
    /// Create a field error.
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// The taxonomy of failed API calls.
#[derive(Debug, Clone, PartialEq, Eq, strum::IntoStaticStr)]
pub enum ApiErrorKind {
    /// 401 or 403: the API key was rejected
    Authentication,
    /// 404: the resource does not exist
    NotFound,
    /// 422: the server rejected the payload
    Validation(Vec<FieldError>),
    /// 429 after the retry budget was spent
    RateLimit {
        /// Suggested wait before trying again, in milliseconds
        retry_after_ms: u64,
    },
    /// 5xx after the single server-error retry
    Server,
    /// Any other non-2xx status
    Generic,
}

impl ApiErrorKind {
    /// Whether the request executor retries this kind internally.
    ///
    /// Only rate limiting and server errors are transient. Note that by the
    /// time a caller sees a `RateLimit` or `Server` error the executor has
    /// already exhausted its retries.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ApiErrorKind::RateLimit { .. } | ApiErrorKind::Server)
    }

    /// Short name of the kind, suitable for structured log fields.
    pub fn name(&self) -> &'static str {
        self.into()
    }
}

impl fmt::Display for ApiErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiErrorKind::Authentication => {
                write!(f, "Authentication failed - check your API key")
            }
            ApiErrorKind::NotFound => write!(f, "Resource not found"),
            ApiErrorKind::Validation(errors) if errors.is_empty() => {
                write!(f, "Validation failed")
            }
            ApiErrorKind::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, error) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, "; ")?;
                    }
                    write!(f, "{}", error)?;
                }
                Ok(())
            }
            ApiErrorKind::RateLimit { retry_after_ms } => write!(
                f,
                "Rate limit exceeded and max retries reached (retry after {}ms)",
                retry_after_ms
            ),
            ApiErrorKind::Server => write!(f, "Server error"),
            ApiErrorKind::Generic => write!(f, "Request failed"),
        }
    }
}

/// A classified API failure with status code, raw body and source location.
///
/// # Examples
///
/// ```
/// use syncro_error::{ApiError, ApiErrorKind};
/// use serde_json::json;
///
/// let err = ApiError::new(ApiErrorKind::NotFound, 404, json!({"error": "missing"}));
/// assert_eq!(err.status, 404);
/// assert!(!err.is_retryable());
/// assert!(err.to_string().contains("HTTP 404"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("API Error: {} (HTTP {}) at line {} in {}", kind, status, line, file)]
pub struct ApiError {
    /// What went wrong
    pub kind: ApiErrorKind,
    /// Original HTTP status code
    pub status: u16,
    /// Raw response body (a JSON string when the body was not JSON)
    pub body: serde_json::Value,
    /// Line number where the error was classified
    pub line: u32,
    /// File where the error was classified
    pub file: &'static str,
}

impl ApiError {
    /// Create a new API error at the caller's location.
    #[track_caller]
    pub fn new(kind: ApiErrorKind, status: u16, body: serde_json::Value) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            status,
            body,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &ApiErrorKind {
        &self.kind
    }

    /// Field-level messages for a validation failure, empty otherwise.
    pub fn field_errors(&self) -> &[FieldError] {
        match &self.kind {
            ApiErrorKind::Validation(errors) => errors,
            _ => &[],
        }
    }

    /// Suggested retry delay for an exhausted rate limit.
    pub fn retry_after_ms(&self) -> Option<u64> {
        match self.kind {
            ApiErrorKind::RateLimit { retry_after_ms } => Some(retry_after_ms),
            _ => None,
        }
    }

    /// See [`ApiErrorKind::is_retryable`].
    pub fn is_retryable(&self) -> bool {
        self.kind.is_retryable()
    }
}
