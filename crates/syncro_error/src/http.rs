//! Transport-level failures.

/// Reasons a request never produced an HTTP response we could classify.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum HttpErrorKind {
    /// The URL could not be built or parsed
    #[display("Invalid URL: {}", _0)]
    InvalidUrl(String),
    /// Connection could not be established
    #[display("Connection failed: {}", _0)]
    Connect(String),
    /// The request timed out in the transport
    #[display("Request timed out: {}", _0)]
    Timeout(String),
    /// Sending the request failed for another reason
    #[display("Request failed: {}", _0)]
    Request(String),
    /// Reading the response body failed
    #[display("Failed to read response body: {}", _0)]
    Body(String),
}

/// HTTP transport error with source location.
///
/// # Examples
///
/// ```
/// use syncro_error::{HttpError, HttpErrorKind};
///
/// let err = HttpError::new(HttpErrorKind::Connect("connection refused".into()));
/// assert!(err.to_string().contains("connection refused"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("HTTP Error: {} at line {} in {}", kind, line, file)]
pub struct HttpError {
    /// The kind of transport failure
    pub kind: HttpErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl HttpError {
    /// Create a new HttpError at the current location.
    #[track_caller]
    pub fn new(kind: HttpErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
