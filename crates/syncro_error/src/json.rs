//! JSON encoding and decoding failures.

/// What part of JSON handling failed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum JsonErrorKind {
    /// A success body could not be decoded into the requested type
    #[display("Failed to decode response: {}", _0)]
    Decode(String),
    /// A request body could not be serialized
    #[display("Failed to encode request body: {}", _0)]
    Encode(String),
    /// The response did not contain the expected key
    #[display("Response is missing key '{}'", _0)]
    MissingKey(String),
}

/// JSON error with source location.
///
/// # Examples
///
/// ```
/// use syncro_error::{JsonError, JsonErrorKind};
///
/// let err = JsonError::new(JsonErrorKind::MissingKey("customer".into()));
/// assert!(err.to_string().contains("customer"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("JSON Error: {} at line {} in {}", kind, line, file)]
pub struct JsonError {
    /// The kind of JSON failure
    pub kind: JsonErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl JsonError {
    /// Create a new JsonError at the current location.
    #[track_caller]
    pub fn new(kind: JsonErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
