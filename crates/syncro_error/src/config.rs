//! Client configuration errors.

/// Configuration problems detected while loading or resolving settings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum ConfigErrorKind {
    /// No API key was supplied
    #[display("apiKey is required")]
    MissingApiKey,
    /// Neither a subdomain nor an explicit base URL was supplied
    #[display("Either subdomain or base_url must be provided")]
    MissingBaseUrl,
    /// A quota setting is out of range
    #[display("Invalid rate limit setting '{}': {}", field, reason)]
    InvalidQuota {
        /// The offending setting
        field: String,
        /// Why it was rejected
        reason: String,
    },
    /// A configuration source could not be read or parsed
    #[display("Failed to load configuration: {}", _0)]
    Load(String),
    /// A builder was missing data
    #[display("Failed to build configuration: {}", _0)]
    Builder(String),
}

/// Configuration error with source location.
///
/// # Examples
///
/// ```
/// use syncro_error::{ConfigError, ConfigErrorKind};
///
/// let err = ConfigError::new(ConfigErrorKind::MissingApiKey);
/// assert!(err.to_string().contains("apiKey is required"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Configuration Error: {} at line {} in {}", kind, line, file)]
pub struct ConfigError {
    /// The kind of configuration failure
    pub kind: ConfigErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl ConfigError {
    /// Create a new ConfigError at the current location.
    #[track_caller]
    pub fn new(kind: ConfigErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Shorthand for an out-of-range quota setting.
    #[track_caller]
    pub fn invalid_quota(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::new(ConfigErrorKind::InvalidQuota {
            field: field.into(),
            reason: reason.into(),
        })
    }
}
