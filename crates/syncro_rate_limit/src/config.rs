//! Quota configuration.
//!
//! The defaults match Syncro's documented limit of 180 requests per 60-second
//! rolling window. All fields are optional when deserializing, so a partial
//! `[rate_limit]` table only overrides what it names:
//!
//! ```toml
//! [rate_limit]
//! max_requests = 100
//! throttle_threshold = 0.9
//! ```

use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use syncro_error::{ConfigError, ConfigErrorKind, SyncroResult};
use tracing::debug;

/// Settings consumed by the quota tracker and the retry policy.
///
/// # Examples
///
/// ```
/// use syncro_rate_limit::QuotaConfig;
///
/// let config = QuotaConfig::builder()
///     .max_requests(2u32)
///     .window_ms(1000u64)
///     .throttle_threshold(1.0)
///     .build()
///     .unwrap();
///
/// assert_eq!(*config.max_requests(), 2);
/// assert_eq!(*config.max_retries(), 3); // default
/// ```
#[derive(
    Debug,
    Clone,
    PartialEq,
    Serialize,
    Deserialize,
    Getters,
    derive_setters::Setters,
    derive_builder::Builder,
)]
#[setters(prefix = "with_")]
#[builder(default, setter(into), build_fn(private, name = "build_internal"))]
#[serde(default)]
pub struct QuotaConfig {
    /// Whether quota enforcement is active
    enabled: bool,

    /// Requests allowed per window
    max_requests: u32,

    /// Rolling window length in milliseconds
    window_ms: u64,

    /// Utilization fraction in (0, 1] where voluntary throttling begins
    throttle_threshold: f64,

    /// Base delay for exponential backoff on 429 responses, in milliseconds.
    /// Also reported as the retry-after hint once retries are exhausted.
    #[serde(alias = "retry_after_ms")]
    base_retry_delay_ms: u64,

    /// Retries allowed for 429 responses
    max_retries: u32,
}

impl Default for QuotaConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_requests: 180,
            window_ms: 60_000,
            throttle_threshold: 0.8,
            base_retry_delay_ms: 5_000,
            max_retries: 3,
        }
    }
}

impl QuotaConfig {
    /// Creates a new builder seeded with the defaults.
    pub fn builder() -> QuotaConfigBuilder {
        QuotaConfigBuilder::default()
    }

    /// A configuration with enforcement switched off.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    /// Rolling window length.
    pub fn window(&self) -> Duration {
        Duration::from_millis(self.window_ms)
    }

    /// Base backoff delay for rate-limited requests.
    pub fn base_retry_delay(&self) -> Duration {
        Duration::from_millis(self.base_retry_delay_ms)
    }

    /// Checks that every setting is in range.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `max_requests` or `window_ms` is zero,
    /// or if `throttle_threshold` is outside `(0, 1]`.
    pub fn validate(&self) -> SyncroResult<()> {
        if self.max_requests == 0 {
            return Err(ConfigError::invalid_quota("max_requests", "must be greater than 0").into());
        }
        if self.window_ms == 0 {
            return Err(ConfigError::invalid_quota("window_ms", "must be greater than 0").into());
        }
        if !(self.throttle_threshold > 0.0 && self.throttle_threshold <= 1.0) {
            return Err(ConfigError::invalid_quota(
                "throttle_threshold",
                format!("must be in (0, 1], got {}", self.throttle_threshold),
            )
            .into());
        }
        debug!(
            enabled = self.enabled,
            max_requests = self.max_requests,
            window_ms = self.window_ms,
            "Quota configuration validated"
        );
        Ok(())
    }
}

impl QuotaConfigBuilder {
    /// Build and validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if any setting is out of range.
    pub fn build(&self) -> SyncroResult<QuotaConfig> {
        let config = self
            .build_internal()
            .map_err(|e| ConfigError::new(ConfigErrorKind::Builder(e.to_string())))?;
        config.validate()?;
        Ok(config)
    }
}
