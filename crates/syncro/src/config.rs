//! Client configuration.
//!
//! Settings are layered with the `config` crate, later sources overriding
//! earlier ones:
//! 1. Bundled defaults (`syncro.toml` shipped with the library)
//! 2. `~/.config/syncro/syncro.toml`
//! 3. `./syncro.toml`
//! 4. Environment variables prefixed with `SYNCRO_`, using `__` for nesting
//!    (`SYNCRO_API_KEY`, `SYNCRO_RATE_LIMIT__MAX_REQUESTS`)

use config::{Config, Environment, File, FileFormat};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use syncro_error::{ConfigError, ConfigErrorKind, SyncroResult};
use syncro_rate_limit::QuotaConfig;
use tracing::{debug, instrument};

const DEFAULT_CONFIG: &str = include_str!("../../../syncro.toml");

/// Vendor host for subdomain-based accounts.
const SYNCRO_HOST: &str = "syncromsp.com";

/// User-supplied client settings.
///
/// # Examples
///
/// ```
/// use syncro::SyncroConfig;
///
/// let config = SyncroConfig::new("secret").with_subdomain("acme");
/// let resolved = config.resolve().unwrap();
/// assert_eq!(resolved.base_url(), "https://acme.syncromsp.com");
/// ```
#[derive(Clone, Default, PartialEq, Serialize, Deserialize, Getters, derive_setters::Setters)]
#[setters(prefix = "with_", into)]
#[serde(default)]
pub struct SyncroConfig {
    /// API key sent as the `api_key` query parameter
    api_key: String,

    /// Account subdomain, expanded to `https://{subdomain}.syncromsp.com`
    #[setters(strip_option)]
    subdomain: Option<String>,

    /// Explicit base URL; takes precedence over `subdomain`
    #[setters(strip_option)]
    base_url: Option<String>,

    /// Quota and retry settings
    rate_limit: QuotaConfig,
}

impl fmt::Debug for SyncroConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyncroConfig")
            .field("api_key", &"<redacted>")
            .field("subdomain", &self.subdomain)
            .field("base_url", &self.base_url)
            .field("rate_limit", &self.rate_limit)
            .finish()
    }
}

impl SyncroConfig {
    /// Settings with the given API key and default quotas.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Self::default()
        }
    }

    /// Load layered configuration from the bundled defaults, user files and
    /// the environment.
    ///
    /// A `.env` file in the working directory is read first, if present.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if a source cannot be parsed.
    #[instrument]
    pub fn load() -> SyncroResult<Self> {
        debug!("Loading configuration: env > current dir > home dir > bundled defaults");
        if let Ok(path) = dotenvy::dotenv() {
            debug!(path = %path.display(), "Loaded .env file");
        }

        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".config/syncro/syncro.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }

        builder = builder
            .add_source(File::with_name("syncro").required(false))
            .add_source(
                Environment::with_prefix("SYNCRO")
                    .prefix_separator("_")
                    .separator("__"),
            );

        Self::deserialize_from(builder.build())
    }

    /// Load configuration from a single file. The format follows the file
    /// extension.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the file cannot be read or parsed.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> SyncroResult<Self> {
        debug!("Loading configuration from file");
        let built = Config::builder()
            .add_source(File::from(path.as_ref()))
            .build();
        Self::deserialize_from(built)
    }

    fn deserialize_from(built: Result<Config, config::ConfigError>) -> SyncroResult<Self> {
        let config: Self = built
            .map_err(|e| ConfigError::new(ConfigErrorKind::Load(e.to_string())))?
            .try_deserialize()
            .map_err(|e| ConfigError::new(ConfigErrorKind::Load(e.to_string())))?;
        Ok(config)
    }

    /// Validate the settings and compute the effective base URL.
    ///
    /// # Errors
    ///
    /// - [`ConfigErrorKind::MissingApiKey`] when the key is empty
    /// - [`ConfigErrorKind::MissingBaseUrl`] when neither `base_url` nor
    ///   `subdomain` is set
    /// - [`ConfigErrorKind::InvalidQuota`] when a quota setting is out of range
    pub fn resolve(&self) -> SyncroResult<ResolvedConfig> {
        if self.api_key.trim().is_empty() {
            return Err(ConfigError::new(ConfigErrorKind::MissingApiKey).into());
        }

        let base_url = match (non_empty(&self.base_url), non_empty(&self.subdomain)) {
            (Some(url), _) => url.strip_suffix('/').unwrap_or(url).to_string(),
            (None, Some(subdomain)) => format!("https://{}.{}", subdomain, SYNCRO_HOST),
            (None, None) => return Err(ConfigError::new(ConfigErrorKind::MissingBaseUrl).into()),
        };

        self.rate_limit.validate()?;

        Ok(ResolvedConfig {
            api_key: self.api_key.clone(),
            base_url,
            rate_limit: self.rate_limit.clone(),
        })
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Validated settings the client runs with.
#[derive(Clone, PartialEq, Getters)]
pub struct ResolvedConfig {
    /// API key
    api_key: String,
    /// Base URL without a trailing slash
    base_url: String,
    /// Quota and retry settings
    rate_limit: QuotaConfig,
}

impl fmt::Debug for ResolvedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("rate_limit", &self.rate_limit)
            .finish()
    }
}
