//! Probe configuration.
//!
//! The only input is the target base URL, taken from the command line.
//! Defaults to `http://localhost:5000`.

use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Base URL used when none is given.
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";

/// Timeout applied to the register and login calls. Other calls have none.
pub const AUTH_TIMEOUT: Duration = Duration::from_secs(10);

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid base URL {url:?}: {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("Unsupported scheme {scheme:?} in base URL {url:?} (expected http or https)")]
    UnsupportedScheme { url: String, scheme: String },
}

/// Probe configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeConfig {
    /// Base URL without a trailing slash, e.g. `http://localhost:5000`
    base_url: String,
    /// Timeout for the register and login calls
    pub auth_timeout: Duration,
}

impl ProbeConfig {
    /// Build a configuration for `base_url`.
    ///
    /// Trailing slashes are dropped so that paths can be appended directly.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL does not parse or is not http(s).
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        let parsed = Url::parse(base_url).map_err(|source| ConfigError::InvalidBaseUrl {
            url: base_url.to_string(),
            source,
        })?;

        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::UnsupportedScheme {
                url: base_url.to_string(),
                scheme: parsed.scheme().to_string(),
            });
        }

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            auth_timeout: AUTH_TIMEOUT,
        })
    }

    /// The base URL, without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for a path below the base, e.g. `/api/cart`.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            auth_timeout: AUTH_TIMEOUT,
        }
    }
}
