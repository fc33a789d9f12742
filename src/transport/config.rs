//! HTTP transport configuration.

use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;

/// HTTP client configuration.
///
/// Covers connection-level settings only; the per-request timeout comes from
/// the connector configuration and is applied per call.
#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    /// Maximum idle connections kept per host.
    #[serde(default = "default_pool_max_idle")]
    pub pool_max_idle_per_host: usize,

    /// Connection timeout in seconds.
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            pool_max_idle_per_host: default_pool_max_idle(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

impl HttpConfig {
    /// Validates configuration values are within acceptable bounds.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidTimeout`] if `connect_timeout_secs` is
    /// outside 1-60 seconds.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.connect_timeout_secs == 0 || self.connect_timeout_secs > 60 {
            return Err(ConfigError::InvalidTimeout);
        }
        Ok(())
    }

    /// Returns the connect timeout as a `Duration`.
    #[must_use]
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

fn default_pool_max_idle() -> usize {
    10
}

fn default_connect_timeout_secs() -> u64 {
    10
}
