//! Connector configuration.
//!
//! The configuration record is owned by the calling application's
//! persistence layer; the core treats it as an immutable value per call.
//! It is TOML-deserializable so operational tooling can load connector
//! definitions from files.

use std::time::Duration;

use serde::Deserialize;
use url::Url;

use crate::error::ConfigError;

/// Supported API versions.
///
/// Currently a single revision; the variant decides the endpoint suffix the
/// connector appends to the base URL.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiVersion {
    /// Revision v2 (`/v2/validate`).
    #[default]
    V2,
}

impl ApiVersion {
    /// Returns the endpoint path appended to the base URL.
    #[must_use]
    pub const fn endpoint_suffix(self) -> &'static str {
        match self {
            Self::V2 => "/v2/validate",
        }
    }

    /// Returns the version tag as configured.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::V2 => "v2",
        }
    }
}

/// Configuration of one payment connector.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ConnectorConfig {
    /// Display name; must be non-empty.
    pub name: String,

    /// Base URL of the subsidy API (e.g. `http://localhost:8080/api/payments`).
    pub base_url: String,

    /// API version tag.
    #[serde(default)]
    pub api_version: ApiVersion,

    /// Hard per-call timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Whether this connector may be used for validations.
    #[serde(default = "default_is_active")]
    pub is_active: bool,
}

impl ConnectorConfig {
    /// Parses and validates a configuration from TOML.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed TOML, or the validation
    /// error for out-of-bounds values.
    ///
    /// # Examples
    ///
    /// ```
    /// use subsidy_connector::ConnectorConfig;
    ///
    /// let config = ConnectorConfig::from_toml(r#"
    ///     name = "canteen"
    ///     base_url = "http://localhost:8080/api/payments"
    ///     timeout_secs = 10
    /// "#)
    /// .unwrap();
    ///
    /// assert_eq!(config.name, "canteen");
    /// assert!(config.is_active);
    /// ```
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(toml_str).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration.
    ///
    /// The base URL must parse as an http or https URL. The subsidy API
    /// commonly runs on the store's local network, so plain http and
    /// localhost are allowed. The timeout must be 1-300 seconds.
    ///
    /// # Errors
    ///
    /// Returns the matching [`ConfigError`] variant for each rejection.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.name.is_empty() {
            return Err(ConfigError::NameRequired);
        }
        if self.base_url.is_empty() {
            return Err(ConfigError::BaseUrlRequired);
        }

        let url = Url::parse(&self.base_url).map_err(|e| ConfigError::InvalidBaseUrl {
            url: self.base_url.clone(),
            reason: e.to_string(),
        })?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ConfigError::InvalidBaseUrl {
                url: self.base_url.clone(),
                reason: format!("unsupported scheme '{}'", url.scheme()),
            });
        }

        if self.timeout_secs == 0 || self.timeout_secs > 300 {
            return Err(ConfigError::InvalidTimeout);
        }

        Ok(())
    }

    /// Returns the full validation endpoint URL, with any trailing slash
    /// stripped from the base URL.
    #[must_use]
    pub fn endpoint_url(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), self.api_version.endpoint_suffix())
    }

    /// Returns the per-call timeout as a `Duration`.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_is_active() -> bool {
    true
}
