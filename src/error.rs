//! Error types for the subsidy connector.
//!
//! Each failure family gets its own enum so callers can match exhaustively
//! at the layer where the failure occurs. None of these types cross the
//! [`PaymentConnector::validate`](crate::PaymentConnector::validate)
//! boundary: the validation pipeline converts every failure into an
//! [`ApiOutcome::Failure`](crate::ApiOutcome) value with a stable
//! [`ErrorKind`](crate::ErrorKind).
//!
//! # Error Families
//!
//! - [`BuildError`]: order-to-wire-format translation failures
//! - [`TransportError`]: network-layer failures (timeout, connection, other)
//! - [`ConfigError`]: connector configuration rejected by validation
//! - [`RegistryError`]: connector lookup failures

use thiserror::Error;

use crate::connector::models::ErrorKind;

/// Request-building failures.
///
/// Produced by [`RequestBuilder::build`](crate::connector::RequestBuilder::build)
/// when an order cannot be shaped into the canonical payment request.
/// The connector converts these into `processing_error` outcomes; callers
/// wanting strict user-input validation can invoke the builder directly
/// and surface the error themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BuildError {
    /// The order has no identifier (absent or empty).
    #[error("order id is required")]
    MissingOrderId,

    /// The order has no lines at all.
    #[error("order lines are required")]
    MissingLines,

    /// Every line was dropped during filtering (none carried a product id).
    #[error("no valid items found in order")]
    NoValidItems,
}

/// Transport-layer failures for the outbound API call.
///
/// The variants mirror the classification taxonomy exactly: each maps to one
/// failure kind (`timeout`, `connection`, `request`). HTTP error statuses are
/// NOT transport failures: the transport returns 4xx/5xx responses as `Ok`
/// so the classifier can inspect status and body.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The request did not complete within the configured timeout.
    #[error("request timed out after {after_secs} seconds")]
    Timeout {
        /// The timeout that expired, in seconds.
        after_secs: u64,
    },

    /// The connection to the API could not be established.
    #[error("connection failed: {0}")]
    Connection(String),

    /// Any other request-layer failure (DNS, TLS, malformed request, ...).
    #[error("request failed: {0}")]
    Request(String),
}

/// Connector configuration rejected by validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The connector has no name.
    #[error("connector name is required")]
    NameRequired,

    /// The connector has no base URL.
    #[error("base_url is required")]
    BaseUrlRequired,

    /// The base URL does not parse as an http/https URL.
    #[error("invalid base_url '{url}': {reason}")]
    InvalidBaseUrl {
        /// The rejected URL.
        url: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The timeout is outside the accepted bounds.
    #[error("timeout_secs must be between 1 and 300")]
    InvalidTimeout,

    /// The TOML document could not be parsed into a configuration.
    #[error("invalid connector config: {0}")]
    Parse(String),
}

/// Connector lookup failures.
///
/// Produced by [`ConnectorRegistry`](crate::connector::ConnectorRegistry)
/// when resolution fails. These carry the configuration-resolution kinds of
/// the error taxonomy (`not_found`, `no_connector`) for the routing layer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// No connector with the requested name exists.
    #[error("connector not found: {0}")]
    NotFound(String),

    /// The registry holds no active connector.
    #[error("no active connector found")]
    NoneActive,
}

impl RegistryError {
    /// Returns the stable error kind for this lookup failure.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::NoneActive => ErrorKind::NoConnector,
        }
    }
}
