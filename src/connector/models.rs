//! Canonical result models for order validation.
//!
//! The external API answers with an inconsistently-shaped JSON document; the
//! types here are the stable structures the rest of the application consumes.
//! Serialization uses camelCase keys to match what downstream consumers of
//! the validation result expect on the wire.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Stable failure-kind identifiers for the whole validation surface.
///
/// The caller-layer kinds (`access_denied`, `not_found`, `no_connector`)
/// exist for the routing layer; the core itself never produces them from
/// [`validate`](crate::PaymentConnector::validate). Serialized form and
/// [`as_str`](Self::as_str) use the snake_case identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Caller lacks the required permissions (routing layer).
    AccessDenied,
    /// The requested connector does not exist (configuration resolution).
    NotFound,
    /// No active connector is configured (configuration resolution).
    NoConnector,
    /// The connector is configured but disabled; no call was made.
    ConnectorInactive,
    /// The order could not be shaped into a payment request.
    ProcessingError,
    /// The API call did not complete within the configured timeout.
    Timeout,
    /// The API could not be reached.
    Connection,
    /// Any other transport-layer failure.
    Request,
    /// The API rejected the order as a business rule inside a 2xx envelope.
    ValidationError,
    /// The API answered with a 4xx status.
    ClientError,
    /// The API answered with a 5xx status.
    ServerError,
    /// Any uncategorized fault.
    Unexpected,
}

impl ErrorKind {
    /// Returns the stable snake_case identifier.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AccessDenied => "access_denied",
            Self::NotFound => "not_found",
            Self::NoConnector => "no_connector",
            Self::ConnectorInactive => "connector_inactive",
            Self::ProcessingError => "processing_error",
            Self::Timeout => "timeout",
            Self::Connection => "connection",
            Self::Request => "request",
            Self::ValidationError => "validation_error",
            Self::ClientError => "client_error",
            Self::ServerError => "server_error",
            Self::Unexpected => "unexpected",
        }
    }

    /// True for network-layer kinds (`timeout`, `connection`, `request`).
    ///
    /// The connectivity self-test uses this to decide whether the pipe
    /// itself works, independent of business approval.
    #[must_use]
    pub const fn is_transport(self) -> bool {
        matches!(self, Self::Timeout | Self::Connection | Self::Request)
    }

    /// True for kinds where the UI should offer a retry to the cashier.
    #[must_use]
    pub const fn is_retryable(self) -> bool {
        matches!(self, Self::Timeout | Self::Connection)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The single value returned by a validation attempt.
///
/// Always either success-with-data or failure-with-kind; unclassified
/// faults never cross this boundary.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ApiOutcome {
    /// The API accepted the order (or answered 2xx without a JSON payload).
    Success {
        /// Normalized subsidy data; `None` for a non-JSON 2xx body.
        #[serde(skip_serializing_if = "Option::is_none")]
        data: Option<SubsidyResult>,
        /// Human-readable message for the operator.
        message: String,
    },
    /// The validation failed, with a classified kind.
    Failure {
        /// Stable failure kind for UI treatment decisions.
        #[serde(rename = "errorKind")]
        kind: ErrorKind,
        /// Human-readable message for the operator.
        message: String,
        /// HTTP status code, for `client_error`/`server_error` kinds.
        #[serde(rename = "statusCode", skip_serializing_if = "Option::is_none")]
        status_code: Option<u16>,
        /// Raw response body, carried for business-rule rejections.
        #[serde(rename = "rawBody", skip_serializing_if = "Option::is_none")]
        raw_body: Option<Value>,
    },
}

impl ApiOutcome {
    /// Shorthand for a failure without status code or raw body.
    #[must_use]
    pub fn failure(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self::Failure { kind, message: message.into(), status_code: None, raw_body: None }
    }

    /// True for the success variant.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// The failure kind, or `None` for a success.
    #[must_use]
    pub const fn kind(&self) -> Option<ErrorKind> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { kind, .. } => Some(*kind),
        }
    }

    /// The operator-facing message of either variant.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Success { message, .. } | Self::Failure { message, .. } => message,
        }
    }
}

/// Normalized subsidy validation result.
///
/// Every field has an explicit default so the extractor can fill whatever
/// the API actually sent and leave the rest well-defined.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubsidyResult {
    /// Whether the API approved the order.
    pub valid: bool,
    /// Message passed through verbatim from the API.
    pub message: String,
    /// Order total; recomputed from line items when the API omits it.
    pub total_amount: Decimal,
    /// The employee-paid portion of the total.
    pub employee_share: Decimal,
    /// The employer-funded subsidy portion of the total.
    pub employer_share: Decimal,
    /// Account balance before the order.
    pub balance_before: Decimal,
    /// Account balance after the order.
    pub balance_after: Decimal,
    /// Per-line subsidy breakdown.
    pub line_items: Vec<SubsidyLineItem>,
    /// Identity of the account holder.
    pub user: SubsidyUser,
    /// Transaction identifier, when the API issued one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,
    /// Alias of `transaction_id` kept for downstream consumers that still
    /// read the older key.
    #[serde(rename = "idTransaction", skip_serializing_if = "Option::is_none")]
    pub id_transaction: Option<String>,
    /// Second alias of `transaction_id`, same compatibility reason.
    #[serde(rename = "id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

/// One normalized line of the subsidy breakdown.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubsidyLineItem {
    /// Product identifier in the calling application, when echoed back.
    pub external_id: Option<i64>,
    /// Product name; "unknown item" when the API omits it.
    pub name: String,
    /// Quantity ordered.
    pub quantity: Decimal,
    /// Price per unit.
    pub unit_price: Decimal,
    /// Line total.
    pub total_amount: Decimal,
    /// Subsidy granted on this line.
    pub subsidy_amount: Decimal,
    /// Employee-paid portion of this line.
    pub employee_share: Decimal,
    /// Units covered by the subsidy.
    pub subsidized_quantity: Decimal,
    /// Units paid at full price.
    pub unsubsidized_quantity: Decimal,
}

/// Identity fields of the account holder, all defaulting to empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubsidyUser {
    /// Family name.
    pub last_name: String,
    /// Given name.
    pub first_name: String,
    /// Email address.
    pub email: String,
    /// Subsidy category the account belongs to.
    pub category: String,
    /// Display name.
    pub full_name: String,
}

/// Result of the connectivity self-test.
///
/// `reachable` reports whether the pipe works: it is true whenever no
/// transport-layer failure occurred, even if the synthetic order itself
/// was rejected by a business rule.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionTest {
    /// Whether the API endpoint could be reached at all.
    pub reachable: bool,
    /// Full outcome of the synthetic validation, for diagnostics.
    pub outcome: ApiOutcome,
}
