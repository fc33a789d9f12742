//! Point-of-sale order validation against an external subsidy payment API.
//!
//! This library validates a POS order against the subsidy API and
//! normalizes the API's inconsistently-shaped JSON answer into a canonical
//! result. It covers three tightly coupled responsibilities:
//!
//! - translating an internal order into the API's wire format
//!   ([`connector::RequestBuilder`])
//! - issuing the call with failure classification across network, client,
//!   and server error layers ([`connector::ResultClassifier`])
//! - normalizing the success payload, recovering missing top-level totals
//!   from per-line-item data ([`connector::SubsidyExtractor`])
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────┐
//! │  POS / routing │  resolves a ConnectorConfig, builds an OrderInput
//! └───────┬────────┘
//!         │
//! ┌───────▼─────────────────────────────────────────┐
//! │        PaymentConnector (this crate)            │
//! │  RequestBuilder → Transport → ResultClassifier  │
//! │                                 └ SubsidyExtractor
//! └───────┬─────────────────────────────────────────┘
//!         │ HTTP POST {base_url}/v2/validate
//! ┌───────▼────────┐
//! │  Subsidy API   │  returns 200 even for business rejections
//! └────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use subsidy_connector::{
//!     ApiOutcome, ConnectorConfig, OrderInput, OrderLine, PaymentConnector,
//!     transport::HttpTransport,
//! };
//!
//! # async fn example() -> Result<(), subsidy_connector::ConfigError> {
//! let config = ConnectorConfig::from_toml(r#"
//!     name = "canteen"
//!     base_url = "http://localhost:8080/api/payments"
//!     timeout_secs = 10
//! "#)?;
//!
//! let connector = PaymentConnector::new(config, HttpTransport::new());
//!
//! let order = OrderInput {
//!     order_id: "POS-0042".to_owned(),
//!     customer_email: Some("claire@canteen.example".to_owned()),
//!     lines: vec![OrderLine { product_id: Some(7), quantity: None }],
//! };
//!
//! match connector.validate(&order).await {
//!     ApiOutcome::Success { data, message } => {
//!         println!("approved: {message}");
//!         if let Some(result) = data {
//!             println!("subsidy: {}", result.employer_share);
//!         }
//!     }
//!     ApiOutcome::Failure { kind, message, .. } => {
//!         // kind drives UI treatment: retry for timeout/connection,
//!         // block the sale for validation_error.
//!         eprintln!("{kind}: {message}");
//!     }
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Module Organization
//!
//! - [`connector`]: the validation pipeline and its configuration
//! - [`transport`]: the HTTP seam ([`transport::Transport`] trait plus the
//!   reqwest-backed implementation)
//! - [`observe`]: injected structured observation of pipeline diagnostics
//! - [`probe`]: read-only status reporting for operational tooling
//! - [`error`]: per-family error enums; none of them cross the `validate`
//!   boundary
//!
//! # Error Handling
//!
//! [`PaymentConnector::validate`] returns [`ApiOutcome`], never an error:
//! every failure inside the pipeline is converted into a
//! [`ApiOutcome::Failure`] with a stable [`ErrorKind`]. Extraction is
//! infallible by contract; internal faults degrade to a minimal result
//! rather than propagating.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod connector;
pub mod error;
pub mod observe;
pub mod probe;
pub mod transport;

pub use connector::{
    ApiOutcome, ApiVersion, ConnectionTest, ConnectorConfig, ConnectorRegistry, ErrorKind,
    OrderInput, OrderLine, PaymentConnector, PaymentRequest, SubsidyLineItem, SubsidyResult,
    SubsidyUser,
};
pub use error::{BuildError, ConfigError, RegistryError, TransportError};
pub use observe::{Observe, TracingObserver};
pub use probe::{ConnectorEcho, StatusReport, status_report};
