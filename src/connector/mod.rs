//! Order validation against the external subsidy API.
//!
//! [`PaymentConnector`] owns the configuration for one endpoint and
//! sequences the pipeline: request building, the single transport call,
//! classification, and extraction. Its only return value is an
//! [`ApiOutcome`]; unclassified faults never escape.

use std::{fmt, sync::Arc};

use rust_decimal::Decimal;
use tracing::instrument;

use crate::{
    observe::{Observe, TracingObserver},
    transport::{RequestContext, Transport},
};

pub mod classify;
pub mod config;
pub mod extract;
pub mod models;
pub mod registry;
pub mod request;

pub use classify::ResultClassifier;
pub use config::{ApiVersion, ConnectorConfig};
pub use extract::SubsidyExtractor;
pub use models::{
    ApiOutcome, ConnectionTest, ErrorKind, SubsidyLineItem, SubsidyResult, SubsidyUser,
};
pub use registry::ConnectorRegistry;
pub use request::{OrderInput, OrderLine, PaymentRequest, RequestBuilder};

/// Client identifier sent with every outbound call.
pub const CLIENT_IDENTIFIER: &str = concat!("subsidy-connector/", env!("CARGO_PKG_VERSION"));

/// Synthetic order id used by the connectivity self-test.
pub const TEST_ORDER_ID: &str = "TEST_CONNECTION";

/// Validates orders against one configured subsidy API endpoint.
///
/// The connector is stateless apart from its configuration: concurrent
/// `validate` calls share no mutable state, each owns its request and
/// outcome values. Deduplication of concurrent validations for the same
/// order is the caller's responsibility.
///
/// # Examples
///
/// ```rust,no_run
/// use subsidy_connector::{
///     ConnectorConfig, OrderInput, OrderLine, PaymentConnector,
///     transport::HttpTransport,
/// };
///
/// # async fn example() -> Result<(), subsidy_connector::ConfigError> {
/// let config = ConnectorConfig::from_toml(r#"
///     name = "canteen"
///     base_url = "http://localhost:8080/api/payments"
///     timeout_secs = 10
/// "#)?;
///
/// let connector = PaymentConnector::new(config, HttpTransport::new());
///
/// let order = OrderInput {
///     order_id: "POS-0042".to_owned(),
///     customer_email: None,
///     lines: vec![OrderLine { product_id: Some(7), quantity: None }],
/// };
///
/// let outcome = connector.validate(&order).await;
/// println!("success: {}", outcome.is_success());
/// # Ok(())
/// # }
/// ```
pub struct PaymentConnector<T: Transport> {
    config: ConnectorConfig,
    transport: T,
    observer: Arc<dyn Observe>,
}

impl<T: Transport> PaymentConnector<T> {
    /// Creates a connector with the default tracing-backed observer.
    #[must_use]
    pub fn new(config: ConnectorConfig, transport: T) -> Self {
        Self { config, transport, observer: Arc::new(TracingObserver) }
    }

    /// Replaces the observation capability.
    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn Observe>) -> Self {
        self.observer = observer;
        self
    }

    /// Returns the connector configuration.
    #[must_use]
    pub fn config(&self) -> &ConnectorConfig {
        &self.config
    }

    /// Validates one order against the configured endpoint.
    ///
    /// Fails fast without a network call when the connector is inactive.
    /// A build failure short-circuits as a `processing_error` outcome.
    /// Exactly one transport attempt is made; its result is classified and
    /// returned unchanged.
    #[instrument(skip(self, order), fields(connector = %self.config.name, order_id = %order.order_id))]
    pub async fn validate(&self, order: &OrderInput) -> ApiOutcome {
        if !self.config.is_active {
            return ApiOutcome::failure(
                ErrorKind::ConnectorInactive,
                "payment connector is not active",
            );
        }

        let request = match RequestBuilder::new(self.observer.as_ref()).build(order) {
            Ok(request) => request,
            Err(err) => {
                return ApiOutcome::failure(
                    ErrorKind::ProcessingError,
                    format!("failed to prepare payment data: {err}"),
                );
            }
        };

        let body = match serde_json::to_vec(&request) {
            Ok(body) => body,
            Err(err) => {
                return ApiOutcome::failure(
                    ErrorKind::ProcessingError,
                    format!("failed to prepare payment data: {err}"),
                );
            }
        };

        self.observer.request_dispatched(&self.config.endpoint_url());

        let ctx = RequestContext {
            base_url: &self.config.base_url,
            path: self.config.api_version.endpoint_suffix(),
            headers: vec![("User-Agent", CLIENT_IDENTIFIER)],
            timeout: self.config.timeout(),
        };
        let outcome = self.transport.post_json(ctx, &body).await;

        ResultClassifier::new(self.observer.as_ref()).classify(outcome)
    }

    /// Sends a fixed synthetic order to check that the endpoint is reachable.
    ///
    /// "The pipe works" is decoupled from "the order was approved": the
    /// result is reachable whenever no transport-layer failure occurred,
    /// even if the API rejected the synthetic order as a business rule.
    pub async fn test_connection(&self) -> ConnectionTest {
        let order = OrderInput {
            order_id: TEST_ORDER_ID.to_owned(),
            customer_email: Some("test@example.com".to_owned()),
            lines: vec![OrderLine { product_id: Some(1), quantity: Some(Decimal::ONE) }],
        };

        let outcome = self.validate(&order).await;
        let reachable = !outcome.kind().is_some_and(ErrorKind::is_transport);

        ConnectionTest { reachable, outcome }
    }
}

impl<T: Transport> fmt::Debug for PaymentConnector<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PaymentConnector")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
