//! End-to-end validation flow tests against a scripted transport.
//!
//! The transport double returns pre-queued results and counts calls, so the
//! tests can assert both the classified outcome and the exact number of
//! network attempts the connector made.

use std::{
    collections::VecDeque,
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

use rust_decimal::Decimal;
use serde_json::{Value, json};
use subsidy_connector::{
    ApiOutcome, ApiVersion, ConnectorConfig, ConnectorRegistry, ErrorKind, Observe, OrderInput,
    OrderLine, PaymentConnector, TransportError, status_report,
    transport::{RequestContext, Transport, TransportResponse},
};

/// Transport double: replays queued results, records calls.
struct MockTransport {
    calls: AtomicUsize,
    responses: Mutex<VecDeque<Result<TransportResponse, TransportError>>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

struct RecordedRequest {
    url: String,
    headers: Vec<(String, String)>,
    body: Value,
}

impl MockTransport {
    fn new(responses: Vec<Result<TransportResponse, TransportError>>) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            responses: Mutex::new(responses.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    fn returning(status: u16, body: &Value) -> Self {
        Self::new(vec![Ok(TransportResponse::new(status, serde_json::to_vec(body).unwrap()))])
    }

    fn failing(error: TransportError) -> Self {
        Self::new(vec![Err(error)])
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn last_request(&self) -> RecordedRequest {
        self.requests.lock().unwrap().pop().expect("no request was recorded")
    }
}

impl Transport for MockTransport {
    async fn post_json<'a>(
        &'a self,
        ctx: RequestContext<'a>,
        body: &'a [u8],
    ) -> Result<TransportResponse, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(RecordedRequest {
            url: format!("{}{}", ctx.base_url.trim_end_matches('/'), ctx.path),
            headers: ctx
                .headers
                .iter()
                .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
                .collect(),
            body: serde_json::from_slice(body).expect("request body should be JSON"),
        });
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .expect("transport called more often than scripted")
    }
}

/// Observer double recording dropped-line events.
#[derive(Default)]
struct RecordingObserver {
    dropped: Mutex<Vec<usize>>,
}

impl Observe for RecordingObserver {
    fn line_dropped(&self, _order_id: &str, line_index: usize) {
        self.dropped.lock().unwrap().push(line_index);
    }
}

fn config() -> ConnectorConfig {
    ConnectorConfig {
        name: "canteen".to_owned(),
        base_url: "http://localhost:8080/api/payments".to_owned(),
        api_version: ApiVersion::V2,
        timeout_secs: 30,
        is_active: true,
    }
}

fn order(order_id: &str, lines: Vec<OrderLine>) -> OrderInput {
    OrderInput { order_id: order_id.to_owned(), customer_email: None, lines }
}

fn line(product_id: i64, quantity: u32) -> OrderLine {
    OrderLine { product_id: Some(product_id), quantity: Some(Decimal::from(quantity)) }
}

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

#[tokio::test]
async fn end_to_end_success_normalizes_response() {
    let transport = MockTransport::returning(
        200,
        &json!({"status": "success", "amountCharged": 8.0, "remainingBalance": 42.0}),
    );
    let connector = PaymentConnector::new(config(), transport);

    let outcome = connector.validate(&order("A1", vec![line(7, 2)])).await;

    let ApiOutcome::Success { data: Some(result), .. } = outcome else {
        panic!("expected success with data");
    };
    assert!(result.valid);
    assert_eq!(result.employee_share, dec("8"));
    assert_eq!(result.balance_after, dec("42"));
    // No line items supplied, so no derivation fires.
    assert_eq!(result.total_amount, Decimal::ZERO);
}

#[tokio::test]
async fn request_wire_format_and_endpoint() {
    let transport = Arc::new(MockTransport::returning(200, &json!({"status": "success"})));
    let connector = PaymentConnector::new(config(), Arc::clone(&transport));

    let input = OrderInput {
        order_id: "A1".to_owned(),
        customer_email: Some("claire@canteen.example".to_owned()),
        lines: vec![line(7, 2)],
    };
    let _ = connector.validate(&input).await;

    let request = transport.last_request();
    assert_eq!(request.url, "http://localhost:8080/api/payments/v2/validate");
    assert_eq!(request.body["orderId"], "A1");
    assert_eq!(request.body["customer"]["email"], "claire@canteen.example");
    assert_eq!(request.body["items"][0]["productId"], 7);
    assert!(request
        .headers
        .iter()
        .any(|(k, v)| k == "User-Agent" && v.starts_with("subsidy-connector/")));
}

#[tokio::test]
async fn inactive_connector_makes_no_network_call() {
    let transport = Arc::new(MockTransport::new(vec![]));
    let mut cfg = config();
    cfg.is_active = false;
    let connector = PaymentConnector::new(cfg, Arc::clone(&transport));

    let outcome = connector.validate(&order("A1", vec![line(7, 1)])).await;

    assert_eq!(outcome.kind(), Some(ErrorKind::ConnectorInactive));
    assert_eq!(transport.call_count(), 0);
}

#[tokio::test]
async fn validate_makes_exactly_one_attempt() {
    let transport = Arc::new(MockTransport::failing(TransportError::Connection(
        "refused".to_owned(),
    )));
    let connector = PaymentConnector::new(config(), Arc::clone(&transport));

    let outcome = connector.validate(&order("A1", vec![line(7, 1)])).await;

    assert_eq!(outcome.kind(), Some(ErrorKind::Connection));
    assert_eq!(transport.call_count(), 1);
}

#[tokio::test]
async fn timeout_yields_timeout_kind() {
    let transport = MockTransport::failing(TransportError::Timeout { after_secs: 30 });
    let connector = PaymentConnector::new(config(), transport);

    let outcome = connector.validate(&order("A1", vec![line(7, 1)])).await;

    assert_eq!(outcome.kind(), Some(ErrorKind::Timeout));
    assert_eq!(outcome.message(), "API timeout after 30 seconds");
}

#[tokio::test]
async fn business_rejection_inside_200_envelope() {
    let transport = MockTransport::returning(
        200,
        &json!({"status": "error", "message": "insufficient balance"}),
    );
    let connector = PaymentConnector::new(config(), transport);

    let outcome = connector.validate(&order("A1", vec![line(7, 1)])).await;

    let ApiOutcome::Failure { kind, message, raw_body, .. } = outcome else {
        panic!("expected failure");
    };
    assert_eq!(kind, ErrorKind::ValidationError);
    assert_eq!(message, "insufficient balance");
    assert!(raw_body.is_some());
}

#[tokio::test]
async fn server_error_without_parseable_body() {
    let transport =
        MockTransport::new(vec![Ok(TransportResponse::new(503, b"unavailable".to_vec()))]);
    let connector = PaymentConnector::new(config(), transport);

    let outcome = connector.validate(&order("A1", vec![line(7, 1)])).await;

    let ApiOutcome::Failure { kind, message, status_code, .. } = outcome else {
        panic!("expected failure");
    };
    assert_eq!(kind, ErrorKind::ServerError);
    assert_eq!(status_code, Some(503));
    assert!(message.contains("503"));
}

#[tokio::test]
async fn non_json_2xx_is_success_without_data() {
    let transport =
        MockTransport::new(vec![Ok(TransportResponse::new(200, b"<html>OK</html>".to_vec()))]);
    let connector = PaymentConnector::new(config(), transport);

    let outcome = connector.validate(&order("A1", vec![line(7, 1)])).await;

    assert!(matches!(outcome, ApiOutcome::Success { data: None, .. }));
}

#[tokio::test]
async fn build_failure_short_circuits_without_network_call() {
    let transport = Arc::new(MockTransport::new(vec![]));
    let connector = PaymentConnector::new(config(), Arc::clone(&transport));

    let outcome = connector.validate(&order("A1", vec![])).await;

    let ApiOutcome::Failure { kind, message, .. } = outcome else {
        panic!("expected failure");
    };
    assert_eq!(kind, ErrorKind::ProcessingError);
    assert!(message.contains("failed to prepare payment data"));
    assert_eq!(transport.call_count(), 0);
}

#[tokio::test]
async fn dropped_lines_are_reported_and_absent_from_wire() {
    let transport = Arc::new(MockTransport::returning(200, &json!({"status": "success"})));
    let observer = Arc::new(RecordingObserver::default());
    let connector = PaymentConnector::new(config(), Arc::clone(&transport))
        .with_observer(observer.clone());

    let input = order("A1", vec![
        OrderLine { product_id: None, quantity: None },
        line(7, 1),
        OrderLine { product_id: None, quantity: Some(Decimal::ONE) },
    ]);
    let outcome = connector.validate(&input).await;

    assert!(outcome.is_success());
    assert_eq!(*observer.dropped.lock().unwrap(), vec![0, 2]);

    let request = transport.last_request();
    let items = request.body["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["productId"], 7);
}

#[tokio::test]
async fn derivation_fallback_through_full_pipeline() {
    let transport = MockTransport::returning(
        200,
        &json!({
            "status": "success",
            "remainingBalance": 30.0,
            "articles": [
                {"odooId": 1, "nom": "menu", "montantTotal": 10.0, "subventionTotale": 4.0},
                {"odooId": 2, "nom": "dessert", "montantTotal": 5.0, "subventionTotale": 1.0},
            ],
        }),
    );
    let connector = PaymentConnector::new(config(), transport);

    let outcome = connector.validate(&order("A1", vec![line(1, 1), line(2, 1)])).await;

    let ApiOutcome::Success { data: Some(result), .. } = outcome else {
        panic!("expected success with data");
    };
    assert_eq!(result.total_amount, dec("15"));
    assert_eq!(result.employer_share, dec("5"));
    assert_eq!(result.employee_share, dec("10"));
    assert_eq!(result.balance_before, dec("40"));
    assert_eq!(result.line_items.len(), 2);
}

#[tokio::test]
async fn test_connection_reachable_despite_business_rejection() {
    let transport = MockTransport::returning(
        200,
        &json!({"status": "error", "message": "unknown product"}),
    );
    let connector = PaymentConnector::new(config(), transport);

    let test = connector.test_connection().await;

    assert!(test.reachable);
    assert_eq!(test.outcome.kind(), Some(ErrorKind::ValidationError));
}

#[tokio::test]
async fn test_connection_unreachable_on_timeout() {
    let transport = MockTransport::failing(TransportError::Timeout { after_secs: 30 });
    let connector = PaymentConnector::new(config(), transport);

    let test = connector.test_connection().await;

    assert!(!test.reachable);
    assert_eq!(test.outcome.kind(), Some(ErrorKind::Timeout));
}

#[tokio::test]
async fn test_connection_sends_synthetic_order() {
    let transport = Arc::new(MockTransport::returning(200, &json!({"status": "success"})));
    let connector = PaymentConnector::new(config(), Arc::clone(&transport));

    let test = connector.test_connection().await;

    assert!(test.reachable);
    let request = transport.last_request();
    assert_eq!(request.body["orderId"], "TEST_CONNECTION");
    assert_eq!(request.body["items"].as_array().unwrap().len(), 1);
}

#[test]
fn registry_and_probe_report_configured_connectors() {
    let active = ConnectorConfig::from_toml(r#"
        name = "canteen"
        base_url = "http://localhost:8080/api/payments"
    "#)
    .unwrap();
    let disabled = ConnectorConfig::from_toml(r#"
        name = "cafeteria"
        base_url = "http://10.0.0.5:8080/api/payments"
        is_active = false
    "#)
    .unwrap();

    let registry = ConnectorRegistry::new(vec![disabled, active]);

    assert_eq!(registry.first_active().unwrap().name, "canteen");
    assert_eq!(registry.by_name("cafeteria").unwrap().timeout_secs, 30);

    let report = status_report(&registry);
    assert_eq!(report.total_count, 2);
    assert_eq!(report.active_count, 1);
    assert_eq!(
        report.connectors[1].endpoint_url,
        "http://localhost:8080/api/payments/v2/validate"
    );
}
