//! Structured observation of the validation pipeline.
//!
//! The connector reports diagnostic events through an injected [`Observe`]
//! capability instead of logging directly from the pipeline stages. The
//! default implementation ([`TracingObserver`]) forwards every event to
//! `tracing`; tests inject a recording implementation and assert on the
//! events themselves rather than on log output.

use tracing::{debug, info, warn};

/// Diagnostic events emitted by the validation pipeline.
///
/// All methods have empty default bodies so implementations only override
/// the events they care about.
pub trait Observe: Send + Sync {
    /// An order line without a product id was dropped during request building.
    fn line_dropped(&self, order_id: &str, line_index: usize) {
        let _ = (order_id, line_index);
    }

    /// The outbound API call is about to be dispatched.
    fn request_dispatched(&self, endpoint: &str) {
        let _ = endpoint;
    }

    /// An HTTP response arrived (any status).
    fn response_received(&self, status: u16) {
        let _ = status;
    }

    /// Extraction hit an internal fault and degraded to a minimal result.
    fn extraction_degraded(&self, reason: &str) {
        let _ = reason;
    }
}

/// Default observer forwarding every event to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl Observe for TracingObserver {
    fn line_dropped(&self, order_id: &str, line_index: usize) {
        warn!(order_id, line_index, "order line without product id dropped");
    }

    fn request_dispatched(&self, endpoint: &str) {
        info!(endpoint, "calling subsidy API");
    }

    fn response_received(&self, status: u16) {
        debug!(status, "subsidy API response received");
    }

    fn extraction_degraded(&self, reason: &str) {
        warn!(reason, "subsidy extraction degraded to minimal result");
    }
}
