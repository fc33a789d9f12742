//! Classification of transport results into [`ApiOutcome`] values.
//!
//! The API returns HTTP 200 even for business-rule rejections (insufficient
//! balance, invalid product), so the HTTP status class alone is not enough:
//! for 2xx responses the body's own `status`/`valide` markers decide between
//! success and `validation_error`. This double-layer check (HTTP class
//! first, then payload status) is the crux of the classification and must
//! stay exactly as ordered here.

use std::fmt;

use serde_json::Value;

use crate::{
    connector::{
        extract::SubsidyExtractor,
        models::{ApiOutcome, ErrorKind},
    },
    error::TransportError,
    observe::Observe,
    transport::TransportResponse,
};

/// Message used for a 2xx response whose body carries no message field.
const VALIDATED_MESSAGE: &str = "payment validated successfully";

/// Message used for a business-rule rejection without a message field.
const VALIDATION_FAILED_MESSAGE: &str = "payment validation failed";

/// Maps transport results, network failures or HTTP responses, onto the
/// outcome taxonomy.
pub struct ResultClassifier<'a> {
    observer: &'a dyn Observe,
}

impl<'a> ResultClassifier<'a> {
    /// Creates a classifier reporting diagnostics to `observer`.
    #[must_use]
    pub fn new(observer: &'a dyn Observe) -> Self {
        Self { observer }
    }

    /// Classifies one transport result.
    ///
    /// Rules, in order: transport timeout, transport connection failure,
    /// any other transport failure, then by HTTP status class (2xx with
    /// payload inspection, 4xx, everything else as server error).
    #[must_use]
    pub fn classify(
        &self,
        outcome: Result<TransportResponse, TransportError>,
    ) -> ApiOutcome {
        match outcome {
            Err(TransportError::Timeout { after_secs }) => ApiOutcome::failure(
                ErrorKind::Timeout,
                format!("API timeout after {after_secs} seconds"),
            ),
            Err(TransportError::Connection(_)) => {
                ApiOutcome::failure(ErrorKind::Connection, "cannot connect to subsidy API")
            }
            Err(TransportError::Request(detail)) => {
                ApiOutcome::failure(ErrorKind::Request, format!("API request failed: {detail}"))
            }
            Ok(response) => self.classify_response(&response),
        }
    }

    fn classify_response(&self, response: &TransportResponse) -> ApiOutcome {
        self.observer.response_received(response.status);

        match response.status {
            200..=299 => self.classify_success_body(&response.body),
            400..=499 => http_error_outcome(ErrorKind::ClientError, response),
            _ => http_error_outcome(ErrorKind::ServerError, response),
        }
    }

    fn classify_success_body(&self, body: &[u8]) -> ApiOutcome {
        // A non-JSON 2xx body is not itself an error: success, no payload.
        let Ok(parsed) = serde_json::from_slice::<Value>(body) else {
            return ApiOutcome::Success { data: None, message: VALIDATED_MESSAGE.to_owned() };
        };

        if body_flags_rejection(&parsed) {
            let message = parsed
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or(VALIDATION_FAILED_MESSAGE)
                .to_owned();
            return ApiOutcome::Failure {
                kind: ErrorKind::ValidationError,
                message,
                status_code: None,
                raw_body: Some(parsed),
            };
        }

        let message = parsed
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or(VALIDATED_MESSAGE)
            .to_owned();
        let data = SubsidyExtractor::new(self.observer).extract(&parsed);

        ApiOutcome::Success { data: Some(data), message }
    }
}

impl fmt::Debug for ResultClassifier<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResultClassifier").finish_non_exhaustive()
    }
}

/// True when a 2xx body semantically reports a rejection: `status` equals
/// `"error"`, or a `valide`/`valid` field is explicitly `false`.
fn body_flags_rejection(body: &Value) -> bool {
    if body.get("status").and_then(Value::as_str) == Some("error") {
        return true;
    }
    ["valide", "valid"]
        .into_iter()
        .any(|key| body.get(key).and_then(Value::as_bool) == Some(false))
}

fn http_error_outcome(kind: ErrorKind, response: &TransportResponse) -> ApiOutcome {
    let status = response.status;
    let generic = match kind {
        ErrorKind::ClientError => format!("client error {status}"),
        _ => format!("server error {status}"),
    };

    let message = serde_json::from_slice::<Value>(&response.body)
        .ok()
        .and_then(|body| {
            body.get("message")
                .or_else(|| body.get("error"))
                .and_then(Value::as_str)
                .map(str::to_owned)
        })
        .unwrap_or(generic);

    ApiOutcome::Failure { kind, message, status_code: Some(status), raw_body: None }
}
