//! Transport abstraction for the outbound API call.
//!
//! The connector talks to the subsidy API through the [`Transport`] trait so
//! the network layer can be replaced in tests with a scripted double. The
//! production implementation is [`HttpTransport`], built on a pooled reqwest
//! client.
//!
//! Unlike a transport that treats HTTP error statuses as failures, this one
//! returns every received response (2xx, 4xx and 5xx alike) as `Ok`. Only
//! network-layer faults (timeout, connection refusal, other request errors)
//! surface as [`TransportError`], because the classifier needs the status
//! code and body of error responses to build its outcome.

use std::{future::Future, sync::Arc, time::Duration};

use crate::error::TransportError;

pub mod config;
pub mod http;

pub use config::HttpConfig;
pub use http::HttpTransport;

/// Request context for a single outbound call.
#[derive(Debug, Clone)]
pub struct RequestContext<'a> {
    /// API base URL; a trailing slash is stripped before joining.
    pub base_url: &'a str,
    /// Request path appended to the base URL (e.g. "/v2/validate").
    pub path: &'a str,
    /// Additional headers beyond the JSON content negotiation pair.
    pub headers: Vec<(&'a str, &'a str)>,
    /// Hard deadline for the whole request.
    pub timeout: Duration,
}

/// Raw response from a transport call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    /// HTTP status code.
    pub status: u16,
    /// Raw response body bytes.
    pub body: Vec<u8>,
}

impl TransportResponse {
    /// Convenience constructor for a status/body pair.
    #[must_use]
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self { status, body: body.into() }
    }
}

/// Transport seam for the single outbound POST.
///
/// Implementations must make exactly one attempt per call; retry policy is
/// explicitly the caller's concern, not the transport's.
pub trait Transport: Send + Sync {
    /// Posts a JSON body and returns the raw response.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] only for network-layer faults; HTTP error
    /// statuses are returned as `Ok` responses.
    fn post_json<'a>(
        &'a self,
        ctx: RequestContext<'a>,
        body: &'a [u8],
    ) -> impl Future<Output = Result<TransportResponse, TransportError>> + Send + 'a;
}

/// A shared transport is a transport: lets several connectors reuse one
/// client, and lets tests keep a handle on the double they inject.
impl<T: Transport> Transport for Arc<T> {
    fn post_json<'a>(
        &'a self,
        ctx: RequestContext<'a>,
        body: &'a [u8],
    ) -> impl Future<Output = Result<TransportResponse, TransportError>> + Send + 'a {
        (**self).post_json(ctx, body)
    }
}
