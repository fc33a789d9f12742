//! HTTP transport implementation using reqwest.

use std::{sync::LazyLock, time::Duration};

use reqwest::Client;

use super::{RequestContext, Transport, TransportResponse, config::HttpConfig};
use crate::error::TransportError;

/// Default HTTP client with connection pooling enabled.
///
/// Using a singleton avoids recreating the client per transport instance,
/// preserving connection pooling benefits across all default transports.
/// No global request timeout is set here: each call carries its own hard
/// deadline from the connector configuration.
static DEFAULT_HTTP_CLIENT: LazyLock<Client> = LazyLock::new(|| {
    Client::builder()
        .pool_max_idle_per_host(10)
        .connect_timeout(Duration::from_secs(10))
        .build()
        .expect("failed to create default HTTP client")
});

/// Joins a base URL and a path, stripping a trailing slash from the base.
pub(crate) fn join_url(base_url: &str, path: &str) -> String {
    format!("{}{path}", base_url.trim_end_matches('/'))
}

/// Maps a reqwest failure onto the transport taxonomy.
///
/// Order matters: reqwest reports timeouts as a flavour of request error,
/// so the timeout check comes first.
fn map_transport_error(err: &reqwest::Error, timeout: Duration) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout { after_secs: timeout.as_secs() }
    } else if err.is_connect() {
        TransportError::Connection(err.to_string())
    } else {
        TransportError::Request(err.to_string())
    }
}

/// HTTP transport backed by a pooled reqwest client.
///
/// # Examples
///
/// ```rust,no_run
/// use std::time::Duration;
///
/// use subsidy_connector::transport::{HttpTransport, RequestContext, Transport};
///
/// # async fn example() -> Result<(), subsidy_connector::TransportError> {
/// let transport = HttpTransport::new();
///
/// let ctx = RequestContext {
///     base_url: "http://localhost:8080/api/payments",
///     path: "/v2/validate",
///     headers: vec![("User-Agent", "subsidy-connector/0.1.0")],
///     timeout: Duration::from_secs(30),
/// };
///
/// let response = transport.post_json(ctx, b"{}").await?;
/// println!("status: {}", response.status);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Creates a transport sharing the pooled singleton client.
    #[must_use]
    pub fn new() -> Self {
        Self { client: DEFAULT_HTTP_CLIENT.clone() }
    }

    /// Creates a transport with a dedicated client built from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Request`] if the HTTP client cannot be built.
    pub fn with_config(config: &HttpConfig) -> Result<Self, TransportError> {
        let client = Client::builder()
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .connect_timeout(config.connect_timeout())
            .build()
            .map_err(|e| TransportError::Request(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client })
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for HttpTransport {
    async fn post_json<'a>(
        &'a self,
        ctx: RequestContext<'a>,
        body: &'a [u8],
    ) -> Result<TransportResponse, TransportError> {
        let url = join_url(ctx.base_url, ctx.path);

        let mut request = self
            .client
            .post(&url)
            .timeout(ctx.timeout)
            .header("Content-Type", "application/json")
            .header("Accept", "application/json")
            .body(body.to_vec());

        for (key, value) in ctx.headers {
            request = request.header(key, value);
        }

        let response = request.send().await.map_err(|e| map_transport_error(&e, ctx.timeout))?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| map_transport_error(&e, ctx.timeout))?
            .to_vec();

        Ok(TransportResponse { status, body })
    }
}
