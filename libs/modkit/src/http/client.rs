//! Traced HTTP client that propagates trace context on every request.
//!
//! A thin wrapper around `reqwest::Client`: each request runs inside an
//! `outgoing_http` span, carries a `traceparent` header and records the
//! response status on the span.

use crate::http::simple_otel;
use tracing::{field, Instrument, Level};

#[derive(Clone, Debug)]
pub struct TracedClient {
    inner: reqwest::Client,
}

impl TracedClient {
    /// Create a new TracedClient wrapping the provided reqwest::Client
    pub fn new(inner: reqwest::Client) -> Self {
        Self { inner }
    }

    /// Execute a built request inside an `outgoing_http` span.
    pub async fn execute(&self, mut req: reqwest::Request) -> reqwest::Result<reqwest::Response> {
        let span = tracing::span!(
            Level::INFO,
            "outgoing_http",
            http.method = %req.method(),
            http.url = %redacted_url(req.url()),
            http.status_code = field::Empty,
            trace_id = field::Empty,
            error = field::Empty,
            otel.kind = "client",
        );

        simple_otel::inject_trace_context(req.headers_mut(), &span);

        async {
            let response = self.inner.execute(req).await?;
            let status = response.status();
            let span = tracing::Span::current();
            span.record("http.status_code", status.as_u16());
            if status.is_client_error() || status.is_server_error() {
                span.record("error", true);
            }
            Ok::<_, reqwest::Error>(response)
        }
        .instrument(span)
        .await
    }

    /// Build and execute a request prepared with [`TracedClient::request`].
    pub async fn send(&self, builder: reqwest::RequestBuilder) -> reqwest::Result<reqwest::Response> {
        let req = builder.build()?;
        self.execute(req).await
    }

    /// Start a request builder; finish it with [`TracedClient::send`].
    pub fn request(&self, method: reqwest::Method, url: reqwest::Url) -> reqwest::RequestBuilder {
        self.inner.request(method, url)
    }
}

/// Query strings may carry filters with user data; keep them out of logs.
fn redacted_url(url: &reqwest::Url) -> String {
    let mut clean = url.clone();
    clean.set_query(None);
    clean.to_string()
}

impl From<reqwest::Client> for TracedClient {
    fn from(c: reqwest::Client) -> Self {
        Self::new(c)
    }
}

impl Default for TracedClient {
    fn default() -> Self {
        Self::new(reqwest::Client::new())
    }
}
