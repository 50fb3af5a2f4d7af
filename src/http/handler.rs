//! The request handler: the proxy's single failure boundary.
//!
//! ```text
//! InboundRequest
//!     → method check (GET only)
//!     → request::build_upstream_request
//!     → Upstream::invoke
//!     → response::build_downstream_response
//!     → OutboundResponse
//! ```
//!
//! Every failure on the way, including a panic, becomes the same 500.

use std::any::Any;
use std::backtrace::Backtrace;
use std::panic::AssertUnwindSafe;
use std::time::Instant;

use futures_util::FutureExt;

use crate::config::schema::UpstreamConfig;
use crate::error::ProxyError;
use crate::http::client::Upstream;
use crate::http::request::{build_upstream_request, InboundRequest};
use crate::http::response::{build_downstream_response, error_response, OutboundResponse};
use crate::observability::metrics;

pub struct RequestForwarder<U> {
    upstream: U,
    config: UpstreamConfig,
}

impl<U: Upstream> RequestForwarder<U> {
    pub fn new(upstream: U, config: UpstreamConfig) -> Self {
        Self { upstream, config }
    }

    /// Proxy one request. Never fails.
    pub async fn handle(&self, inbound: InboundRequest) -> OutboundResponse {
        let started = Instant::now();

        let result = AssertUnwindSafe(self.process(&inbound))
            .catch_unwind()
            .await
            .unwrap_or_else(|panic| Err(ProxyError::Panicked(panic_message(panic.as_ref()))));

        match result {
            Ok(response) => {
                metrics::record_request("forwarded", response.status.as_u16(), started);
                response
            }
            Err(error) => {
                tracing::error!(
                    kind = error.kind().as_str(),
                    error = %error.chain(),
                    method = %inbound.method,
                    path = %inbound.path,
                    backtrace = %Backtrace::force_capture(),
                    "Proxying failed"
                );
                metrics::record_failure(error.kind());

                let response = error_response(&error);
                metrics::record_request("failed", response.status.as_u16(), started);
                response
            }
        }
    }

    async fn process(&self, inbound: &InboundRequest) -> Result<OutboundResponse, ProxyError> {
        tracing::info!(
            method = %inbound.method,
            path = %inbound.path,
            query = %inbound.query,
            remote_addr = inbound.remote_addr.as_deref().unwrap_or_default(),
            headers = %inbound.headers.to_json(),
            "Incoming request"
        );
        if inbound.method != "GET" {
            return Err(ProxyError::MethodNotAllowed(inbound.method.clone()));
        }

        let request = build_upstream_request(inbound, &self.config)?;
        tracing::info!(
            url = %request.url,
            headers = %request.headers.to_json(),
            "Request to upstream"
        );

        let upstream = self.upstream.invoke(&request).await?;
        tracing::info!(
            status = upstream.status.as_u16(),
            headers = %upstream.headers.to_json(),
            "Response from upstream"
        );

        let response = build_downstream_response(upstream);
        tracing::info!(
            status = response.status.as_u16(),
            body_bytes = response.body.len(),
            headers = %response.headers.to_json(),
            "Responding"
        );

        Ok(response)
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
