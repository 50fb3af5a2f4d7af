//! Response handling and transformation.
//!
//! # Responsibilities
//! - Transform the upstream response for the browser caller
//! - Strip hop-by-hop headers, add CORS and caching headers
//! - Render the fixed plain-text failure response
//!
//! # Design Decisions
//! - The upstream body arrives fully read and is copied byte for byte
//! - Upstream 4xx/5xx statuses pass through untouched

use axum::{
    body::{Body, Bytes},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};

use crate::error::ProxyError;
use crate::http::headers::HeaderList;
use crate::security::headers::is_hop_by_hop;

/// Forecasts are unlikely to change much within half an hour.
pub const CACHE_CONTROL: &str = "public, max-age=1800";

/// Leading line of every failure response body.
pub const CONTACT_MESSAGE: &str =
    "Proxying to api.met.no failed, please report this at https://github.com/walles/api-met-no-proxy";

/// What the upstream sent back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub headers: HeaderList,
    pub body: Bytes,
}

/// The response returned to the original caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundResponse {
    pub status: StatusCode,
    pub headers: HeaderList,
    pub body: Bytes,
}

/// Build the caller's response from the upstream one.
pub fn build_downstream_response(upstream: UpstreamResponse) -> OutboundResponse {
    let mut headers = HeaderList::new();
    for (name, value) in upstream.headers.iter() {
        if is_hop_by_hop(name) {
            continue;
        }
        headers.add(name, value.clone());
    }

    // Allow use from JavaScript
    headers.set("Access-Control-Allow-Origin", HeaderValue::from_static("*"));
    headers.set("Access-Control-Allow-Methods", HeaderValue::from_static("GET"));
    headers.set("Cache-Control", HeaderValue::from_static(CACHE_CONTROL));

    OutboundResponse {
        status: upstream.status,
        headers,
        body: upstream.body,
    }
}

/// The one response every failure kind collapses into.
pub fn error_response(error: &ProxyError) -> OutboundResponse {
    let mut headers = HeaderList::new();
    headers.set(
        header::CONTENT_TYPE.as_str(),
        HeaderValue::from_static("text/plain; charset=utf-8"),
    );

    OutboundResponse {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        headers,
        body: Bytes::from(format!("{CONTACT_MESSAGE}\n\n{}\n", error.chain())),
    }
}

impl IntoResponse for OutboundResponse {
    fn into_response(self) -> Response {
        let headers = match self.headers.to_header_map() {
            Ok(headers) => headers,
            Err(e) => {
                tracing::error!(error = %e, "Dropping response with unforwardable headers");
                return error_response(&e).into_response();
            }
        };

        let mut response = Response::new(Body::from(self.body));
        *response.status_mut() = self.status;
        *response.headers_mut() = headers;
        response
    }
}
