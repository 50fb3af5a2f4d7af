//! Request normalization.
//!
//! # Responsibilities
//! - Capture the caller's request as an immutable [`InboundRequest`]
//! - Build the upstream URL from the base URL, path and raw query
//! - Strip hop-by-hop headers, force `Host`, add `X-Forwarded-For`
//!
//! # Design Decisions
//! - Path and query are forwarded verbatim; the upstream judges them
//! - Normalization is a pure function so it can be tested without I/O

use std::net::SocketAddr;

use axum::http::request::Parts;
use axum::http::HeaderValue;

use crate::config::schema::UpstreamConfig;
use crate::error::ProxyError;
use crate::http::headers::HeaderList;
use crate::security::headers::{is_hop_by_hop, X_FORWARDED_FOR};

/// The caller's request, as received by the hosting layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundRequest {
    pub method: String,
    pub path: String,
    /// Raw query string without the leading `?`.
    pub query: String,
    pub headers: HeaderList,
    pub remote_addr: Option<String>,
}

impl InboundRequest {
    /// Capture an axum request head. The body is never read.
    pub fn from_parts(parts: &Parts, peer: Option<SocketAddr>) -> Self {
        Self {
            method: parts.method.as_str().to_string(),
            path: parts.uri.path().to_string(),
            query: parts.uri.query().unwrap_or_default().to_string(),
            headers: HeaderList::from_header_map(&parts.headers),
            remote_addr: peer.map(|addr| addr.ip().to_string()),
        }
    }
}

/// A fully described GET request to the upstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundRequest {
    pub url: String,
    pub headers: HeaderList,
}

/// Build the upstream request for `inbound`.
///
/// Example result: `https://api.met.no/weatherapi/locationforecast/2.0/classic?lat=12;lon=34`
pub fn build_upstream_request(
    inbound: &InboundRequest,
    upstream: &UpstreamConfig,
) -> Result<OutboundRequest, ProxyError> {
    let url = format!("{}{}?{}", upstream.base_url, inbound.path, inbound.query);

    let mut headers = HeaderList::new();
    for (name, value) in inbound.headers.iter() {
        if is_hop_by_hop(name) {
            continue;
        }
        headers.set(name, value.clone());
    }
    headers.set("Host", header_value("Host", &upstream.host)?);

    if let Some(addr) = inbound.remote_addr.as_deref().filter(|addr| !addr.is_empty()) {
        headers.set(X_FORWARDED_FOR, header_value(X_FORWARDED_FOR, addr)?);
    }

    Ok(OutboundRequest { url, headers })
}

fn header_value(name: &str, value: &str) -> Result<HeaderValue, ProxyError> {
    HeaderValue::from_str(value).map_err(|_| ProxyError::InvalidHeader { name: name.to_string() })
}
