//! Upstream invocation.
//!
//! # Responsibilities
//! - Send the normalized GET request to the upstream
//! - Bound the wait for response headers, and every body read, by the configured timeout
//! - Hand back status, headers and the fully read body
//!
//! # Design Decisions
//! - The URL goes out as an `http::Uri`, so dot segments and escapes in the
//!   path are sent exactly as received
//! - Upstream 4xx/5xx are ordinary responses, never errors
//! - One attempt per call; the shared client pools connections

use std::time::Duration;

use async_trait::async_trait;
use axum::body::{Body, Bytes};
use axum::http::{Request, Uri};
use futures_util::StreamExt;
use hyper_tls::HttpsConnector;
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use tokio_native_tls::TlsConnector;

use crate::config::schema::UpstreamConfig;
use crate::error::{ProxyError, UpstreamError};
use crate::http::headers::HeaderList;
use crate::http::request::OutboundRequest;
use crate::http::response::UpstreamResponse;
use crate::resilience::timeouts::with_timeout;

/// Something that can perform the upstream call.
#[async_trait]
pub trait Upstream: Send + Sync {
    async fn invoke(&self, request: &OutboundRequest) -> Result<UpstreamResponse, ProxyError>;
}

/// The production upstream, backed by a pooled `hyper` client speaking HTTP or HTTPS.
#[derive(Clone)]
pub struct UpstreamClient {
    client: Client<HttpsConnector<HttpConnector>, Body>,
    timeout: Duration,
}

impl UpstreamClient {
    pub fn new(config: &UpstreamConfig) -> Result<Self, native_tls::Error> {
        let mut http = HttpConnector::new();
        http.enforce_http(false);
        let tls = native_tls::TlsConnector::new()?;
        let connector = HttpsConnector::from((http, TlsConnector::from(tls)));

        let client = Client::builder(TokioExecutor::new()).build(connector);
        Ok(Self {
            client,
            timeout: config.timeout(),
        })
    }
}

#[async_trait]
impl Upstream for UpstreamClient {
    async fn invoke(&self, request: &OutboundRequest) -> Result<UpstreamResponse, ProxyError> {
        let uri: Uri = request
            .url
            .parse()
            .map_err(|_| ProxyError::InvalidUrl(request.url.clone()))?;
        let mut req = Request::get(uri)
            .body(Body::empty())
            .map_err(|_| ProxyError::InvalidUrl(request.url.clone()))?;
        *req.headers_mut() = request.headers.to_header_map()?;

        let send = async {
            self.client
                .request(req)
                .await
                .map_err(|e| UpstreamError::ConnectionFailed(e.into()))
        };
        let response = with_timeout(self.timeout, send).await?;

        let (parts, body) = response.into_parts();
        let body = read_body(Body::new(body), self.timeout).await?;

        Ok(UpstreamResponse {
            status: parts.status,
            headers: HeaderList::from_header_map(&parts.headers),
            body,
        })
    }
}

/// Read `body` to the end. Each chunk must arrive within `idle` of the previous one.
async fn read_body(body: Body, idle: Duration) -> Result<Bytes, UpstreamError> {
    let mut stream = body.into_data_stream();
    let mut collected = Vec::new();

    loop {
        let next = async {
            stream
                .next()
                .await
                .transpose()
                .map_err(|e| UpstreamError::ConnectionFailed(e.into()))
        };
        match with_timeout(idle, next).await? {
            Some(chunk) => collected.extend_from_slice(&chunk),
            None => return Ok(Bytes::from(collected)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::stream;
    use std::convert::Infallible;

    #[tokio::test]
    async fn test_read_body_concatenates_chunks() {
        let chunks = stream::iter(vec![
            Ok::<_, Infallible>(Bytes::from_static(b"{\"properties\":")),
            Ok(Bytes::from_static(b"{}}")),
        ]);
        let body = read_body(Body::from_stream(chunks), Duration::from_secs(1))
            .await
            .unwrap();
        assert_eq!(&body[..], b"{\"properties\":{}}");
    }

    #[tokio::test]
    async fn test_read_body_times_out_on_stalled_stream() {
        let chunks = stream::iter(vec![Ok::<_, Infallible>(Bytes::from_static(b"partial"))])
            .chain(stream::pending());
        let err = read_body(Body::from_stream(chunks), Duration::from_millis(50))
            .await
            .unwrap_err();
        assert!(matches!(err, UpstreamError::Timeout(d) if d == Duration::from_millis(50)));
    }

    #[tokio::test]
    async fn test_broken_body_is_connection_failure() {
        let chunks = stream::iter(vec![
            Ok(Bytes::from_static(b"partial")),
            Err(std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset by peer")),
        ]);
        let err = read_body(Body::from_stream(chunks), Duration::from_secs(1))
            .await
            .unwrap_err();
        assert!(matches!(err, UpstreamError::ConnectionFailed(_)));
    }

    #[tokio::test]
    async fn test_unparseable_url_is_rejected() {
        let client = UpstreamClient::new(&UpstreamConfig::default()).unwrap();
        let request = OutboundRequest {
            url: "https://api.met.no/weather api?".to_string(),
            headers: HeaderList::new(),
        };
        let err = client.invoke(&request).await.unwrap_err();
        assert!(matches!(err, ProxyError::InvalidUrl(_)));
    }
}
