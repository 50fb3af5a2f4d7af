//! Failure taxonomy for the forwarding pipeline.
//!
//! Every stage returns `Result<_, ProxyError>`. The request handler is the
//! only place that matches on it, and it collapses every kind into the same
//! 500 response.

use std::error::Error as _;
use std::time::Duration;

use axum::BoxError;
use thiserror::Error;

/// Coarse classification of a failure, used for logging and metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    MethodNotAllowed,
    UpstreamTimeout,
    UpstreamConnectionFailure,
    UnexpectedFault,
}

impl ErrorKind {
    /// Stable label for metrics and log fields.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::MethodNotAllowed => "method_not_allowed",
            ErrorKind::UpstreamTimeout => "upstream_timeout",
            ErrorKind::UpstreamConnectionFailure => "upstream_connection_failure",
            ErrorKind::UnexpectedFault => "unexpected_fault",
        }
    }
}

/// The upstream call could not produce a response.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("upstream did not respond within {0:?}")]
    Timeout(Duration),

    #[error("upstream connection failed")]
    ConnectionFailed(#[source] BoxError),
}

/// Any failure while handling a single request.
#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("Method must be GET: <{0}>")]
    MethodNotAllowed(String),

    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    #[error("header {name:?} cannot be forwarded")]
    InvalidHeader { name: String },

    #[error("upstream URL {0:?} is not a valid URI")]
    InvalidUrl(String),

    #[error("request handling panicked: {0}")]
    Panicked(String),
}

impl ProxyError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ProxyError::MethodNotAllowed(_) => ErrorKind::MethodNotAllowed,
            ProxyError::Upstream(UpstreamError::Timeout(_)) => ErrorKind::UpstreamTimeout,
            ProxyError::Upstream(UpstreamError::ConnectionFailed(_)) => {
                ErrorKind::UpstreamConnectionFailure
            }
            ProxyError::InvalidHeader { .. } | ProxyError::InvalidUrl(_) | ProxyError::Panicked(_) => {
                ErrorKind::UnexpectedFault
            }
        }
    }

    /// Render the error and all of its sources, outermost first.
    pub fn chain(&self) -> String {
        let mut out = self.to_string();
        let mut source = self.source();
        while let Some(cause) = source {
            out.push_str("\ncaused by: ");
            out.push_str(&cause.to_string());
            source = cause.source();
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds() {
        assert_eq!(
            ProxyError::MethodNotAllowed("POST".into()).kind(),
            ErrorKind::MethodNotAllowed
        );
        assert_eq!(
            ProxyError::from(UpstreamError::Timeout(Duration::from_secs(5))).kind(),
            ErrorKind::UpstreamTimeout
        );
        assert_eq!(
            ProxyError::from(UpstreamError::ConnectionFailed("refused".into())).kind(),
            ErrorKind::UpstreamConnectionFailure
        );
        assert_eq!(
            ProxyError::Panicked("boom".into()).kind(),
            ErrorKind::UnexpectedFault
        );
        assert_eq!(
            ProxyError::InvalidUrl("https://api.met.no/a b?".into()).kind(),
            ErrorKind::UnexpectedFault
        );
    }

    #[test]
    fn test_chain_includes_sources() {
        let err = ProxyError::from(UpstreamError::ConnectionFailed("dns lookup failed".into()));
        let chain = err.chain();
        assert!(chain.starts_with("upstream connection failed"));
        assert!(chain.contains("caused by: dns lookup failed"));
    }
}
