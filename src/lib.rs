//! Forwarding proxy for the api.met.no weather API.
//!
//! Rewrites browser requests into upstream requests and upstream responses
//! into CORS-enabled, cacheable responses.

pub mod config;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod resilience;
pub mod security;

pub use config::schema::ProxyConfig;
pub use error::{ErrorKind, ProxyError, UpstreamError};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
