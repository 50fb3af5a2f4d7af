//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, InboundRequest capture)
//!     → handler.rs (GET check, failure boundary)
//!     → request.rs (build upstream URL and headers)
//!     → client.rs (upstream call with timeout)
//!     → response.rs (strip, add CORS/cache headers, copy body)
//!     → Send to client
//! ```

pub mod client;
pub mod handler;
pub mod headers;
pub mod request;
pub mod response;
pub mod server;

pub use client::{Upstream, UpstreamClient};
pub use handler::RequestForwarder;
pub use headers::HeaderList;
pub use request::{build_upstream_request, InboundRequest, OutboundRequest};
pub use response::{build_downstream_response, OutboundResponse, UpstreamResponse};
pub use server::HttpServer;
