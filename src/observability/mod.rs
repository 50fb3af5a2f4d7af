//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Request handler produces:
//!     → logging.rs (structured log events, one JSON line each)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → Hosting platform log sink (stdout)
//!     → Metrics endpoint (Prometheus scrape, optional)
//! ```
//!
//! # Design Decisions
//! - Request ID lives on the request span, never in forwarded headers
//! - Metrics are cheap and disabled unless configured

pub mod logging;
pub mod metrics;
