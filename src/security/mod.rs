//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request / upstream response:
//!     → headers.rs (drop hop-by-hop headers)
//!     → request.rs / response.rs (inject forwarding and CORS headers)
//! ```
//!
//! # Design Decisions
//! - The hop-by-hop set is a compile-time constant, never mutated
//! - Comparison is case-insensitive; the forwarded name keeps its casing

pub mod headers;
