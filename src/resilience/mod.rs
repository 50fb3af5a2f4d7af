//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Request to upstream:
//!     → timeouts.rs (enforce deadline until response headers arrive)
//!     → On expiry: UpstreamError::Timeout, no retry
//! ```
//!
//! # Design Decisions
//! - Timeouts are non-negotiable; the upstream call always has a deadline
//! - No retries: a failed call becomes the fixed error response

pub mod timeouts;
