//! Timeout enforcement.
//!
//! # Responsibilities
//! - Wrap the upstream call with a deadline
//! - Cancel the call cleanly on timeout
//!
//! # Design Decisions
//! - Uses Tokio's timeout facilities; the inner future is dropped on expiry
//! - Timeout errors are distinct from connection errors

use std::future::Future;
use std::time::Duration;

use crate::error::UpstreamError;

/// Run `fut`, failing with [`UpstreamError::Timeout`] if it has not finished after `limit`.
pub async fn with_timeout<F, T>(limit: Duration, fut: F) -> Result<T, UpstreamError>
where
    F: Future<Output = Result<T, UpstreamError>>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result,
        Err(_) => Err(UpstreamError::Timeout(limit)),
    }
}
