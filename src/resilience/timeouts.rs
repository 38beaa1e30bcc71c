//! Timeout enforcement.
//!
//! # Responsibilities
//! - Bound the total time spent relaying one request
//! - Cancel the in-flight work cleanly on expiry
//!
//! # Design Decisions
//! - Uses Tokio's timeout facilities
//! - Timeout errors are distinct from other errors

use std::future::Future;
use std::time::Duration;

use crate::http::response::RelayError;

/// Run `work`, failing with [`RelayError::Timeout`] if it outlives `deadline`.
pub async fn with_deadline<T, F>(deadline: Duration, work: F) -> Result<T, RelayError>
where
    F: Future<Output = Result<T, RelayError>>,
{
    match tokio::time::timeout(deadline, work).await {
        Ok(result) => result,
        Err(_) => Err(RelayError::Timeout(deadline)),
    }
}
