//! Timeout enforcement.
//!
//! Backend calls already carry the client-wide connect and request
//! timeouts. Routes that must answer even when the backend is down wrap
//! their call in a shorter deadline and serve a static payload instead.

use std::future::Future;
use std::time::Duration;

use tokio::time::timeout;

/// Outcome of a call raced against a deadline.
#[derive(Debug, PartialEq, Eq)]
pub enum Deadline<T> {
    Completed(T),
    Expired,
}

/// Run `fut`, giving up after `limit`.
pub async fn with_deadline<F>(limit: Duration, fut: F) -> Deadline<F::Output>
where
    F: Future,
{
    match timeout(limit, fut).await {
        Ok(output) => Deadline::Completed(output),
        Err(_) => Deadline::Expired,
    }
}
