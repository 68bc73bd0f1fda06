//! Admission gate for registry requests
//!
//! Bounds the number of simultaneous in-flight fetches and enforces a
//! minimum spacing between request starts. This is an admission gate, not a
//! queue: callers hold their permit for the duration of the fetch and the
//! spacing clock is the only shared mutable state, serialized behind a
//! mutex. The limiter is passed into the checker explicitly so tests can
//! run it against a fake registry with tight parameters.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, OwnedSemaphorePermit, Semaphore};
use tokio::time::Instant;

/// Maximum simultaneous in-flight requests
pub const DEFAULT_MAX_CONCURRENT: usize = 5;

/// Minimum spacing between request starts
pub const DEFAULT_MIN_INTERVAL: Duration = Duration::from_millis(50);

/// Concurrency limiter shared by all resolution tasks
pub struct RateLimiter {
    permits: Arc<Semaphore>,
    min_interval: Duration,
    next_start: Mutex<Option<Instant>>,
}

impl RateLimiter {
    pub fn new(max_concurrent: usize, min_interval: Duration) -> Self {
        Self {
            permits: Arc::new(Semaphore::new(max_concurrent)),
            min_interval,
            next_start: Mutex::new(None),
        }
    }

    /// Wait until a request may start; the returned permit must be held for
    /// the duration of the request.
    pub async fn admit(&self) -> OwnedSemaphorePermit {
        let permit = self
            .permits
            .clone()
            .acquire_owned()
            .await
            .expect("limiter semaphore closed");

        let wait = {
            let mut next_start = self.next_start.lock().await;
            let now = Instant::now();
            match *next_start {
                Some(at) if at > now => {
                    *next_start = Some(at + self.min_interval);
                    at - now
                }
                _ => {
                    *next_start = Some(now + self.min_interval);
                    Duration::ZERO
                }
            }
        };

        if !wait.is_zero() {
            tokio::time::sleep(wait).await;
        }

        permit
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_CONCURRENT, DEFAULT_MIN_INTERVAL)
    }
}
