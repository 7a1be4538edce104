//! Global pacing for upstream requests.
//!
//! [`RequestGate`] is a fixed-delay semaphore: a request holds one of
//! `max_in_flight` permits while it runs and for the courtesy delay that
//! follows it. With one permit this reproduces strictly sequential calls
//! separated by the configured delays.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Semaphore;

#[derive(Debug, Clone)]
pub struct RequestGate {
    permits: Arc<Semaphore>,
}

impl RequestGate {
    /// A gate allowing `max_in_flight` outstanding requests (minimum 1).
    #[must_use]
    pub fn new(max_in_flight: usize) -> Self {
        Self {
            permits: Arc::new(Semaphore::new(max_in_flight.max(1))),
        }
    }

    /// Runs `request`, then waits `hold` before releasing the permit.
    ///
    /// The delay is served whether or not the request succeeded.
    pub async fn paced<F: Future>(&self, hold: Duration, request: F) -> F::Output {
        // The semaphore is never closed, so acquisition only fails if that changes.
        let _permit = self.permits.acquire().await.ok();
        let output = request.await;
        pause(hold).await;
        output
    }

    /// Permits not currently held.
    #[must_use]
    pub fn available(&self) -> usize {
        self.permits.available_permits()
    }
}

/// Sleep for `delay`, skipping the timer entirely when it is zero.
pub(crate) async fn pause(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}
