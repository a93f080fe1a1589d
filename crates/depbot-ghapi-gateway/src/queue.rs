use depbot_ghapi_interface::{ApiError, Result};
use tokio::sync::{Semaphore, SemaphorePermit};

/// Bounded-concurrency request queue.
pub struct RequestQueue {
    name: &'static str,
    permits: Semaphore,
}

impl RequestQueue {
    /// One request at a time.
    pub fn serial(name: &'static str) -> Self {
        Self::bounded(name, 1)
    }

    pub fn bounded(name: &'static str, concurrency: usize) -> Self {
        Self {
            name,
            permits: Semaphore::new(concurrency.max(1)),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn available(&self) -> usize {
        self.permits.available_permits()
    }

    /// Wait for a slot.
    pub async fn acquire(&self) -> Result<SemaphorePermit<'_>> {
        self.permits
            .acquire()
            .await
            .map_err(|e| ApiError::ImplementationError { source: e.into() })
    }
}
