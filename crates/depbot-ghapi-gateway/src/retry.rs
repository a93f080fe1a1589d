use std::time::Duration;

use backoff::{backoff::Backoff, ExponentialBackoff, ExponentialBackoffBuilder};

/// Capped exponential backoff giving up after a fixed number of attempts.
pub struct BoundedBackoff {
    inner: ExponentialBackoff,
    retries_left: u32,
}

impl BoundedBackoff {
    pub fn new(max_attempts: u32, initial_interval: Duration, max_interval: Duration) -> Self {
        Self {
            inner: ExponentialBackoffBuilder::new()
                .with_initial_interval(initial_interval)
                .with_max_interval(max_interval)
                .with_max_elapsed_time(None)
                .build(),
            retries_left: max_attempts.saturating_sub(1),
        }
    }
}

impl Backoff for BoundedBackoff {
    fn next_backoff(&mut self) -> Option<Duration> {
        if self.retries_left == 0 {
            return None;
        }

        self.retries_left -= 1;
        self.inner.next_backoff()
    }

    fn reset(&mut self) {
        self.inner.reset()
    }
}
