use futures::Future;

use crate::Result;

/// Run an operation until it succeeds, fails with a non-retryable error,
/// or `max_attempts` is reached.
pub async fn with_retries<T, F, Fut>(max_attempts: u32, mut operation: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut attempt = 1;
    loop {
        match operation().await {
            Err(e) if e.is_retryable() && attempt < max_attempts => attempt += 1,
            other => return other,
        }
    }
}
