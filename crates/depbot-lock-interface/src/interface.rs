use std::time::Duration;

use async_trait::async_trait;
use futures::Future;

use crate::{LockError, LockStatus};

/// Lock service.
#[cfg_attr(any(test, feature = "testkit"), mockall::automock)]
#[async_trait]
pub trait LockService: Send + Sync {
    /// Tries to lock a resource.
    async fn try_lock_resource<'a>(&'a self, name: &str) -> Result<LockStatus<'a>, LockError>;
    /// Checks if resource exists.
    async fn has_resource(&self, name: &str) -> Result<bool, LockError>;
    /// Deletes a resource if it exists.
    async fn del_resource(&self, name: &str) -> Result<(), LockError>;
    /// Sleep for duration.
    async fn sleep_for_duration(&self, duration: Duration) -> Result<(), LockError>;

    /// Wait for a resource lock, until timeout.
    #[tracing::instrument(skip(self), ret)]
    async fn wait_lock_resource<'a>(
        &'a self,
        name: &str,
        timeout_ms: u64,
    ) -> Result<LockStatus<'a>, LockError> {
        // Try each 100ms
        let mut elapsed_time = 0;
        let millis = 100;
        let duration = Duration::from_millis(millis);

        loop {
            match self.try_lock_resource(name).await? {
                l @ LockStatus::SuccessfullyLocked(_) => return Ok(l),
                LockStatus::AlreadyLocked => (),
            }

            if elapsed_time > timeout_ms {
                return Ok(LockStatus::AlreadyLocked);
            } else {
                self.sleep_for_duration(duration).await?;
                elapsed_time += millis;
            }
        }
    }
    /// Health check
    async fn health_check(&self) -> Result<(), LockError>;
}

/// Output of a locked section.
#[derive(Debug)]
pub enum UsingLockResult<T> {
    /// Lock could not be acquired before timeout.
    AlreadyLocked,
    /// Section ran.
    Locked(T),
}

/// Run a section while holding a named lock, then release it.
pub async fn using_lock<F, Fut, T, E>(
    lock_service: &dyn LockService,
    name: &str,
    timeout_ms: u64,
    f: F,
) -> Result<UsingLockResult<Result<T, E>>, E>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: From<LockError>,
{
    match lock_service.wait_lock_resource(name, timeout_ms).await? {
        LockStatus::AlreadyLocked => Ok(UsingLockResult::AlreadyLocked),
        LockStatus::SuccessfullyLocked(instance) => {
            let result = f().await;
            instance.release().await?;
            Ok(UsingLockResult::Locked(result))
        }
    }
}
