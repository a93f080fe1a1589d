//! In-process lock driver.

use std::{collections::HashSet, sync::Mutex, time::Duration};

use async_trait::async_trait;
use depbot_lock_interface::{LockError, LockInstance, LockService, LockStatus};

/// Memory lock service.
#[derive(Default)]
pub struct MemoryLockService {
    resources: Mutex<HashSet<String>>,
}

impl MemoryLockService {
    /// Creates a memory lock service.
    pub fn new() -> Self {
        Default::default()
    }
}

#[async_trait]
impl LockService for MemoryLockService {
    #[tracing::instrument(skip(self), ret)]
    async fn try_lock_resource<'a>(&'a self, name: &str) -> Result<LockStatus<'a>, LockError> {
        if self.resources.lock().unwrap().insert(name.to_string()) {
            Ok(LockStatus::SuccessfullyLocked(LockInstance::new(self, name)))
        } else {
            Ok(LockStatus::AlreadyLocked)
        }
    }

    #[tracing::instrument(skip(self), ret)]
    async fn has_resource(&self, name: &str) -> Result<bool, LockError> {
        Ok(self.resources.lock().unwrap().contains(name))
    }

    #[tracing::instrument(skip(self))]
    async fn del_resource(&self, name: &str) -> Result<(), LockError> {
        self.resources.lock().unwrap().remove(name);
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn sleep_for_duration(&self, duration: Duration) -> Result<(), LockError> {
        tokio::time::sleep(duration).await;
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn health_check(&self) -> Result<(), LockError> {
        Ok(())
    }
}
