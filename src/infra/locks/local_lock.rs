use std::collections::HashMap;
use std::sync::Arc;
use async_trait::async_trait;
use tokio::sync::{Mutex, OwnedMutexGuard};
use crate::domain::ports::{SlotLockGuard, SlotLockManager};
use crate::error::AppError;

/// In-process keyed mutex. A SQLite deployment is single-node by
/// construction, so process scope equals lock scope there.
pub struct LocalSlotLock {
    locks: Mutex<HashMap<i64, Arc<Mutex<()>>>>,
}

impl LocalSlotLock {
    pub fn new() -> Self {
        Self {
            locks: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for LocalSlotLock {
    fn default() -> Self {
        Self::new()
    }
}

pub struct LocalSlotLockGuard {
    _guard: OwnedMutexGuard<()>,
}

#[async_trait]
impl SlotLockGuard for LocalSlotLockGuard {
    async fn release(self: Box<Self>) -> Result<(), AppError> {
        // Dropping the inner guard releases the mutex.
        Ok(())
    }
}

#[async_trait]
impl SlotLockManager for LocalSlotLock {
    async fn acquire(&self, key: i64) -> Result<Box<dyn SlotLockGuard>, AppError> {
        let entry = {
            let mut locks = self.locks.lock().await;
            locks.entry(key).or_insert_with(|| Arc::new(Mutex::new(()))).clone()
        };

        let guard = entry.lock_owned().await;
        Ok(Box::new(LocalSlotLockGuard { _guard: guard }))
    }
}
