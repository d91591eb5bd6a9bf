//! Per-key async mutex

use std::collections::HashMap;
use std::sync::{Arc, Mutex, Weak};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// Serialises async work per key inside one process
///
/// Entries are weak, so a key's mutex is dropped once no task holds or waits
/// for it.
#[derive(Default)]
pub struct KeyedLocks {
    locks: Mutex<HashMap<String, Weak<AsyncMutex<()>>>>,
}

impl KeyedLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `key`
    pub async fn lock(&self, key: &str) -> OwnedMutexGuard<()> {
        let mutex = {
            let mut locks = match self.locks.lock() {
                Ok(locks) => locks,
                Err(poisoned) => poisoned.into_inner(),
            };
            locks.retain(|_, weak| weak.strong_count() > 0);
            match locks.get(key).and_then(Weak::upgrade) {
                Some(mutex) => mutex,
                None => {
                    let mutex = Arc::new(AsyncMutex::new(()));
                    locks.insert(key.to_string(), Arc::downgrade(&mutex));
                    mutex
                }
            }
        };
        mutex.lock_owned().await
    }

    /// Keys with a live mutex
    pub fn active_keys(&self) -> usize {
        match self.locks.lock() {
            Ok(locks) => locks.values().filter(|w| w.strong_count() > 0).count(),
            Err(poisoned) => poisoned
                .into_inner()
                .values()
                .filter(|w| w.strong_count() > 0)
                .count(),
        }
    }
}
