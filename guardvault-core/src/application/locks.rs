use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

struct Slot {
    mutex: Arc<AsyncMutex<()>>,
    /// Holders plus waiters. The slot is removed when this drops to zero.
    users: usize,
}

/// Per-key async mutexes. Entries are created on first use and pruned when the
/// last holder or waiter goes away, including waiters whose future is cancelled.
pub struct LockTable<K> {
    entries: Mutex<HashMap<K, Slot>>,
}

impl<K: Eq + Hash + Clone> LockTable<K> {
    pub fn new() -> Self {
        Self { entries: Mutex::new(HashMap::new()) }
    }

    /// Waits for exclusive access to `key`. The guard may be held across awaits.
    pub async fn lock(&self, key: &K) -> KeyGuard<'_, K> {
        let mutex = {
            let mut entries = self.entries();
            let slot = entries.entry(key.clone()).or_insert_with(|| Slot { mutex: Arc::new(AsyncMutex::new(())), users: 0 });
            slot.users += 1;
            slot.mutex.clone()
        };
        // Registered before awaiting so a dropped future still releases its slot.
        let mut key_guard = KeyGuard { table: self, key: key.clone(), guard: None };
        key_guard.guard = Some(mutex.lock_owned().await);
        key_guard
    }

    /// Number of keys currently held or awaited.
    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // The map is only touched by non-panicking HashMap calls, so a poisoned
    // mutex still guards consistent state.
    fn entries(&self) -> MutexGuard<'_, HashMap<K, Slot>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn release(&self, key: &K) {
        let mut entries = self.entries();
        if let Some(slot) = entries.get_mut(key) {
            slot.users = slot.users.saturating_sub(1);
            if slot.users == 0 {
                entries.remove(key);
            }
        }
    }
}

impl<K: Eq + Hash + Clone> Default for LockTable<K> {
    fn default() -> Self {
        Self::new()
    }
}

pub struct KeyGuard<'a, K: Eq + Hash + Clone> {
    table: &'a LockTable<K>,
    key: K,
    guard: Option<OwnedMutexGuard<()>>,
}

impl<K: Eq + Hash + Clone> Drop for KeyGuard<'_, K> {
    fn drop(&mut self) {
        self.guard.take();
        self.table.release(&self.key);
    }
}
