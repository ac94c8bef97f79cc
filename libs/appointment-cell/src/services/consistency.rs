// libs/appointment-cell/src/services/consistency.rs
//
// Serializes the check-then-insert step of booking per doctor. Requests for
// different doctors never contend; requests for the same doctor queue in
// arrival order. The store's own overlap constraint remains the final guard
// across processes.
//
// The map holds weak handles only: a doctor's mutex lives as long as some
// request holds or awaits it, and dead entries are pruned on the next acquire.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, Weak};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use tracing::debug;
use uuid::Uuid;

#[derive(Debug, Default)]
pub struct SchedulingLocks {
    locks: Mutex<HashMap<Uuid, Weak<AsyncMutex<()>>>>,
}

impl SchedulingLocks {
    pub fn new() -> Self {
        Self::default()
    }

    fn table(&self) -> MutexGuard<'_, HashMap<Uuid, Weak<AsyncMutex<()>>>> {
        match self.locks.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Waits for exclusive scheduling rights on `doctor_id`.
    pub async fn acquire(&self, doctor_id: Uuid) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.table();
            locks.retain(|_, weak| weak.strong_count() > 0);

            match locks.get(&doctor_id).and_then(Weak::upgrade) {
                Some(lock) => lock,
                None => {
                    let lock = Arc::new(AsyncMutex::new(()));
                    locks.insert(doctor_id, Arc::downgrade(&lock));
                    lock
                }
            }
        };

        let guard = lock.lock_owned().await;
        debug!("Acquired scheduling lock for doctor {}", doctor_id);
        guard
    }

    /// Doctors whose lock is currently held or awaited.
    pub fn tracked_doctors(&self) -> usize {
        let mut locks = self.table();
        locks.retain(|_, weak| weak.strong_count() > 0);
        locks.len()
    }
}
