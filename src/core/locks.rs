use parking_lot::{Mutex, MutexGuard};
use std::collections::HashMap;
use std::sync::Arc;

/// One mutex per worker: ingestions of the same worker run one at a time,
/// ingestions of different workers never wait on each other.
#[derive(Debug, Default)]
pub struct WorkerLocks {
    inner: Mutex<HashMap<i64, Arc<Mutex<()>>>>,
}

impl WorkerLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// The lock guarding `worker_id`, created on first use.
    pub fn lock_for(&self, worker_id: i64) -> Arc<Mutex<()>> {
        Arc::clone(self.inner.lock().entry(worker_id).or_default())
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Take a worker lock, blocking while another ingestion of the same worker runs.
pub fn acquire(lock: &Mutex<()>) -> MutexGuard<'_, ()> {
    lock.lock()
}
