use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::sync::Arc;

/// The database-wide reader/writer lock.
///
/// One `SharedLock` is created per database and cloned into every place that
/// needs it; clones refer to the same underlying lock. Document reads take it
/// in shared mode. Document mutations and index creation or removal take it
/// exclusively, so no reader ever observes a document whose index entries are
/// only partially written.
///
/// The lock is `parking_lot`'s poison-free `RwLock`, which is not reentrant:
/// a thread holding the write guard must not call back into an operation that
/// acquires the lock again.
///
/// # Examples
///
/// ```
/// use quire::common::SharedLock;
///
/// let lock = SharedLock::new();
/// {
///     let _read_guard = lock.read();
///     assert!(lock.try_read().is_some());
/// }
/// {
///     let _write_guard = lock.write();
///     assert!(lock.try_read().is_none());
/// }
/// ```
#[derive(Clone)]
pub struct SharedLock {
    lock: Arc<RwLock<()>>,
}

impl SharedLock {
    /// Creates a new, unlocked lock.
    pub fn new() -> Self {
        SharedLock {
            lock: Arc::new(RwLock::new(())),
        }
    }

    /// Acquires the lock in shared mode, blocking while a writer holds it.
    pub fn read(&self) -> RwLockReadGuard<'_, ()> {
        self.lock.read()
    }

    /// Acquires the lock exclusively, blocking while any reader or writer holds it.
    pub fn write(&self) -> RwLockWriteGuard<'_, ()> {
        self.lock.write()
    }

    /// Attempts to acquire the lock in shared mode without blocking.
    pub fn try_read(&self) -> Option<RwLockReadGuard<'_, ()>> {
        self.lock.try_read()
    }

    /// Attempts to acquire the lock exclusively without blocking.
    pub fn try_write(&self) -> Option<RwLockWriteGuard<'_, ()>> {
        self.lock.try_write()
    }

    /// Returns `true` if both handles refer to the same lock.
    pub fn same_lock(&self, other: &SharedLock) -> bool {
        Arc::ptr_eq(&self.lock, &other.lock)
    }
}

impl Default for SharedLock {
    fn default() -> Self {
        Self::new()
    }
}
