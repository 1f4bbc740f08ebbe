use parking_lot::RwLock;
use std::sync::Arc;

/// State shared between cloned handles and reached only through closures, so
/// no lock guard outlives a call.
///
/// Collections keep their index registry in one, the database its collection
/// table, and the configuration its store factory. The lock only keeps the
/// wrapped value itself intact. Keeping documents and indexes consistent with
/// each other is the job of the database-wide [SharedLock](crate::common::SharedLock).
pub struct Guarded<T> {
    inner: Arc<RwLock<T>>,
}

impl<T> Guarded<T> {
    pub fn new(value: T) -> Self {
        Guarded {
            inner: Arc::new(RwLock::new(value)),
        }
    }

    /// Runs `f` with shared access to the value.
    #[inline]
    pub fn read_with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.inner.read())
    }

    /// Runs `f` with exclusive access to the value.
    ///
    /// `f` must not reach this same value again; the lock is not reentrant.
    #[inline]
    pub fn write_with<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        f(&mut self.inner.write())
    }
}

impl<T> Clone for Guarded<T> {
    fn clone(&self) -> Self {
        Guarded {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Default> Default for Guarded<T> {
    fn default() -> Self {
        Guarded::new(T::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use std::thread;

    #[test]
    fn test_read_with_returns_closure_result() {
        let names = Guarded::new(vec!["a", "b", "c"]);
        assert_eq!(names.read_with(|names| names.len()), 3);
    }

    #[test]
    fn test_write_with_is_seen_by_clones() {
        let table: Guarded<BTreeMap<String, u32>> = Guarded::default();
        let other = table.clone();

        other.write_with(|table| table.insert("users".to_string(), 1));
        assert_eq!(table.read_with(|table| table.get("users").copied()), Some(1));
    }

    #[test]
    fn test_concurrent_writers_do_not_lose_updates() {
        let counter = Guarded::new(0u64);
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let counter = counter.clone();
                thread::spawn(move || {
                    for _ in 0..1_000 {
                        counter.write_with(|value| *value += 1);
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(counter.read_with(|value| *value), 4_000);
    }
}
