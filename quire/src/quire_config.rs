//! Configuration of a Quire database.

use crate::common::{Guarded, DEFAULT_ID_ALLOCATION_ATTEMPTS};
use crate::errors::{ErrorKind, QuireError, QuireResult};
use crate::store::StoreFactory;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;

/// Settings a database is opened with.
///
/// A configuration can be changed until the database opens; after that it
/// is frozen and every setter fails with `ConfigError`. Clones share the
/// same settings.
///
/// # Examples
///
/// ```rust
/// use quire::quire_config::QuireConfig;
///
/// let config = QuireConfig::new();
/// config.set_id_allocation_attempts(3).unwrap();
/// assert_eq!(config.id_allocation_attempts(), 3);
///
/// assert!(config.set_id_allocation_attempts(0).is_err());
/// ```
#[derive(Clone)]
pub struct QuireConfig {
    inner: Arc<QuireConfigInner>,
}

impl Default for QuireConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl QuireConfig {
    /// Creates a configuration backed by in-memory stores.
    pub fn new() -> Self {
        QuireConfig {
            inner: Arc::new(QuireConfigInner {
                store_factory: Guarded::new(StoreFactory::default()),
                id_allocation_attempts: AtomicU32::new(DEFAULT_ID_ALLOCATION_ATTEMPTS),
                frozen: AtomicBool::new(false),
            }),
        }
    }

    /// The factory that opens partitions and index stores.
    pub fn store_factory(&self) -> StoreFactory {
        self.inner.store_factory.read_with(|factory| factory.clone())
    }

    pub fn set_store_factory(&self, store_factory: StoreFactory) -> QuireResult<()> {
        self.inner.check_mutable("store factory")?;
        self.inner
            .store_factory
            .write_with(|factory| *factory = store_factory);
        Ok(())
    }

    /// How many random identifiers an insert tries before giving up with
    /// `DuplicateId`.
    pub fn id_allocation_attempts(&self) -> u32 {
        self.inner.id_allocation_attempts.load(Ordering::Relaxed)
    }

    /// # Errors
    ///
    /// `ConfigError` if `attempts` is 0 or the configuration is frozen.
    pub fn set_id_allocation_attempts(&self, attempts: u32) -> QuireResult<()> {
        self.inner.check_mutable("id allocation attempts")?;
        if attempts == 0 {
            log::error!("Id allocation attempts must be at least 1");
            return Err(QuireError::new(
                "Id allocation attempts must be at least 1",
                ErrorKind::ConfigError,
            ));
        }

        self.inner
            .id_allocation_attempts
            .store(attempts, Ordering::Relaxed);
        Ok(())
    }

    pub fn is_frozen(&self) -> bool {
        self.inner.frozen.load(Ordering::Acquire)
    }

    pub(crate) fn freeze(&self) {
        self.inner.frozen.store(true, Ordering::Release);
    }
}

struct QuireConfigInner {
    store_factory: Guarded<StoreFactory>,
    id_allocation_attempts: AtomicU32,
    frozen: AtomicBool,
}

impl QuireConfigInner {
    fn check_mutable(&self, setting: &str) -> QuireResult<()> {
        if self.frozen.load(Ordering::Acquire) {
            log::error!("Cannot change {} after the database is opened", setting);
            return Err(QuireError::new(
                &format!("Cannot change {} after the database is opened", setting),
                ErrorKind::ConfigError,
            ));
        }
        Ok(())
    }
}
