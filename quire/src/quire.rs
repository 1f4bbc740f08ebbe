use crate::collection::Collection;
use crate::common::{Guarded, SharedLock};
use crate::errors::{ErrorKind, QuireError, QuireResult};
use crate::quire_builder::QuireBuilder;
use crate::quire_config::QuireConfig;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// An open Quire database.
///
/// The database owns one reader/writer lock shared by all of its
/// collections and a table of the collections opened so far. Clones refer
/// to the same database. Dropping the last clone closes every partition and
/// index store, as does an explicit [close](Quire::close).
///
/// # Examples
///
/// ```rust
/// use quire::doc;
/// use quire::quire::Quire;
///
/// let db = Quire::builder().open().unwrap();
/// let users = db.collection("users").unwrap();
///
/// let id = users.insert(doc! { name: "Ann" }).unwrap().id();
/// assert_eq!(users.read(id).unwrap(), doc! { name: "Ann" });
///
/// db.close().unwrap();
/// assert!(users.read(id).is_err());
/// ```
#[derive(Clone)]
pub struct Quire {
    inner: Arc<QuireInner>,
}

impl Quire {
    pub fn builder() -> QuireBuilder {
        QuireBuilder::new()
    }

    pub(crate) fn new(config: QuireConfig) -> Self {
        Quire {
            inner: Arc::new(QuireInner {
                config,
                lock: SharedLock::new(),
                collections: Guarded::new(BTreeMap::new()),
                closed: AtomicBool::new(false),
            }),
        }
    }

    /// Returns the collection named `name`, opening it on first use.
    ///
    /// # Errors
    ///
    /// * `InvalidInput` if `name` is empty
    /// * `DatabaseClosed` if the database is closed
    /// * any error from opening the collection's partition
    pub fn collection(&self, name: &str) -> QuireResult<Collection> {
        validate_collection_name(name)?;

        let _guard = self.inner.lock.write();
        self.inner.ensure_opened()?;

        if let Some(collection) = self.inner.collections.read_with(|map| map.get(name).cloned()) {
            return Ok(collection);
        }

        let collection = Collection::new(name, &self.inner.config, Arc::downgrade(&self.inner))?;
        self.inner
            .collections
            .write_with(|map| map.insert(name.to_string(), collection.clone()));
        log::debug!("Opened collection {}", name);
        Ok(collection)
    }

    pub fn has_collection(&self, name: &str) -> QuireResult<bool> {
        let _guard = self.inner.lock.read();
        self.inner.ensure_opened()?;
        Ok(self.inner.collections.read_with(|map| map.contains_key(name)))
    }

    /// Names of the opened collections, sorted.
    pub fn collection_names(&self) -> QuireResult<Vec<String>> {
        let _guard = self.inner.lock.read();
        self.inner.ensure_opened()?;
        Ok(self.inner.collections.read_with(|map| map.keys().cloned().collect()))
    }

    /// Closes every collection's partition and index stores.
    ///
    /// Later operations on the database or its collections fail with
    /// `DatabaseClosed`. Closing twice is a no-op.
    pub fn close(&self) -> QuireResult<()> {
        let _guard = self.inner.lock.write();
        self.inner.close()
    }

    pub fn is_closed(&self) -> bool {
        self.inner.closed.load(Ordering::Acquire)
    }

    pub fn config(&self) -> QuireConfig {
        self.inner.config.clone()
    }
}

pub(crate) struct QuireInner {
    config: QuireConfig,
    lock: SharedLock,
    collections: Guarded<BTreeMap<String, Collection>>,
    closed: AtomicBool,
}

impl QuireInner {
    pub(crate) fn lock(&self) -> &SharedLock {
        &self.lock
    }

    pub(crate) fn ensure_opened(&self) -> QuireResult<()> {
        if self.closed.load(Ordering::Acquire) {
            log::error!("Database is closed");
            return Err(QuireError::new("Database is closed", ErrorKind::DatabaseClosed));
        }
        Ok(())
    }

    // Must be called with the write lock held, or from drop.
    fn close(&self) -> QuireResult<()> {
        if self.closed.swap(true, Ordering::AcqRel) {
            return Ok(());
        }

        let collections = self
            .collections
            .write_with(|map| std::mem::take(map));

        let mut first_error = None;
        for (name, collection) in collections {
            if let Err(e) = collection.close() {
                log::error!("Failed to close collection {}: {}", name, e);
                first_error.get_or_insert(e);
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => {
                log::debug!("Database closed");
                Ok(())
            }
        }
    }
}

impl Drop for QuireInner {
    fn drop(&mut self) {
        let _ = self.close();
    }
}

fn validate_collection_name(name: &str) -> QuireResult<()> {
    if name.is_empty() {
        log::error!("Collection name cannot be empty");
        return Err(QuireError::new(
            "Collection name cannot be empty",
            ErrorKind::InvalidInput,
        ));
    }
    Ok(())
}
