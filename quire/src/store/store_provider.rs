use crate::errors::QuireResult;
use crate::index::IndexName;
use crate::store::memory::InMemoryStoreProvider;
use crate::store::{HashIndex, Partition};
use std::ops::Deref;
use std::sync::Arc;

/// Opens the stores a database needs.
///
/// A database asks its provider for one [Partition] per collection and one
/// [HashIndex] per registered index. Opening a partition twice for the same
/// collection returns the same store; opening a hash index always returns an
/// empty, fresh store, since an index is only ever populated by backfilling
/// it from its partition.
pub trait StoreProvider: Send + Sync {
    /// Opens the document partition of `collection`.
    fn open_partition(&self, collection: &str) -> QuireResult<Partition>;

    /// Opens a new, empty hash index store for `index_name` in `collection`.
    fn open_hash_index(&self, collection: &str, index_name: &IndexName) -> QuireResult<HashIndex>;
}

/// A cloneable handle to a [StoreProvider]; defaults to in-memory stores.
#[derive(Clone)]
pub struct StoreFactory {
    inner: Arc<dyn StoreProvider>,
}

impl StoreFactory {
    pub fn new<T: StoreProvider + 'static>(inner: T) -> Self {
        StoreFactory {
            inner: Arc::new(inner),
        }
    }
}

impl Default for StoreFactory {
    fn default() -> Self {
        StoreFactory::new(InMemoryStoreProvider::new())
    }
}

impl Deref for StoreFactory {
    type Target = Arc<dyn StoreProvider>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}
