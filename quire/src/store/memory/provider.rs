use crate::errors::{ErrorKind, QuireError, QuireResult};
use crate::index::IndexName;
use crate::store::memory::{InMemoryHashIndex, InMemoryPartition};
use crate::store::{HashIndex, Partition, PartitionProvider, StoreProvider};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::Arc;

/// Opens in-memory partitions and hash indexes.
///
/// Documents of a collection outlive the database that wrote them: once that
/// database is closed, a new database over the same provider reopens the
/// collection with its documents. A partition can only be open in one
/// database at a time. Hash indexes are not kept and start empty.
#[derive(Clone, Default)]
pub struct InMemoryStoreProvider {
    inner: Arc<InMemoryStoreProviderInner>,
}

impl InMemoryStoreProvider {
    pub fn new() -> Self {
        InMemoryStoreProvider::default()
    }

    /// Returns the most recent handle to the partition of `collection`, if
    /// it was ever opened. The handle may already be closed.
    pub fn opened_partition(&self, collection: &str) -> Option<Partition> {
        self.inner
            .partitions
            .get(collection)
            .map(|entry| Partition::new(entry.value().clone()))
    }
}

impl StoreProvider for InMemoryStoreProvider {
    fn open_partition(&self, collection: &str) -> QuireResult<Partition> {
        self.inner.open_partition(collection)
    }

    fn open_hash_index(&self, collection: &str, index_name: &IndexName) -> QuireResult<HashIndex> {
        let name = format!("{}/{}", collection, index_name);
        log::debug!("Opening in-memory hash index {}", name);
        Ok(HashIndex::new(InMemoryHashIndex::new(&name)))
    }
}

#[derive(Default)]
struct InMemoryStoreProviderInner {
    partitions: DashMap<String, InMemoryPartition>,
}

impl InMemoryStoreProviderInner {
    fn open_partition(&self, collection: &str) -> QuireResult<Partition> {
        match self.partitions.entry(collection.to_string()) {
            Entry::Occupied(mut entry) => {
                if !entry.get().is_closed()? {
                    log::error!("Partition {} is already open", collection);
                    return Err(QuireError::new(
                        &format!("Partition {} is already open", collection),
                        ErrorKind::InvalidOperation,
                    ));
                }

                log::debug!("Reopening in-memory partition {}", collection);
                let partition = entry.get().reopen();
                entry.insert(partition.clone());
                Ok(Partition::new(partition))
            }
            Entry::Vacant(entry) => {
                log::debug!("Opening in-memory partition {}", collection);
                let partition = InMemoryPartition::new(collection);
                entry.insert(partition.clone());
                Ok(Partition::new(partition))
            }
        }
    }
}
