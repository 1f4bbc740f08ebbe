use super::index_writer::{apply_entry, IndexOp};
use crate::collection::{Document, DocumentId};
use crate::common::{decode_document, Guarded};
use crate::errors::{ErrorKind, QuireError, QuireResult};
use crate::index::{hash_value, IndexPath, IndexRegistry};
use crate::store::{HashIndex, Partition, StoreFactory};
use std::sync::Arc;

/// Index lifecycle of one collection: create, drop, rebuild, enumerate and
/// point lookup.
///
/// Creating or rebuilding an index backfills it from every document already
/// in the partition, so a registered index always covers the whole
/// collection. The collection calls the mutating methods while holding the
/// database write lock.
#[derive(Clone)]
pub(crate) struct IndexOperations {
    inner: Arc<IndexOperationsInner>,
}

impl IndexOperations {
    pub fn new(
        collection_name: String,
        partition: Partition,
        store_factory: StoreFactory,
        registry: Guarded<IndexRegistry>,
    ) -> Self {
        IndexOperations {
            inner: Arc::new(IndexOperationsInner {
                collection_name,
                partition,
                store_factory,
                registry,
            }),
        }
    }

    /// Registers and backfills an index on `path`.
    ///
    /// # Errors
    /// `AlreadyIndexed` if an index on `path` exists. A failure while
    /// backfilling discards the new store and leaves the registry unchanged.
    pub fn create_index(&self, path: IndexPath) -> QuireResult<()> {
        self.inner.create_index(path)
    }

    /// Unregisters the index on `path` and disposes its store.
    pub fn drop_index(&self, path: &IndexPath) -> QuireResult<()> {
        self.inner.drop_index(path)
    }

    /// Replaces the store of the index on `path` with a freshly backfilled one.
    pub fn rebuild_index(&self, path: &IndexPath) -> QuireResult<()> {
        self.inner.rebuild_index(path)
    }

    pub fn list_indexes(&self) -> Vec<IndexPath> {
        self.inner.registry.read_with(|registry| registry.paths())
    }

    pub fn list_index_names(&self) -> Vec<String> {
        self.inner.registry.read_with(|registry| {
            registry
                .names()
                .into_iter()
                .map(|name| name.into_string())
                .collect()
        })
    }

    /// Returns up to `limit` identifiers indexed under the hash of `value`.
    pub fn lookup(
        &self,
        path: &IndexPath,
        value: &Document,
        limit: usize,
    ) -> QuireResult<Vec<DocumentId>> {
        self.inner.lookup(path, value, limit)
    }

    /// Closes every index store.
    pub fn close(&self) -> QuireResult<()> {
        self.inner.close()
    }
}

struct IndexOperationsInner {
    collection_name: String,
    partition: Partition,
    store_factory: StoreFactory,
    registry: Guarded<IndexRegistry>,
}

impl IndexOperationsInner {
    fn not_indexed(&self, path: &IndexPath) -> QuireError {
        log::error!(
            "Collection {} has no index on {}",
            self.collection_name,
            path
        );
        QuireError::new(
            &format!("Collection {} has no index on {}", self.collection_name, path),
            ErrorKind::NotIndexed,
        )
    }

    fn find_store(&self, path: &IndexPath) -> QuireResult<HashIndex> {
        let name = path.name();
        self.registry
            .read_with(|registry| registry.get(&name).map(|entry| entry.store().clone()))
            .ok_or_else(|| self.not_indexed(path))
    }

    fn create_index(&self, path: IndexPath) -> QuireResult<()> {
        let name = path.name();
        if self.registry.read_with(|registry| registry.contains(&name)) {
            log::error!(
                "Collection {} already has an index on {}",
                self.collection_name,
                path
            );
            return Err(QuireError::new(
                &format!(
                    "Collection {} already has an index on {}",
                    self.collection_name, path
                ),
                ErrorKind::AlreadyIndexed,
            ));
        }

        let store = self.open_backfilled(&path)?;
        self.registry.write_with(|registry| registry.insert(path, store))?;
        log::debug!("Created index {} on collection {}", name, self.collection_name);
        Ok(())
    }

    fn drop_index(&self, path: &IndexPath) -> QuireResult<()> {
        let name = path.name();
        let entry = self.registry.write_with(|registry| registry.remove(&name))?;
        entry.store().dispose()?;
        log::debug!("Dropped index {} on collection {}", name, self.collection_name);
        Ok(())
    }

    fn rebuild_index(&self, path: &IndexPath) -> QuireResult<()> {
        let name = path.name();
        if !self.registry.read_with(|registry| registry.contains(&name)) {
            return Err(self.not_indexed(path));
        }

        let store = self.open_backfilled(path)?;
        let old_store = self
            .registry
            .write_with(|registry| registry.replace_store(&name, store))?;
        old_store.dispose()?;
        log::debug!("Rebuilt index {} on collection {}", name, self.collection_name);
        Ok(())
    }

    fn lookup(
        &self,
        path: &IndexPath,
        value: &Document,
        limit: usize,
    ) -> QuireResult<Vec<DocumentId>> {
        let Some(hash) = hash_value(value) else {
            log::error!("Cannot look up a {} value in an index", value.kind_name());
            return Err(QuireError::new(
                &format!("Cannot look up a {} value in an index", value.kind_name()),
                ErrorKind::InvalidInput,
            ));
        };

        let store = self.find_store(path)?;
        store.get(hash, limit)
    }

    fn close(&self) -> QuireResult<()> {
        self.registry.read_with(|registry| {
            for (_, entry) in registry.iter() {
                entry.store().close()?;
            }
            Ok(())
        })
    }

    // Opens a new store and fills it from every stored document. The store
    // is disposed again if filling it fails.
    fn open_backfilled(&self, path: &IndexPath) -> QuireResult<HashIndex> {
        let store = self
            .store_factory
            .open_hash_index(&self.collection_name, &path.name())?;

        if let Err(e) = self.backfill(path, &store) {
            log::error!(
                "Failed to build index {} on collection {}: {}",
                path,
                self.collection_name,
                e
            );
            if let Err(dispose_error) = store.dispose() {
                log::error!("Failed to discard partial index {}: {}", path, dispose_error);
            }
            return Err(e);
        }
        Ok(store)
    }

    fn backfill(&self, path: &IndexPath, store: &HashIndex) -> QuireResult<()> {
        let mut failure = None;
        self.partition.for_each_doc(&mut |id, bytes| {
            let document = match decode_document(bytes) {
                Ok(document) => document,
                Err(e) => {
                    log::warn!(
                        "Skipping corrupt document {} while indexing {} on collection {}: {}",
                        id,
                        path,
                        self.collection_name,
                        e
                    );
                    return true;
                }
            };

            match apply_entry(id, &document, path, store, IndexOp::Add) {
                Ok(()) => true,
                Err(e) => {
                    failure = Some(e);
                    false
                }
            }
        })?;

        match failure {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::encode_document;
    use crate::doc;
    use crate::index::{hash_str, IndexName};
    use crate::store::memory::{InMemoryHashIndex, InMemoryPartition};
    use crate::store::{HashIndexProvider, StoreProvider};

    fn path(segments: &[&str]) -> IndexPath {
        IndexPath::new(segments).unwrap()
    }

    fn setup_with(factory: StoreFactory) -> (IndexOperations, Partition) {
        let partition = Partition::new(InMemoryPartition::new("test"));
        let operations = IndexOperations::new(
            "test".to_string(),
            partition.clone(),
            factory,
            Guarded::new(IndexRegistry::new()),
        );
        (operations, partition)
    }

    fn setup() -> (IndexOperations, Partition) {
        setup_with(StoreFactory::default())
    }

    fn store_doc(partition: &Partition, id: u64, document: Document) -> DocumentId {
        partition
            .insert(DocumentId::from(id), encode_document(&document).unwrap())
            .unwrap()
    }

    #[test]
    fn test_create_index_backfills() {
        let (operations, partition) = setup();
        let first = store_doc(&partition, 1, doc! { tags: ["t1", "t2"] });
        let second = store_doc(&partition, 2, doc! { tags: "t1" });
        store_doc(&partition, 3, doc! { other: 1 });

        operations.create_index(path(&["tags"])).unwrap();

        let t1 = operations.lookup(&path(&["tags"]), &"t1".into(), 0).unwrap();
        assert_eq!(t1, vec![first, second]);
        let t2 = operations.lookup(&path(&["tags"]), &"t2".into(), 0).unwrap();
        assert_eq!(t2, vec![first]);
    }

    #[test]
    fn test_create_index_twice() {
        let (operations, _) = setup();
        operations.create_index(path(&["a", "b"])).unwrap();
        let err = operations.create_index(path(&["a", "b"])).unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::AlreadyIndexed);
        assert_eq!(operations.list_index_names(), vec!["a!b".to_string()]);
    }

    #[test]
    fn test_backfill_skips_corrupt_documents() {
        let (operations, partition) = setup();
        partition.insert(DocumentId::from(1), b"not json".to_vec()).unwrap();
        let good = store_doc(&partition, 2, doc! { name: "x" });

        operations.create_index(path(&["name"])).unwrap();
        assert_eq!(
            operations.lookup(&path(&["name"]), &"x".into(), 0).unwrap(),
            vec![good]
        );
    }

    // Opens stores that are already closed, so every put fails.
    struct ClosedIndexProvider {
        opened: parking_lot::Mutex<Vec<HashIndex>>,
    }

    impl StoreProvider for Arc<ClosedIndexProvider> {
        fn open_partition(&self, collection: &str) -> QuireResult<Partition> {
            Ok(Partition::new(InMemoryPartition::new(collection)))
        }

        fn open_hash_index(
            &self,
            _collection: &str,
            index_name: &IndexName,
        ) -> QuireResult<HashIndex> {
            let store = InMemoryHashIndex::new(index_name.as_str());
            store.close()?;
            let store = HashIndex::new(store);
            self.opened.lock().push(store.clone());
            Ok(store)
        }
    }

    #[test]
    fn test_failed_backfill_leaves_registry_unchanged() {
        let provider = Arc::new(ClosedIndexProvider {
            opened: parking_lot::Mutex::new(Vec::new()),
        });

        let (operations, partition) = setup_with(StoreFactory::new(provider.clone()));
        store_doc(&partition, 1, doc! { name: "x" });

        let err = operations.create_index(path(&["name"])).unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::StoreClosed);
        assert!(operations.list_indexes().is_empty());

        let opened = provider.opened.lock();
        assert_eq!(opened.len(), 1);
        assert!(opened[0].is_closed().unwrap());
    }

    #[test]
    fn test_drop_index() {
        let (operations, partition) = setup();
        store_doc(&partition, 1, doc! { name: "x" });
        operations.create_index(path(&["name"])).unwrap();
        operations.drop_index(&path(&["name"])).unwrap();

        assert!(operations.list_indexes().is_empty());
        let err = operations
            .lookup(&path(&["name"]), &"x".into(), 0)
            .unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::NotIndexed);
    }

    #[test]
    fn test_drop_missing_index() {
        let (operations, _) = setup();
        let err = operations.drop_index(&path(&["%&^*"])).unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::NotIndexed);
    }

    #[test]
    fn test_list_in_registration_order() {
        let (operations, _) = setup();
        operations.create_index(path(&["a", "b"])).unwrap();
        operations.create_index(path(&["c"])).unwrap();
        operations.create_index(path(&["0"])).unwrap();

        assert_eq!(
            operations.list_indexes(),
            vec![path(&["a", "b"]), path(&["c"]), path(&["0"])]
        );
        assert_eq!(
            operations.list_index_names(),
            vec!["a!b".to_string(), "c".to_string(), "0".to_string()]
        );
    }

    #[test]
    fn test_rebuild_index_drops_stale_entries() {
        let (operations, partition) = setup();
        let id = store_doc(&partition, 1, doc! { name: "old" });
        operations.create_index(path(&["name"])).unwrap();

        // rewrite the partition behind the index's back
        partition
            .update(id, encode_document(&doc! { name: "new" }).unwrap())
            .unwrap();
        assert_eq!(
            operations.lookup(&path(&["name"]), &"old".into(), 0).unwrap(),
            vec![id]
        );

        operations.rebuild_index(&path(&["name"])).unwrap();
        assert!(operations
            .lookup(&path(&["name"]), &"old".into(), 0)
            .unwrap()
            .is_empty());
        assert_eq!(
            operations.lookup(&path(&["name"]), &"new".into(), 0).unwrap(),
            vec![id]
        );
    }

    #[test]
    fn test_rebuild_missing_index() {
        let (operations, _) = setup();
        let err = operations.rebuild_index(&path(&["x"])).unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::NotIndexed);
    }

    #[test]
    fn test_lookup_rejects_unhashable_values() {
        let (operations, _) = setup();
        operations.create_index(path(&["a"])).unwrap();

        for value in [Document::Null, Document::from(vec![1]), doc! { b: 1 }] {
            let err = operations.lookup(&path(&["a"]), &value, 0).unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::InvalidInput);
        }
    }

    #[test]
    fn test_lookup_limit() {
        let (operations, partition) = setup();
        for id in 1..=5 {
            store_doc(&partition, id, doc! { kind: "k" });
        }
        operations.create_index(path(&["kind"])).unwrap();

        assert_eq!(operations.lookup(&path(&["kind"]), &"k".into(), 2).unwrap().len(), 2);
        assert_eq!(operations.lookup(&path(&["kind"]), &"k".into(), 0).unwrap().len(), 5);
        assert!(operations.lookup(&path(&["kind"]), &"z".into(), 0).unwrap().is_empty());
    }

    #[test]
    fn test_close_closes_stores() {
        let (operations, _) = setup();
        operations.create_index(path(&["a"])).unwrap();
        operations.close().unwrap();

        let err = operations.lookup(&path(&["a"]), &"x".into(), 0).unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::StoreClosed);
    }

    #[test]
    fn test_lookup_uses_value_hash() {
        let (operations, partition) = setup();
        let id = store_doc(&partition, 1, doc! { n: 1.0 });
        operations.create_index(path(&["n"])).unwrap();

        assert_eq!(operations.lookup(&path(&["n"]), &Document::from(1), 0).unwrap(), vec![id]);
        assert_eq!(hash_str("1"), hash_value(&Document::from(1)).unwrap());
    }
}
