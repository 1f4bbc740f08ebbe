use crate::collection::{Document, DocumentId};
use crate::common::Guarded;
use crate::errors::QuireResult;
use crate::index::{hash_value, resolve, IndexPath, IndexRegistry};
use crate::store::HashIndex;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum IndexOp {
    Add,
    Remove,
}

/// Keeps the registered indexes of a collection in step with its documents.
///
/// For every registered index, the writer resolves the index path against a
/// document and puts or removes one `(hash, id)` entry per scalar found.
/// Nulls and containers are never indexed.
#[derive(Clone)]
pub(crate) struct DocumentIndexWriter {
    registry: Guarded<IndexRegistry>,
}

impl DocumentIndexWriter {
    pub fn new(registry: Guarded<IndexRegistry>) -> Self {
        DocumentIndexWriter { registry }
    }

    /// Adds the entries of `document` to every registered index.
    pub fn write_index_entry(&self, id: DocumentId, document: &Document) -> QuireResult<()> {
        self.apply(id, document, IndexOp::Add)
    }

    /// Removes the entries of `document` from every registered index.
    ///
    /// Entries that were never present are ignored.
    pub fn remove_index_entry(&self, id: DocumentId, document: &Document) -> QuireResult<()> {
        self.apply(id, document, IndexOp::Remove)
    }

    fn apply(&self, id: DocumentId, document: &Document, op: IndexOp) -> QuireResult<()> {
        self.registry.read_with(|registry| {
            for (_, entry) in registry.iter() {
                apply_entry(id, document, entry.path(), entry.store(), op)?;
            }
            Ok(())
        })
    }
}

/// Applies `op` for one index path to one store.
pub(crate) fn apply_entry(
    id: DocumentId,
    document: &Document,
    path: &IndexPath,
    store: &HashIndex,
    op: IndexOp,
) -> QuireResult<()> {
    for value in resolve(document, path) {
        let Some(hash) = hash_value(value) else {
            continue;
        };

        match op {
            IndexOp::Add => store.put(hash, id)?,
            IndexOp::Remove => {
                if !store.remove(hash, id)? {
                    log::debug!("No entry for document {} under hash {} to remove", id, hash);
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doc;
    use crate::errors::ErrorKind;
    use crate::index::hash_str;
    use crate::store::memory::InMemoryHashIndex;

    fn path(segments: &[&str]) -> IndexPath {
        IndexPath::new(segments).unwrap()
    }

    fn registry_with(paths: &[&[&str]]) -> (Guarded<IndexRegistry>, Vec<HashIndex>) {
        let registry = Guarded::new(IndexRegistry::new());
        let mut stores = Vec::new();
        for segments in paths {
            let store = HashIndex::new(InMemoryHashIndex::new("test"));
            stores.push(store.clone());
            registry
                .write_with(|r| r.insert(path(segments), store))
                .unwrap();
        }
        (registry, stores)
    }

    #[test]
    fn test_write_index_entry() {
        let (registry, stores) = registry_with(&[&["name"], &["tags"]]);
        let writer = DocumentIndexWriter::new(registry);
        let id = DocumentId::from(1);

        writer
            .write_index_entry(id, &doc! { name: "x", tags: ["t1", "t2"] })
            .unwrap();

        assert_eq!(stores[0].entries().unwrap(), vec![(hash_str("x"), id)]);
        let mut expected = vec![(hash_str("t1"), id), (hash_str("t2"), id)];
        expected.sort();
        assert_eq!(stores[1].entries().unwrap(), expected);
    }

    #[test]
    fn test_array_of_documents_is_flattened() {
        let (registry, stores) = registry_with(&[&["items", "sku"]]);
        let writer = DocumentIndexWriter::new(registry);
        let id = DocumentId::from(7);

        writer
            .write_index_entry(id, &doc! { items: [{ sku: "a" }, { sku: "b" }] })
            .unwrap();

        assert_eq!(stores[0].get(hash_str("a"), 0).unwrap(), vec![id]);
        assert_eq!(stores[0].get(hash_str("b"), 0).unwrap(), vec![id]);
    }

    #[test]
    fn test_null_and_containers_are_skipped() {
        let (registry, stores) = registry_with(&[&["a"], &["b"], &["missing"]]);
        let writer = DocumentIndexWriter::new(registry);

        writer
            .write_index_entry(DocumentId::from(1), &doc! { a: null, b: { c: 1 } })
            .unwrap();

        for store in stores {
            assert!(store.entries().unwrap().is_empty());
        }
    }

    #[test]
    fn test_remove_index_entry() {
        let (registry, stores) = registry_with(&[&["tags"]]);
        let writer = DocumentIndexWriter::new(registry);
        let id = DocumentId::from(1);
        let document = doc! { tags: ["t1", "t2"] };

        writer.write_index_entry(id, &document).unwrap();
        writer.remove_index_entry(id, &document).unwrap();
        assert!(stores[0].entries().unwrap().is_empty());
    }

    #[test]
    fn test_remove_of_unindexed_values_is_tolerated() {
        let (registry, stores) = registry_with(&[&["tags"]]);
        let writer = DocumentIndexWriter::new(registry);
        let id = DocumentId::from(1);

        writer.write_index_entry(id, &doc! { tags: ["t1"] }).unwrap();
        writer
            .remove_index_entry(id, &doc! { tags: ["t1", "never"] })
            .unwrap();
        assert!(stores[0].entries().unwrap().is_empty());
    }

    #[test]
    fn test_repeated_values_do_not_corrupt_store() {
        let (registry, stores) = registry_with(&[&["tags"]]);
        let writer = DocumentIndexWriter::new(registry);
        let id = DocumentId::from(1);
        let document = doc! { tags: ["t1", "t1"] };

        writer.write_index_entry(id, &document).unwrap();
        assert_eq!(stores[0].get(hash_str("t1"), 0).unwrap(), vec![id]);
        writer.remove_index_entry(id, &document).unwrap();
        assert!(stores[0].entries().unwrap().is_empty());
    }

    #[test]
    fn test_store_failure_propagates() {
        let (registry, stores) = registry_with(&[&["name"]]);
        stores[0].close().unwrap();
        let writer = DocumentIndexWriter::new(registry);

        let err = writer
            .write_index_entry(DocumentId::from(1), &doc! { name: "x" })
            .unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::StoreClosed);
    }

    #[test]
    fn test_no_indexes_is_noop() {
        let (registry, _) = registry_with(&[]);
        let writer = DocumentIndexWriter::new(registry);
        writer
            .write_index_entry(DocumentId::from(1), &doc! { name: "x" })
            .unwrap();
    }
}
