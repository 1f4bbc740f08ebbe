use super::index_operations::IndexOperations;
use super::index_writer::DocumentIndexWriter;
use super::read_operations::ReadOperations;
use super::write_operations::WriteOperations;
use super::write_result::WriteResult;
use crate::collection::{Document, DocumentId};
use crate::common::Guarded;
use crate::errors::QuireResult;
use crate::index::{IndexPath, IndexRegistry};
use crate::quire_config::QuireConfig;
use crate::store::Partition;

/// Wires the read, write and index operations of one collection around a
/// shared partition and index registry.
pub(crate) struct CollectionOperations {
    partition: Partition,
    index_operations: IndexOperations,
    write_operations: WriteOperations,
    read_operations: ReadOperations,
}

impl CollectionOperations {
    pub fn new(collection_name: &str, quire_config: &QuireConfig) -> QuireResult<Self> {
        let store_factory = quire_config.store_factory();
        let partition = store_factory.open_partition(collection_name)?;
        let registry = Guarded::new(IndexRegistry::new());

        let index_operations = IndexOperations::new(
            collection_name.to_string(),
            partition.clone(),
            store_factory,
            registry.clone(),
        );

        let read_operations = ReadOperations::new(collection_name.to_string(), partition.clone());

        let write_operations = WriteOperations::new(
            collection_name.to_string(),
            partition.clone(),
            DocumentIndexWriter::new(registry),
            quire_config.id_allocation_attempts(),
        );

        Ok(CollectionOperations {
            partition,
            index_operations,
            write_operations,
            read_operations,
        })
    }

    pub fn insert(&self, document: Document) -> QuireResult<WriteResult> {
        self.write_operations.insert(document)
    }

    pub fn insert_with_id(&self, id: DocumentId, document: Document) -> QuireResult<WriteResult> {
        self.write_operations.insert_with_id(id, document)
    }

    pub fn update(&self, id: DocumentId, document: Document) -> QuireResult<WriteResult> {
        self.write_operations.update(id, document)
    }

    pub fn remove(&self, id: DocumentId) -> QuireResult<WriteResult> {
        self.write_operations.remove(id)
    }

    pub fn get_by_id(&self, id: DocumentId) -> QuireResult<Document> {
        self.read_operations.get_by_id(id)
    }

    pub fn snapshot(&self) -> QuireResult<Vec<(DocumentId, Vec<u8>)>> {
        self.read_operations.snapshot()
    }

    pub fn size(&self) -> QuireResult<u64> {
        self.read_operations.size()
    }

    pub fn create_index(&self, path: IndexPath) -> QuireResult<()> {
        self.index_operations.create_index(path)
    }

    pub fn drop_index(&self, path: &IndexPath) -> QuireResult<()> {
        self.index_operations.drop_index(path)
    }

    pub fn rebuild_index(&self, path: &IndexPath) -> QuireResult<()> {
        self.index_operations.rebuild_index(path)
    }

    pub fn list_indexes(&self) -> Vec<IndexPath> {
        self.index_operations.list_indexes()
    }

    pub fn list_index_names(&self) -> Vec<String> {
        self.index_operations.list_index_names()
    }

    pub fn lookup(
        &self,
        path: &IndexPath,
        value: &Document,
        limit: usize,
    ) -> QuireResult<Vec<DocumentId>> {
        self.index_operations.lookup(path, value, limit)
    }

    pub fn close(&self) -> QuireResult<()> {
        self.index_operations.close()?;
        self.partition.close()
    }
}
