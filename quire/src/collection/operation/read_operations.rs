use crate::collection::{Document, DocumentId};
use crate::common::decode_document;
use crate::errors::{QuireError, QuireResult};
use crate::store::Partition;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct ReadOperations {
    inner: Arc<ReadOperationsInner>,
}

impl ReadOperations {
    pub fn new(collection_name: String, partition: Partition) -> Self {
        ReadOperations {
            inner: Arc::new(ReadOperationsInner {
                collection_name,
                partition,
            }),
        }
    }

    /// Reads and decodes the document stored under `id`.
    ///
    /// Fails with `NotFound` if there is none and with `DecodeError` if the
    /// stored bytes are corrupt.
    pub fn get_by_id(&self, id: DocumentId) -> QuireResult<Document> {
        self.inner.get_by_id(id)
    }

    /// Copies every stored `(id, bytes)` pair out of the partition.
    pub fn snapshot(&self) -> QuireResult<Vec<(DocumentId, Vec<u8>)>> {
        self.inner.snapshot()
    }

    pub fn size(&self) -> QuireResult<u64> {
        self.inner.partition.size()
    }
}

struct ReadOperationsInner {
    collection_name: String,
    partition: Partition,
}

impl ReadOperationsInner {
    fn get_by_id(&self, id: DocumentId) -> QuireResult<Document> {
        let bytes = self.partition.read(id)?;
        decode_document(&bytes).map_err(|e| {
            log::error!(
                "Document {} in collection {} is corrupt: {}",
                id,
                self.collection_name,
                e
            );
            QuireError::new_with_cause(
                &format!(
                    "Document {} in collection {} is corrupt",
                    id, self.collection_name
                ),
                e.kind().clone(),
                e,
            )
        })
    }

    fn snapshot(&self) -> QuireResult<Vec<(DocumentId, Vec<u8>)>> {
        let mut documents = Vec::new();
        self.partition.for_each_doc(&mut |id, bytes| {
            documents.push((id, bytes.to_vec()));
            true
        })?;
        Ok(documents)
    }
}
