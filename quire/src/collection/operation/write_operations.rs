use super::index_writer::DocumentIndexWriter;
use super::write_result::{WriteResult, WriteWarning};
use crate::collection::{Document, DocumentId};
use crate::common::{decode_document, encode_document};
use crate::errors::{ErrorKind, QuireError, QuireResult};
use crate::store::Partition;
use std::sync::Arc;

/// Document mutations: writes the partition first, then the indexes.
///
/// None of these methods lock; the collection calls them while holding the
/// database write lock.
#[derive(Clone)]
pub(crate) struct WriteOperations {
    inner: Arc<WriteOperationsInner>,
}

impl WriteOperations {
    pub fn new(
        collection_name: String,
        partition: Partition,
        index_writer: DocumentIndexWriter,
        id_allocation_attempts: u32,
    ) -> Self {
        WriteOperations {
            inner: Arc::new(WriteOperationsInner {
                collection_name,
                partition,
                index_writer,
                id_allocation_attempts,
            }),
        }
    }

    /// Stores a document under a fresh identifier, redrawing the identifier
    /// when it collides with an existing one.
    pub fn insert(&self, document: Document) -> QuireResult<WriteResult> {
        self.inner.insert(document)
    }

    /// Stores a document under a caller-supplied identifier.
    pub fn insert_with_id(&self, id: DocumentId, document: Document) -> QuireResult<WriteResult> {
        self.inner.insert_with_id(id, document)
    }

    /// Replaces the whole content of a stored document.
    pub fn update(&self, id: DocumentId, document: Document) -> QuireResult<WriteResult> {
        self.inner.update(id, document)
    }

    pub fn remove(&self, id: DocumentId) -> QuireResult<WriteResult> {
        self.inner.remove(id)
    }
}

struct WriteOperationsInner {
    collection_name: String,
    partition: Partition,
    index_writer: DocumentIndexWriter,
    id_allocation_attempts: u32,
}

impl WriteOperationsInner {
    fn check_document(&self, document: &Document) -> QuireResult<()> {
        if document.is_null() {
            log::error!(
                "Cannot write a null document into collection {}",
                self.collection_name
            );
            return Err(QuireError::new(
                &format!(
                    "Cannot write a null document into collection {}",
                    self.collection_name
                ),
                ErrorKind::InvalidInput,
            ));
        }
        Ok(())
    }

    fn insert(&self, document: Document) -> QuireResult<WriteResult> {
        self.check_document(&document)?;
        let bytes = encode_document(&document)?;

        for attempt in 1..=self.id_allocation_attempts {
            let id = DocumentId::new();
            match self.partition.insert(id, bytes.clone()) {
                Ok(id) => {
                    self.index_writer.write_index_entry(id, &document)?;
                    return Ok(WriteResult::new(id));
                }
                Err(e) if e.kind() == &ErrorKind::DuplicateId => {
                    log::warn!(
                        "Identifier {} is taken in collection {}, retrying ({}/{})",
                        id,
                        self.collection_name,
                        attempt,
                        self.id_allocation_attempts
                    );
                }
                Err(e) => return Err(e),
            }
        }

        log::error!(
            "Failed to allocate a free identifier in collection {} after {} attempts",
            self.collection_name,
            self.id_allocation_attempts
        );
        Err(QuireError::new(
            &format!(
                "Failed to allocate a free identifier in collection {} after {} attempts",
                self.collection_name, self.id_allocation_attempts
            ),
            ErrorKind::DuplicateId,
        ))
    }

    fn insert_with_id(&self, id: DocumentId, document: Document) -> QuireResult<WriteResult> {
        self.check_document(&document)?;
        let bytes = encode_document(&document)?;

        let id = self.partition.insert(id, bytes)?;
        self.index_writer.write_index_entry(id, &document)?;
        Ok(WriteResult::new(id))
    }

    fn update(&self, id: DocumentId, document: Document) -> QuireResult<WriteResult> {
        self.check_document(&document)?;
        let bytes = encode_document(&document)?;

        let (original, warning) = self.read_original(id)?;
        self.partition.update(id, bytes)?;

        if let Some(original) = &original {
            self.index_writer.remove_index_entry(id, original)?;
        }
        self.index_writer.write_index_entry(id, &document)?;

        Ok(Self::result(id, warning))
    }

    fn remove(&self, id: DocumentId) -> QuireResult<WriteResult> {
        let (original, warning) = self.read_original(id)?;
        self.partition.delete(id)?;

        if let Some(original) = &original {
            self.index_writer.remove_index_entry(id, original)?;
        }

        Ok(Self::result(id, warning))
    }

    // A stored value that fails to decode cannot be unindexed. The write
    // still goes ahead and the caller gets a warning instead of an error.
    fn read_original(
        &self,
        id: DocumentId,
    ) -> QuireResult<(Option<Document>, Option<WriteWarning>)> {
        let bytes = self.partition.read(id)?;
        match decode_document(&bytes) {
            Ok(original) => Ok((Some(original), None)),
            Err(cause) => {
                log::warn!(
                    "Will not unindex document {} in collection {}: {}",
                    id,
                    self.collection_name,
                    cause
                );
                Ok((None, Some(WriteWarning::StaleIndexEntries { id, cause })))
            }
        }
    }

    fn result(id: DocumentId, warning: Option<WriteWarning>) -> WriteResult {
        match warning {
            Some(warning) => WriteResult::with_warning(id, warning),
            None => WriteResult::new(id),
        }
    }
}
