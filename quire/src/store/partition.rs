use crate::collection::DocumentId;
use crate::errors::QuireResult;
use std::ops::Deref;
use std::sync::Arc;

/// Low-level contract of a per-collection document byte store.
///
/// # Purpose
/// A partition persists the encoded bytes of every document in one
/// collection, keyed by [DocumentId]. It knows nothing about document
/// structure or indexes; the collection layer encodes, decodes and keeps
/// indexes in step with it.
///
/// # Contract
/// - `insert` never overwrites: an identifier that is already present fails
///   with `DuplicateId`.
/// - `read`, `update` and `delete` fail with `NotFound` for an absent
///   identifier.
/// - Every operation on a closed partition fails with `StoreClosed`.
///
/// # Thread Safety
/// Implementers must be `Send + Sync`. The collection layer serializes
/// writers through the database lock, but concurrent readers may call
/// `read` and `for_each_doc` at the same time.
pub trait PartitionProvider: Send + Sync {
    /// Stores a new document.
    ///
    /// # Arguments
    /// * `id` - The identifier to store the document under
    /// * `bytes` - The encoded document
    ///
    /// # Returns
    /// * `Ok(id)` once the document is stored
    /// * `Err(QuireError)` with `DuplicateId` if `id` is already taken
    fn insert(&self, id: DocumentId, bytes: Vec<u8>) -> QuireResult<DocumentId>;

    /// Reads the encoded bytes stored under `id`.
    ///
    /// # Returns
    /// * `Ok(bytes)` if the document exists
    /// * `Err(QuireError)` with `NotFound` if it does not
    fn read(&self, id: DocumentId) -> QuireResult<Vec<u8>>;

    /// Replaces the encoded bytes stored under `id`.
    ///
    /// # Returns
    /// * `Ok(())` if the document existed and was replaced
    /// * `Err(QuireError)` with `NotFound` if it does not exist
    fn update(&self, id: DocumentId, bytes: Vec<u8>) -> QuireResult<()>;

    /// Removes the document stored under `id`.
    ///
    /// # Returns
    /// * `Ok(())` if the document existed and was removed
    /// * `Err(QuireError)` with `NotFound` if it does not exist
    fn delete(&self, id: DocumentId) -> QuireResult<()>;

    /// Visits every stored document until `visit` returns `false`.
    ///
    /// # Arguments
    /// * `visit` - Called with the identifier and encoded bytes of each
    ///   document; returning `false` stops the enumeration
    fn for_each_doc(&self, visit: &mut dyn FnMut(DocumentId, &[u8]) -> bool) -> QuireResult<()>;

    /// Returns the number of stored documents.
    fn size(&self) -> QuireResult<u64>;

    /// Closes the partition. Closing twice is a no-op.
    fn close(&self) -> QuireResult<()>;

    /// Returns `true` once the partition has been closed.
    fn is_closed(&self) -> QuireResult<bool>;
}

/// A cloneable handle to a [PartitionProvider].
///
/// Cloning is cheap and every clone refers to the same underlying store.
#[derive(Clone)]
pub struct Partition {
    inner: Arc<dyn PartitionProvider>,
}

impl Partition {
    pub fn new<T: PartitionProvider + 'static>(inner: T) -> Self {
        Partition {
            inner: Arc::new(inner),
        }
    }
}

impl Deref for Partition {
    type Target = Arc<dyn PartitionProvider>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{ErrorKind, QuireError};

    struct SingleDocPartition;

    impl PartitionProvider for SingleDocPartition {
        fn insert(&self, id: DocumentId, _bytes: Vec<u8>) -> QuireResult<DocumentId> {
            Ok(id)
        }

        fn read(&self, id: DocumentId) -> QuireResult<Vec<u8>> {
            if id.value() == 1 {
                Ok(b"{}".to_vec())
            } else {
                Err(QuireError::new("missing", ErrorKind::NotFound))
            }
        }

        fn update(&self, _id: DocumentId, _bytes: Vec<u8>) -> QuireResult<()> {
            Ok(())
        }

        fn delete(&self, _id: DocumentId) -> QuireResult<()> {
            Ok(())
        }

        fn for_each_doc(
            &self,
            visit: &mut dyn FnMut(DocumentId, &[u8]) -> bool,
        ) -> QuireResult<()> {
            visit(DocumentId::from(1), b"{}");
            Ok(())
        }

        fn size(&self) -> QuireResult<u64> {
            Ok(1)
        }

        fn close(&self) -> QuireResult<()> {
            Ok(())
        }

        fn is_closed(&self) -> QuireResult<bool> {
            Ok(false)
        }
    }

    #[test]
    fn test_handle_derefs_to_provider() {
        let partition = Partition::new(SingleDocPartition);
        assert_eq!(partition.read(DocumentId::from(1)).unwrap(), b"{}".to_vec());
        assert_eq!(
            partition.read(DocumentId::from(2)).unwrap_err().kind(),
            &ErrorKind::NotFound
        );
        assert_eq!(partition.size().unwrap(), 1);
    }

    #[test]
    fn test_clones_share_provider() {
        let partition = Partition::new(SingleDocPartition);
        let clone = partition.clone();
        assert!(Arc::ptr_eq(&partition.inner, &clone.inner));
    }

    #[test]
    fn test_for_each_doc_through_handle() {
        let partition = Partition::new(SingleDocPartition);
        let mut seen = Vec::new();
        partition
            .for_each_doc(&mut |id, bytes| {
                seen.push((id, bytes.to_vec()));
                true
            })
            .unwrap();
        assert_eq!(seen, vec![(DocumentId::from(1), b"{}".to_vec())]);
    }
}
