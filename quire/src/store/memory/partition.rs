use crate::collection::DocumentId;
use crate::errors::{ErrorKind, QuireError, QuireResult};
use crate::store::PartitionProvider;
use crossbeam_skiplist::SkipMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// In-memory document partition backed by a concurrent skip list.
///
/// Documents are kept ordered by identifier, so enumeration visits them in
/// ascending identifier order. Clones share the same data and the same open
/// state.
#[derive(Clone)]
pub struct InMemoryPartition {
    inner: Arc<InMemoryPartitionInner>,
}

impl InMemoryPartition {
    pub fn new(name: &str) -> Self {
        InMemoryPartition {
            inner: Arc::new(InMemoryPartitionInner::new(name, Arc::new(SkipMap::new()))),
        }
    }

    /// Returns a new open handle over the documents of this partition.
    ///
    /// Closing only ends a handle; the documents stay in memory for the next
    /// handle. The handle this is called on keeps its own open state.
    pub fn reopen(&self) -> Self {
        InMemoryPartition {
            inner: Arc::new(InMemoryPartitionInner::new(
                &self.inner.name,
                self.inner.backing_map.clone(),
            )),
        }
    }
}

impl PartitionProvider for InMemoryPartition {
    fn insert(&self, id: DocumentId, bytes: Vec<u8>) -> QuireResult<DocumentId> {
        self.inner.insert(id, bytes)
    }

    fn read(&self, id: DocumentId) -> QuireResult<Vec<u8>> {
        self.inner.read(id)
    }

    fn update(&self, id: DocumentId, bytes: Vec<u8>) -> QuireResult<()> {
        self.inner.update(id, bytes)
    }

    fn delete(&self, id: DocumentId) -> QuireResult<()> {
        self.inner.delete(id)
    }

    fn for_each_doc(&self, visit: &mut dyn FnMut(DocumentId, &[u8]) -> bool) -> QuireResult<()> {
        self.inner.for_each_doc(visit)
    }

    fn size(&self) -> QuireResult<u64> {
        self.inner.size()
    }

    fn close(&self) -> QuireResult<()> {
        self.inner.close()
    }

    fn is_closed(&self) -> QuireResult<bool> {
        self.inner.is_closed()
    }
}

struct InMemoryPartitionInner {
    backing_map: Arc<SkipMap<u64, Vec<u8>>>,
    closed: AtomicBool,
    name: String,
}

impl InMemoryPartitionInner {
    fn new(name: &str, backing_map: Arc<SkipMap<u64, Vec<u8>>>) -> Self {
        InMemoryPartitionInner {
            backing_map,
            closed: AtomicBool::from(false),
            name: name.to_string(),
        }
    }

    fn check_opened(&self) -> QuireResult<()> {
        if self.closed.load(Ordering::Relaxed) {
            log::error!("Partition {} is closed", self.name);
            return Err(QuireError::new(
                &format!("Partition {} is closed", self.name),
                ErrorKind::StoreClosed,
            ));
        }
        Ok(())
    }

    fn not_found(&self, id: DocumentId) -> QuireError {
        log::error!("Document {} not found in partition {}", id, self.name);
        QuireError::new(
            &format!("Document {} not found in partition {}", id, self.name),
            ErrorKind::NotFound,
        )
    }

    fn insert(&self, id: DocumentId, bytes: Vec<u8>) -> QuireResult<DocumentId> {
        self.check_opened()?;

        let mut inserted = false;
        self.backing_map.get_or_insert_with(id.value(), || {
            inserted = true;
            bytes
        });

        if !inserted {
            log::error!("Document {} already exists in partition {}", id, self.name);
            return Err(QuireError::new(
                &format!("Document {} already exists in partition {}", id, self.name),
                ErrorKind::DuplicateId,
            ));
        }
        Ok(id)
    }

    fn read(&self, id: DocumentId) -> QuireResult<Vec<u8>> {
        self.check_opened()?;

        match self.backing_map.get(&id.value()) {
            Some(entry) => Ok(entry.value().clone()),
            None => Err(self.not_found(id)),
        }
    }

    fn update(&self, id: DocumentId, bytes: Vec<u8>) -> QuireResult<()> {
        self.check_opened()?;

        if !self.backing_map.contains_key(&id.value()) {
            return Err(self.not_found(id));
        }
        self.backing_map.insert(id.value(), bytes);
        Ok(())
    }

    fn delete(&self, id: DocumentId) -> QuireResult<()> {
        self.check_opened()?;

        match self.backing_map.remove(&id.value()) {
            Some(_) => Ok(()),
            None => Err(self.not_found(id)),
        }
    }

    fn for_each_doc(&self, visit: &mut dyn FnMut(DocumentId, &[u8]) -> bool) -> QuireResult<()> {
        self.check_opened()?;

        for entry in self.backing_map.iter() {
            if !visit(DocumentId::from(*entry.key()), entry.value()) {
                break;
            }
        }
        Ok(())
    }

    fn size(&self) -> QuireResult<u64> {
        self.check_opened()?;
        Ok(self.backing_map.len() as u64)
    }

    fn close(&self) -> QuireResult<()> {
        self.closed.store(true, Ordering::Relaxed);
        Ok(())
    }

    fn is_closed(&self) -> QuireResult<bool> {
        Ok(self.closed.load(Ordering::Relaxed))
    }
}
