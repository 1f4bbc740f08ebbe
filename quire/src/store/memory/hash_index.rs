use crate::collection::DocumentId;
use crate::common::UNLIMITED;
use crate::errors::{ErrorKind, QuireError, QuireResult};
use crate::store::HashIndexProvider;
use dashmap::DashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// In-memory hash index backed by a `DashMap` of identifier lists.
///
/// Each hash maps to the identifiers put under it, in the order they were
/// first put. Hashes whose last identifier is removed are dropped from the
/// map.
#[derive(Clone)]
pub struct InMemoryHashIndex {
    inner: Arc<InMemoryHashIndexInner>,
}

impl InMemoryHashIndex {
    pub fn new(name: &str) -> Self {
        InMemoryHashIndex {
            inner: Arc::new(InMemoryHashIndexInner::new(name)),
        }
    }
}

impl HashIndexProvider for InMemoryHashIndex {
    fn put(&self, hash: u64, id: DocumentId) -> QuireResult<()> {
        self.inner.put(hash, id)
    }

    fn remove(&self, hash: u64, id: DocumentId) -> QuireResult<bool> {
        self.inner.remove(hash, id)
    }

    fn get(&self, hash: u64, limit: usize) -> QuireResult<Vec<DocumentId>> {
        self.inner.get(hash, limit)
    }

    fn entries(&self) -> QuireResult<Vec<(u64, DocumentId)>> {
        self.inner.entries()
    }

    fn close(&self) -> QuireResult<()> {
        self.inner.close()
    }

    fn is_closed(&self) -> QuireResult<bool> {
        self.inner.is_closed()
    }

    fn dispose(&self) -> QuireResult<()> {
        self.inner.dispose()
    }
}

struct InMemoryHashIndexInner {
    buckets: DashMap<u64, Vec<DocumentId>>,
    closed: AtomicBool,
    dropped: AtomicBool,
    name: String,
}

impl InMemoryHashIndexInner {
    fn new(name: &str) -> Self {
        InMemoryHashIndexInner {
            buckets: DashMap::new(),
            closed: AtomicBool::from(false),
            dropped: AtomicBool::from(false),
            name: name.to_string(),
        }
    }

    fn check_opened(&self) -> QuireResult<()> {
        if self.dropped.load(Ordering::Relaxed) {
            log::error!("Hash index {} is disposed", self.name);
            return Err(QuireError::new(
                &format!("Hash index {} is disposed", self.name),
                ErrorKind::StoreClosed,
            ));
        }

        if self.closed.load(Ordering::Relaxed) {
            log::error!("Hash index {} is closed", self.name);
            return Err(QuireError::new(
                &format!("Hash index {} is closed", self.name),
                ErrorKind::StoreClosed,
            ));
        }

        Ok(())
    }

    fn put(&self, hash: u64, id: DocumentId) -> QuireResult<()> {
        self.check_opened()?;

        let mut ids = self.buckets.entry(hash).or_default();
        if !ids.contains(&id) {
            ids.push(id);
        }
        Ok(())
    }

    fn remove(&self, hash: u64, id: DocumentId) -> QuireResult<bool> {
        self.check_opened()?;

        let (removed, now_empty) = match self.buckets.get_mut(&hash) {
            Some(mut ids) => match ids.iter().position(|existing| *existing == id) {
                Some(position) => {
                    ids.remove(position);
                    (true, ids.is_empty())
                }
                None => (false, false),
            },
            None => (false, false),
        };

        // the bucket guard above must be released before removing the key
        if now_empty {
            self.buckets.remove_if(&hash, |_, ids| ids.is_empty());
        }
        Ok(removed)
    }

    fn get(&self, hash: u64, limit: usize) -> QuireResult<Vec<DocumentId>> {
        self.check_opened()?;

        match self.buckets.get(&hash) {
            Some(ids) if limit == UNLIMITED => Ok(ids.clone()),
            Some(ids) => Ok(ids.iter().take(limit).copied().collect()),
            None => Ok(Vec::new()),
        }
    }

    fn entries(&self) -> QuireResult<Vec<(u64, DocumentId)>> {
        self.check_opened()?;

        let mut entries: Vec<(u64, DocumentId)> = self
            .buckets
            .iter()
            .flat_map(|bucket| {
                let hash = *bucket.key();
                bucket
                    .value()
                    .iter()
                    .map(move |id| (hash, *id))
                    .collect::<Vec<_>>()
            })
            .collect();
        entries.sort_unstable();
        Ok(entries)
    }

    fn close(&self) -> QuireResult<()> {
        self.closed.store(true, Ordering::Relaxed);
        Ok(())
    }

    fn is_closed(&self) -> QuireResult<bool> {
        Ok(self.closed.load(Ordering::Relaxed) || self.dropped.load(Ordering::Relaxed))
    }

    fn dispose(&self) -> QuireResult<()> {
        self.buckets.clear();
        self.dropped.store(true, Ordering::Relaxed);
        self.closed.store(true, Ordering::Relaxed);
        Ok(())
    }
}
