use crate::collection::operation::CollectionOperations;
use crate::collection::{Document, DocumentId, WriteResult};
use crate::errors::{ErrorKind, QuireError, QuireResult};
use crate::index::IndexPath;
use crate::quire::QuireInner;
use crate::quire_config::QuireConfig;
use std::sync::{Arc, Weak};

/// A named set of documents with hash indexes on document paths.
///
/// Every document read takes the database lock in shared mode and every
/// mutation takes it exclusively, so a reader never sees a document whose
/// index entries are half written. The lock is shared by all collections
/// of one database.
///
/// `Collection` is a cheap handle: clones refer to the same collection.
/// It holds only a weak reference to its database and fails with
/// `DatabaseClosed` once the database is closed or dropped.
///
/// # Examples
///
/// ```rust,ignore
/// use quire::doc;
/// use quire::quire::Quire;
///
/// let db = Quire::builder().open()?;
/// let users = db.collection("users")?;
///
/// users.index(&["address", "city"])?;
/// let id = users.insert(doc! { name: "Ann", address: { city: "Oslo" } })?.id();
///
/// let hits = users.lookup(&["address", "city"], &"Oslo".into(), 0)?;
/// assert_eq!(hits, vec![id]);
/// ```
#[derive(Clone)]
pub struct Collection {
    inner: Arc<CollectionInner>,
}

impl Collection {
    pub(crate) fn new(name: &str, config: &QuireConfig, db: Weak<QuireInner>) -> QuireResult<Self> {
        let operations = CollectionOperations::new(name, config)?;
        Ok(Collection {
            inner: Arc::new(CollectionInner {
                name: name.to_string(),
                operations,
                db,
            }),
        })
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Stores a document under a freshly allocated identifier and indexes it.
    ///
    /// # Errors
    ///
    /// * `InvalidInput` if the document is null
    /// * `EncodingError` if it holds a non-finite number
    /// * `DuplicateId` if every identifier tried was taken
    /// * any storage error from the partition or an index store
    pub fn insert(&self, document: Document) -> QuireResult<WriteResult> {
        let db = self.inner.database()?;
        let _guard = db.lock().write();
        db.ensure_opened()?;
        self.inner.operations.insert(document)
    }

    /// Reads the document stored under `id`.
    ///
    /// Fails with `NotFound` if there is none, and with `DecodeError` if the
    /// stored bytes cannot be decoded.
    pub fn read(&self, id: DocumentId) -> QuireResult<Document> {
        let db = self.inner.database()?;
        let _guard = db.lock().read();
        db.ensure_opened()?;
        self.inner.operations.get_by_id(id)
    }

    /// Replaces the document stored under `id` and moves its index entries.
    ///
    /// If the previous document cannot be decoded the write still goes
    /// through, and the returned result carries a warning that its old index
    /// entries may be stale.
    pub fn update(&self, id: DocumentId, document: Document) -> QuireResult<WriteResult> {
        let db = self.inner.database()?;
        let _guard = db.lock().write();
        db.ensure_opened()?;
        self.inner.operations.update(id, document)
    }

    /// Deletes the document stored under `id` and removes its index entries.
    pub fn delete(&self, id: DocumentId) -> QuireResult<WriteResult> {
        let db = self.inner.database()?;
        let _guard = db.lock().write();
        db.ensure_opened()?;
        self.inner.operations.remove(id)
    }

    /// Stores a document under a caller-chosen identifier, without taking
    /// the database lock.
    ///
    /// Meant for restoring a collection from a dump while nothing else
    /// touches the database. Callers must serialize it against every other
    /// operation themselves. Fails with `DuplicateId` if `id` is taken.
    pub fn insert_recovery(&self, id: DocumentId, document: Document) -> QuireResult<WriteResult> {
        let db = self.inner.database()?;
        db.ensure_opened()?;
        self.inner.operations.insert_with_id(id, document)
    }

    /// Creates an index on `path` and fills it from the documents already
    /// stored.
    ///
    /// # Errors
    ///
    /// * `InvalidInput` if `path` is empty or a segment is empty or holds `!`
    /// * `AlreadyIndexed` if the path is indexed already
    pub fn index<S: AsRef<str>>(&self, path: &[S]) -> QuireResult<()> {
        let path = IndexPath::new(path)?;
        let db = self.inner.database()?;
        let _guard = db.lock().write();
        db.ensure_opened()?;
        self.inner.operations.create_index(path)
    }

    /// Removes the index on `path`. Fails with `NotIndexed` if there is none.
    pub fn unindex<S: AsRef<str>>(&self, path: &[S]) -> QuireResult<()> {
        let path = IndexPath::new(path)?;
        let db = self.inner.database()?;
        let _guard = db.lock().write();
        db.ensure_opened()?;
        self.inner.operations.drop_index(&path)
    }

    /// Discards the entries of the index on `path` and rebuilds them from
    /// the stored documents.
    pub fn reindex<S: AsRef<str>>(&self, path: &[S]) -> QuireResult<()> {
        let path = IndexPath::new(path)?;
        let db = self.inner.database()?;
        let _guard = db.lock().write();
        db.ensure_opened()?;
        self.inner.operations.rebuild_index(&path)
    }

    /// Indexed paths in the order they were created.
    pub fn all_indexes(&self) -> QuireResult<Vec<IndexPath>> {
        let db = self.inner.database()?;
        let _guard = db.lock().read();
        db.ensure_opened()?;
        Ok(self.inner.operations.list_indexes())
    }

    /// Index names (segments joined with `!`) in the order the indexes were
    /// created.
    pub fn all_indexes_joint_paths(&self) -> QuireResult<Vec<String>> {
        let db = self.inner.database()?;
        let _guard = db.lock().read();
        db.ensure_opened()?;
        Ok(self.inner.operations.list_index_names())
    }

    /// Returns up to `limit` identifiers of documents whose value at `path`
    /// hashes like `value`. A `limit` of 0 means no limit.
    ///
    /// The result holds hash candidates: distinct values may collide, so
    /// callers that need exact matches must read the documents and compare.
    pub fn lookup<S: AsRef<str>>(
        &self,
        path: &[S],
        value: &Document,
        limit: usize,
    ) -> QuireResult<Vec<DocumentId>> {
        let path = IndexPath::new(path)?;
        let db = self.inner.database()?;
        let _guard = db.lock().read();
        db.ensure_opened()?;
        self.inner.operations.lookup(&path, value, limit)
    }

    /// Visits every stored `(id, bytes)` pair in id order until `visit`
    /// returns `false`.
    ///
    /// The pairs are copied out under the shared lock and visited after it
    /// is released, so `visit` may call back into the database.
    pub fn for_each_doc<F>(&self, mut visit: F) -> QuireResult<()>
    where
        F: FnMut(DocumentId, &[u8]) -> bool,
    {
        let documents = {
            let db = self.inner.database()?;
            let _guard = db.lock().read();
            db.ensure_opened()?;
            self.inner.operations.snapshot()?
        };

        for (id, bytes) in documents {
            if !visit(id, &bytes) {
                break;
            }
        }
        Ok(())
    }

    /// Number of stored documents.
    pub fn size(&self) -> QuireResult<u64> {
        let db = self.inner.database()?;
        let _guard = db.lock().read();
        db.ensure_opened()?;
        self.inner.operations.size()
    }

    // Called by the database with its write lock held.
    pub(crate) fn close(&self) -> QuireResult<()> {
        self.inner.operations.close()
    }
}

struct CollectionInner {
    name: String,
    operations: CollectionOperations,
    db: Weak<QuireInner>,
}

impl CollectionInner {
    fn database(&self) -> QuireResult<Arc<QuireInner>> {
        self.db.upgrade().ok_or_else(|| {
            log::error!("Database of collection {} has been dropped", self.name);
            QuireError::new(
                &format!("Database of collection {} has been dropped", self.name),
                ErrorKind::DatabaseClosed,
            )
        })
    }
}
