use crate::collection::DocumentId;
use crate::errors::QuireResult;
use std::ops::Deref;
use std::sync::Arc;

/// Low-level contract of a hash-keyed secondary index store.
///
/// # Purpose
/// A hash index maps the hash of an indexed value to the set of document
/// identifiers whose document holds a value with that hash. Different values
/// may share a hash, so a lookup returns candidates that the caller confirms
/// against the documents themselves.
///
/// # Contract
/// - Entries have set semantics per hash: putting the same `(hash, id)` pair
///   twice stores it once, and removing it once removes it.
/// - Removing an absent pair is not an error.
/// - `get` returns identifiers in the order they were first put, at most
///   `limit` of them, or all of them when `limit` is zero. A hash with no
///   entries yields an empty list.
/// - Every operation on a closed or disposed store fails with `StoreClosed`.
///
/// # Thread Safety
/// Implementers must be `Send + Sync`.
pub trait HashIndexProvider: Send + Sync {
    /// Adds `id` to the entries of `hash`.
    fn put(&self, hash: u64, id: DocumentId) -> QuireResult<()>;

    /// Removes `id` from the entries of `hash`.
    ///
    /// # Returns
    /// * `Ok(true)` if the pair was present and has been removed
    /// * `Ok(false)` if the pair was not present
    fn remove(&self, hash: u64, id: DocumentId) -> QuireResult<bool>;

    /// Returns up to `limit` identifiers stored under `hash`; zero means no limit.
    fn get(&self, hash: u64, limit: usize) -> QuireResult<Vec<DocumentId>>;

    /// Returns every `(hash, id)` pair in the store, sorted.
    fn entries(&self) -> QuireResult<Vec<(u64, DocumentId)>>;

    /// Closes the store. Closing twice is a no-op.
    fn close(&self) -> QuireResult<()>;

    /// Returns `true` once the store has been closed or disposed.
    fn is_closed(&self) -> QuireResult<bool>;

    /// Discards every entry and closes the store for good.
    fn dispose(&self) -> QuireResult<()>;
}

/// A cloneable handle to a [HashIndexProvider].
#[derive(Clone)]
pub struct HashIndex {
    inner: Arc<dyn HashIndexProvider>,
}

impl HashIndex {
    pub fn new<T: HashIndexProvider + 'static>(inner: T) -> Self {
        HashIndex {
            inner: Arc::new(inner),
        }
    }
}

impl Deref for HashIndex {
    type Target = Arc<dyn HashIndexProvider>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}
