use crate::errors::{ErrorKind, QuireError, QuireResult};
use crate::index::{IndexName, IndexPath};
use crate::store::HashIndex;
use indexmap::IndexMap;

/// A registered index: its path and the store holding its entries.
#[derive(Clone)]
pub struct IndexEntry {
    path: IndexPath,
    store: HashIndex,
}

impl IndexEntry {
    pub fn new(path: IndexPath, store: HashIndex) -> Self {
        IndexEntry { path, store }
    }

    pub fn path(&self) -> &IndexPath {
        &self.path
    }

    pub fn store(&self) -> &HashIndex {
        &self.store
    }
}

/// The table of indexes registered on one collection.
///
/// Entries are keyed by [IndexName] and enumerate in registration order.
/// Dropping an entry keeps the relative order of the others.
#[derive(Clone, Default)]
pub struct IndexRegistry {
    entries: IndexMap<IndexName, IndexEntry>,
}

impl IndexRegistry {
    pub fn new() -> Self {
        IndexRegistry::default()
    }

    pub fn contains(&self, name: &IndexName) -> bool {
        self.entries.contains_key(name)
    }

    pub fn get(&self, name: &IndexName) -> Option<&IndexEntry> {
        self.entries.get(name)
    }

    /// Registers a new index after all existing ones.
    ///
    /// Fails with `AlreadyIndexed` if an index with the same name exists.
    pub fn insert(&mut self, path: IndexPath, store: HashIndex) -> QuireResult<()> {
        let name = path.name();
        if self.entries.contains_key(&name) {
            log::error!("Index on {} already exists", name);
            return Err(QuireError::new(
                &format!("Index on {} already exists", name),
                ErrorKind::AlreadyIndexed,
            ));
        }

        self.entries.insert(name, IndexEntry::new(path, store));
        Ok(())
    }

    /// Unregisters an index and returns its entry.
    ///
    /// Fails with `NotIndexed` if no index has that name.
    pub fn remove(&mut self, name: &IndexName) -> QuireResult<IndexEntry> {
        match self.entries.shift_remove(name) {
            Some(entry) => Ok(entry),
            None => {
                log::error!("Index on {} does not exist", name);
                Err(QuireError::new(
                    &format!("Index on {} does not exist", name),
                    ErrorKind::NotIndexed,
                ))
            }
        }
    }

    /// Swaps the store of a registered index in place, returning the old store.
    pub fn replace_store(&mut self, name: &IndexName, store: HashIndex) -> QuireResult<HashIndex> {
        match self.entries.get_mut(name) {
            Some(entry) => Ok(std::mem::replace(&mut entry.store, store)),
            None => {
                log::error!("Index on {} does not exist", name);
                Err(QuireError::new(
                    &format!("Index on {} does not exist", name),
                    ErrorKind::NotIndexed,
                ))
            }
        }
    }

    pub fn paths(&self) -> Vec<IndexPath> {
        self.entries.values().map(|entry| entry.path.clone()).collect()
    }

    pub fn names(&self) -> Vec<IndexName> {
        self.entries.keys().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&IndexName, &IndexEntry)> {
        self.entries.iter()
    }

    /// Removes every entry, returning them in registration order.
    pub fn drain(&mut self) -> Vec<IndexEntry> {
        self.entries.drain(..).map(|(_, entry)| entry).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
