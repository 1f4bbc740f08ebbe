//! Database setup for benchmarks

use crate::data_gen::INDEXED_PATHS;
use quire::collection::{Collection, Document, DocumentId};
use quire::quire::Quire;

/// Result type for store operations
pub type StoreResult<T> = Result<T, Box<dyn std::error::Error>>;

/// Context holding a database that is closed when dropped
pub struct BenchContext {
    db: Quire,
}

impl BenchContext {
    pub fn db(&self) -> &Quire {
        &self.db
    }
}

impl Drop for BenchContext {
    fn drop(&mut self) {
        let _ = self.db.close();
    }
}

/// Create an in-memory Quire database
pub fn create_inmemory_db() -> StoreResult<BenchContext> {
    let db = Quire::builder().open()?;
    Ok(BenchContext { db })
}

/// Open the `bench` collection with an index on every path in [INDEXED_PATHS].
pub fn create_indexed_collection(ctx: &BenchContext) -> StoreResult<Collection> {
    let collection = ctx.db().collection("bench")?;
    for path in INDEXED_PATHS {
        collection.index(path)?;
    }
    Ok(collection)
}

/// Insert `docs` and return their identifiers in insertion order.
pub fn populate(collection: &Collection, docs: &[Document]) -> StoreResult<Vec<DocumentId>> {
    let mut ids = Vec::with_capacity(docs.len());
    for document in docs {
        ids.push(collection.insert(document.clone())?.id());
    }
    log::debug!("Populated {} with {} documents", collection.name(), ids.len());
    Ok(ids)
}
