//! Hash-based secondary indexes on nested document fields.
//!
//! An index is declared on an [IndexPath], a sequence of field names leading
//! into a document. Every scalar found at that path (arrays along the way are
//! flattened) is hashed with [hash_value] and stored as a `(hash, id)` entry
//! in the index's [HashIndex](crate::store::HashIndex).
//!
//! ```rust,ignore
//! use quire::doc;
//!
//! let orders = db.collection("orders")?;
//! orders.index(&["items", "sku"])?;
//!
//! let id = orders.insert(doc! { items: [{ sku: "a" }, { sku: "b" }] })?.id();
//! assert!(orders.lookup(&["items", "sku"], &"a".into(), 0)?.contains(&id));
//! ```
//!
//! # Components
//!
//! - [resolve] walks a document along a path and lazily yields every value
//!   reached.
//! - [hash_value] turns a scalar into its 64-bit index key.
//! - [IndexRegistry] keeps the indexes of one collection in registration order.

mod index_path;
mod index_registry;
mod path_resolver;
mod value_hasher;

pub use index_path::*;
pub use index_registry::*;
pub use path_resolver::*;
pub use value_hasher::*;
