//! Documents and collections.
//!
//! A [Document] is a JSON-shaped value: null, boolean, number, string,
//! array or an ordered string-keyed map. Collections store mapping
//! documents under a [DocumentId] and keep hash indexes on document paths
//! in step with every write.
//!
//! ```rust,ignore
//! use quire::doc;
//! use quire::quire::Quire;
//!
//! let db = Quire::builder().open()?;
//! let orders = db.collection("orders")?;
//!
//! orders.index(&["items", "sku"])?;
//! let id = orders
//!     .insert(doc! { items: [{ sku: "A-1" }, { sku: "B-2" }] })?
//!     .id();
//!
//! // every element of an array of documents is indexed
//! assert_eq!(orders.lookup(&["items", "sku"], &"B-2".into(), 0)?, vec![id]);
//! ```

mod document;
mod document_id;
pub(crate) mod operation;
mod quire_collection;

pub use document::*;
pub use document_id::*;
pub use operation::{WriteResult, WriteWarning};
pub use quire_collection::*;
