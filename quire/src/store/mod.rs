//! Storage collaborators.
//!
//! The document store talks to persistence only through two contracts:
//!
//! - a **partition** ([PartitionProvider]) maps a document identifier to the
//!   encoded bytes of that document, one partition per collection;
//! - a **hash index** ([HashIndexProvider]) maps a value hash to the set of
//!   identifiers whose document holds that value, one per registered index.
//!
//! Both are opened through a [StoreProvider], wrapped in the cheap, cloneable
//! handles [Partition], [HashIndex] and [StoreFactory]. The [memory] module
//! holds the in-memory implementation used by default and in tests.

mod hash_index;
pub mod memory;
mod partition;
mod store_provider;

pub use hash_index::*;
pub use partition::*;
pub use store_provider::*;
