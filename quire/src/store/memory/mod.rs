//! In-memory stores, used by default and in tests. Nothing is persisted.

mod hash_index;
mod partition;
mod provider;

pub use hash_index::*;
pub use partition::*;
pub use provider::*;
