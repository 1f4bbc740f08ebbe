//! Shared building blocks: interior-mutability helpers, the database-wide
//! lock, constants and the document codec.

mod codec;
mod constants;
mod lock;
mod util;

pub use codec::*;
pub use constants::*;
pub use lock::*;
pub use util::*;
