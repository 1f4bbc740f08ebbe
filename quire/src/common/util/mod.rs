mod guarded;

pub use guarded::*;
