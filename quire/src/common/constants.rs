/// Joins the segments of an index path into its index name.
pub const INDEX_PATH_SEPARATOR: &str = "!";

/// Default number of identifiers tried before an insert gives up on collisions.
pub const DEFAULT_ID_ALLOCATION_ATTEMPTS: u32 = 8;

/// Identifiers are drawn from `[0, MAX_DOCUMENT_ID]`.
pub const MAX_DOCUMENT_ID: u64 = i64::MAX as u64;

/// Deepest container nesting a document may have. The root container counts
/// as one level. Deeper documents could not be decoded again.
pub const MAX_DOCUMENT_DEPTH: usize = 100;

/// Passing this as the `limit` of an index lookup returns every match.
pub const UNLIMITED: usize = 0;

// Floats with zero fraction below this magnitude are rendered as integers
// when hashed, so `1` and `1.0` land on the same index entry.
pub(crate) const MAX_EXACT_FLOAT_INTEGER: f64 = 9_007_199_254_740_992.0;

// Compile-time checks on the separator
const _: () = {
    assert!(INDEX_PATH_SEPARATOR.len() == 1);
};
