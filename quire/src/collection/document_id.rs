use crate::common::MAX_DOCUMENT_ID;
use rand::Rng;
use std::fmt::{Debug, Display};

/// The identifier of a stored document.
///
/// Identifiers are assigned at insert time, stay stable until the document is
/// deleted, and are unique within a collection. New identifiers are drawn
/// uniformly from `[0, 2^63)`; a collection rejects and redraws an identifier
/// that is already taken instead of overwriting the existing record.
///
/// # Examples
///
/// ```rust
/// use quire::collection::DocumentId;
///
/// let generated = DocumentId::new();
/// let restored = DocumentId::from(42);
/// assert_eq!(restored.value(), 42);
/// assert!(generated.value() <= i64::MAX as u64);
/// ```
#[derive(PartialEq, Eq, Ord, PartialOrd, Hash, Clone, Copy)]
pub struct DocumentId {
    id_value: u64,
}

impl DocumentId {
    /// Draws a new random identifier.
    pub fn new() -> Self {
        let id_value = rand::thread_rng().gen_range(0..=MAX_DOCUMENT_ID);
        DocumentId { id_value }
    }

    /// Returns the numeric value of this identifier.
    pub fn value(&self) -> u64 {
        self.id_value
    }
}

impl Default for DocumentId {
    fn default() -> Self {
        DocumentId::new()
    }
}

impl From<u64> for DocumentId {
    fn from(id_value: u64) -> Self {
        DocumentId { id_value }
    }
}

impl From<DocumentId> for u64 {
    fn from(id: DocumentId) -> Self {
        id.id_value
    }
}

impl Debug for DocumentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "DocumentId({})", self.id_value)
    }
}

impl Display for DocumentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id_value)
    }
}
