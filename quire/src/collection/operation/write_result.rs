use crate::collection::DocumentId;
use crate::errors::QuireError;
use std::fmt::Display;

/// The outcome of a successful insert, update or delete.
///
/// A write either fails outright or succeeds, possibly with warnings. A
/// warning means the document store itself was written correctly but some
/// index may now hold entries that no longer match, which
/// [Collection::reindex](crate::collection::Collection::reindex) repairs.
///
/// # Examples
///
/// ```rust,ignore
/// use quire::doc;
///
/// let result = users.update(id, doc! { name: "Bob" })?;
/// for warning in result.warnings() {
///     log::warn!("{}", warning);
/// }
/// ```
#[derive(Debug)]
pub struct WriteResult {
    id: DocumentId,
    warnings: Vec<WriteWarning>,
}

impl WriteResult {
    pub fn new(id: DocumentId) -> Self {
        WriteResult {
            id,
            warnings: Vec::new(),
        }
    }

    pub fn with_warning(id: DocumentId, warning: WriteWarning) -> Self {
        WriteResult {
            id,
            warnings: vec![warning],
        }
    }

    /// The identifier of the written document.
    pub fn id(&self) -> DocumentId {
        self.id
    }

    pub fn warnings(&self) -> &[WriteWarning] {
        &self.warnings
    }

    /// Returns `true` if the write completed without warnings.
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}

/// A recoverable anomaly met while completing a write.
#[derive(Debug)]
pub enum WriteWarning {
    /// The previous content of the document could not be decoded, so its
    /// index entries were left in place.
    StaleIndexEntries { id: DocumentId, cause: QuireError },
}

impl Display for WriteWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WriteWarning::StaleIndexEntries { id, cause } => write!(
                f,
                "Index entries of document {} may be stale: {}",
                id,
                cause.message()
            ),
        }
    }
}
