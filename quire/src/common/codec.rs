use crate::collection::Document;
use crate::common::MAX_DOCUMENT_DEPTH;
use crate::errors::{ErrorKind, QuireError, QuireResult};

/// Encodes a document into its JSON byte form.
///
/// # Errors
///
/// `EncodingError` if the document could not be read back unchanged: it
/// holds a NaN or infinite number, which JSON cannot represent, or it nests
/// containers deeper than [MAX_DOCUMENT_DEPTH].
pub fn encode_document(document: &Document) -> QuireResult<Vec<u8>> {
    if !document.is_finite() {
        log::error!("Cannot encode a document holding a non-finite number");
        return Err(QuireError::new(
            "Cannot encode a document holding a non-finite number",
            ErrorKind::EncodingError,
        ));
    }

    if document.nests_deeper_than(MAX_DOCUMENT_DEPTH) {
        log::error!(
            "Cannot encode a document nested deeper than {} levels",
            MAX_DOCUMENT_DEPTH
        );
        return Err(QuireError::new(
            &format!(
                "Cannot encode a document nested deeper than {} levels",
                MAX_DOCUMENT_DEPTH
            ),
            ErrorKind::EncodingError,
        ));
    }

    serde_json::to_vec(document).map_err(|e| {
        log::error!("Failed to encode document: {}", e);
        QuireError::new(
            &format!("Failed to encode document: {}", e),
            ErrorKind::EncodingError,
        )
    })
}

/// Decodes a document from its JSON byte form.
///
/// # Errors
///
/// `DecodeError` if the bytes are not a valid encoded document.
pub fn decode_document(bytes: &[u8]) -> QuireResult<Document> {
    Ok(serde_json::from_slice(bytes)?)
}
