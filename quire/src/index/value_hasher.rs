use crate::collection::Document;
use std::borrow::Cow;

/// Returns the canonical text of a scalar, the form that is hashed.
///
/// Strings are passed through, booleans render as `true`/`false` and numbers
/// use their canonical [Display](crate::collection::Number) form, so `1` and
/// `1.0` share a text. Null and containers have no canonical text.
pub fn canonical_text(value: &Document) -> Option<Cow<'_, str>> {
    match value {
        Document::String(s) => Some(Cow::Borrowed(s.as_str())),
        Document::Bool(true) => Some(Cow::Borrowed("true")),
        Document::Bool(false) => Some(Cow::Borrowed("false")),
        Document::Number(n) => Some(Cow::Owned(n.to_string())),
        Document::Null | Document::Array(_) | Document::Map(_) => None,
    }
}

/// Hashes a string with the sdbm algorithm over its Unicode scalar values.
///
/// The result is part of the persisted index format and must never change.
///
/// ```rust
/// use quire::index::hash_str;
///
/// assert_eq!(hash_str(""), 0);
/// assert_eq!(hash_str("a"), 97);
/// assert_eq!(hash_str("ab"), 6_363_201);
/// ```
pub fn hash_str(text: &str) -> u64 {
    text.chars().fold(0u64, |hash, c| {
        u64::from(c)
            .wrapping_add(hash << 6)
            .wrapping_add(hash << 16)
            .wrapping_sub(hash)
    })
}

/// Hashes the canonical text of a scalar; `None` for null and containers,
/// which are never indexed.
pub fn hash_value(value: &Document) -> Option<u64> {
    canonical_text(value).map(|text| hash_str(&text))
}
