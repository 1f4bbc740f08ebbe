use crate::common::MAX_EXACT_FLOAT_INTEGER;
use crate::errors::{ErrorKind, QuireError, QuireResult};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Display, Formatter};

/// A schema-free record.
///
/// A document is a tree of nested containers: an insertion-ordered mapping of
/// string keys to documents, a sequence of documents, or a scalar (string,
/// number, boolean or null). Any shape is valid. The identity of a stored
/// document is its [DocumentId](crate::collection::DocumentId), never a field
/// inside the tree.
///
/// Documents serialize to and from JSON shapes untagged, so the encoded form
/// of `{"name": "x", "tags": ["a", "b"]}` is exactly that JSON text.
///
/// Equality is deep. Mapping equality ignores key order.
///
/// # Examples
///
/// ```rust
/// use quire::doc;
/// use quire::collection::Document;
///
/// let mut document = doc! {
///     name: "x",
///     tags: ["t1", "t2"],
///     address: { city: "Oslo" }
/// };
/// document.put("visits", 3).unwrap();
///
/// assert_eq!(document.get("name"), Some(&Document::from("x")));
/// assert_eq!(document.len(), 4);
/// ```
#[derive(Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Document {
    /// The null scalar. A null root stands for an absent document.
    #[default]
    Null,
    /// A boolean scalar.
    Bool(bool),
    /// A numeric scalar.
    Number(Number),
    /// A string scalar.
    String(String),
    /// An ordered sequence of documents.
    Array(Vec<Document>),
    /// An insertion-ordered mapping from field name to document.
    Map(IndexMap<String, Document>),
}

impl Document {
    /// Creates an empty mapping document.
    pub fn new() -> Self {
        Document::Map(IndexMap::new())
    }

    /// Associates `value` with the top-level `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// * `InvalidInput` if the key is empty.
    /// * `InvalidOperation` if this document is not a mapping.
    pub fn put<V: Into<Document>>(&mut self, key: &str, value: V) -> QuireResult<()> {
        if key.is_empty() {
            log::error!("Document does not support empty key");
            return Err(QuireError::new(
                "Document does not support empty key",
                ErrorKind::InvalidInput,
            ));
        }

        match self {
            Document::Map(map) => {
                map.insert(key.to_string(), value.into());
                Ok(())
            }
            other => {
                log::error!("Cannot put key {} into a {} document", key, other.kind_name());
                Err(QuireError::new(
                    &format!("Cannot put key {} into a {} document", key, other.kind_name()),
                    ErrorKind::InvalidOperation,
                ))
            }
        }
    }

    /// Returns the value of the top-level `key`, if this is a mapping holding it.
    pub fn get(&self, key: &str) -> Option<&Document> {
        match self {
            Document::Map(map) => map.get(key),
            _ => None,
        }
    }

    /// Removes the top-level `key`, preserving the order of the remaining keys.
    pub fn remove(&mut self, key: &str) -> Option<Document> {
        match self {
            Document::Map(map) => map.shift_remove(key),
            _ => None,
        }
    }

    /// Number of entries of a mapping or elements of a sequence; zero for scalars.
    pub fn len(&self) -> usize {
        match self {
            Document::Map(map) => map.len(),
            Document::Array(items) => items.len(),
            _ => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Document::Null)
    }

    pub fn is_map(&self) -> bool {
        matches!(self, Document::Map(_))
    }

    pub fn is_array(&self) -> bool {
        matches!(self, Document::Array(_))
    }

    /// Returns `true` for strings, numbers, booleans and null.
    pub fn is_scalar(&self) -> bool {
        !matches!(self, Document::Map(_) | Document::Array(_))
    }

    pub fn as_map(&self) -> Option<&IndexMap<String, Document>> {
        match self {
            Document::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&Vec<Document>> {
        match self {
            Document::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Document::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Document::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<&Number> {
        match self {
            Document::Number(n) => Some(n),
            _ => None,
        }
    }

    /// Iterates over the entries of a mapping document in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Document)> {
        self.as_map().into_iter().flat_map(|map| map.iter())
    }

    pub(crate) fn kind_name(&self) -> &'static str {
        match self {
            Document::Null => "null",
            Document::Bool(_) => "boolean",
            Document::Number(_) => "number",
            Document::String(_) => "string",
            Document::Array(_) => "array",
            Document::Map(_) => "mapping",
        }
    }

    /// Returns `true` if every number in the tree is finite.
    pub(crate) fn is_finite(&self) -> bool {
        match self {
            Document::Number(n) => n.is_finite(),
            Document::Array(items) => items.iter().all(Document::is_finite),
            Document::Map(map) => map.values().all(Document::is_finite),
            _ => true,
        }
    }

    /// Returns `true` if containers nest more than `limit` levels deep.
    pub(crate) fn nests_deeper_than(&self, limit: usize) -> bool {
        let mut pending = vec![(self, 0usize)];
        while let Some((node, depth)) = pending.pop() {
            let children: Box<dyn Iterator<Item = &Document>> = match node {
                Document::Array(items) => Box::new(items.iter()),
                Document::Map(map) => Box::new(map.values()),
                _ => continue,
            };
            if depth == limit {
                return true;
            }
            pending.extend(children.map(|child| (child, depth + 1)));
        }
        false
    }
}

impl Debug for Document {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)
    }
}

impl Display for Document {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let json = serde_json::to_string(self).map_err(|_| std::fmt::Error)?;
        write!(f, "{}", json)
    }
}

/// A numeric scalar.
///
/// Integers keep their exact value; everything else is a 64-bit float.
/// Numbers compare by numeric value, so `Int(5)`, `UInt(5)` and `Float(5.0)`
/// are equal.
///
/// `Display` renders the canonical text used when hashing index keys:
/// integers in decimal, floats with no fractional part (and magnitude below
/// 2^53) as integers, and every other float in Rust's shortest round-trip
/// decimal form.
#[derive(Clone, Copy, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Number {
    Int(i64),
    UInt(u64),
    Float(f64),
}

impl Number {
    pub fn is_finite(&self) -> bool {
        match self {
            Number::Float(f) => f.is_finite(),
            _ => true,
        }
    }

    pub fn as_f64(&self) -> f64 {
        match self {
            Number::Int(i) => *i as f64,
            Number::UInt(u) => *u as f64,
            Number::Float(f) => *f,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Number::Int(i) => Some(*i),
            Number::UInt(u) => i64::try_from(*u).ok(),
            Number::Float(_) => None,
        }
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Number::Int(a), Number::Int(b)) => a == b,
            (Number::UInt(a), Number::UInt(b)) => a == b,
            (Number::Int(a), Number::UInt(b)) | (Number::UInt(b), Number::Int(a)) => {
                i128::from(*a) == i128::from(*b)
            }
            (Number::Float(a), Number::Float(b)) => a == b,
            (Number::Float(f), n) | (n, Number::Float(f)) => *f == n.as_f64(),
        }
    }
}

impl Debug for Number {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)
    }
}

impl Display for Number {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Number::Int(i) => write!(f, "{}", i),
            Number::UInt(u) => write!(f, "{}", u),
            Number::Float(x) => {
                if x.is_finite() && x.fract() == 0.0 && x.abs() < MAX_EXACT_FLOAT_INTEGER {
                    write!(f, "{}", *x as i64)
                } else {
                    write!(f, "{}", x)
                }
            }
        }
    }
}

impl From<bool> for Document {
    fn from(value: bool) -> Self {
        Document::Bool(value)
    }
}

impl From<i32> for Document {
    fn from(value: i32) -> Self {
        Document::Number(Number::Int(i64::from(value)))
    }
}

impl From<i64> for Document {
    fn from(value: i64) -> Self {
        Document::Number(Number::Int(value))
    }
}

impl From<u32> for Document {
    fn from(value: u32) -> Self {
        Document::Number(Number::Int(i64::from(value)))
    }
}

impl From<u64> for Document {
    fn from(value: u64) -> Self {
        match i64::try_from(value) {
            Ok(i) => Document::Number(Number::Int(i)),
            Err(_) => Document::Number(Number::UInt(value)),
        }
    }
}

impl From<usize> for Document {
    fn from(value: usize) -> Self {
        Document::from(value as u64)
    }
}

impl From<f64> for Document {
    fn from(value: f64) -> Self {
        Document::Number(Number::Float(value))
    }
}

impl From<Number> for Document {
    fn from(value: Number) -> Self {
        Document::Number(value)
    }
}

impl From<&str> for Document {
    fn from(value: &str) -> Self {
        Document::String(value.to_string())
    }
}

impl From<String> for Document {
    fn from(value: String) -> Self {
        Document::String(value)
    }
}

impl From<&String> for Document {
    fn from(value: &String) -> Self {
        Document::String(value.clone())
    }
}

impl<T: Into<Document>> From<Vec<T>> for Document {
    fn from(values: Vec<T>) -> Self {
        Document::Array(values.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Document>> From<Option<T>> for Document {
    fn from(value: Option<T>) -> Self {
        value.map_or(Document::Null, Into::into)
    }
}

impl From<IndexMap<String, Document>> for Document {
    fn from(map: IndexMap<String, Document>) -> Self {
        Document::Map(map)
    }
}

impl FromIterator<(String, Document)> for Document {
    fn from_iter<I: IntoIterator<Item = (String, Document)>>(iter: I) -> Self {
        Document::Map(iter.into_iter().collect())
    }
}

pub fn normalize(value: &str) -> String {
    value.trim_matches('"').to_string()
}

/// Creates a mapping [Document] with JSON-like syntax.
///
/// Keys may be identifiers or string literals. Values may be nested
/// `{ ... }` mappings, `[ ... ]` sequences, `null`, or any expression
/// convertible into a [Document]; wrap negative numbers and arithmetic in
/// parentheses.
///
/// # Examples
///
/// ```rust
/// use quire::doc;
///
/// let empty = doc! {};
/// let base = 100;
/// let document = doc! {
///     "name": "Alice",
///     score: (base * 2),
///     offset: (-3),
///     manager: null,
///     items: [{ sku: "a" }, { sku: "b" }]
/// };
/// assert!(empty.is_empty());
/// assert_eq!(document.len(), 5);
/// ```
#[macro_export]
macro_rules! doc {
    () => {
        $crate::collection::Document::new()
    };

    ($($key:tt : $value:tt),* $(,)?) => {
        {
            let mut doc = $crate::collection::Document::new();
            $(
                doc.put(&$crate::collection::normalize(stringify!($key)), $crate::doc_value!($value))
                .expect(&format!("Failed to put value {} in document", stringify!($value)));
            )*
            doc
        }
    };
}

/// Helper macro to convert values for the [doc!] macro.
#[macro_export]
macro_rules! doc_value {
    (null) => {
        $crate::collection::Document::Null
    };

    ({ $($key:tt : $value:tt),* $(,)? }) => {
        $crate::doc!{ $($key : $value),* }
    };

    ([ $($value:tt),* $(,)? ]) => {
        $crate::collection::Document::Array(vec![$($crate::doc_value!($value)),*])
    };

    ($value:expr) => {
        $crate::collection::Document::from($value)
    };
}
