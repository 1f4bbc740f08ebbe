use crate::common::INDEX_PATH_SEPARATOR;
use crate::errors::{ErrorKind, QuireError, QuireResult};
use itertools::Itertools;
use smallvec::SmallVec;
use std::fmt::{Debug, Display};

type SegmentVec = SmallVec<[String; 4]>;

/// The location of an indexed value inside a document.
///
/// An index path is an ordered, non-empty sequence of field names: `["a", "b"]`
/// reaches `doc.a.b`. Arrays met along the way are flattened by the
/// [resolver](crate::index::resolve), so `["items", "sku"]` also reaches the
/// `sku` of every element of an `items` array.
///
/// Two paths are equal when their segments are equal elementwise. Each path
/// has exactly one [IndexName], its segments joined with `!`; for that reason
/// segments may be neither empty nor contain `!`.
///
/// # Examples
///
/// ```rust
/// use quire::index::IndexPath;
///
/// let path = IndexPath::new(&["address", "city"]).unwrap();
/// assert_eq!(path.name().as_str(), "address!city");
/// assert_eq!(IndexPath::from_name("address!city").unwrap(), path);
/// assert!(IndexPath::new(&["bad!segment"]).is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct IndexPath {
    segments: SegmentVec,
}

impl IndexPath {
    /// Creates an index path from its segments.
    ///
    /// # Errors
    ///
    /// `InvalidInput` if there are no segments, or a segment is empty or
    /// contains the `!` separator.
    pub fn new<S: AsRef<str>>(segments: &[S]) -> QuireResult<Self> {
        if segments.is_empty() {
            log::error!("Index path must have at least one segment");
            return Err(QuireError::new(
                "Index path must have at least one segment",
                ErrorKind::InvalidInput,
            ));
        }

        let mut validated = SegmentVec::with_capacity(segments.len());
        for segment in segments {
            let segment = segment.as_ref();
            if segment.is_empty() {
                log::error!("Index path segment cannot be empty");
                return Err(QuireError::new(
                    "Index path segment cannot be empty",
                    ErrorKind::InvalidInput,
                ));
            }
            if segment.contains(INDEX_PATH_SEPARATOR) {
                log::error!(
                    "Index path segment {} cannot contain '{}'",
                    segment,
                    INDEX_PATH_SEPARATOR
                );
                return Err(QuireError::new(
                    &format!(
                        "Index path segment {} cannot contain '{}'",
                        segment, INDEX_PATH_SEPARATOR
                    ),
                    ErrorKind::InvalidInput,
                ));
            }
            validated.push(segment.to_string());
        }

        Ok(IndexPath {
            segments: validated,
        })
    }

    /// Recovers a path from its joined [IndexName] text.
    pub fn from_name(name: &str) -> QuireResult<Self> {
        let segments: Vec<&str> = name.split(INDEX_PATH_SEPARATOR).collect();
        IndexPath::new(&segments)
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Returns the canonical joined name of this path.
    pub fn name(&self) -> IndexName {
        IndexName(self.segments.iter().join(INDEX_PATH_SEPARATOR))
    }
}

impl Debug for IndexPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.segments.iter()).finish()
    }
}

impl Display for IndexPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.segments.iter().join(INDEX_PATH_SEPARATOR))
    }
}

impl PartialEq<[&str]> for IndexPath {
    fn eq(&self, other: &[&str]) -> bool {
        self.segments.len() == other.len()
            && self.segments.iter().zip(other).all(|(a, b)| a == b)
    }
}

/// The joined textual form of an [IndexPath], unique per collection.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IndexName(String);

impl IndexName {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl Debug for IndexName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self.0)
    }
}

impl Display for IndexName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
