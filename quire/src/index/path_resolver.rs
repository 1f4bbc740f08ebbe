use crate::collection::Document;
use crate::index::IndexPath;
use smallvec::SmallVec;
use std::iter::FusedIterator;
use std::slice::Iter;

/// Resolves every value reachable from `document` by following `path`.
///
/// Resolution descends one mapping key per segment. Whenever the walk meets
/// a sequence where it expected a mapping, it continues into every mapping
/// element of that sequence with the same remaining segments, so the path
/// `["items", "sku"]` reaches the `sku` of each element of `items`. When the
/// path is exhausted on a sequence, each element is yielded on its own;
/// otherwise the node itself is yielded, which may be a sub-document.
///
/// A branch that meets a scalar, or a mapping without the requested key,
/// yields nothing. A root that is not a mapping yields nothing. Resolution
/// never fails and yields values in document order.
///
/// # Examples
///
/// ```rust
/// use quire::doc;
/// use quire::collection::Document;
/// use quire::index::{resolve, IndexPath};
///
/// let order = doc! { items: [{ sku: "a" }, { sku: "b" }, { qty: 1 }] };
/// let path = IndexPath::new(&["items", "sku"]).unwrap();
///
/// let skus: Vec<&Document> = resolve(&order, &path).collect();
/// assert_eq!(skus, vec![&Document::from("a"), &Document::from("b")]);
/// ```
pub fn resolve<'a>(document: &'a Document, path: &'a IndexPath) -> PathValues<'a> {
    let mut stack = SmallVec::new();
    if document.is_map() {
        stack.push(Frame::Walk {
            node: document,
            depth: 0,
        });
    }

    PathValues {
        segments: path.segments(),
        stack,
    }
}

enum Frame<'a> {
    // follow mapping keys starting at `depth`
    Walk { node: &'a Document, depth: usize },
    // branch into each mapping element with the segments from `depth`
    Elements { items: Iter<'a, Document>, depth: usize },
    // yield the elements of a sequence found at the end of the path
    Terminal(Iter<'a, Document>),
}

/// The lazy sequence of values produced by [resolve].
pub struct PathValues<'a> {
    segments: &'a [String],
    stack: SmallVec<[Frame<'a>; 4]>,
}

impl<'a> PathValues<'a> {
    fn walk(&mut self, node: &'a Document, depth: usize) -> Option<&'a Document> {
        let mut current = node;
        let mut depth = depth;

        loop {
            if depth == self.segments.len() {
                return match current {
                    Document::Array(items) => {
                        self.stack.push(Frame::Terminal(items.iter()));
                        None
                    }
                    other => Some(other),
                };
            }

            match current {
                Document::Map(map) => match map.get(&self.segments[depth]) {
                    Some(child) => {
                        current = child;
                        depth += 1;
                    }
                    None => return None,
                },
                Document::Array(items) => {
                    self.stack.push(Frame::Elements {
                        items: items.iter(),
                        depth,
                    });
                    return None;
                }
                _ => return None,
            }
        }
    }
}

impl<'a> Iterator for PathValues<'a> {
    type Item = &'a Document;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(frame) = self.stack.pop() {
            match frame {
                Frame::Walk { node, depth } => {
                    if let Some(value) = self.walk(node, depth) {
                        return Some(value);
                    }
                }
                Frame::Elements { mut items, depth } => {
                    if let Some(element) = items.next() {
                        self.stack.push(Frame::Elements { items, depth });
                        if element.is_map() {
                            self.stack.push(Frame::Walk {
                                node: element,
                                depth,
                            });
                        }
                    }
                }
                Frame::Terminal(mut items) => {
                    if let Some(element) = items.next() {
                        self.stack.push(Frame::Terminal(items));
                        return Some(element);
                    }
                }
            }
        }
        None
    }
}

impl FusedIterator for PathValues<'_> {}
