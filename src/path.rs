//! Path addressing into the document tree.
//!
//! A path is a sequence of integer segments read from the root. A
//! non-negative segment `i` descends into `children[i]` of the current
//! node. The sentinel `-1` descends into the head of a table and is valid
//! only when the current node is a table with a non-empty head.
//!
//! The sentinel is kept on the wire (JSON, CLI) for compatibility with
//! stored paths, but is normalized into [`PathSegment::Head`] as soon as a
//! path enters this crate.
//!
//! ```
//! use pagetree::model::{Document, Node};
//! use pagetree::path::validate_path;
//!
//! let doc = Document::with_children(vec![Node::table(
//!     Some(Node::head_from_strings(["Name"])),
//!     vec![Node::row_from_strings(["Alice"])],
//! )]);
//!
//! assert!(validate_path(&doc, &[0, -1, 0]));  // head cell
//! assert!(validate_path(&doc, &[0, 0, 0]));   // body cell
//! assert!(!validate_path(&doc, &[-1]));       // sentinel outside a table
//! ```

use crate::model::{Document, Node};
use std::fmt;
use std::sync::Arc;

/// Wire value of the table-head segment.
pub const HEAD_SENTINEL: i64 = -1;

/// One step of a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// Descend into `children[index]`
    Child(usize),
    /// Descend into the head of a table
    Head,
}

impl PathSegment {
    /// Convert a wire segment. Values below `-1` have no meaning.
    pub fn from_raw(raw: i64) -> Option<Self> {
        match raw {
            HEAD_SENTINEL => Some(PathSegment::Head),
            i if i >= 0 => usize::try_from(i).ok().map(PathSegment::Child),
            _ => None,
        }
    }

    /// The wire form of this segment.
    pub fn to_raw(self) -> i64 {
        match self {
            PathSegment::Child(i) => i as i64,
            PathSegment::Head => HEAD_SENTINEL,
        }
    }
}

/// A normalized path from the document root to a node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct NodePath {
    segments: Vec<PathSegment>,
}

impl NodePath {
    /// Create an empty path.
    pub fn root() -> Self {
        Self::default()
    }

    /// Create a path from normalized segments.
    pub fn from_segments(segments: Vec<PathSegment>) -> Self {
        Self { segments }
    }

    /// Create a path from wire segments.
    ///
    /// Returns `None` if any segment is below the sentinel.
    pub fn from_raw(raw: &[i64]) -> Option<Self> {
        raw.iter()
            .map(|&r| PathSegment::from_raw(r))
            .collect::<Option<Vec<_>>>()
            .map(Self::from_segments)
    }

    /// Parse a textual path such as `"0.2.-1.0"` or `"0, 2, -1, 0"`.
    ///
    /// Returns `None` for non-numeric segments. An empty string is the
    /// empty path.
    pub fn parse(input: &str) -> Option<Self> {
        let trimmed = input.trim().trim_start_matches('[').trim_end_matches(']');
        if trimmed.trim().is_empty() {
            return Some(Self::root());
        }

        let sep = if trimmed.contains(',') { ',' } else { '.' };
        let raw = trimmed
            .split(sep)
            .map(|s| s.trim().parse::<i64>().ok())
            .collect::<Option<Vec<_>>>()?;
        Self::from_raw(&raw)
    }

    /// Get the segments of the path.
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Get the wire form of the path.
    pub fn to_raw(&self) -> Vec<i64> {
        self.segments.iter().map(|s| s.to_raw()).collect()
    }

    /// Number of segments.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Check if this is the empty path.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Extend the path by one segment.
    pub fn child(&self, segment: PathSegment) -> NodePath {
        let mut segments = self.segments.clone();
        segments.push(segment);
        NodePath { segments }
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.segments.iter().map(|s| s.to_raw().to_string()).collect();
        f.write_str(&parts.join(", "))
    }
}

/// Follow one segment down from a node.
pub fn step<'a>(node: &'a Node, segment: PathSegment) -> Option<&'a Arc<Node>> {
    match segment {
        PathSegment::Child(i) => node.children().and_then(|c| c.get(i)),
        PathSegment::Head => match node {
            Node::Table(table) if table.has_head() => table.head.as_ref(),
            _ => None,
        },
    }
}

/// Resolve a path to the node it addresses.
///
/// The empty path addresses the document itself, not a node, and
/// resolves to `None`. The sentinel is never valid at the root.
pub fn resolve<'a>(doc: &'a Document, path: &NodePath) -> Option<&'a Arc<Node>> {
    let (first, rest) = path.segments().split_first()?;
    let mut current = match first {
        PathSegment::Child(i) => doc.children.get(*i)?,
        PathSegment::Head => return None,
    };
    for segment in rest {
        current = step(current, *segment)?;
    }
    Some(current)
}

/// Check that a wire path addresses a node of the document.
pub fn validate_path(doc: &Document, raw: &[i64]) -> bool {
    NodePath::from_raw(raw).is_some_and(|path| resolve(doc, &path).is_some())
}

/// Check that a textual path addresses a node of the document.
pub fn validate_path_str(doc: &Document, input: &str) -> bool {
    NodePath::parse(input).is_some_and(|path| resolve(doc, &path).is_some())
}
