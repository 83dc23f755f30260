//! Visitor pattern for walking the document tree.
//!
//! The walk is depth-first in reading order. For a table the head is
//! visited (under the [`PathSegment::Head`] segment) before the body rows.
//!
//! # Example
//!
//! ```
//! use pagetree::model::{Document, Node};
//! use pagetree::path::NodePath;
//! use pagetree::visitor::{walk, NodeVisitor};
//!
//! struct WordCounter(usize);
//!
//! impl NodeVisitor for WordCounter {
//!     fn visit_content(&mut self, _path: &NodePath, _node: &Node, content: &str) {
//!         self.0 += content.split_whitespace().count();
//!     }
//! }
//!
//! let doc = Document::with_children(vec![Node::text("two words"), Node::heading("one", 2)]);
//! let mut counter = WordCounter(0);
//! walk(&doc, &mut counter);
//! assert_eq!(counter.0, 3);
//! ```

use crate::model::{Document, Node};
use crate::path::{NodePath, PathSegment};

/// Action returned by [`NodeVisitor::visit_node`] to steer the walk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum VisitorAction {
    /// Continue into the node's children.
    #[default]
    Continue,

    /// Do not descend into this node.
    SkipChildren,

    /// Stop the walk entirely.
    Stop,
}

impl VisitorAction {
    /// Check if this action stops the walk.
    pub fn should_stop(&self) -> bool {
        matches!(self, VisitorAction::Stop)
    }
}

/// Trait for visiting document nodes.
///
/// All methods have no-op defaults.
pub trait NodeVisitor {
    /// Called for every node before its children.
    fn visit_node(&mut self, path: &NodePath, node: &Node) -> VisitorAction {
        let _ = (path, node);
        VisitorAction::Continue
    }

    /// Called for every node that carries content (text and headings),
    /// after [`NodeVisitor::visit_node`].
    fn visit_content(&mut self, path: &NodePath, node: &Node, content: &str) {
        let _ = (path, node, content);
    }
}

/// Walk every node of the document.
pub fn walk<V: NodeVisitor + ?Sized>(doc: &Document, visitor: &mut V) {
    for (i, child) in doc.children.iter().enumerate() {
        let path = NodePath::root().child(PathSegment::Child(i));
        if walk_node(child, &path, visitor).should_stop() {
            return;
        }
    }
}

/// Walk a single subtree rooted at `path`.
pub fn walk_node<V: NodeVisitor + ?Sized>(
    node: &Node,
    path: &NodePath,
    visitor: &mut V,
) -> VisitorAction {
    match visitor.visit_node(path, node) {
        VisitorAction::Stop => return VisitorAction::Stop,
        VisitorAction::SkipChildren => return VisitorAction::Continue,
        VisitorAction::Continue => {}
    }

    if let Some(content) = node.content() {
        visitor.visit_content(path, node, content);
    }

    if let Some(head) = node.table_head_node() {
        let head_path = path.child(PathSegment::Head);
        if walk_node(head, &head_path, visitor).should_stop() {
            return VisitorAction::Stop;
        }
    }

    if let Some(children) = node.children() {
        for (i, child) in children.iter().enumerate() {
            let child_path = path.child(PathSegment::Child(i));
            if walk_node(child, &child_path, visitor).should_stop() {
                return VisitorAction::Stop;
            }
        }
    }

    VisitorAction::Continue
}
