//! Immutable content editing.
//!
//! An edit replaces the content of one node and returns a new
//! [`Document`]. Only the edited node and its ancestors are rebuilt; every
//! other subtree is the same `Arc` in both documents.
//!
//! Edits run in two phases. The path and the target are fully validated
//! against the input first, and only then is the copy-on-path rebuild
//! performed, so a failed edit never yields a partially edited tree.
//!
//! Editable targets:
//!
//! - `text` and `heading` nodes: their own `content` is replaced.
//! - `list_item`, `table_column` and `column` wrappers whose first child
//!   carries content: that first child's content is replaced and later
//!   children are kept.

use crate::error::EditError;
use crate::model::{Document, Node};
use crate::path::{resolve, step, NodePath, PathSegment};
use crate::visitor::{walk, NodeVisitor, VisitorAction};
use std::sync::Arc;

/// Replace the content at a wire path (`-1` addresses a table head).
///
/// # Errors
///
/// - [`EditError::EmptyPath`] if `path` is empty
/// - [`EditError::EmptyContent`] if `new_content` is blank
/// - [`EditError::PathNotFound`] if the path does not resolve
/// - [`EditError::NodeNotEditable`] if the target has no editable content
///
/// # Example
///
/// ```
/// use pagetree::editor::update_content;
/// use pagetree::model::{Document, Node};
///
/// let doc = Document::with_children(vec![Node::heading("Draft", 1), Node::text("Body")]);
/// let edited = update_content(&doc, &[0], "Final").unwrap();
///
/// assert_eq!(edited.children[0].content(), Some("Final"));
/// assert_eq!(doc.children[0].content(), Some("Draft"));
/// ```
pub fn update_content(
    doc: &Document,
    path: &[i64],
    new_content: &str,
) -> Result<Document, EditError> {
    if path.is_empty() {
        return Err(EditError::EmptyPath);
    }
    if new_content.trim().is_empty() {
        return Err(EditError::EmptyContent);
    }
    let parsed = NodePath::from_raw(path).ok_or_else(|| EditError::PathNotFound {
        path: display_raw(path),
    })?;
    update_content_at(doc, &parsed, new_content)
}

/// Replace the content at a normalized path.
///
/// See [`update_content`] for the error conditions.
pub fn update_content_at(
    doc: &Document,
    path: &NodePath,
    new_content: &str,
) -> Result<Document, EditError> {
    if path.is_empty() {
        return Err(EditError::EmptyPath);
    }
    if new_content.trim().is_empty() {
        return Err(EditError::EmptyContent);
    }

    // Phase 1: validate against the untouched input.
    let target = resolve(doc, path).ok_or_else(|| EditError::PathNotFound {
        path: path.to_string(),
    })?;
    let replacement = replace_content(target, new_content).ok_or(EditError::NodeNotEditable {
        path: path.to_string(),
        kind: target.kind().as_str(),
    })?;

    // Phase 2: copy-on-path rebuild.
    let invalid = || EditError::InternalInvalidResult {
        path: path.to_string(),
    };
    let (first, rest) = path.segments().split_first().ok_or_else(invalid)?;
    let index = match first {
        PathSegment::Child(i) => *i,
        PathSegment::Head => return Err(invalid()),
    };
    let root_child = doc.children.get(index).ok_or_else(invalid)?;
    let rebuilt = rebuild(root_child, rest, Arc::new(replacement)).ok_or_else(invalid)?;

    let mut children = doc.children.clone();
    children[index] = rebuilt;
    let edited = Document {
        children,
        variables: doc.variables.clone(),
    };

    if read_content(&edited, path) != Some(new_content) {
        return Err(invalid());
    }

    log::debug!("Updated content at [{}]", path);
    Ok(edited)
}

/// Read the editable content at a path.
///
/// Uses the same direct/wrapping rules as [`update_content`].
pub fn read_content<'a>(doc: &'a Document, path: &NodePath) -> Option<&'a str> {
    let node = resolve(doc, path)?;
    match node.as_ref() {
        Node::Text(_) | Node::Heading(_) => node.content(),
        Node::ListItem(c) | Node::TableColumn(c) => c.children.first()?.content(),
        Node::Column(column) => column.children.first()?.content(),
        _ => None,
    }
}

/// Check whether the node at a path accepts [`update_content`].
pub fn is_editable(doc: &Document, path: &NodePath) -> bool {
    read_content(doc, path).is_some()
}

/// List the paths of every editable node, in reading order.
///
/// Wrappers are listed instead of their first child, so each piece of
/// content appears once.
pub fn editable_paths(doc: &Document) -> Vec<NodePath> {
    struct Collector(Vec<NodePath>);

    impl NodeVisitor for Collector {
        fn visit_node(&mut self, path: &NodePath, node: &Node) -> VisitorAction {
            match node {
                Node::Text(_) | Node::Heading(_) => {
                    self.0.push(path.clone());
                    VisitorAction::Continue
                }
                Node::ListItem(_) | Node::TableColumn(_) | Node::Column(_) => {
                    let wrapped = node
                        .children()
                        .and_then(|c| c.first())
                        .is_some_and(|first| first.content().is_some());
                    if wrapped {
                        self.0.push(path.clone());
                    }
                    VisitorAction::Continue
                }
                _ => VisitorAction::Continue,
            }
        }
    }

    let mut collector = Collector(Vec::new());
    walk(doc, &mut collector);

    // Drop the first child of each wrapper; it is reached through the wrapper.
    let wrappers: Vec<NodePath> = collector
        .0
        .iter()
        .filter(|p| resolve(doc, p).is_some_and(|n| n.content().is_none()))
        .cloned()
        .collect();
    collector
        .0
        .into_iter()
        .filter(|p| !wrappers.iter().any(|w| *p == w.child(PathSegment::Child(0))))
        .collect()
}

/// Build the replacement for the terminal node, or `None` if not editable.
fn replace_content(target: &Node, new_content: &str) -> Option<Node> {
    match target {
        Node::Text(_) | Node::Heading(_) => target.with_content(new_content),
        Node::ListItem(_) | Node::TableColumn(_) | Node::Column(_) => {
            let children = target.children()?;
            let first = children.first()?;
            let replaced = first.with_content(new_content)?;

            let mut rebuilt = Vec::with_capacity(children.len());
            rebuilt.push(Arc::new(replaced));
            rebuilt.extend(children.iter().skip(1).cloned());
            Some(target.with_children(rebuilt))
        }
        _ => None,
    }
}

/// Rebuild `node` with the subtree at `rest` swapped for `replacement`.
fn rebuild(node: &Arc<Node>, rest: &[PathSegment], replacement: Arc<Node>) -> Option<Arc<Node>> {
    let Some((segment, tail)) = rest.split_first() else {
        return Some(replacement);
    };

    let next = step(node, *segment)?;
    let rebuilt_child = rebuild(next, tail, replacement)?;

    let rebuilt = match (*segment, node.as_ref()) {
        (PathSegment::Head, Node::Table(table)) => {
            let mut table = table.clone();
            table.head = Some(rebuilt_child);
            Node::Table(table)
        }
        (PathSegment::Child(i), _) => {
            let mut children = node.children()?.to_vec();
            *children.get_mut(i)? = rebuilt_child;
            node.with_children(children)
        }
        (PathSegment::Head, _) => return None,
    };
    Some(Arc::new(rebuilt))
}

fn display_raw(path: &[i64]) -> String {
    path.iter()
        .map(|s| s.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
