//! Document-level types.

use super::{Node, VariableDefinition};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A structured document: an ordered sequence of block nodes plus optional
/// variable declarations.
///
/// Documents are values. Editing produces a new `Document` that shares
/// every untouched subtree with the original through its `Arc` children.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Top-level nodes in reading order
    #[serde(default)]
    pub children: Vec<Arc<Node>>,

    /// Declared template variables, in declaration order
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variables: Option<Vec<VariableDefinition>>,
}

impl Document {
    /// Create a new empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a document from owned top-level nodes.
    pub fn with_children(children: Vec<Node>) -> Self {
        Self {
            children: children.into_iter().map(Arc::new).collect(),
            variables: None,
        }
    }

    /// Set the declared variables and return self.
    pub fn with_variables(mut self, variables: Vec<VariableDefinition>) -> Self {
        self.variables = Some(variables);
        self
    }

    /// Append a top-level node.
    pub fn push(&mut self, node: Node) {
        self.children.push(Arc::new(node));
    }

    /// Check if the document has no top-level nodes.
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Number of top-level nodes.
    pub fn len(&self) -> usize {
        self.children.len()
    }

    /// Total number of nodes in the tree.
    pub fn node_count(&self) -> usize {
        self.children.iter().map(|n| n.node_count()).sum()
    }

    /// Declared variables, if the document carries a non-empty list.
    pub fn declared_variables(&self) -> Option<&[VariableDefinition]> {
        self.variables.as_deref().filter(|vars| !vars.is_empty())
    }

    /// Look up a declared variable by name.
    pub fn variable(&self, name: &str) -> Option<&VariableDefinition> {
        self.variables
            .as_deref()
            .and_then(|vars| vars.iter().find(|v| v.name == name))
    }

    /// Get plain text content of the entire document.
    pub fn plain_text(&self) -> String {
        self.children
            .iter()
            .filter(|n| !n.is_page_break())
            .map(|n| n.plain_text())
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}
