//! Document statistics.

use crate::model::{Document, Node, Page};
use crate::path::NodePath;
use crate::variables::find_placeholders;
use crate::visitor::{walk, NodeVisitor, VisitorAction};
use serde::{Deserialize, Serialize};

/// Counts collected from a document tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentStats {
    /// Total number of nodes, including table heads
    pub node_count: u32,

    /// Number of text nodes
    pub text_count: u32,

    /// Number of headings
    pub heading_count: u32,

    /// Number of lists
    pub list_count: u32,

    /// Number of list items
    pub list_item_count: u32,

    /// Number of tables
    pub table_count: u32,

    /// Number of table body rows
    pub row_count: u32,

    /// Number of grids
    pub grid_count: u32,

    /// Number of explicit page breaks
    pub page_break_count: u32,

    /// Number of `${...}` placeholders
    pub placeholder_count: u32,

    /// Approximate word count (whitespace-separated tokens)
    pub word_count: u32,

    /// Character count (excluding whitespace)
    pub char_count: u32,

    /// Number of pages, when computed from paginated output
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_count: Option<u32>,
}

impl DocumentStats {
    /// Create new empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect statistics for a document.
    pub fn collect(doc: &Document) -> Self {
        let mut stats = Self::new();
        walk(doc, &mut stats);
        stats
    }

    /// Collect statistics for paginated output.
    ///
    /// Split nodes are counted once per fragment.
    pub fn collect_pages(pages: &[Page]) -> Self {
        let mut stats = Self::new();
        for page in pages {
            let doc = Document {
                children: page.nodes.clone(),
                variables: None,
            };
            walk(&doc, &mut stats);
        }
        stats.page_count = Some(pages.len() as u32);
        stats
    }

    /// Add word and character counts from text.
    pub fn count_text(&mut self, text: &str) {
        self.word_count += text.split_whitespace().count() as u32;
        self.char_count += text.chars().filter(|c| !c.is_whitespace()).count() as u32;
        self.placeholder_count += find_placeholders(text).len() as u32;
    }
}

impl NodeVisitor for DocumentStats {
    fn visit_node(&mut self, _path: &NodePath, node: &Node) -> VisitorAction {
        self.node_count += 1;
        match node {
            Node::Text(_) => self.text_count += 1,
            Node::Heading(_) => self.heading_count += 1,
            Node::PageBreak => self.page_break_count += 1,
            Node::List(_) => self.list_count += 1,
            Node::ListItem(_) => self.list_item_count += 1,
            Node::Table(_) => self.table_count += 1,
            Node::TableRow(_) => self.row_count += 1,
            Node::Grid(_) => self.grid_count += 1,
            Node::TableHead(_) | Node::TableColumn(_) | Node::Column(_) => {}
        }
        VisitorAction::Continue
    }

    fn visit_content(&mut self, _path: &NodePath, _node: &Node, content: &str) {
        self.count_text(content);
    }
}
