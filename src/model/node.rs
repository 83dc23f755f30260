//! Document tree node types.

use super::TextStyles;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// A node of the document tree.
///
/// The enum is closed: every kind the serialized form can carry is a
/// variant here, and the JSON discriminant is the `type` field.
/// Containment rules (a `list` only holds `list_item`s, and so on) are
/// enforced by [`crate::schema`] when a tree is loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Node {
    /// A run of body text
    Text(TextNode),

    /// A section heading
    Heading(HeadingNode),

    /// A forced page break
    PageBreak,

    /// An ordered or bulleted list
    List(ListNode),

    /// One entry of a list
    ListItem(ContainerNode),

    /// A table with optional repeated head
    Table(TableNode),

    /// The head row of a table
    TableHead(ContainerNode),

    /// A body row of a table
    TableRow(ContainerNode),

    /// A cell of a table head or row
    TableColumn(ContainerNode),

    /// A multi-column layout
    Grid(GridNode),

    /// One column of a grid
    Column(ColumnNode),
}

impl Node {
    /// Create a text node.
    pub fn text(content: impl Into<String>) -> Self {
        Node::Text(TextNode {
            content: content.into(),
            styles: None,
        })
    }

    /// Create a heading node. The level is clamped to 1..=6.
    pub fn heading(content: impl Into<String>, level: u8) -> Self {
        Node::Heading(HeadingNode {
            level: level.clamp(1, 6),
            content: content.into(),
            styles: None,
        })
    }

    /// Create a list from item nodes.
    pub fn list(ordered: bool, items: Vec<Node>) -> Self {
        Node::List(ListNode {
            ordered,
            start: None,
            children: items.into_iter().map(Arc::new).collect(),
        })
    }

    /// Create a list item holding the given nodes.
    pub fn list_item(children: Vec<Node>) -> Self {
        Node::ListItem(ContainerNode::new(children))
    }

    /// Create a table from an optional head and body rows.
    pub fn table(head: Option<Node>, rows: Vec<Node>) -> Self {
        Node::Table(TableNode {
            head: head.map(Arc::new),
            children: rows.into_iter().map(Arc::new).collect(),
        })
    }

    /// Create a table head from cells.
    pub fn table_head(cells: Vec<Node>) -> Self {
        Node::TableHead(ContainerNode::new(cells))
    }

    /// Create a table row from cells.
    pub fn table_row(cells: Vec<Node>) -> Self {
        Node::TableRow(ContainerNode::new(cells))
    }

    /// Create a table cell holding the given nodes.
    pub fn table_column(children: Vec<Node>) -> Self {
        Node::TableColumn(ContainerNode::new(children))
    }

    /// Create a table row of single-text cells.
    pub fn row_from_strings<S: Into<String>>(values: impl IntoIterator<Item = S>) -> Self {
        Node::table_row(
            values
                .into_iter()
                .map(|v| Node::table_column(vec![Node::text(v)]))
                .collect(),
        )
    }

    /// Create a table head of single-text cells.
    pub fn head_from_strings<S: Into<String>>(values: impl IntoIterator<Item = S>) -> Self {
        Node::table_head(
            values
                .into_iter()
                .map(|v| Node::table_column(vec![Node::text(v)]))
                .collect(),
        )
    }

    /// Create a grid from column nodes.
    pub fn grid(columns: Vec<Node>) -> Self {
        Node::Grid(GridNode {
            columns: columns.len().max(1) as u32,
            children: columns.into_iter().map(Arc::new).collect(),
        })
    }

    /// Create a grid column with an optional width percentage.
    pub fn column(width: Option<u8>, children: Vec<Node>) -> Self {
        Node::Column(ColumnNode {
            width,
            children: children.into_iter().map(Arc::new).collect(),
        })
    }

    /// Get the kind of this node.
    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Text(_) => NodeKind::Text,
            Node::Heading(_) => NodeKind::Heading,
            Node::PageBreak => NodeKind::PageBreak,
            Node::List(_) => NodeKind::List,
            Node::ListItem(_) => NodeKind::ListItem,
            Node::Table(_) => NodeKind::Table,
            Node::TableHead(_) => NodeKind::TableHead,
            Node::TableRow(_) => NodeKind::TableRow,
            Node::TableColumn(_) => NodeKind::TableColumn,
            Node::Grid(_) => NodeKind::Grid,
            Node::Column(_) => NodeKind::Column,
        }
    }

    /// Get the children of this node, or `None` for leaf kinds.
    ///
    /// A table's head is not part of its children.
    pub fn children(&self) -> Option<&[Arc<Node>]> {
        match self {
            Node::Text(_) | Node::Heading(_) | Node::PageBreak => None,
            Node::List(list) => Some(&list.children),
            Node::ListItem(c) | Node::TableHead(c) | Node::TableRow(c) | Node::TableColumn(c) => {
                Some(&c.children)
            }
            Node::Table(table) => Some(&table.children),
            Node::Grid(grid) => Some(&grid.children),
            Node::Column(column) => Some(&column.children),
        }
    }

    /// Build a node of the same kind and attributes with new children.
    ///
    /// Leaf kinds are returned unchanged. The table head is kept.
    pub fn with_children(&self, children: Vec<Arc<Node>>) -> Node {
        match self {
            Node::Text(_) | Node::Heading(_) | Node::PageBreak => self.clone(),
            Node::List(list) => Node::List(ListNode {
                ordered: list.ordered,
                start: list.start,
                children,
            }),
            Node::ListItem(_) => Node::ListItem(ContainerNode { children }),
            Node::TableHead(_) => Node::TableHead(ContainerNode { children }),
            Node::TableRow(_) => Node::TableRow(ContainerNode { children }),
            Node::TableColumn(_) => Node::TableColumn(ContainerNode { children }),
            Node::Table(table) => Node::Table(TableNode {
                head: table.head.clone(),
                children,
            }),
            Node::Grid(grid) => Node::Grid(GridNode {
                columns: grid.columns,
                children,
            }),
            Node::Column(column) => Node::Column(ColumnNode {
                width: column.width,
                children,
            }),
        }
    }

    /// Get the direct content of a text or heading node.
    pub fn content(&self) -> Option<&str> {
        match self {
            Node::Text(text) => Some(&text.content),
            Node::Heading(heading) => Some(&heading.content),
            _ => None,
        }
    }

    /// Build a copy of a text or heading node with new content.
    pub fn with_content(&self, content: impl Into<String>) -> Option<Node> {
        match self {
            Node::Text(text) => Some(Node::Text(TextNode {
                content: content.into(),
                styles: text.styles.clone(),
            })),
            Node::Heading(heading) => Some(Node::Heading(HeadingNode {
                level: heading.level,
                content: content.into(),
                styles: heading.styles.clone(),
            })),
            _ => None,
        }
    }

    /// Check if this is a page break directive.
    pub fn is_page_break(&self) -> bool {
        matches!(self, Node::PageBreak)
    }

    /// Get the table head, if this is a table that has one.
    pub fn table_head_node(&self) -> Option<&Arc<Node>> {
        match self {
            Node::Table(table) => table.head.as_ref(),
            _ => None,
        }
    }

    /// Get plain text content of this node and its descendants.
    pub fn plain_text(&self) -> String {
        match self {
            Node::Text(text) => text.content.clone(),
            Node::Heading(heading) => heading.content.clone(),
            Node::PageBreak => String::new(),
            Node::TableHead(c) | Node::TableRow(c) => join_text(&c.children, "\t"),
            Node::Table(table) => {
                let mut lines = Vec::new();
                if let Some(head) = &table.head {
                    lines.push(head.plain_text());
                }
                lines.extend(table.children.iter().map(|row| row.plain_text()));
                lines.join("\n")
            }
            Node::Grid(grid) => join_text(&grid.children, "\n\n"),
            _ => self
                .children()
                .map(|children| join_text(children, "\n"))
                .unwrap_or_default(),
        }
    }

    /// Count this node and all of its descendants, including table heads.
    pub fn node_count(&self) -> usize {
        let head = self.table_head_node().map(|h| h.node_count()).unwrap_or(0);
        let children: usize = self
            .children()
            .map(|c| c.iter().map(|n| n.node_count()).sum())
            .unwrap_or(0);
        1 + head + children
    }
}

fn join_text(nodes: &[Arc<Node>], separator: &str) -> String {
    nodes
        .iter()
        .map(|n| n.plain_text())
        .collect::<Vec<_>>()
        .join(separator)
}

/// The kind of a [`Node`], without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// `text`
    Text,
    /// `heading`
    Heading,
    /// `page_break`
    PageBreak,
    /// `list`
    List,
    /// `list_item`
    ListItem,
    /// `table`
    Table,
    /// `table_head`
    TableHead,
    /// `table_row`
    TableRow,
    /// `table_column`
    TableColumn,
    /// `grid`
    Grid,
    /// `column`
    Column,
}

impl NodeKind {
    /// All node kinds.
    pub const ALL: [NodeKind; 11] = [
        NodeKind::Text,
        NodeKind::Heading,
        NodeKind::PageBreak,
        NodeKind::List,
        NodeKind::ListItem,
        NodeKind::Table,
        NodeKind::TableHead,
        NodeKind::TableRow,
        NodeKind::TableColumn,
        NodeKind::Grid,
        NodeKind::Column,
    ];

    /// The serialized `type` discriminant.
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Text => "text",
            NodeKind::Heading => "heading",
            NodeKind::PageBreak => "page_break",
            NodeKind::List => "list",
            NodeKind::ListItem => "list_item",
            NodeKind::Table => "table",
            NodeKind::TableHead => "table_head",
            NodeKind::TableRow => "table_row",
            NodeKind::TableColumn => "table_column",
            NodeKind::Grid => "grid",
            NodeKind::Column => "column",
        }
    }

    /// Look up a kind by its serialized discriminant.
    pub fn from_type_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|k| k.as_str() == name)
    }

    /// Whether nodes of this kind may appear in block position
    /// (document root, list items, table cells, grid columns).
    pub fn is_block(&self) -> bool {
        matches!(
            self,
            NodeKind::Text
                | NodeKind::Heading
                | NodeKind::PageBreak
                | NodeKind::List
                | NodeKind::Table
                | NodeKind::Grid
        )
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payload of a text node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextNode {
    /// Editable text; may be blank
    pub content: String,

    /// Optional text styling
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub styles: Option<TextStyles>,
}

/// Payload of a heading node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadingNode {
    /// Heading level (1-6)
    pub level: u8,

    /// Editable heading text
    pub content: String,

    /// Optional text styling
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub styles: Option<TextStyles>,
}

/// Payload of a list node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListNode {
    /// Numbered when true, bulleted otherwise
    #[serde(default)]
    pub ordered: bool,

    /// First number shown, for ordered lists continued from a previous page
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<u32>,

    /// List items
    #[serde(default)]
    pub children: Vec<Arc<Node>>,
}

impl ListNode {
    /// The number of the first item (1 unless continued).
    pub fn first_number(&self) -> u32 {
        self.start.unwrap_or(1)
    }
}

/// Payload shared by list items, table heads, rows and cells.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerNode {
    /// Child nodes
    #[serde(default)]
    pub children: Vec<Arc<Node>>,
}

impl ContainerNode {
    /// Create a container from owned nodes.
    pub fn new(children: Vec<Node>) -> Self {
        Self {
            children: children.into_iter().map(Arc::new).collect(),
        }
    }
}

/// Payload of a table node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableNode {
    /// Head row repeated on every page the table spans
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub head: Option<Arc<Node>>,

    /// Body rows
    #[serde(default)]
    pub children: Vec<Arc<Node>>,
}

impl TableNode {
    /// Whether the head exists and has at least one cell.
    pub fn has_head(&self) -> bool {
        self.head
            .as_ref()
            .and_then(|h| h.children())
            .is_some_and(|cells| !cells.is_empty())
    }
}

/// Payload of a grid node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridNode {
    /// Declared column count
    pub columns: u32,

    /// Grid columns
    #[serde(default)]
    pub children: Vec<Arc<Node>>,
}

/// Payload of a grid column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnNode {
    /// Width percentage (1-100); widths need not sum to 100
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u8>,

    /// Column content
    #[serde(default)]
    pub children: Vec<Arc<Node>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_level_clamped() {
        let h = Node::heading("Title", 9);
        assert!(matches!(h, Node::Heading(HeadingNode { level: 6, .. })));
    }

    #[test]
    fn test_type_discriminants() {
        let json = serde_json::to_value(Node::PageBreak).unwrap();
        assert_eq!(json, serde_json::json!({ "type": "page_break" }));

        let json = serde_json::to_value(Node::list_item(vec![Node::text("a")])).unwrap();
        assert_eq!(json["type"], "list_item");
        assert_eq!(json["children"][0]["type"], "text");

        for kind in NodeKind::ALL {
            assert_eq!(NodeKind::from_type_name(kind.as_str()), Some(kind));
        }
    }

    #[test]
    fn test_children_excludes_head() {
        let table = Node::table(
            Some(Node::head_from_strings(["A", "B"])),
            vec![Node::row_from_strings(["1", "2"])],
        );
        assert_eq!(table.children().map(|c| c.len()), Some(1));
        assert!(table.table_head_node().is_some());
        assert!(Node::text("x").children().is_none());
    }

    #[test]
    fn test_with_children_keeps_attributes() {
        let list = Node::List(ListNode {
            ordered: true,
            start: Some(4),
            children: Vec::new(),
        });
        let rebuilt = list.with_children(vec![Arc::new(Node::list_item(vec![]))]);
        match rebuilt {
            Node::List(l) => {
                assert!(l.ordered);
                assert_eq!(l.start, Some(4));
                assert_eq!(l.children.len(), 1);
            }
            other => panic!("unexpected node {:?}", other),
        }
    }

    #[test]
    fn test_plain_text_table() {
        let table = Node::table(
            Some(Node::head_from_strings(["Name", "Age"])),
            vec![Node::row_from_strings(["Alice", "30"])],
        );
        assert_eq!(table.plain_text(), "Name\tAge\nAlice\t30");
    }

    #[test]
    fn test_node_count_includes_head() {
        let table = Node::table(
            Some(Node::head_from_strings(["A"])),
            vec![Node::row_from_strings(["1"])],
        );
        // table + head + cell + text + row + cell + text
        assert_eq!(table.node_count(), 7);
    }

    #[test]
    fn test_has_head_ignores_empty_head() {
        let table = TableNode {
            head: Some(Arc::new(Node::table_head(vec![]))),
            children: Vec::new(),
        };
        assert!(!table.has_head());
    }
}
