//! Page-level types.

use super::Node;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Page width and height in points (1 point = 1/72 inch).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageSize {
    /// Page width in points
    pub width: f32,

    /// Page height in points
    pub height: f32,
}

impl PageSize {
    /// Standard Letter size (8.5 x 11 inches).
    pub const LETTER: PageSize = PageSize {
        width: 612.0,
        height: 792.0,
    };

    /// Standard A4 size (210 x 297 mm).
    pub const A4: PageSize = PageSize {
        width: 595.0,
        height: 842.0,
    };

    /// Create a custom page size.
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Check if the page is in landscape orientation.
    pub fn is_landscape(&self) -> bool {
        self.width > self.height
    }
}

impl Default for PageSize {
    fn default() -> Self {
        Self::LETTER
    }
}

/// One page of paginated output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    /// Page number (1-indexed)
    pub number: u32,

    /// Top-level nodes (or fragments of them) placed on this page
    pub nodes: Vec<Arc<Node>>,

    /// Measured height of the placed content
    pub height: f32,
}

impl Page {
    /// Create a new empty page.
    pub fn new(number: u32) -> Self {
        Self {
            number,
            nodes: Vec::new(),
            height: 0.0,
        }
    }

    /// Check if the page has no content.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Get the number of nodes on the page.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Get plain text content of the page.
    pub fn plain_text(&self) -> String {
        self.nodes
            .iter()
            .map(|n| n.plain_text())
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}
