//! Height measurement.
//!
//! The engine never measures anything itself. Callers supply a [`Measure`]
//! implementation bound to a fixed page width and typography, typically a
//! rendering surface. Closures of type `FnMut(&Node, bool) -> f32` work
//! directly, which is what tests use.

use crate::model::{FontSize, Node, TextStyles};

/// Measures the rendered height of a node.
///
/// `first_on_page` is true when the node would be the first on its page;
/// implementations should then omit the node's leading top margin.
/// Results must be deterministic for a given node and flag.
pub trait Measure {
    /// Rendered height of `node`, in the same unit as the page budget.
    fn measure(&mut self, node: &Node, first_on_page: bool) -> f32;
}

impl<F> Measure for F
where
    F: FnMut(&Node, bool) -> f32,
{
    fn measure(&mut self, node: &Node, first_on_page: bool) -> f32 {
        self(node, first_on_page)
    }
}

/// Measure and clamp to a usable height (NaN and negatives become 0).
pub(crate) fn measure_clamped<M: Measure + ?Sized>(
    measure: &mut M,
    node: &Node,
    first_on_page: bool,
) -> f32 {
    let height = measure.measure(node, first_on_page);
    if height.is_finite() && height > 0.0 {
        height
    } else {
        0.0
    }
}

/// Approximate measurer based on average glyph width and line height.
///
/// This is an estimate for previews and command-line use, not a
/// typesetter: every glyph is assumed to be `char_width` ems wide and
/// lines never hyphenate.
#[derive(Debug, Clone)]
pub struct EstimatedMeasure {
    /// Content width in points
    pub width: f32,

    /// Average glyph width as a fraction of the font size
    pub char_width: f32,

    /// Line height as a multiple of the font size
    pub line_height: f32,

    /// Vertical gap before each block that is not first on the page
    pub block_spacing: f32,

    /// Indentation of list items
    pub list_indent: f32,

    /// Padding inside table cells (each side)
    pub cell_padding: f32,
}

impl EstimatedMeasure {
    /// Create a measurer for the given content width.
    pub fn new(width: f32) -> Self {
        Self {
            width,
            char_width: 0.5,
            line_height: 1.4,
            block_spacing: 8.0,
            list_indent: 18.0,
            cell_padding: 4.0,
        }
    }

    fn font_size(styles: Option<&TextStyles>, fallback: f32) -> f32 {
        styles
            .and_then(|s| s.font_size)
            .map(|s| s.points())
            .unwrap_or(fallback)
    }

    fn heading_size(level: u8) -> f32 {
        match level {
            1 => 24.0,
            2 => 20.0,
            3 => 16.0,
            4 => 14.0,
            _ => FontSize::Base.points(),
        }
    }

    fn text_height(&self, content: &str, font_size: f32, width: f32) -> f32 {
        let glyph = (font_size * self.char_width).max(0.1);
        let per_line = ((width / glyph).floor() as usize).max(1);
        let lines: usize = content
            .split('\n')
            .map(|line| line.chars().count().div_ceil(per_line).max(1))
            .sum();
        lines as f32 * font_size * self.line_height
    }

    fn spacing(&self, first_on_page: bool) -> f32 {
        if first_on_page {
            0.0
        } else {
            self.block_spacing
        }
    }

    fn stack(&self, children: &[std::sync::Arc<Node>], width: f32, first_on_page: bool) -> f32 {
        children
            .iter()
            .enumerate()
            .map(|(i, c)| self.height_at(c, width, first_on_page && i == 0))
            .sum()
    }

    fn row_height(&self, row: &Node, width: f32) -> f32 {
        let cells = row.children().unwrap_or(&[]);
        if cells.is_empty() {
            return FontSize::Base.points() * self.line_height + 2.0 * self.cell_padding;
        }
        let cell_width = width / cells.len() as f32;
        cells
            .iter()
            .map(|cell| self.height_at(cell, cell_width, true))
            .fold(0.0, f32::max)
    }

    /// Height of a node laid out at `width`.
    pub fn height_at(&self, node: &Node, width: f32, first_on_page: bool) -> f32 {
        match node {
            Node::Text(text) => {
                let size = Self::font_size(text.styles.as_ref(), FontSize::Base.points());
                self.text_height(&text.content, size, width) + self.spacing(first_on_page)
            }
            Node::Heading(heading) => {
                let size =
                    Self::font_size(heading.styles.as_ref(), Self::heading_size(heading.level));
                let margin = if first_on_page { 0.0 } else { size * 0.6 };
                self.text_height(&heading.content, size, width) + margin
            }
            Node::PageBreak => 0.0,
            Node::List(list) => {
                let inner = (width - self.list_indent).max(1.0);
                self.stack(&list.children, inner, true) + self.spacing(first_on_page)
            }
            Node::ListItem(item) => self.stack(&item.children, width, first_on_page),
            Node::Table(table) => {
                let head = table
                    .head
                    .as_ref()
                    .map(|h| self.row_height(h, width))
                    .unwrap_or(0.0);
                let rows: f32 = table.children.iter().map(|r| self.row_height(r, width)).sum();
                head + rows + self.spacing(first_on_page)
            }
            Node::TableHead(_) | Node::TableRow(_) => self.row_height(node, width),
            Node::TableColumn(cell) => {
                let inner = (width - 2.0 * self.cell_padding).max(1.0);
                self.stack(&cell.children, inner, true) + 2.0 * self.cell_padding
            }
            Node::Grid(grid) => {
                let count = grid.children.len().max(1) as f32;
                let tallest = grid
                    .children
                    .iter()
                    .map(|col| {
                        let share = match col.as_ref() {
                            Node::Column(c) => c.width.map(|w| f32::from(w) / 100.0),
                            _ => None,
                        }
                        .unwrap_or(1.0 / count);
                        self.height_at(col, width * share, true)
                    })
                    .fold(0.0, f32::max);
                tallest + self.spacing(first_on_page)
            }
            Node::Column(column) => self.stack(&column.children, width, first_on_page),
        }
    }
}

impl Measure for EstimatedMeasure {
    fn measure(&mut self, node: &Node, first_on_page: bool) -> f32 {
        self.height_at(node, self.width, first_on_page)
    }
}
