//! Pagination engine.
//!
//! Lays the top-level nodes of a [`Document`] onto fixed-height pages using
//! a caller-supplied [`Measure`]. Nodes that do not fit the space left on
//! the current page are split where their kind allows it:
//!
//! - `text` is broken at whitespace (hard-cut for a single long word); both
//!   fragments must keep at least [`PaginateOptions::min_split_chars`].
//! - `list` is split between items; ordered continuations carry `start`.
//! - `table` is split between rows and the head repeats on each fragment.
//! - `grid` splits every column independently.
//! - `heading`, `table_row` and `table_head` are never split.
//!
//! A `page_break` ends the current page unless it is still empty, and
//! never produces a node of its own. Pagination always terminates: a node
//! that does not fit even an empty page is placed on its own page.

mod measure;
mod options;
mod split;

pub use measure::{EstimatedMeasure, Measure};
pub use options::{Margins, PaginateOptions, DEFAULT_MIN_SPLIT_CHARS, DEFAULT_SAFETY_BUFFER};
pub use split::Split;

use crate::model::{Document, Node, Page};
use split::{force_split, Splitter};
use std::sync::Arc;

/// Paginate a document with the given measurer.
///
/// Returns at least one page; an empty document yields a single empty page.
/// Nodes placed whole are the same `Arc` as in the input document.
///
/// # Example
///
/// ```
/// use pagetree::model::{Document, Node};
/// use pagetree::paginate::{paginate, PaginateOptions};
///
/// let doc = Document::with_children(vec![
///     Node::heading("One", 1),
///     Node::PageBreak,
///     Node::heading("Two", 1),
/// ]);
/// let mut measure = |_: &Node, _: bool| 20.0;
/// let pages = paginate(&doc, &mut measure, &PaginateOptions::default());
///
/// assert_eq!(pages.len(), 2);
/// assert_eq!(pages[1].nodes[0].content(), Some("Two"));
/// ```
pub fn paginate<M: Measure + ?Sized>(
    doc: &Document,
    measure: &mut M,
    options: &PaginateOptions,
) -> Vec<Page> {
    Paginator::new(measure, options).run(doc)
}

/// Paginate with an [`EstimatedMeasure`] sized to the options' content width.
pub fn paginate_estimated(doc: &Document, options: &PaginateOptions) -> Vec<Page> {
    let mut measure = EstimatedMeasure::new(options.content_width());
    paginate(doc, &mut measure, options)
}

/// The page currently being filled.
struct PageCursor {
    number: u32,
    nodes: Vec<Arc<Node>>,
    used: f32,
}

impl PageCursor {
    fn new(number: u32) -> Self {
        Self {
            number,
            nodes: Vec::new(),
            used: 0.0,
        }
    }

    fn is_fresh(&self) -> bool {
        self.nodes.is_empty()
    }

    fn remaining(&self, budget: f32) -> f32 {
        budget - self.used
    }

    fn place(&mut self, node: Arc<Node>, height: f32) {
        self.nodes.push(node);
        self.used += height;
    }

    /// Close this page and start the next one.
    fn finalize(&mut self, pages: &mut Vec<Page>) {
        let next = PageCursor::new(self.number + 1);
        let done = std::mem::replace(self, next);
        log::debug!(
            "Page {} closed with {} nodes ({:.1}pt)",
            done.number,
            done.nodes.len(),
            done.used
        );
        pages.push(Page {
            number: done.number,
            nodes: done.nodes,
            height: done.used,
        });
    }
}

struct Paginator<'a, M: Measure + ?Sized> {
    splitter: Splitter<'a, M>,
    budget: f32,
}

impl<'a, M: Measure + ?Sized> Paginator<'a, M> {
    fn new(measure: &'a mut M, options: &PaginateOptions) -> Self {
        Self {
            splitter: Splitter::new(measure, options.min_split_chars),
            budget: options.content_budget(),
        }
    }

    fn run(mut self, doc: &Document) -> Vec<Page> {
        log::debug!(
            "Paginating {} top-level nodes into {:.1}pt pages",
            doc.len(),
            self.budget
        );

        let mut pages = Vec::new();
        let mut cursor = PageCursor::new(1);

        for node in &doc.children {
            if node.is_page_break() {
                if !cursor.is_fresh() {
                    cursor.finalize(&mut pages);
                }
                continue;
            }
            self.place(Arc::clone(node), &mut cursor, &mut pages);
        }

        if !cursor.is_fresh() || pages.is_empty() {
            cursor.finalize(&mut pages);
        }
        pages
    }

    fn place(&mut self, node: Arc<Node>, cursor: &mut PageCursor, pages: &mut Vec<Page>) {
        let mut pending = node;
        loop {
            let first = cursor.is_fresh();
            let remaining = cursor.remaining(self.budget);
            let height = self.splitter.height(&pending, first);

            if height <= remaining {
                cursor.place(pending, height);
                return;
            }

            if let Some(split) = self.splitter.split(&pending, remaining, first) {
                let fits_height = self.splitter.height(&split.fits, first);
                cursor.place(Arc::new(split.fits), fits_height);
                cursor.finalize(pages);
                pending = Arc::new(split.overflow);
                continue;
            }

            if !first {
                cursor.finalize(pages);
                continue;
            }

            // Nothing fits on an empty page: force progress.
            let (placed, rest) = force_split(&pending);
            let placed_height = self.splitter.height(&placed, true);
            if placed_height > self.budget {
                log::warn!(
                    "{} of {:.1}pt exceeds the {:.1}pt page; placing it alone",
                    placed.kind(),
                    placed_height,
                    self.budget
                );
            }
            cursor.place(placed, placed_height);
            match rest {
                Some(rest) => {
                    cursor.finalize(pages);
                    pending = Arc::new(rest);
                }
                None => return,
            }
        }
    }
}
