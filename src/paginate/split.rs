//! Split policies for nodes that overflow the remaining page space.
//!
//! Every successful split places real content in `fits` and leaves
//! strictly less in `overflow`, which is what bounds the pagination loop.

use super::measure::{measure_clamped, Measure};
use crate::model::{ListNode, Node, TableNode, TextNode};
use std::sync::Arc;

/// A node divided into the part that fits and the part that continues.
#[derive(Debug, Clone, PartialEq)]
pub struct Split {
    /// Placed on the current page
    pub fits: Node,

    /// Carried to the next page
    pub overflow: Node,
}

pub(crate) struct Splitter<'a, M: Measure + ?Sized> {
    measure: &'a mut M,
    min_split_chars: usize,
}

impl<'a, M: Measure + ?Sized> Splitter<'a, M> {
    pub(crate) fn new(measure: &'a mut M, min_split_chars: usize) -> Self {
        Self {
            measure,
            min_split_chars,
        }
    }

    pub(crate) fn height(&mut self, node: &Node, first_on_page: bool) -> f32 {
        measure_clamped(&mut *self.measure, node, first_on_page)
    }

    /// Split `node` so that the first part fits in `budget`.
    ///
    /// Returns `None` when the kind is unbreakable or no useful split
    /// exists at this budget.
    pub(crate) fn split(&mut self, node: &Node, budget: f32, first_on_page: bool) -> Option<Split> {
        if budget <= 0.0 {
            return None;
        }
        let split = match node {
            Node::Text(text) => self.split_text(text, budget, first_on_page),
            Node::List(list) => self.split_list(node, list, budget, first_on_page),
            Node::Table(table) => self.split_table(node, table, budget, first_on_page),
            Node::Grid(_) => self.split_grid(node, budget, first_on_page),
            Node::ListItem(_) | Node::TableColumn(_) | Node::Column(_) => {
                self.split_container(node, budget, first_on_page)
            }
            Node::Heading(_) | Node::PageBreak | Node::TableHead(_) | Node::TableRow(_) => None,
        };
        if split.is_some() {
            log::trace!("Split {} against {:.1}pt", node.kind(), budget);
        }
        split
    }

    /// Largest `k` such that `node` holding only `items[..k]` fits.
    fn fitting_prefix(
        &mut self,
        node: &Node,
        items: &[Arc<Node>],
        budget: f32,
        first_on_page: bool,
    ) -> usize {
        let (mut lo, mut hi) = (0, items.len());
        while lo < hi {
            let mid = lo + (hi - lo).div_ceil(2);
            let candidate = node.with_children(items[..mid].to_vec());
            if self.height(&candidate, first_on_page) <= budget {
                lo = mid;
            } else {
                hi = mid - 1;
            }
        }
        lo
    }

    fn split_text(&mut self, text: &TextNode, budget: f32, first_on_page: bool) -> Option<Split> {
        let content = text.content.as_str();
        let total = content.chars().count();
        if total < self.min_split_chars.saturating_mul(2).max(2) {
            return None;
        }

        // offsets[k] is the byte offset just past the first k characters
        let offsets: Vec<usize> = content
            .char_indices()
            .map(|(i, _)| i)
            .chain(std::iter::once(content.len()))
            .collect();
        let fragment = |s: &str| {
            Node::Text(TextNode {
                content: s.to_string(),
                styles: text.styles.clone(),
            })
        };

        let (mut lo, mut hi) = (0, total);
        while lo < hi {
            let mid = lo + (hi - lo).div_ceil(2);
            if self.height(&fragment(&content[..offsets[mid]]), first_on_page) <= budget {
                lo = mid;
            } else {
                hi = mid - 1;
            }
        }
        if lo == 0 || lo == total {
            return None;
        }

        // Break at the last whitespace at or before the cut, or hard-cut a
        // single long word.
        let hard = offsets[lo];
        let cut = if content[hard..].starts_with(char::is_whitespace) {
            hard
        } else {
            content[..hard]
                .rfind(char::is_whitespace)
                .unwrap_or(hard)
        };

        let head = content[..cut].trim_end();
        let tail = content[cut..].trim_start();
        if head.is_empty()
            || tail.is_empty()
            || head.chars().count() < self.min_split_chars
            || tail.chars().count() < self.min_split_chars
        {
            return None;
        }

        Some(Split {
            fits: fragment(head),
            overflow: fragment(tail),
        })
    }

    fn split_list(
        &mut self,
        node: &Node,
        list: &ListNode,
        budget: f32,
        first_on_page: bool,
    ) -> Option<Split> {
        let items = &list.children;
        let placed = self.fitting_prefix(node, items, budget, first_on_page);
        if placed >= items.len() {
            return None;
        }
        if placed > 0 {
            return Some(Split {
                fits: node.with_children(items[..placed].to_vec()),
                overflow: continued(list, items[placed..].to_vec(), placed),
            });
        }

        // Not even one whole item fits: divide the first item itself.
        let first_item = items.first()?;
        let overhead = self.height(&node.with_children(Vec::new()), first_on_page);
        let inner = self.split(first_item, budget - overhead, first_on_page)?;
        let fits = node.with_children(vec![Arc::new(inner.fits)]);
        if self.height(&fits, first_on_page) > budget {
            return None;
        }
        let mut rest = vec![Arc::new(inner.overflow)];
        rest.extend(items[1..].iter().cloned());
        Some(Split {
            fits,
            overflow: continued(list, rest, 0),
        })
    }

    fn split_table(
        &mut self,
        node: &Node,
        table: &TableNode,
        budget: f32,
        first_on_page: bool,
    ) -> Option<Split> {
        let rows = &table.children;
        let placed = self.fitting_prefix(node, rows, budget, first_on_page);
        if placed == 0 || placed >= rows.len() {
            return None;
        }
        // with_children keeps the head, so both fragments repeat it.
        Some(Split {
            fits: node.with_children(rows[..placed].to_vec()),
            overflow: node.with_children(rows[placed..].to_vec()),
        })
    }

    fn split_container(&mut self, node: &Node, budget: f32, first_on_page: bool) -> Option<Split> {
        let children = node.children()?;
        let whole = self.fitting_prefix(node, children, budget, first_on_page);
        if whole >= children.len() {
            return None;
        }

        let used = self.height(&node.with_children(children[..whole].to_vec()), first_on_page);
        if let Some(inner) =
            self.split(&children[whole], budget - used, first_on_page && whole == 0)
        {
            let mut placed = children[..whole].to_vec();
            placed.push(Arc::new(inner.fits));
            let fits = node.with_children(placed);
            if self.height(&fits, first_on_page) <= budget {
                let mut rest = vec![Arc::new(inner.overflow)];
                rest.extend(children[whole + 1..].iter().cloned());
                return Some(Split {
                    fits,
                    overflow: node.with_children(rest),
                });
            }
        }

        if whole == 0 {
            return None;
        }
        Some(Split {
            fits: node.with_children(children[..whole].to_vec()),
            overflow: node.with_children(children[whole..].to_vec()),
        })
    }

    /// Each column is divided on its own; the overflow grid keeps every
    /// column, empty where the column finished on this page.
    fn split_grid(&mut self, node: &Node, budget: f32, first_on_page: bool) -> Option<Split> {
        let columns = node.children()?;
        if columns.iter().any(|c| c.children().is_none()) {
            return None;
        }

        let mut placed = Vec::with_capacity(columns.len());
        let mut rest = Vec::with_capacity(columns.len());
        let (mut progressed, mut remaining) = (false, false);

        for column in columns {
            let empty = Arc::new(column.with_children(Vec::new()));
            if self.height(column, first_on_page) <= budget {
                progressed |= column.children().is_some_and(|c| !c.is_empty());
                placed.push(Arc::clone(column));
                rest.push(empty);
            } else if let Some(split) = self.split(column, budget, first_on_page) {
                progressed = true;
                remaining = true;
                placed.push(Arc::new(split.fits));
                rest.push(Arc::new(split.overflow));
            } else {
                remaining = true;
                placed.push(empty);
                rest.push(Arc::clone(column));
            }
        }

        if !progressed || !remaining {
            return None;
        }
        let fits = node.with_children(placed);
        if self.height(&fits, first_on_page) > budget {
            return None;
        }
        Some(Split {
            fits,
            overflow: node.with_children(rest),
        })
    }
}

/// Force progress on a node that does not fit an empty page.
///
/// Tables give up their first row, lists their first item. Anything else
/// is returned whole with no remainder.
pub(crate) fn force_split(node: &Arc<Node>) -> (Arc<Node>, Option<Node>) {
    match node.as_ref() {
        Node::Table(table) if table.children.len() > 1 => (
            Arc::new(node.with_children(table.children[..1].to_vec())),
            Some(node.with_children(table.children[1..].to_vec())),
        ),
        Node::List(list) if list.children.len() > 1 => (
            Arc::new(node.with_children(list.children[..1].to_vec())),
            Some(continued(list, list.children[1..].to_vec(), 1)),
        ),
        _ => (Arc::clone(node), None),
    }
}

/// Continuation of a list after `placed` whole items went on earlier pages.
fn continued(list: &ListNode, children: Vec<Arc<Node>>, placed: usize) -> Node {
    let start = if list.ordered {
        let placed = u32::try_from(placed).unwrap_or(u32::MAX);
        Some(list.first_number().saturating_add(placed))
    } else {
        list.start
    };
    Node::List(ListNode {
        ordered: list.ordered,
        start,
        children,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 1pt per character of text, 10pt per table row or head.
    fn linear(node: &Node, _first: bool) -> f32 {
        match node {
            Node::Text(t) => t.content.chars().count() as f32,
            Node::Heading(h) => h.content.chars().count() as f32,
            Node::TableRow(_) | Node::TableHead(_) => 10.0,
            Node::Table(t) => 10.0 * (t.children.len() + usize::from(t.head.is_some())) as f32,
            Node::Grid(g) => g.children.iter().map(|c| linear(c, false)).fold(0.0, f32::max),
            _ => node
                .children()
                .map(|c| c.iter().map(|n| linear(n, false)).sum())
                .unwrap_or(0.0),
        }
    }

    fn splitter(measure: &mut fn(&Node, bool) -> f32) -> Splitter<'_, fn(&Node, bool) -> f32> {
        Splitter::new(measure, 5)
    }

    #[test]
    fn test_text_split_at_whitespace() {
        let mut m: fn(&Node, bool) -> f32 = linear;
        let mut s = splitter(&mut m);
        let node = Node::text("alpha bravo charlie delta echo");
        let split = s.split(&node, 14.0, true).unwrap();
        assert_eq!(split.fits.content(), Some("alpha bravo"));
        assert_eq!(split.overflow.content(), Some("charlie delta echo"));
    }

    #[test]
    fn test_text_hard_cut_without_whitespace() {
        let mut m: fn(&Node, bool) -> f32 = linear;
        let mut s = splitter(&mut m);
        let node = Node::text("x".repeat(30));
        let split = s.split(&node, 12.0, true).unwrap();
        assert_eq!(split.fits.content().map(str::len), Some(12));
        assert_eq!(split.overflow.content().map(str::len), Some(18));
    }

    #[test]
    fn test_text_fragments_respect_minimum() {
        let mut m: fn(&Node, bool) -> f32 = linear;
        let mut s = splitter(&mut m);
        // A 3-character head would be under the 5-character minimum.
        assert!(s.split(&Node::text("abc defghijklmnop"), 4.0, true).is_none());
        // Too short to produce two fragments at all.
        assert!(s.split(&Node::text("abcdefgh"), 4.0, true).is_none());
    }

    #[test]
    fn test_table_split_repeats_head() {
        let mut m: fn(&Node, bool) -> f32 = linear;
        let mut s = splitter(&mut m);
        let rows = (0..5).map(|i| Node::row_from_strings([i.to_string()])).collect();
        let table = Node::table(Some(Node::head_from_strings(["H"])), rows);

        let split = s.split(&table, 35.0, true).unwrap();
        assert_eq!(split.fits.children().map(|c| c.len()), Some(2));
        assert_eq!(split.overflow.children().map(|c| c.len()), Some(3));
        assert!(Arc::ptr_eq(
            split.fits.table_head_node().unwrap(),
            split.overflow.table_head_node().unwrap()
        ));
    }

    #[test]
    fn test_table_without_room_for_a_row() {
        let mut m: fn(&Node, bool) -> f32 = linear;
        let mut s = splitter(&mut m);
        let table = Node::table(
            Some(Node::head_from_strings(["H"])),
            vec![Node::row_from_strings(["a"]), Node::row_from_strings(["b"])],
        );
        assert!(s.split(&table, 15.0, true).is_none());
    }

    #[test]
    fn test_ordered_list_continues_numbering() {
        let mut m: fn(&Node, bool) -> f32 = linear;
        let mut s = splitter(&mut m);
        let items = (0..4)
            .map(|_| Node::list_item(vec![Node::text("1234567890")]))
            .collect();
        let list = Node::list(true, items);

        let split = s.split(&list, 25.0, true).unwrap();
        match (&split.fits, &split.overflow) {
            (Node::List(fits), Node::List(rest)) => {
                assert_eq!(fits.children.len(), 2);
                assert_eq!(fits.first_number(), 1);
                assert_eq!(rest.children.len(), 2);
                assert_eq!(rest.start, Some(3));
            }
            other => panic!("unexpected split {:?}", other),
        }
    }

    #[test]
    fn test_list_item_split_when_no_item_fits() {
        let mut m: fn(&Node, bool) -> f32 = linear;
        let mut s = splitter(&mut m);
        let list = Node::list(
            true,
            vec![Node::list_item(vec![
                Node::text("first paragraph"),
                Node::text("second paragraph"),
            ])],
        );
        let split = s.split(&list, 18.0, true).unwrap();
        assert_eq!(split.fits.plain_text(), "first paragraph");
        assert_eq!(split.overflow.plain_text(), "second paragraph");
        match split.overflow {
            Node::List(rest) => assert_eq!(rest.start, Some(1)),
            other => panic!("unexpected overflow {:?}", other),
        }
    }

    #[test]
    fn test_grid_columns_split_independently() {
        let mut m: fn(&Node, bool) -> f32 = linear;
        let mut s = splitter(&mut m);
        let grid = Node::grid(vec![
            Node::column(Some(50), vec![Node::text("short")]),
            Node::column(
                Some(50),
                vec![Node::text("0123456789"), Node::text("0123456789")],
            ),
        ]);

        let split = s.split(&grid, 12.0, true).unwrap();
        let fits = split.fits.children().unwrap();
        let rest = split.overflow.children().unwrap();
        assert_eq!(fits[0].plain_text(), "short");
        assert_eq!(fits[1].plain_text(), "0123456789");
        assert!(rest[0].children().unwrap().is_empty());
        assert_eq!(rest[1].plain_text(), "0123456789");
    }

    #[test]
    fn test_unbreakable_kinds() {
        let mut m: fn(&Node, bool) -> f32 = linear;
        let mut s = splitter(&mut m);
        assert!(s.split(&Node::heading("a very long heading text", 1), 3.0, true).is_none());
        assert!(s.split(&Node::row_from_strings(["a", "b"]), 3.0, true).is_none());
        assert!(s.split(&Node::text("anything at all here"), 0.0, true).is_none());
    }

    #[test]
    fn test_force_split() {
        let table = Arc::new(Node::table(
            None,
            vec![Node::row_from_strings(["a"]), Node::row_from_strings(["b"])],
        ));
        let (placed, rest) = force_split(&table);
        assert_eq!(placed.children().map(|c| c.len()), Some(1));
        assert_eq!(rest.and_then(|r| r.children().map(|c| c.len())), Some(1));

        let heading = Arc::new(Node::heading("Huge", 1));
        let (placed, rest) = force_split(&heading);
        assert!(Arc::ptr_eq(&placed, &heading));
        assert!(rest.is_none());
    }
}
