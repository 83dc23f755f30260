//! Integration tests for the pagination engine.

use pagetree::model::{Document, Node};
use pagetree::paginate::{paginate, PaginateOptions};
use proptest::prelude::*;
use std::sync::Arc;

/// 40pt per table row or head, 20pt per list item, 1pt per text character.
fn structural(node: &Node, _first: bool) -> f32 {
    match node {
        Node::Table(table) => {
            let rows = table.children.len() + usize::from(table.head.is_some());
            40.0 * rows as f32
        }
        Node::List(list) => 20.0 * list.children.len() as f32,
        Node::Text(text) => text.content.chars().count() as f32,
        _ => 30.0,
    }
}

fn budget(height: f32) -> PaginateOptions {
    PaginateOptions::new().with_content_height(height)
}

fn contents(pages: &[pagetree::Page]) -> Vec<String> {
    pages
        .iter()
        .flat_map(|p| p.nodes.iter())
        .filter_map(|n| n.content().map(str::to_string))
        .collect()
}

#[test]
fn test_table_repeats_head_on_every_page() {
    let head = Node::head_from_strings(["Item", "Qty"]);
    let rows = (0..50)
        .map(|i| Node::row_from_strings([format!("item {}", i), i.to_string()]))
        .collect();
    let doc = Document::with_children(vec![Node::table(Some(head), rows)]);

    let pages = paginate(&doc, &mut structural, &budget(500.0));

    // 500 / 40 = 12 rows per page, one of them the head
    let per_page: Vec<usize> = pages
        .iter()
        .map(|p| match p.nodes[0].as_ref() {
            Node::Table(t) => t.children.len(),
            other => panic!("expected table, got {:?}", other.kind()),
        })
        .collect();
    assert_eq!(per_page, vec![11, 11, 11, 11, 6]);

    let Node::Table(original) = doc.children[0].as_ref() else {
        panic!("expected table");
    };
    let original_head = original.head.as_ref().unwrap();
    for page in &pages {
        let Node::Table(fragment) = page.nodes[0].as_ref() else {
            panic!("expected table");
        };
        assert!(Arc::ptr_eq(fragment.head.as_ref().unwrap(), original_head));
        assert!(page.height <= 500.0);
    }
}

#[test]
fn test_ordered_list_continuation_numbers() {
    let items = (0..30)
        .map(|i| Node::list_item(vec![Node::text(format!("clause {}", i))]))
        .collect();
    let doc = Document::with_children(vec![Node::list(true, items)]);

    let pages = paginate(&doc, &mut structural, &budget(100.0));
    assert_eq!(pages.len(), 6);

    let starts: Vec<u32> = pages
        .iter()
        .map(|p| match p.nodes[0].as_ref() {
            Node::List(list) => list.first_number(),
            other => panic!("expected list, got {:?}", other.kind()),
        })
        .collect();
    assert_eq!(starts, vec![1, 6, 11, 16, 21, 26]);
}

#[test]
fn test_unordered_list_has_no_start() {
    let items = (0..8)
        .map(|i| Node::list_item(vec![Node::text(i.to_string())]))
        .collect();
    let doc = Document::with_children(vec![Node::list(false, items)]);

    let pages = paginate(&doc, &mut structural, &budget(100.0));
    assert_eq!(pages.len(), 2);
    for page in &pages {
        let Node::List(list) = page.nodes[0].as_ref() else {
            panic!("expected list");
        };
        assert_eq!(list.start, None);
    }
}

#[test]
fn test_text_split_preserves_words() {
    let content = "abcd ".repeat(50);
    let doc = Document::with_children(vec![Node::text(content.clone())]);

    let pages = paginate(&doc, &mut structural, &budget(100.0));
    assert!(pages.len() >= 3);
    assert!(pages.iter().all(|p| p.height <= 100.0));

    let rejoined = contents(&pages).join(" ");
    assert_eq!(
        rejoined.split_whitespace().collect::<Vec<_>>(),
        content.split_whitespace().collect::<Vec<_>>()
    );
}

#[test]
fn test_oversized_rows_terminate() {
    let doc = Document::with_children(vec![Node::table(
        Some(Node::head_from_strings(["A"])),
        vec![
            Node::row_from_strings(["1"]),
            Node::row_from_strings(["2"]),
            Node::row_from_strings(["3"]),
        ],
    )]);

    // Even head + one row (80pt) exceeds the page
    let pages = paginate(&doc, &mut structural, &budget(30.0));
    assert_eq!(pages.len(), 3);
    assert!(pages.iter().all(|p| p.node_count() == 1));
}

#[test]
fn test_zero_budget_terminates() {
    let doc = Document::with_children(vec![Node::text("a"), Node::text("b")]);
    let pages = paginate(&doc, &mut structural, &budget(0.0));
    assert_eq!(pages.len(), 2);
}

proptest! {
    #[test]
    fn prop_page_count_for_identical_texts(
        n in 1usize..80,
        h in prop::sample::select(vec![10.0f32, 20.0, 30.0, 40.0, 60.0, 120.0])
    ) {
        let doc = Document::with_children((0..n).map(|i| Node::text(i.to_string())).collect());
        let mut measure = move |_: &Node, _: bool| h;
        let pages = paginate(&doc, &mut measure, &budget(120.0));

        let per_page = (120.0 / h) as usize;
        prop_assert_eq!(pages.len(), n.div_ceil(per_page));
    }

    #[test]
    fn prop_reading_order_is_preserved(heights in prop::collection::vec(1u8..60, 0..40)) {
        let doc = Document::with_children(
            heights.iter().enumerate().map(|(i, _)| Node::heading(i.to_string(), 3)).collect(),
        );
        let lookup = heights.clone();
        let mut measure = move |node: &Node, _: bool| {
            let index: usize = node.content().and_then(|c| c.parse().ok()).unwrap_or(0);
            f32::from(lookup[index])
        };
        let pages = paginate(&doc, &mut measure, &budget(100.0));

        let expected: Vec<String> = (0..heights.len()).map(|i| i.to_string()).collect();
        prop_assert_eq!(contents(&pages), expected);
        prop_assert!(pages.iter().all(|p| p.height <= 100.0));
        prop_assert!(!pages.is_empty());
        for (i, page) in pages.iter().enumerate() {
            prop_assert_eq!(page.number as usize, i + 1);
        }
    }
}
