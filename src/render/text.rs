//! Plain text rendering for documents and pages.

use crate::model::{Document, Page};

/// Convert a document to plain text.
pub fn to_text(doc: &Document) -> String {
    doc.plain_text().trim().to_string()
}

/// Convert paginated output to plain text, one block per page.
///
/// Pages are introduced by a `--- Page N ---` marker line.
pub fn pages_to_text(pages: &[Page]) -> String {
    pages
        .iter()
        .map(|page| format!("--- Page {} ---\n{}", page.number, page.plain_text().trim()))
        .collect::<Vec<_>>()
        .join("\n\n")
}
