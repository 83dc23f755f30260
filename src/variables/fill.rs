//! Placeholder substitution.

use super::extract::{extract_variables, find_placeholders};
use super::format::format_value;
use super::ExtractOptions;
use crate::model::{Document, Node, TableNode, VariableDefinition};
use std::collections::HashMap;
use std::sync::Arc;

/// Substitute placeholder values throughout a document.
///
/// Each `${...}` whose variable has a non-blank value (or a default) is
/// replaced by the formatted value; other placeholders are left intact.
/// Unchanged subtrees are shared with the input.
pub fn fill_document(doc: &Document, values: &HashMap<String, String>) -> Document {
    let definitions: HashMap<String, VariableDefinition> =
        extract_variables(doc, &ExtractOptions::default())
            .into_iter()
            .map(|d| (d.name.clone(), d))
            .collect();

    let filler = Filler {
        definitions: &definitions,
        values,
    };
    let children = doc.children.iter().map(|c| filler.fill(c)).collect();
    Document {
        children,
        variables: doc.variables.clone(),
    }
}

/// Substitute placeholder values in a single string.
pub fn fill_text(
    text: &str,
    definitions: &HashMap<String, VariableDefinition>,
    values: &HashMap<String, String>,
) -> String {
    Filler { definitions, values }
        .replace(text)
        .unwrap_or_else(|| text.to_string())
}

struct Filler<'a> {
    definitions: &'a HashMap<String, VariableDefinition>,
    values: &'a HashMap<String, String>,
}

impl Filler<'_> {
    fn value_for(&self, name: &str) -> Option<String> {
        let def = self.definitions.get(name);
        let supplied = self
            .values
            .get(name)
            .filter(|v| !v.trim().is_empty())
            .cloned();
        let raw = supplied.or_else(|| def.and_then(|d| d.default_value.clone()))?;
        Some(match def {
            Some(def) => format_value(def, &raw),
            None => raw,
        })
    }

    /// Replaced text, or `None` when nothing changed.
    fn replace(&self, text: &str) -> Option<String> {
        let placeholders = find_placeholders(text);
        let mut out = String::with_capacity(text.len());
        let mut cursor = 0;
        let mut changed = false;
        for placeholder in placeholders {
            if let Some(value) = self.value_for(&placeholder.name) {
                out.push_str(&text[cursor..placeholder.span.start]);
                out.push_str(&value);
                cursor = placeholder.span.end;
                changed = true;
            }
        }
        if !changed {
            return None;
        }
        out.push_str(&text[cursor..]);
        Some(out)
    }

    fn fill(&self, node: &Arc<Node>) -> Arc<Node> {
        if let Some(content) = node.content() {
            return match self.replace(content).and_then(|c| node.with_content(c)) {
                Some(filled) => Arc::new(filled),
                None => Arc::clone(node),
            };
        }

        let mut changed = false;
        let head = node.table_head_node().map(|h| {
            let filled = self.fill(h);
            changed |= !Arc::ptr_eq(h, &filled);
            filled
        });
        let children: Vec<Arc<Node>> = node
            .children()
            .unwrap_or(&[])
            .iter()
            .map(|c| {
                let filled = self.fill(c);
                changed |= !Arc::ptr_eq(c, &filled);
                filled
            })
            .collect();

        if !changed {
            return Arc::clone(node);
        }
        let rebuilt = match node.as_ref() {
            Node::Table(_) => Node::Table(TableNode { head, children }),
            _ => node.with_children(children),
        };
        Arc::new(rebuilt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::VariableType;

    fn values(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_fill_replaces_and_keeps_unknown() {
        let doc = Document::with_children(vec![
            Node::heading("Agreement with ${CLIENT}", 1),
            Node::text("Signed ${SIGNED_DATE:DATE:format=long} by ${SIGNER}"),
            Node::PageBreak,
        ]);
        let filled = fill_document(
            &doc,
            &values(&[("CLIENT", "Acme"), ("SIGNED_DATE", "2025-01-05")]),
        );

        assert_eq!(filled.children[0].content(), Some("Agreement with Acme"));
        assert_eq!(
            filled.children[1].content(),
            Some("Signed January 5, 2025 by ${SIGNER}")
        );
        assert!(Arc::ptr_eq(&doc.children[2], &filled.children[2]));
        assert_eq!(doc.children[0].content(), Some("Agreement with ${CLIENT}"));
    }

    #[test]
    fn test_fill_uses_defaults_and_shares_untouched() {
        let doc = Document::with_children(vec![
            Node::table(
                Some(Node::head_from_strings(["${COL:TEXT:default=Name}"])),
                vec![Node::row_from_strings(["static"])],
            ),
            Node::text("no placeholders"),
        ]);
        let filled = fill_document(&doc, &HashMap::new());

        let head = filled.children[0].table_head_node().unwrap();
        assert_eq!(head.plain_text(), "Name");
        let old_row = &doc.children[0].children().unwrap()[0];
        let new_row = &filled.children[0].children().unwrap()[0];
        assert!(Arc::ptr_eq(old_row, new_row));
        assert!(Arc::ptr_eq(&doc.children[1], &filled.children[1]));
    }

    #[test]
    fn test_fill_text() {
        let defs = HashMap::from([(
            "PHONE".to_string(),
            VariableDefinition::new("PHONE", VariableType::Phone),
        )]);
        let text = fill_text("Call ${PHONE}", &defs, &values(&[("PHONE", "4155552671")]));
        assert_eq!(text, "Call (415) 555-2671");
        assert_eq!(fill_text("Hi ${X}", &defs, &HashMap::new()), "Hi ${X}");
    }
}
