//! Template variables.
//!
//! Content strings may embed placeholders of the form `${NAME}` or
//! `${NAME:TYPE:key=value:...}`. This module extracts typed
//! [`VariableDefinition`]s from a document, validates and formats
//! supplied values, and substitutes them back into the tree.
//!
//! ```
//! use pagetree::model::{Document, Node, VariableType};
//! use pagetree::variables::{extract_variables, ExtractOptions};
//!
//! let doc = Document::with_children(vec![Node::text(
//!     "Contact ${CLIENT_EMAIL} before ${DUE:DATE:format=long}",
//! )]);
//! let vars = extract_variables(&doc, &ExtractOptions::default());
//!
//! assert_eq!(vars[0].var_type, VariableType::Email);
//! assert_eq!(vars[1].name, "DUE");
//! ```
//!
//! [`VariableDefinition`]: crate::model::VariableDefinition

mod extract;
mod fill;
mod format;
mod phone;
mod validate;

pub use extract::{
    definition_from, document_placeholders, extract_from_text, extract_variables,
    find_placeholders, infer_type, label_from_name, Placeholder,
};
pub use fill::{fill_document, fill_text};
pub use format::{format_date, format_value, format_with_locale, DateOrder};
pub use phone::{format_phone, parse_phone, plan_for_region, NumberingPlan, PhoneNumber, PLANS};
pub use validate::{parse_date, parse_number, validate, validate_all};

/// Options for variable extraction.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Guess the type of untyped placeholders from their names and
    /// synthesize missing labels
    pub infer_types: bool,
}

impl ExtractOptions {
    /// Create new extraction options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable name-based inference.
    pub fn with_infer_types(mut self, infer: bool) -> Self {
        self.infer_types = infer;
        self
    }
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self { infer_types: true }
    }
}
