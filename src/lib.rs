//! # pagetree
//!
//! Structured document trees for generated contracts, letters and forms.
//!
//! A [`Document`] is an immutable tree of typed block nodes. This library
//! validates trees arriving as JSON, edits node content by path without
//! mutating the input, fills `${...}` template variables, and lays the
//! tree out onto fixed-height pages.
//!
//! ## Quick Start
//!
//! ```
//! use pagetree::{paginate, parse_json, update_content, PaginateOptions};
//!
//! fn main() -> pagetree::Result<()> {
//!     let doc = parse_json(r#"{
//!         "children": [
//!             { "type": "heading", "level": 1, "content": "Lease Agreement" },
//!             { "type": "text", "content": "Between ${LANDLORD} and ${TENANT}." }
//!         ]
//!     }"#)?;
//!
//!     // Edits return a new document; `doc` is left untouched
//!     let edited = update_content(&doc, &[0], "Residential Lease")?;
//!     assert_eq!(edited.children[0].content(), Some("Residential Lease"));
//!
//!     let pages = paginate(&edited, &PaginateOptions::letter());
//!     assert_eq!(pages.len(), 1);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Schema validation**: untrusted JSON trees are checked before use
//! - **Path editing**: copy-on-path updates with structural sharing
//! - **Pagination**: text, list, table and grid splitting under a height budget
//! - **Template variables**: typed extraction, validation, formatting and filling
//! - **Generation seam**: pluggable providers whose output is always validated

pub mod editor;
pub mod error;
pub mod generate;
pub mod model;
pub mod paginate;
pub mod path;
pub mod render;
pub mod schema;
pub mod variables;
pub mod visitor;

// Re-export commonly used types
pub use error::{
    EditError, Error, GenerationError, Result, SchemaError, ValidationCode, ValidationError,
};
pub use generate::{DocumentGenerator, GenerationRequest};
pub use model::{
    Document, Node, NodeKind, Page, PageSize, VariableDefinition, VariableType,
    VariableValidation,
};
pub use paginate::{EstimatedMeasure, Margins, Measure, PaginateOptions};
pub use path::{NodePath, PathSegment};
pub use render::{DocumentStats, JsonFormat};
pub use variables::ExtractOptions;
pub use visitor::{NodeVisitor, VisitorAction};

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

/// Parse and validate a document from a JSON string.
///
/// # Example
///
/// ```
/// use pagetree::parse_json;
///
/// let doc = parse_json(r#"{ "children": [{ "type": "page_break" }] }"#).unwrap();
/// assert_eq!(doc.len(), 1);
///
/// assert!(parse_json(r#"{ "children": [{ "type": "image" }] }"#).is_err());
/// ```
pub fn parse_json(json: &str) -> Result<Document> {
    let value: serde_json::Value = serde_json::from_str(json)?;
    Ok(schema::from_value(&value)?)
}

/// Parse and validate a document from a JSON file.
///
/// # Example
///
/// ```no_run
/// use pagetree::parse_file;
///
/// let doc = parse_file("contract.json").unwrap();
/// println!("Nodes: {}", doc.node_count());
/// ```
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Document> {
    let path = path.as_ref();
    log::debug!("Loading document from {}", path.display());
    let json = std::fs::read_to_string(path)?;
    parse_json(&json)
}

/// Parse and validate a document from a reader.
///
/// # Arguments
///
/// * `reader` - Any type implementing `Read`
pub fn parse_reader<R: Read>(mut reader: R) -> Result<Document> {
    let mut json = String::new();
    reader.read_to_string(&mut json)?;
    parse_json(&json)
}

/// Serialize a document to its persisted JSON form.
pub fn to_json(doc: &Document, format: JsonFormat) -> Result<String> {
    render::to_json(doc, format)
}

/// Paginate a document using the built-in height estimate.
///
/// Use [`paginate::paginate`] to supply a measurer backed by a real
/// layout engine.
pub fn paginate(doc: &Document, options: &PaginateOptions) -> Vec<Page> {
    paginate::paginate_estimated(doc, options)
}

/// Replace the content of one node, returning the edited document.
///
/// `path` uses the wire form, where `-1` addresses a table head.
pub fn update_content(doc: &Document, path: &[i64], new_content: &str) -> Result<Document> {
    Ok(editor::update_content(doc, path, new_content)?)
}

/// Check that a wire path addresses a node of the document.
pub fn validate_path(doc: &Document, raw: &[i64]) -> bool {
    path::validate_path(doc, raw)
}

/// Builder for loading documents and working with them.
///
/// # Example
///
/// ```
/// use pagetree::{PaginateOptions, Pagetree};
///
/// let result = Pagetree::new()
///     .with_paginate_options(PaginateOptions::a4())
///     .with_infer_types(false)
///     .parse_json(r#"{ "children": [{ "type": "text", "content": "Dear ${NAME}," }] }"#)?;
///
/// assert_eq!(result.variables().len(), 1);
/// assert_eq!(result.paginate().len(), 1);
/// # Ok::<(), pagetree::Error>(())
/// ```
pub struct Pagetree {
    paginate_options: PaginateOptions,
    extract_options: ExtractOptions,
    json_format: JsonFormat,
}

impl Pagetree {
    /// Create a new Pagetree builder.
    pub fn new() -> Self {
        Self {
            paginate_options: PaginateOptions::default(),
            extract_options: ExtractOptions::default(),
            json_format: JsonFormat::default(),
        }
    }

    /// Set pagination options.
    pub fn with_paginate_options(mut self, options: PaginateOptions) -> Self {
        self.paginate_options = options;
        self
    }

    /// Set the page size.
    pub fn with_page_size(mut self, size: PageSize) -> Self {
        self.paginate_options = self.paginate_options.with_page_size(size);
        self
    }

    /// Set a uniform page margin in points.
    pub fn with_margin(mut self, margin: f32) -> Self {
        self.paginate_options = self.paginate_options.with_margin(margin);
        self
    }

    /// Enable or disable name-based variable type inference.
    pub fn with_infer_types(mut self, infer: bool) -> Self {
        self.extract_options = self.extract_options.with_infer_types(infer);
        self
    }

    /// Emit compact JSON.
    pub fn compact(mut self) -> Self {
        self.json_format = JsonFormat::Compact;
        self
    }

    /// Load a document from a JSON file.
    pub fn parse<P: AsRef<Path>>(self, path: P) -> Result<PagetreeResult> {
        let document = parse_file(path)?;
        Ok(self.wrap(document))
    }

    /// Load a document from a JSON string.
    pub fn parse_json(self, json: &str) -> Result<PagetreeResult> {
        let document = parse_json(json)?;
        Ok(self.wrap(document))
    }

    /// Wrap an already validated document.
    pub fn document(self, document: Document) -> PagetreeResult {
        self.wrap(document)
    }

    fn wrap(self, document: Document) -> PagetreeResult {
        PagetreeResult {
            document,
            paginate_options: self.paginate_options,
            extract_options: self.extract_options,
            json_format: self.json_format,
        }
    }
}

impl Default for Pagetree {
    fn default() -> Self {
        Self::new()
    }
}

/// A loaded document together with the builder's options.
pub struct PagetreeResult {
    /// The loaded document
    pub document: Document,
    paginate_options: PaginateOptions,
    extract_options: ExtractOptions,
    json_format: JsonFormat,
}

impl PagetreeResult {
    /// Paginate with the built-in height estimate.
    pub fn paginate(&self) -> Vec<Page> {
        paginate::paginate_estimated(&self.document, &self.paginate_options)
    }

    /// Paginate with a custom measurer.
    pub fn paginate_with<M: Measure + ?Sized>(&self, measure: &mut M) -> Vec<Page> {
        paginate::paginate(&self.document, measure, &self.paginate_options)
    }

    /// Template variables of the document.
    pub fn variables(&self) -> Vec<VariableDefinition> {
        variables::extract_variables(&self.document, &self.extract_options)
    }

    /// Validate supplied values against the document's variables.
    pub fn validate(&self, values: &HashMap<String, String>) -> Vec<ValidationError> {
        variables::validate_all(&self.variables(), values)
    }

    /// Substitute values into a copy of the document.
    pub fn fill(&self, values: &HashMap<String, String>) -> Document {
        variables::fill_document(&self.document, values)
    }

    /// Edit one node, keeping the options for further work.
    pub fn update_content(self, path: &[i64], new_content: &str) -> Result<Self> {
        let document = editor::update_content(&self.document, path, new_content)?;
        Ok(Self { document, ..self })
    }

    /// Serialize the document to JSON.
    pub fn to_json(&self) -> Result<String> {
        render::to_json(&self.document, self.json_format)
    }

    /// Serialize paginated output to JSON.
    pub fn pages_to_json(&self) -> Result<String> {
        render::pages_to_json(&self.paginate(), self.json_format)
    }

    /// Get plain text of the document.
    pub fn to_text(&self) -> String {
        render::to_text(&self.document)
    }

    /// Collect document statistics.
    pub fn stats(&self) -> DocumentStats {
        DocumentStats::collect(&self.document)
    }

    /// Get the document.
    pub fn document(&self) -> &Document {
        &self.document
    }
}
