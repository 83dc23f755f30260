//! Document generation collaborators.
//!
//! A [`DocumentGenerator`] turns a free-text prompt (and optionally the
//! document being revised) into a JSON document tree. Providers are
//! untrusted: whatever they return goes through [`accept_generated`],
//! which validates it against the document schema before it is used.
//!
//! # Example
//!
//! ```
//! use pagetree::generate::{generate_document, DocumentGenerator, GenerationRequest};
//! use pagetree::GenerationError;
//! use serde_json::{json, Value};
//!
//! struct Canned;
//!
//! impl DocumentGenerator for Canned {
//!     fn name(&self) -> &str {
//!         "canned"
//!     }
//!
//!     fn generate(&self, request: &GenerationRequest) -> Result<Value, GenerationError> {
//!         Ok(json!({
//!             "type": "document",
//!             "children": [{ "type": "heading", "level": 1, "content": request.prompt }]
//!         }))
//!     }
//! }
//!
//! let doc = generate_document(&Canned, &GenerationRequest::new("Lease")).unwrap();
//! assert_eq!(doc.children[0].content(), Some("Lease"));
//! ```

use crate::error::GenerationError;
use crate::model::Document;
use crate::schema;
use serde_json::Value;

/// A generation request.
#[derive(Debug, Clone, Default)]
pub struct GenerationRequest {
    /// What to write
    pub prompt: String,

    /// Document to revise, if any
    pub existing: Option<Document>,
}

impl GenerationRequest {
    /// Create a request for a new document.
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            existing: None,
        }
    }

    /// Revise an existing document instead of starting from scratch.
    pub fn with_existing(mut self, doc: Document) -> Self {
        self.existing = Some(doc);
        self
    }

    /// Check if this request revises a document.
    pub fn is_revision(&self) -> bool {
        self.existing.is_some()
    }
}

/// Trait for document generation providers.
///
/// Implementations perform the provider call and report provider
/// failures as [`GenerationError`]s. They do not need to validate the
/// returned tree.
pub trait DocumentGenerator: Send + Sync {
    /// Get the name of this provider.
    fn name(&self) -> &str;

    /// Produce a JSON document tree for the request.
    fn generate(&self, request: &GenerationRequest) -> Result<Value, GenerationError>;
}

/// Validate a provider response and turn it into a document.
///
/// Schema failures become [`GenerationError::InvalidResponse`]; invalid
/// trees are never coerced.
pub fn accept_generated(value: &Value) -> Result<Document, GenerationError> {
    schema::from_value(value).map_err(|e| GenerationError::InvalidResponse {
        message: e.to_string(),
    })
}

/// Run a generator and validate its response.
pub fn generate_document(
    generator: &dyn DocumentGenerator,
    request: &GenerationRequest,
) -> Result<Document, GenerationError> {
    if request.prompt.trim().is_empty() {
        return Err(GenerationError::ConfigurationError {
            message: "Prompt must not be empty".to_string(),
        });
    }

    log::debug!(
        "Generating with {} (revision: {})",
        generator.name(),
        request.is_revision()
    );
    let value = generator
        .generate(request)
        .inspect_err(|e| log::warn!("{} failed: {}", generator.name(), e))?;

    let doc = accept_generated(&value)?;
    log::debug!(
        "Accepted generated document with {} nodes",
        doc.node_count()
    );
    Ok(doc)
}
