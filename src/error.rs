//! Error types for pagetree library.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::io;
use thiserror::Error;

/// Result type alias for pagetree operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while loading, validating or editing documents.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The input is not valid JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The JSON value does not describe a valid document tree.
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// A content edit was rejected.
    #[error(transparent)]
    Edit(#[from] EditError),

    /// A generation provider failed.
    #[error(transparent)]
    Generation(#[from] GenerationError),

    /// Error during serialization of the output.
    #[error("Rendering error: {0}")]
    Render(String),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

/// Failures of [`crate::editor::update_content`].
///
/// These are returned as values; the input document is never touched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EditError {
    /// The path has no segments.
    #[error("Path is empty")]
    EmptyPath,

    /// The replacement content is empty or whitespace only.
    #[error("Content must not be empty")]
    EmptyContent,

    /// The path does not resolve to a node.
    #[error("No node at path [{path}]")]
    PathNotFound {
        /// Display form of the requested path
        path: String,
    },

    /// The node at the path has no editable content.
    #[error("Node at path [{path}] ({kind}) is not editable")]
    NodeNotEditable {
        /// Display form of the requested path
        path: String,
        /// Kind of the node that was found
        kind: &'static str,
    },

    /// The rebuilt tree did not hold the new content at the path.
    #[error("Edit at path [{path}] produced an invalid document")]
    InternalInvalidResult {
        /// Display form of the requested path
        path: String,
    },
}

/// A document tree failed schema validation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid document at {path}: {message}")]
pub struct SchemaError {
    /// Location of the offending value, e.g. `children[2].level`
    pub path: String,

    /// What was wrong with it
    pub message: String,
}

impl SchemaError {
    /// Create a schema error for a location.
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Failures reported by a document generation provider.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "code", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GenerationError {
    /// The provider throttled the request.
    #[error("Rate limit exceeded")]
    RateLimit {
        /// Seconds to wait before retrying, if the provider said
        #[serde(default, skip_serializing_if = "Option::is_none")]
        retry_after: Option<u64>,
    },

    /// The provider answered with something that is not a valid document.
    #[error("Invalid response: {message}")]
    InvalidResponse {
        /// What was wrong with the response
        message: String,
    },

    /// The provider call failed.
    #[error("API error: {message}")]
    ApiError {
        /// HTTP status, when there was one
        #[serde(default, skip_serializing_if = "Option::is_none")]
        status: Option<u16>,
        /// Provider message
        message: String,
    },

    /// The provider is not configured (missing key, unknown model, ...).
    #[error("Configuration error: {message}")]
    ConfigurationError {
        /// What is missing or wrong
        message: String,
    },
}

impl GenerationError {
    /// The wire code of the failure.
    pub fn code(&self) -> &'static str {
        match self {
            GenerationError::RateLimit { .. } => "RATE_LIMIT",
            GenerationError::InvalidResponse { .. } => "INVALID_RESPONSE",
            GenerationError::ApiError { .. } => "API_ERROR",
            GenerationError::ConfigurationError { .. } => "CONFIGURATION_ERROR",
        }
    }

    /// Whether retrying the same request may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            GenerationError::RateLimit { .. } => true,
            GenerationError::ApiError { status, .. } => status.map_or(true, |s| s >= 500),
            _ => false,
        }
    }
}

/// A variable value failed validation.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("{field}: {message}")]
pub struct ValidationError {
    /// Name of the variable
    pub field: String,

    /// Human-readable reason
    pub message: String,

    /// Machine-readable reason
    pub code: ValidationCode,
}

impl ValidationError {
    /// Create a validation error for a variable.
    pub fn new(field: impl Into<String>, code: ValidationCode, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            code,
        }
    }
}

/// Machine-readable validation failure codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValidationCode {
    /// A required value is missing
    Required,
    /// Text is shorter than `minLength`
    MinLength,
    /// Text is longer than `maxLength`
    MaxLength,
    /// Text does not match `pattern`
    Pattern,
    /// Not an email address
    InvalidEmail,
    /// Email domain is not in the allow-list
    InvalidDomain,
    /// Not a recognizable date
    InvalidDate,
    /// Date before `minDate`
    DateTooEarly,
    /// Date after `maxDate`
    DateTooLate,
    /// Not a number, or too many decimal places
    InvalidNumber,
    /// Number below `min`
    NumberTooSmall,
    /// Number above `max`
    NumberTooLarge,
    /// Not a valid phone number for the numbering plan
    InvalidPhone,
}

impl ValidationCode {
    /// The wire form of the code.
    pub fn as_str(&self) -> &'static str {
        match self {
            ValidationCode::Required => "REQUIRED",
            ValidationCode::MinLength => "MIN_LENGTH",
            ValidationCode::MaxLength => "MAX_LENGTH",
            ValidationCode::Pattern => "PATTERN",
            ValidationCode::InvalidEmail => "INVALID_EMAIL",
            ValidationCode::InvalidDomain => "INVALID_DOMAIN",
            ValidationCode::InvalidDate => "INVALID_DATE",
            ValidationCode::DateTooEarly => "DATE_TOO_EARLY",
            ValidationCode::DateTooLate => "DATE_TOO_LATE",
            ValidationCode::InvalidNumber => "INVALID_NUMBER",
            ValidationCode::NumberTooSmall => "NUMBER_TOO_SMALL",
            ValidationCode::NumberTooLarge => "NUMBER_TOO_LARGE",
            ValidationCode::InvalidPhone => "INVALID_PHONE",
        }
    }
}

impl fmt::Display for ValidationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
