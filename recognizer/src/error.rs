//! Error types for recognizer construction and configuration loading.
//!
//! Only construction-time contract violations are errors. Input that is not
//! recognized produces no matches instead.

use field_recognizer_core::ValidationError;
use thiserror::Error;

use crate::help::TemplateUsage;
use crate::pattern::TermError;

/// Errors that can occur while building a recognizer or loading its
/// configuration.
#[derive(Debug, Error)]
pub enum RecognizerError {
    /// Optional primitive field whose storage cannot represent absence.
    #[error("optional field must be nullable: {field}")]
    NotNullable { field: String },

    /// A surface term is not valid pattern syntax.
    #[error("invalid term in field {field}: {source}")]
    InvalidTerm {
        field: String,
        #[source]
        source: TermError,
    },

    /// A help template override is not valid Handlebars syntax.
    #[error("invalid {} template: {source}", .usage.name())]
    InvalidTemplate {
        usage: TemplateUsage,
        #[source]
        source: Box<handlebars::TemplateError>,
    },

    /// Field kind does not fit the recognizer being built.
    #[error("field {field} is not {expected}")]
    KindMismatch {
        field: String,
        expected: &'static str,
    },

    /// Enumeration field declares no values.
    #[error("enumeration field has no values: {field}")]
    EmptyEnumeration { field: String },

    /// Any other structural problem in the field definition.
    #[error("invalid field definition: {0}")]
    InvalidField(#[from] ValidationError),

    /// File I/O failure.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// YAML parsing or serialization failure.
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),
}

/// Convenience alias for results with [`RecognizerError`].
pub type Result<T> = std::result::Result<T, RecognizerError>;
