//! Field definition validation.
//!
//! Validates structural invariants of field definitions, catching problems
//! such as duplicate enumeration values, inverted numeric bounds, and
//! optional fields that cannot represent absence before a recognizer is
//! built from them.
//!
//! # Examples
//!
//! ```
//! use field_recognizer_core::*;
//!
//! let field = FieldSchema::new("age", FieldKind::integer(Some(0), Some(120)));
//! assert!(validate_field(&field).is_empty());
//!
//! // Invalid: optional primitive that cannot hold "no preference"
//! let bad = FieldSchema::new("age", FieldKind::integer(None, None))
//!     .optional()
//!     .with_nullable(false);
//! assert!(!validate_field(&bad).is_empty());
//! ```

use std::collections::HashSet;

use thiserror::Error;

use crate::{FieldKind, FieldSchema};

/// Field validation errors.
///
/// Each variant describes a specific structural problem found during
/// validation. The `Display` impl provides a human-readable message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Field name is empty or whitespace-only.
    #[error("field name cannot be empty")]
    EmptyFieldName,
    /// Enumeration field declares no values.
    #[error("enumeration field has no values: {0}")]
    EmptyEnumeration(String),
    /// Enumeration value name is empty or whitespace-only.
    #[error("enumeration value name cannot be empty in field: {0}")]
    EmptyValueName(String),
    /// Two enumeration values share a name.
    #[error("duplicate enumeration value: {0}")]
    DuplicateValue(String),
    /// Numeric field with `min > max`.
    #[error("minimum exceeds maximum in field: {0}")]
    InvertedBounds(String),
    /// Optional primitive field whose storage cannot represent absence.
    #[error("optional field must be nullable: {0}")]
    OptionalNotNullable(String),
}

/// Validates a field definition.
///
/// Returns every problem found; an empty vector means the field is valid.
///
/// # Examples
///
/// ```
/// use field_recognizer_core::*;
///
/// let field = FieldSchema::new(
///     "color",
///     FieldKind::enumeration(vec![EnumValue::new("Red"), EnumValue::new("Red")]),
/// );
/// let errors = validate_field(&field);
/// assert_eq!(errors, vec![ValidationError::DuplicateValue("Red".into())]);
/// ```
pub fn validate_field(field: &FieldSchema) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if field.name.trim().is_empty() {
        errors.push(ValidationError::EmptyFieldName);
        return errors;
    }

    if field.optional && !field.nullable && field.kind.is_primitive() {
        errors.push(ValidationError::OptionalNotNullable(field.name.clone()));
    }

    match &field.kind {
        FieldKind::Enumeration { values, .. } => {
            if values.is_empty() {
                errors.push(ValidationError::EmptyEnumeration(field.name.clone()));
            }
            let mut seen: HashSet<&str> = HashSet::new();
            for value in values {
                if value.value.trim().is_empty() {
                    errors.push(ValidationError::EmptyValueName(field.name.clone()));
                } else if !seen.insert(value.value.as_str()) {
                    errors.push(ValidationError::DuplicateValue(value.value.clone()));
                }
            }
        }
        FieldKind::Integer {
            min: Some(min),
            max: Some(max),
            ..
        } if min > max => {
            errors.push(ValidationError::InvertedBounds(field.name.clone()));
        }
        FieldKind::Real {
            min: Some(min),
            max: Some(max),
            ..
        } if min > max => {
            errors.push(ValidationError::InvertedBounds(field.name.clone()));
        }
        _ => {}
    }

    errors
}
