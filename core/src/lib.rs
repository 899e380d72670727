//! Core match and field-definition types for free-text field recognition.
//!
//! This crate defines the foundational types shared by recognizers and
//! their callers:
//!
//! - [`TermMatch`]: a candidate interpretation of a span of input, with a
//!   confidence score and the recognized [`Value`].
//! - [`Value`]: every domain value a recognizer can produce.
//! - [`FieldSchema`]: the definition of a form field: its kind, terms,
//!   and whether it is optional.
//! - [`EnumValue`]: one legal value of an enumeration field.
//!
//! Validation ([`validate_field`]) catches structural errors such as
//! duplicate values and optional fields that cannot hold "no preference".
//!
//! Selection ([`best_match`], [`remove_covered`]) implements the common
//! caller policy for choosing among candidates.
//!
//! # Example
//!
//! ```
//! use field_recognizer_core::*;
//!
//! let field = FieldSchema::new(
//!     "color",
//!     FieldKind::enumeration(vec![
//!         EnumValue::new("Red").with_terms(["red", "crimson"]),
//!         EnumValue::new("Blue").with_terms(["blue", "navy"]),
//!     ]),
//! )
//! .optional();
//!
//! assert!(validate_field(&field).is_empty());
//! assert_eq!(field.kind.label(), "enumeration");
//! ```

mod select;
mod types;
mod validate;

pub use select::{best_match, remove_covered};
pub use types::*;
pub use validate::{ValidationError, validate_field};
