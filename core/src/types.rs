//! Match and field-definition types for free-text field recognition.
//!
//! This module defines the value objects shared by every recognizer: the
//! [`TermMatch`] candidate produced when input text is recognized, the
//! [`Value`] union of recognizable domain values, and the field definitions
//! ([`FieldSchema`], [`FieldKind`], [`EnumValue`]) a recognizer is built
//! from. All types serialize with [`serde`] so field definitions can be
//! loaded from YAML or JSON.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A recognized domain value.
///
/// Enumeration fields produce [`Value::Choice`] carrying the value name;
/// primitive fields produce the variant matching their kind.
///
/// # Examples
///
/// ```
/// use field_recognizer_core::Value;
///
/// let v = Value::Choice("Red".into());
/// assert_eq!(v.as_choice(), Some("Red"));
/// assert_eq!(Value::Integer(3).to_string(), "3");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Value {
    /// A named enumeration value.
    Choice(String),
    /// Boolean answer.
    Bool(bool),
    /// Free text, preserved verbatim including surrounding whitespace.
    Text(String),
    /// Whole number.
    Integer(i64),
    /// Floating-point number.
    Real(f64),
    /// Resolved point in time.
    DateTime(NaiveDateTime),
}

impl Value {
    /// Returns the enumeration value name, if this is a [`Value::Choice`].
    pub fn as_choice(&self) -> Option<&str> {
        match self {
            Value::Choice(name) => Some(name),
            _ => None,
        }
    }

    /// Short label for the value's kind, used in diagnostics and tables.
    pub fn kind_label(&self) -> &'static str {
        match self {
            Value::Choice(_) => "choice",
            Value::Bool(_) => "bool",
            Value::Text(_) => "text",
            Value::Integer(_) => "integer",
            Value::Real(_) => "real",
            Value::DateTime(_) => "date_time",
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Choice(name) => f.write_str(name),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Text(text) => f.write_str(text),
            Value::Integer(n) => write!(f, "{n}"),
            Value::Real(x) => write!(f, "{x}"),
            Value::DateTime(dt) => write!(f, "{dt}"),
        }
    }
}

/// A candidate interpretation of a span of user input.
///
/// `start` and `length` are byte offsets into the original input. A `value`
/// of `None` means the user explicitly expressed "no preference".
///
/// # Examples
///
/// ```
/// use field_recognizer_core::{TermMatch, Value};
///
/// let whole = TermMatch::new(0, 7, 1.0, Some(Value::Choice("Reddish".into())));
/// let part = TermMatch::new(0, 3, 0.43, Some(Value::Choice("Red".into())));
/// assert!(whole.covers(&part));
/// assert!(whole.overlaps(&part));
/// assert_eq!(whole.end(), 7);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TermMatch {
    /// Byte offset where the match starts
    pub start: usize,
    /// Length of the match in bytes
    pub length: usize,
    /// Confidence score (0.0 - 1.0)
    pub confidence: f64,
    /// Recognized value, `None` for "no preference"
    pub value: Option<Value>,
}

impl TermMatch {
    /// Creates a match, clamping `confidence` into `[0.0, 1.0]`.
    pub fn new(start: usize, length: usize, confidence: f64, value: Option<Value>) -> Self {
        Self {
            start,
            length,
            confidence: confidence.clamp(0.0, 1.0),
            value,
        }
    }

    /// Byte offset one past the last matched byte.
    pub fn end(&self) -> usize {
        self.start + self.length
    }

    /// Returns `true` if this match's span fully contains `other`'s span.
    pub fn covers(&self, other: &TermMatch) -> bool {
        self.start <= other.start && self.end() >= other.end()
    }

    /// Returns `true` if the two spans share at least one byte.
    ///
    /// Zero-length spans overlap nothing.
    pub fn overlaps(&self, other: &TermMatch) -> bool {
        self.length > 0
            && other.length > 0
            && self.start < other.end()
            && other.start < self.end()
    }

    /// Returns `true` if both matches consumed exactly the same span.
    pub fn is_same_span(&self, other: &TermMatch) -> bool {
        self.start == other.start && self.length == other.length
    }

    /// Returns the matched slice of `input`, if the span lies within it.
    pub fn text<'a>(&self, input: &'a str) -> Option<&'a str> {
        input.get(self.start..self.end())
    }
}

/// One legal value of an enumeration field.
///
/// A value is identified by `value`; `description` is the human-readable
/// label shown in help, and `terms` are the surface terms (literal phrases
/// or regular-expression fragments) a user may type to select it.
///
/// # Examples
///
/// ```
/// use field_recognizer_core::EnumValue;
///
/// let value = EnumValue::new("Large").with_terms(["large", "big", "L"]);
/// assert_eq!(value.description(), "Large");
/// assert_eq!(value.surface_terms(), vec!["large", "big", "L"]);
///
/// // Without explicit terms the description and name are used, as plain text.
/// let value = EnumValue::new("ExtraLarge").with_description("extra large");
/// assert_eq!(value.surface_terms(), vec!["extra large", "ExtraLarge"]);
/// assert!(value.has_literal_terms());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumValue {
    /// Value name, returned as [`Value::Choice`] when recognized
    pub value: String,
    /// Human-readable description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Surface terms that select this value
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub terms: Vec<String>,
}

impl EnumValue {
    /// Creates a value with no description and no explicit terms.
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            description: None,
            terms: Vec::new(),
        }
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the surface terms.
    pub fn with_terms<I, S>(mut self, terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.terms = terms.into_iter().map(Into::into).collect();
        self
    }

    /// Returns the description, falling back to the value name.
    pub fn description(&self) -> &str {
        self.description.as_deref().unwrap_or(&self.value)
    }

    /// Returns the terms used to recognize this value.
    ///
    /// Explicit `terms` win; otherwise the description and the value name
    /// (deduplicated case-insensitively) are used. Generated terms are plain
    /// text, see [`has_literal_terms`](Self::has_literal_terms).
    pub fn surface_terms(&self) -> Vec<&str> {
        if !self.terms.is_empty() {
            return self.terms.iter().map(String::as_str).collect();
        }
        let mut terms = vec![self.description()];
        if !terms[0].eq_ignore_ascii_case(&self.value) {
            terms.push(&self.value);
        }
        terms
    }

    /// `true` when [`surface_terms`](Self::surface_terms) are generated from
    /// the description and name and must match as written.
    pub fn has_literal_terms(&self) -> bool {
        self.terms.is_empty()
    }
}

/// Kind of value a field accepts.
///
/// # Examples
///
/// ```
/// use field_recognizer_core::FieldKind;
///
/// let kind = FieldKind::integer(Some(1), Some(10));
/// assert!(kind.is_primitive());
/// assert_eq!(kind.label(), "integer");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldKind {
    /// Closed set of named values.
    Enumeration {
        /// Legal values in declaration order
        values: Vec<EnumValue>,
        /// Whether values can be selected by 1-based ordinal
        #[serde(default = "default_true")]
        allow_numbers: bool,
        /// Whether the field collects a list of values
        #[serde(default)]
        allow_multiple: bool,
    },
    /// Yes/no answer.
    Boolean,
    /// Free text.
    Text,
    /// Whole number within optional inclusive bounds.
    Integer {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min: Option<i64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max: Option<i64>,
        /// Whether bounds are mentioned in help
        #[serde(default)]
        show_limits: bool,
    },
    /// Floating-point number within optional inclusive bounds.
    Real {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max: Option<f64>,
        /// Whether bounds are mentioned in help
        #[serde(default)]
        show_limits: bool,
    },
    /// Point in time resolved by an external date/time phrase parser.
    DateTime,
}

fn default_true() -> bool {
    true
}

impl FieldKind {
    /// Enumeration over `values` with ordinal shortcuts enabled.
    pub fn enumeration(values: Vec<EnumValue>) -> Self {
        FieldKind::Enumeration {
            values,
            allow_numbers: true,
            allow_multiple: false,
        }
    }

    /// Integer kind with hidden bounds.
    pub fn integer(min: Option<i64>, max: Option<i64>) -> Self {
        FieldKind::Integer {
            min,
            max,
            show_limits: false,
        }
    }

    /// Real kind with hidden bounds.
    pub fn real(min: Option<f64>, max: Option<f64>) -> Self {
        FieldKind::Real {
            min,
            max,
            show_limits: false,
        }
    }

    /// Returns `true` for every kind except [`FieldKind::Enumeration`].
    pub fn is_primitive(&self) -> bool {
        !matches!(self, FieldKind::Enumeration { .. })
    }

    /// Short label for the kind.
    pub fn label(&self) -> &'static str {
        match self {
            FieldKind::Enumeration { .. } => "enumeration",
            FieldKind::Boolean => "boolean",
            FieldKind::Text => "text",
            FieldKind::Integer { .. } => "integer",
            FieldKind::Real { .. } => "real",
            FieldKind::DateTime => "date_time",
        }
    }
}

/// Definition of a form field, as supplied by the field metadata provider.
///
/// A recognizer is built once from this snapshot and never re-reads it.
///
/// # Examples
///
/// ```
/// use field_recognizer_core::{EnumValue, FieldKind, FieldSchema};
///
/// let field = FieldSchema::new(
///     "size",
///     FieldKind::enumeration(vec![EnumValue::new("Small"), EnumValue::new("Large")]),
/// )
/// .with_description("sandwich size")
/// .with_terms(["size", "how big"])
/// .optional();
///
/// assert!(field.optional);
/// assert!(field.nullable);
/// assert_eq!(field.description(), "sandwich size");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSchema {
    /// Field name
    pub name: String,
    /// Human-readable description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Terms identifying the field itself rather than one of its values
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub terms: Vec<String>,
    /// Whether the field may be left unset ("no preference")
    #[serde(default)]
    pub optional: bool,
    /// Whether the field's storage can represent absence
    #[serde(default = "default_true")]
    pub nullable: bool,
    /// What the field accepts
    pub kind: FieldKind,
}

impl FieldSchema {
    /// Creates a required, nullable field.
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            description: None,
            terms: Vec::new(),
            optional: false,
            nullable: true,
            kind,
        }
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the field-level terms.
    pub fn with_terms<I, S>(mut self, terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.terms = terms.into_iter().map(Into::into).collect();
        self
    }

    /// Marks the field optional.
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Sets whether the field can represent absence.
    pub fn with_nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    /// Returns the description, falling back to the field name.
    pub fn description(&self) -> &str {
        self.description.as_deref().unwrap_or(&self.name)
    }
}
