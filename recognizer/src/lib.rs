//! Term matching and confidence scoring for free-text form field answers.
//!
//! Given a field with a closed set of legal values (an enumeration) or a
//! primitive type (boolean, text, integer, real, date/time), a recognizer
//! decides from raw user text which value(s) were meant, with what
//! confidence, and whether the user instead asked for "no preference" or to
//! keep the current choice.
//!
//! # Main entry points
//!
//! - [`build_recognizer`]: build a [`Recognizer`] for a
//!   [`FieldSchema`](field_recognizer_core::FieldSchema).
//! - [`Recognizer::matches`]: lazily produce candidate
//!   [`TermMatch`](field_recognizer_core::TermMatch)es for an input.
//! - [`Recognizer::help`]: render help text through a [`TemplateRenderer`].
//!
//! # Example
//!
//! ```
//! use field_recognizer::{RecognizerContext, build_recognizer};
//! use field_recognizer_core::{EnumValue, FieldKind, FieldSchema, Value, best_match};
//!
//! let field = FieldSchema::new(
//!     "bread",
//!     FieldKind::enumeration(vec![
//!         EnumValue::new("Wheat").with_terms(["wheat", "whole wheat"]),
//!         EnumValue::new("Rye").with_terms(["rye"]),
//!     ]),
//! )
//! .optional();
//!
//! let recognizer = build_recognizer(&field, &RecognizerContext::default()).unwrap();
//!
//! let best = best_match(recognizer.matches("whole wheat please", None)).unwrap();
//! assert_eq!(best.value, Some(Value::Choice("Wheat".into())));
//! assert_eq!(best.confidence, 1.0);
//!
//! let best = best_match(recognizer.matches("I don't care", None)).unwrap();
//! assert_eq!(best.value, None);
//! ```
//!
//! Matching never fails: unrecognized input simply yields no candidates.
//! Only construction can fail, with a [`RecognizerError`].

pub mod datetime;
pub mod enumeration;
pub mod error;
pub mod field_file;
pub mod help;
pub mod pattern;
pub mod phrases;
pub mod primitive;

use std::sync::Arc;

use field_recognizer_core::{FieldSchema, TermMatch, Value, ValidationError, validate_field};

pub use datetime::{DateTimeParser, FormatDateTimeParser};
pub use enumeration::{EntryTag, EnumerationMatcher, TermEntry};
pub use error::{RecognizerError, Result};
pub use field_file::{load_field, save_field};
pub use help::{HandlebarsRenderer, HelpArg, TemplateRenderer, TemplateUsage, build_list};
pub use pattern::{PatternBuilder, TermPattern};
pub use phrases::{NumberFormat, PhraseConfig};
pub use primitive::{PrimitiveKind, PrimitiveMatcher};

/// External collaborators and configuration shared by recognizers.
///
/// The default context uses English phrases, a [`HandlebarsRenderer`] with
/// the built-in templates and a [`FormatDateTimeParser`].
#[derive(Clone)]
pub struct RecognizerContext {
    pub phrases: Arc<PhraseConfig>,
    pub renderer: Arc<dyn TemplateRenderer>,
    pub date_time_parser: Arc<dyn DateTimeParser>,
}

impl std::fmt::Debug for RecognizerContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecognizerContext")
            .field("phrases", &self.phrases)
            .finish_non_exhaustive()
    }
}

impl Default for RecognizerContext {
    fn default() -> Self {
        Self {
            phrases: Arc::new(PhraseConfig::default()),
            renderer: Arc::new(HandlebarsRenderer::default()),
            date_time_parser: Arc::new(FormatDateTimeParser::default()),
        }
    }
}

impl RecognizerContext {
    /// Context over `phrases`, rendering with its template overrides.
    ///
    /// # Errors
    ///
    /// Returns [`RecognizerError::InvalidTemplate`] if an override in
    /// `phrases.templates` does not compile.
    pub fn new(phrases: PhraseConfig) -> Result<Self> {
        let renderer = HandlebarsRenderer::new(&phrases.templates)?;
        Ok(Self {
            phrases: Arc::new(phrases),
            renderer: Arc::new(renderer),
            date_time_parser: Arc::new(FormatDateTimeParser::default()),
        })
    }

    /// Replaces the template renderer.
    pub fn with_renderer(mut self, renderer: impl TemplateRenderer + 'static) -> Self {
        self.renderer = Arc::new(renderer);
        self
    }

    /// Replaces the date/time phrase parser.
    pub fn with_date_time_parser(mut self, parser: impl DateTimeParser + 'static) -> Self {
        self.date_time_parser = Arc::new(parser);
        self
    }
}

/// A recognizer for one field.
#[derive(Debug)]
pub enum Recognizer {
    Enumeration(EnumerationMatcher),
    Primitive(PrimitiveMatcher),
}

/// Builds the recognizer for `field`.
///
/// The field is validated first.
///
/// # Errors
///
/// - [`RecognizerError::NotNullable`] for an optional primitive field that
///   cannot represent absence.
/// - [`RecognizerError::EmptyEnumeration`] for an enumeration without values.
/// - [`RecognizerError::InvalidTerm`] when a surface term is not valid
///   pattern syntax.
/// - [`RecognizerError::InvalidField`] for any other validation error.
pub fn build_recognizer(field: &FieldSchema, context: &RecognizerContext) -> Result<Recognizer> {
    if let Some(error) = validate_field(field).into_iter().next() {
        return Err(match error {
            ValidationError::OptionalNotNullable(field) => RecognizerError::NotNullable { field },
            ValidationError::EmptyEnumeration(field) => RecognizerError::EmptyEnumeration { field },
            other => RecognizerError::InvalidField(other),
        });
    }

    if field.kind.is_primitive() {
        PrimitiveMatcher::from_field(field, context).map(Recognizer::Primitive)
    } else {
        EnumerationMatcher::from_field(field, context).map(Recognizer::Enumeration)
    }
}

impl Recognizer {
    /// Field name.
    pub fn field(&self) -> &str {
        match self {
            Recognizer::Enumeration(m) => m.field(),
            Recognizer::Primitive(m) => m.field(),
        }
    }

    /// Lazily yields candidate matches for `input`, given the field's
    /// current value as `default`.
    pub fn matches<'a>(
        &'a self,
        input: &'a str,
        default: Option<&'a Value>,
    ) -> Box<dyn Iterator<Item = TermMatch> + 'a> {
        match self {
            Recognizer::Enumeration(m) => Box::new(m.matches(input, default)),
            Recognizer::Primitive(m) => Box::new(m.matches(input, default)),
        }
    }

    /// Rendered help text.
    pub fn help(&self, default: Option<&Value>) -> String {
        match self {
            Recognizer::Enumeration(m) => m.help(default),
            Recognizer::Primitive(m) => m.help(default),
        }
    }

    /// Help template usage.
    pub fn help_usage(&self) -> TemplateUsage {
        match self {
            Recognizer::Enumeration(m) => m.help_usage(),
            Recognizer::Primitive(m) => m.help_usage(),
        }
    }

    /// Help arguments handed to the renderer.
    pub fn help_args(&self, default: Option<&Value>) -> Vec<HelpArg> {
        match self {
            Recognizer::Enumeration(m) => m.help_args(default),
            Recognizer::Primitive(m) => m.help_args(default),
        }
    }

    /// Arguments for the field's prompt; ordinal range for enumerations.
    pub fn prompt_args(&self) -> Vec<HelpArg> {
        match self {
            Recognizer::Enumeration(m) => m.prompt_args(),
            Recognizer::Primitive(_) => Vec::new(),
        }
    }

    /// Legal values; empty for primitive fields.
    pub fn values(&self) -> Vec<Value> {
        match self {
            Recognizer::Enumeration(m) => m.values(),
            Recognizer::Primitive(_) => Vec::new(),
        }
    }

    pub fn value_description(&self, value: &Value) -> Option<String> {
        match self {
            Recognizer::Enumeration(m) => m.value_description(value),
            Recognizer::Primitive(m) => m.value_description(value),
        }
    }

    /// Descriptions of all legal values; empty for primitive fields.
    pub fn value_descriptions(&self) -> Vec<String> {
        match self {
            Recognizer::Enumeration(m) => m.value_descriptions(),
            Recognizer::Primitive(_) => Vec::new(),
        }
    }

    /// Phrases that select `value`.
    pub fn valid_inputs(&self, value: &Value) -> Vec<String> {
        match self {
            Recognizer::Enumeration(m) => m.valid_inputs(value),
            Recognizer::Primitive(m) => m.valid_inputs(value),
        }
    }

    /// Spans naming the field itself; only enumerations carry field terms.
    pub fn field_mentions(&self, input: &str) -> Vec<TermMatch> {
        match self {
            Recognizer::Enumeration(m) => m.field_mentions(input).collect(),
            Recognizer::Primitive(_) => Vec::new(),
        }
    }
}
