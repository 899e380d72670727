//! Recognizers for primitive fields: boolean, text, integer, real and
//! date/time.
//!
//! Every kind shares one wrapper around its parse rule. Input is trimmed
//! and lowercased for comparison only. A configured no-preference phrase
//! yields `None`; when a default exists (or the field is optional) blank
//! input, `c`, or a current-choice phrase yields the default. Anything else
//! is handed to the kind's parse rule.

use std::fmt;
use std::sync::Arc;

use field_recognizer_core::{FieldKind, FieldSchema, TermMatch, Value};
use tracing::debug;

use crate::RecognizerContext;
use crate::datetime::DateTimeParser;
use crate::error::{RecognizerError, Result};
use crate::help::{HelpArg, TemplateRenderer, TemplateUsage};
use crate::phrases::{PhraseConfig, normalized};

/// Parse rule of a primitive field.
#[derive(Clone)]
pub enum PrimitiveKind {
    /// Exact (case-insensitive) membership in the yes or no phrase sets.
    Boolean { yes: Vec<String>, no: Vec<String> },
    /// Any non-blank input, verbatim with surrounding whitespace, at
    /// confidence 0.0.
    Text,
    Integer {
        min: Option<i64>,
        max: Option<i64>,
        show_limits: bool,
    },
    Real {
        min: Option<f64>,
        max: Option<f64>,
        show_limits: bool,
    },
    /// Delegates to an external phrase parser.
    DateTime { parser: Arc<dyn DateTimeParser> },
}

impl fmt::Debug for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrimitiveKind::Boolean { yes, no } => f
                .debug_struct("Boolean")
                .field("yes", yes)
                .field("no", no)
                .finish(),
            PrimitiveKind::Text => f.write_str("Text"),
            PrimitiveKind::Integer {
                min,
                max,
                show_limits,
            } => f
                .debug_struct("Integer")
                .field("min", min)
                .field("max", max)
                .field("show_limits", show_limits)
                .finish(),
            PrimitiveKind::Real {
                min,
                max,
                show_limits,
            } => f
                .debug_struct("Real")
                .field("min", min)
                .field("max", max)
                .field("show_limits", show_limits)
                .finish(),
            PrimitiveKind::DateTime { .. } => f.debug_struct("DateTime").finish_non_exhaustive(),
        }
    }
}

impl PrimitiveKind {
    fn help_usage(&self) -> TemplateUsage {
        match self {
            PrimitiveKind::Boolean { .. } => TemplateUsage::BoolHelp,
            PrimitiveKind::Text => TemplateUsage::StringHelp,
            PrimitiveKind::Integer { .. } => TemplateUsage::IntegerHelp,
            PrimitiveKind::Real { .. } => TemplateUsage::RealHelp,
            PrimitiveKind::DateTime { .. } => TemplateUsage::DateTimeHelp,
        }
    }
}

/// Recognizer for a primitive field.
///
/// # Examples
///
/// ```
/// use field_recognizer::{PrimitiveMatcher, RecognizerContext};
/// use field_recognizer_core::{FieldKind, FieldSchema, Value};
///
/// let field = FieldSchema::new("guests", FieldKind::integer(Some(1), Some(8)));
/// let matcher = PrimitiveMatcher::from_field(&field, &RecognizerContext::default()).unwrap();
///
/// let found: Vec<_> = matcher.matches(" 4 ", None).collect();
/// assert_eq!(found[0].value, Some(Value::Integer(4)));
/// assert_eq!((found[0].start, found[0].length), (1, 1));
///
/// assert_eq!(matcher.matches("9", None).count(), 0);
/// ```
pub struct PrimitiveMatcher {
    field: String,
    kind: PrimitiveKind,
    optional: bool,
    no_preference: Vec<String>,
    current_choice: Vec<String>,
    phrases: Arc<PhraseConfig>,
    renderer: Arc<dyn TemplateRenderer>,
}

impl fmt::Debug for PrimitiveMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrimitiveMatcher")
            .field("field", &self.field)
            .field("kind", &self.kind)
            .field("optional", &self.optional)
            .finish_non_exhaustive()
    }
}

impl PrimitiveMatcher {
    /// Builds the matcher for a primitive field.
    ///
    /// # Errors
    ///
    /// Returns [`RecognizerError::NotNullable`] for an optional field that
    /// cannot represent absence, and [`RecognizerError::KindMismatch`] for
    /// an enumeration field.
    pub fn from_field(field: &FieldSchema, context: &RecognizerContext) -> Result<Self> {
        if field.optional && !field.nullable {
            return Err(RecognizerError::NotNullable {
                field: field.name.clone(),
            });
        }

        let phrases = &context.phrases;
        let kind = match &field.kind {
            FieldKind::Enumeration { .. } => {
                return Err(RecognizerError::KindMismatch {
                    field: field.name.clone(),
                    expected: "a primitive",
                });
            }
            FieldKind::Boolean => PrimitiveKind::Boolean {
                yes: normalized(&phrases.yes),
                no: normalized(&phrases.no),
            },
            FieldKind::Text => PrimitiveKind::Text,
            FieldKind::Integer {
                min,
                max,
                show_limits,
            } => PrimitiveKind::Integer {
                min: *min,
                max: *max,
                show_limits: *show_limits,
            },
            FieldKind::Real {
                min,
                max,
                show_limits,
            } => PrimitiveKind::Real {
                min: *min,
                max: *max,
                show_limits: *show_limits,
            },
            FieldKind::DateTime => PrimitiveKind::DateTime {
                parser: Arc::clone(&context.date_time_parser),
            },
        };
        debug!(field = %field.name, kind = ?kind, optional = field.optional, "Built primitive matcher");

        Ok(Self {
            field: field.name.clone(),
            kind,
            optional: field.optional,
            no_preference: if field.optional {
                normalized(&phrases.no_preference)
            } else {
                Vec::new()
            },
            current_choice: normalized(&phrases.current_choice),
            phrases: Arc::clone(phrases),
            renderer: Arc::clone(&context.renderer),
        })
    }

    /// Field name.
    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn kind(&self) -> &PrimitiveKind {
        &self.kind
    }

    /// Lazily yields at most one candidate for `input`.
    ///
    /// The span covers the trimmed input, except for text fields, whose
    /// value and span are the input exactly as typed. Blank input yields a
    /// span over the whole input.
    pub fn matches<'a>(
        &'a self,
        input: &'a str,
        default: Option<&'a Value>,
    ) -> impl Iterator<Item = TermMatch> + 'a {
        std::iter::once_with(move || self.match_input(input, default)).flatten()
    }

    fn match_input(&self, input: &str, default: Option<&Value>) -> Option<TermMatch> {
        let trimmed = input.trim();
        let offset = input.len() - input.trim_start().len();
        let (start, length) = if trimmed.is_empty() {
            (0, input.len())
        } else {
            (offset, trimmed.len())
        };
        let key = trimmed.to_lowercase();

        let found = if self.no_preference.contains(&key) {
            Some(TermMatch::new(start, length, 1.0, None))
        } else if (default.is_some() || self.optional)
            && (key.is_empty() || key == "c" || self.current_choice.contains(&key))
        {
            Some(TermMatch::new(start, length, 1.0, default.cloned()))
        } else {
            // Text keeps the input as typed; other kinds parse the trimmed slice.
            let (text, shift) = match self.kind {
                PrimitiveKind::Text => (input, 0),
                _ => (trimmed, offset),
            };
            self.parse(text).map(|m| TermMatch {
                start: m.start + shift,
                ..m
            })
        };

        if let Some(m) = &found {
            debug!(field = %self.field, confidence = m.confidence, value = ?m.value, "Primitive match");
        }
        found
    }

    /// Applies the kind's parse rule to `input` alone, without shortcuts.
    ///
    /// The returned span is relative to `input` and covers all of it.
    pub fn parse(&self, input: &str) -> Option<TermMatch> {
        let whole = |confidence: f64, value: Value| {
            Some(TermMatch::new(0, input.len(), confidence, Some(value)))
        };
        let number = &self.phrases.number;

        match &self.kind {
            PrimitiveKind::Boolean { yes, no } => {
                let key = input.trim().to_lowercase();
                if yes.contains(&key) {
                    whole(1.0, Value::Bool(true))
                } else if no.contains(&key) {
                    whole(1.0, Value::Bool(false))
                } else {
                    None
                }
            }
            PrimitiveKind::Text => {
                if input.trim().is_empty() {
                    None
                } else {
                    whole(0.0, Value::Text(input.to_string()))
                }
            }
            PrimitiveKind::Integer { min, max, .. } => {
                let n = number.parse_integer(input.trim())?;
                if min.is_some_and(|min| n < min) || max.is_some_and(|max| n > max) {
                    return None;
                }
                whole(1.0, Value::Integer(n))
            }
            PrimitiveKind::Real { min, max, .. } => {
                let x = number.parse_real(input.trim())?;
                if min.is_some_and(|min| x < min) || max.is_some_and(|max| x > max) {
                    return None;
                }
                whole(1.0, Value::Real(x))
            }
            PrimitiveKind::DateTime { parser } => {
                let when = parser.parse(input)?;
                whole(1.0, Value::DateTime(when))
            }
        }
    }

    /// Human-readable form of `value` for this field.
    pub fn value_description(&self, value: &Value) -> Option<String> {
        match (&self.kind, value) {
            (PrimitiveKind::Boolean { .. }, Value::Bool(true)) => {
                Some(self.phrases.canonical_yes().to_string())
            }
            (PrimitiveKind::Boolean { .. }, Value::Bool(false)) => {
                Some(self.phrases.canonical_no().to_string())
            }
            (PrimitiveKind::Text, Value::Text(text)) => Some(text.clone()),
            (PrimitiveKind::Integer { .. }, Value::Integer(n)) => Some(n.to_string()),
            (PrimitiveKind::Real { .. }, Value::Real(x)) => Some(self.phrases.number.format_real(*x)),
            (PrimitiveKind::DateTime { .. }, Value::DateTime(when)) => {
                Some(when.format(&self.phrases.date_time_format).to_string())
            }
            _ => None,
        }
    }

    /// Phrases accepted for `value`; only booleans have a closed set.
    pub fn valid_inputs(&self, value: &Value) -> Vec<String> {
        match (&self.kind, value) {
            (PrimitiveKind::Boolean { .. }, Value::Bool(true)) => self.phrases.yes.clone(),
            (PrimitiveKind::Boolean { .. }, Value::Bool(false)) => self.phrases.no.clone(),
            _ => Vec::new(),
        }
    }

    /// Template usage for help on this field.
    pub fn help_usage(&self) -> TemplateUsage {
        self.kind.help_usage()
    }

    /// Help arguments: `[current_choice, no_preference, min, max]`.
    ///
    /// Bounds are present only for numeric kinds configured to show them.
    pub fn help_args(&self, default: Option<&Value>) -> Vec<HelpArg> {
        let mut args = Vec::with_capacity(4);
        if default.is_some() || self.optional {
            args.push(HelpArg::Text(self.phrases.current_choice_shortcut()));
        } else {
            args.push(HelpArg::Missing);
        }
        if self.optional {
            args.push(HelpArg::Text(
                self.phrases.canonical_no_preference().to_string(),
            ));
        } else {
            args.push(HelpArg::Missing);
        }

        match &self.kind {
            PrimitiveKind::Integer {
                min,
                max,
                show_limits: true,
            } => {
                args.push(min.map_or(HelpArg::Missing, HelpArg::Integer));
                args.push(max.map_or(HelpArg::Missing, HelpArg::Integer));
            }
            PrimitiveKind::Real {
                min,
                max,
                show_limits: true,
            } => {
                args.push(min.map_or(HelpArg::Missing, HelpArg::Real));
                args.push(max.map_or(HelpArg::Missing, HelpArg::Real));
            }
            _ => {
                args.push(HelpArg::Missing);
                args.push(HelpArg::Missing);
            }
        }
        args
    }

    /// Renders help through the configured template renderer.
    pub fn help(&self, default: Option<&Value>) -> String {
        self.renderer
            .render(self.help_usage(), &self.help_args(default))
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveDateTime};

    use super::*;

    fn matcher(field: FieldSchema) -> PrimitiveMatcher {
        PrimitiveMatcher::from_field(&field, &RecognizerContext::default()).unwrap()
    }

    fn first(m: &PrimitiveMatcher, input: &str, default: Option<&Value>) -> Option<TermMatch> {
        m.matches(input, default).next()
    }

    #[test]
    fn test_optional_not_nullable_rejected() {
        let field = FieldSchema::new("age", FieldKind::integer(None, None))
            .optional()
            .with_nullable(false);
        let err = PrimitiveMatcher::from_field(&field, &RecognizerContext::default()).unwrap_err();
        assert!(matches!(err, RecognizerError::NotNullable { ref field } if field == "age"));
    }

    #[test]
    fn test_required_not_nullable_allowed() {
        let field = FieldSchema::new("age", FieldKind::integer(None, None)).with_nullable(false);
        assert!(PrimitiveMatcher::from_field(&field, &RecognizerContext::default()).is_ok());
    }

    #[test]
    fn test_boolean_phrases() {
        let m = matcher(FieldSchema::new("toasted", FieldKind::Boolean));
        assert_eq!(first(&m, "Y", None).unwrap().value, Some(Value::Bool(true)));
        assert_eq!(first(&m, " Nope ", None).unwrap().value, Some(Value::Bool(false)));
        assert!(first(&m, "maybe", None).is_none());
    }

    #[test]
    fn test_text_confidence_is_zero() {
        let m = matcher(FieldSchema::new("name", FieldKind::Text));
        let found = first(&m, "Ada Lovelace", None).unwrap();
        assert_eq!(found.confidence, 0.0);
        assert_eq!((found.start, found.length), (0, 12));
        assert!(first(&m, "   ", None).is_none());
    }

    #[test]
    fn test_text_is_verbatim() {
        let m = matcher(FieldSchema::new("name", FieldKind::Text));
        let input = "  Ada  Lovelace \t";
        let found = first(&m, input, None).unwrap();
        assert_eq!(found.value, Some(Value::Text(input.into())));
        assert_eq!((found.start, found.length), (0, input.len()));
        assert_eq!(found.text(input), Some(input));

        // Shortcuts still compare the trimmed input.
        let default = Value::Text("Bob".into());
        let found = first(&m, "  c ", Some(&default)).unwrap();
        assert_eq!(found.value, Some(default));
        assert_eq!((found.start, found.length), (2, 1));
    }

    #[test]
    fn test_text_keeps_casing() {
        let m = matcher(FieldSchema::new("name", FieldKind::Text));
        let found = first(&m, "McDonald", None).unwrap();
        assert_eq!(found.value, Some(Value::Text("McDonald".into())));
    }

    #[test]
    fn test_integer_bounds_inclusive() {
        let m = matcher(FieldSchema::new("n", FieldKind::integer(Some(1), Some(10))));
        assert!(first(&m, "1", None).is_some());
        assert!(first(&m, "10", None).is_some());
        assert!(first(&m, "0", None).is_none());
        assert!(first(&m, "11", None).is_none());
        assert!(first(&m, "ten", None).is_none());
        assert!(first(&m, "2.5", None).is_none());
    }

    #[test]
    fn test_integer_group_separator() {
        let m = matcher(FieldSchema::new("n", FieldKind::integer(None, None)));
        assert_eq!(
            first(&m, "1,250", None).unwrap().value,
            Some(Value::Integer(1250))
        );
    }

    #[test]
    fn test_real_bounds_inclusive() {
        let m = matcher(FieldSchema::new("w", FieldKind::real(Some(0.5), Some(2.5))));
        assert_eq!(first(&m, "0.5", None).unwrap().value, Some(Value::Real(0.5)));
        assert_eq!(first(&m, "2.5", None).unwrap().value, Some(Value::Real(2.5)));
        assert!(first(&m, "0.49", None).is_none());
        assert!(first(&m, "2.51", None).is_none());
        assert!(first(&m, "inf", None).is_none());
    }

    #[test]
    fn test_date_time_delegates_to_parser() {
        let m = matcher(FieldSchema::new("when", FieldKind::DateTime));
        let expected = NaiveDate::from_ymd_opt(2025, 5, 17)
            .and_then(|d| d.and_hms_opt(18, 30, 0))
            .unwrap();
        assert_eq!(
            first(&m, "2025-05-17 18:30", None).unwrap().value,
            Some(Value::DateTime(expected))
        );
        assert!(first(&m, "someday", None).is_none());
    }

    #[test]
    fn test_date_time_custom_parser() {
        let fixed: NaiveDateTime = NaiveDate::from_ymd_opt(2026, 1, 1)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .unwrap();
        let context = RecognizerContext::default()
            .with_date_time_parser(move |text: &str| (text == "new year").then_some(fixed));
        let field = FieldSchema::new("when", FieldKind::DateTime);
        let m = PrimitiveMatcher::from_field(&field, &context).unwrap();
        assert_eq!(
            first(&m, "new year", None).unwrap().value,
            Some(Value::DateTime(fixed))
        );
    }

    #[test]
    fn test_no_preference_only_on_optional() {
        let required = matcher(FieldSchema::new("name", FieldKind::Text));
        let found = first(&required, "none", None).unwrap();
        assert_eq!(found.value, Some(Value::Text("none".into())));

        let optional = matcher(FieldSchema::new("name", FieldKind::Text).optional());
        let default = Value::Text("Bob".into());
        let found = first(&optional, "No Preference", Some(&default)).unwrap();
        assert_eq!(found.value, None);
        assert_eq!(found.confidence, 1.0);
    }

    #[test]
    fn test_current_choice_shortcuts() {
        let m = matcher(FieldSchema::new("n", FieldKind::integer(None, None)));
        let default = Value::Integer(7);
        for input in ["", "  ", "c", "C", "current", "Current Choice"] {
            let found = first(&m, input, Some(&default)).unwrap();
            assert_eq!(found.value, Some(Value::Integer(7)), "input {input:?}");
            assert_eq!(found.confidence, 1.0);
        }
        assert!(first(&m, "c", None).is_none());
        assert!(first(&m, "", None).is_none());
    }

    #[test]
    fn test_blank_span_covers_input() {
        let m = matcher(FieldSchema::new("n", FieldKind::integer(None, None)));
        let default = Value::Integer(7);
        let found = first(&m, "   ", Some(&default)).unwrap();
        assert_eq!((found.start, found.length), (0, 3));
    }

    #[test]
    fn test_optional_blank_without_default_is_no_preference_default() {
        let m = matcher(FieldSchema::new("flag", FieldKind::Boolean).optional());
        let found = first(&m, "", None).unwrap();
        assert_eq!(found.value, None);
    }

    #[test]
    fn test_help_args_and_rendering() {
        let field = FieldSchema::new(
            "n",
            FieldKind::Integer {
                min: Some(1),
                max: Some(5),
                show_limits: true,
            },
        )
        .optional();
        let m = matcher(field);
        assert_eq!(
            m.help_args(None),
            vec![
                HelpArg::Text("Current Choice or 'c'".into()),
                HelpArg::Text("No Preference".into()),
                HelpArg::Integer(1),
                HelpArg::Integer(5),
            ]
        );
        assert_eq!(
            m.help(None),
            "You can enter a number from 1 up to 5, Current Choice or 'c' to keep the current value, No Preference to leave it unset."
        );
    }

    #[test]
    fn test_hidden_limits_not_in_help() {
        let m = matcher(FieldSchema::new("n", FieldKind::integer(Some(1), Some(5))));
        assert_eq!(m.help(None), "You can enter a number.");
    }

    #[test]
    fn test_value_descriptions() {
        let m = matcher(FieldSchema::new("toasted", FieldKind::Boolean));
        assert_eq!(m.value_description(&Value::Bool(true)), Some("yes".into()));
        assert_eq!(m.value_description(&Value::Integer(1)), None);
        assert_eq!(m.valid_inputs(&Value::Bool(false))[0], "no");
    }
}
