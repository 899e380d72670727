//! Recognizer for enumeration fields.
//!
//! An [`EnumerationMatcher`] owns one [`TermEntry`] per legal value plus
//! optional entries for "current choice", "no preference" and the field's
//! own name. Entries are built once, in ordinal order:
//!
//! 1. current choice (ordinal 0, shortcut `c`)
//! 2. each value in declaration order (ordinals 1..N)
//! 3. no preference (ordinal N+1), only for optional fields
//! 4. field disambiguation terms (no ordinal)
//!
//! Matching runs every entry's pattern over the input and yields candidates
//! lazily, entry by entry. Ranking is left to the caller.

use std::fmt;
use std::sync::Arc;

use field_recognizer_core::{EnumValue, FieldKind, FieldSchema, TermMatch, Value};
use tracing::debug;

use crate::RecognizerContext;
use crate::error::{RecognizerError, Result};
use crate::help::{HelpArg, TemplateRenderer, TemplateUsage, build_list};
use crate::pattern::{PatternBuilder, PatternHit, TermPattern};
use crate::phrases::PhraseConfig;

/// What a [`TermEntry`] stands for.
#[derive(Debug, Clone, PartialEq)]
pub enum EntryTag {
    /// A legal value of the field.
    Concrete(Value),
    /// "Keep the current value".
    CurrentChoice,
    /// "Leave the field unset".
    NoPreference,
    /// Terms naming the field itself.
    FieldDisambiguation,
}

/// One compiled pattern and the tag it resolves to.
#[derive(Debug, Clone)]
pub struct TermEntry {
    pub tag: EntryTag,
    pub ordinal: Option<usize>,
    pattern: TermPattern,
}

impl TermEntry {
    pub fn reference_length(&self) -> usize {
        self.pattern.reference_length()
    }
}

/// Recognizes which value(s) of an enumeration field the input refers to.
///
/// # Examples
///
/// ```
/// use field_recognizer::{EnumerationMatcher, RecognizerContext};
/// use field_recognizer_core::{EnumValue, FieldKind, FieldSchema, Value};
///
/// let field = FieldSchema::new(
///     "color",
///     FieldKind::enumeration(vec![
///         EnumValue::new("Red").with_terms(["red", "reddish"]),
///         EnumValue::new("Blue").with_terms(["blue"]),
///     ]),
/// );
/// let matcher = EnumerationMatcher::from_field(&field, &RecognizerContext::default()).unwrap();
///
/// let matches: Vec<_> = matcher.matches("blue please", None).collect();
/// assert_eq!(matches.len(), 1);
/// assert_eq!(matches[0].value, Some(Value::Choice("Blue".into())));
///
/// // Ordinal shortcut
/// let matches: Vec<_> = matcher.matches("1", None).collect();
/// assert_eq!(matches[0].value, Some(Value::Choice("Red".into())));
/// ```
pub struct EnumerationMatcher {
    field: String,
    values: Vec<EnumValue>,
    entries: Vec<TermEntry>,
    allow_numbers: bool,
    allow_multiple: bool,
    no_preference: bool,
    max_ordinal: usize,
    phrases: Arc<PhraseConfig>,
    renderer: Arc<dyn TemplateRenderer>,
}

impl fmt::Debug for EnumerationMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnumerationMatcher")
            .field("field", &self.field)
            .field("entries", &self.entries)
            .field("allow_numbers", &self.allow_numbers)
            .field("allow_multiple", &self.allow_multiple)
            .field("no_preference", &self.no_preference)
            .finish_non_exhaustive()
    }
}

impl EnumerationMatcher {
    /// Builds the matcher for an enumeration field.
    ///
    /// # Errors
    ///
    /// Returns [`RecognizerError::KindMismatch`] if `field` is not an
    /// enumeration, [`RecognizerError::EmptyEnumeration`] if it has no
    /// values, and [`RecognizerError::InvalidTerm`] if a surface term is not
    /// valid pattern syntax.
    pub fn from_field(field: &FieldSchema, context: &RecognizerContext) -> Result<Self> {
        let FieldKind::Enumeration {
            values,
            allow_numbers,
            allow_multiple,
        } = &field.kind
        else {
            return Err(RecognizerError::KindMismatch {
                field: field.name.clone(),
                expected: "an enumeration",
            });
        };
        if values.is_empty() {
            return Err(RecognizerError::EmptyEnumeration {
                field: field.name.clone(),
            });
        }

        let phrases = &context.phrases;
        let compile = |builder: PatternBuilder| {
            builder
                .build()
                .map_err(|source| RecognizerError::InvalidTerm {
                    field: field.name.clone(),
                    source,
                })
        };

        let mut entries = Vec::with_capacity(values.len() + 3);

        if !phrases.current_choice.is_empty() {
            entries.push(TermEntry {
                tag: EntryTag::CurrentChoice,
                ordinal: Some(0),
                pattern: compile(
                    PatternBuilder::literal(phrases.current_choice.iter().cloned())
                        .with_current_choice_shortcut(),
                )?,
            });
        }

        let mut ordinal = 0;
        for value in values {
            ordinal += 1;
            let mut builder = if value.has_literal_terms() {
                PatternBuilder::literal(value.surface_terms())
            } else {
                PatternBuilder::new(value.surface_terms())
            };
            if *allow_numbers {
                builder = builder.with_ordinal(ordinal);
            }
            entries.push(TermEntry {
                tag: EntryTag::Concrete(Value::Choice(value.value.clone())),
                ordinal: Some(ordinal),
                pattern: compile(builder)?,
            });
        }

        if field.optional {
            ordinal += 1;
            let mut builder = PatternBuilder::literal(phrases.no_preference.iter().cloned());
            if *allow_numbers {
                builder = builder.with_ordinal(ordinal);
            }
            entries.push(TermEntry {
                tag: EntryTag::NoPreference,
                ordinal: Some(ordinal),
                pattern: compile(builder)?,
            });
        }

        if !field.terms.is_empty() {
            entries.push(TermEntry {
                tag: EntryTag::FieldDisambiguation,
                ordinal: None,
                pattern: compile(PatternBuilder::new(field.terms.iter().cloned()))?,
            });
        }

        for entry in &entries {
            debug!(
                field = %field.name,
                tag = ?entry.tag,
                ordinal = ?entry.ordinal,
                reference_length = entry.reference_length(),
                "Built term entry"
            );
        }

        Ok(Self {
            field: field.name.clone(),
            values: values.clone(),
            entries,
            allow_numbers: *allow_numbers,
            allow_multiple: *allow_multiple,
            no_preference: field.optional,
            max_ordinal: ordinal,
            phrases: Arc::clone(&context.phrases),
            renderer: Arc::clone(&context.renderer),
        })
    }

    /// Field name.
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Entries in ordinal order.
    pub fn entries(&self) -> &[TermEntry] {
        &self.entries
    }

    /// Lazily yields candidate matches for `input`.
    ///
    /// Blank input with a default (or on an optional field) first yields a
    /// full-span match carrying `default`. Then every entry's hits follow
    /// in entry order. Field disambiguation terms never produce value
    /// matches; see [`field_mentions`](Self::field_mentions).
    pub fn matches<'a>(
        &'a self,
        input: &'a str,
        default: Option<&'a Value>,
    ) -> impl Iterator<Item = TermMatch> + 'a {
        let skipped = input.trim().is_empty() && (default.is_some() || self.no_preference);
        let blank = skipped.then(|| TermMatch::new(0, input.len(), 1.0, default.cloned()));

        let hits = self
            .entries
            .iter()
            .filter(|entry| entry.tag != EntryTag::FieldDisambiguation)
            .flat_map(move |entry| {
                entry
                    .pattern
                    .hits(input)
                    .filter_map(move |hit| self.resolve(entry, hit, default))
            });

        blank.into_iter().chain(hits).inspect(|m| {
            debug!(
                start = m.start,
                length = m.length,
                confidence = m.confidence,
                value = ?m.value,
                "Enumeration match"
            );
        })
    }

    /// Lazily yields spans where the input names the field itself.
    ///
    /// Matches carry no value; confidence follows the word length ratio.
    pub fn field_mentions<'a>(&'a self, input: &'a str) -> impl Iterator<Item = TermMatch> + 'a {
        self.entries
            .iter()
            .filter(|entry| entry.tag == EntryTag::FieldDisambiguation)
            .flat_map(move |entry| {
                entry
                    .pattern
                    .hits(input)
                    .map(|hit| TermMatch::new(hit.start, hit.length, hit.confidence, None))
            })
    }

    fn resolve(&self, entry: &TermEntry, hit: PatternHit, default: Option<&Value>) -> Option<TermMatch> {
        match &entry.tag {
            EntryTag::CurrentChoice => (default.is_some() || self.no_preference)
                .then(|| TermMatch::new(hit.start, hit.length, 1.0, default.cloned())),
            EntryTag::NoPreference => Some(TermMatch::new(hit.start, hit.length, 1.0, None)),
            EntryTag::Concrete(value) => Some(TermMatch::new(
                hit.start,
                hit.length,
                hit.confidence,
                Some(value.clone()),
            )),
            EntryTag::FieldDisambiguation => None,
        }
    }

    /// Legal values in declaration order.
    pub fn values(&self) -> Vec<Value> {
        self.values
            .iter()
            .map(|v| Value::Choice(v.value.clone()))
            .collect()
    }

    /// Description of one value, if it belongs to this field.
    pub fn value_description(&self, value: &Value) -> Option<String> {
        self.find(value).map(|v| v.description().to_string())
    }

    /// Descriptions of all values in declaration order.
    pub fn value_descriptions(&self) -> Vec<String> {
        self.values
            .iter()
            .map(|v| v.description().to_string())
            .collect()
    }

    /// Surface terms that select `value`.
    pub fn valid_inputs(&self, value: &Value) -> Vec<String> {
        self.find(value)
            .map(|v| v.surface_terms().into_iter().map(String::from).collect())
            .unwrap_or_default()
    }

    /// Ordinal range arguments for prompts: `[1, max]`, or missing when
    /// ordinal shortcuts are disabled.
    pub fn prompt_args(&self) -> Vec<HelpArg> {
        if self.allow_numbers {
            vec![HelpArg::Integer(1), HelpArg::Integer(self.max_ordinal as i64)]
        } else {
            vec![HelpArg::Missing, HelpArg::Missing]
        }
    }

    /// Template usage for help on this field.
    pub fn help_usage(&self) -> TemplateUsage {
        match (self.allow_numbers, self.allow_multiple) {
            (true, false) => TemplateUsage::EnumOneNumberHelp,
            (true, true) => TemplateUsage::EnumManyNumberHelp,
            (false, false) => TemplateUsage::EnumOneWordHelp,
            (false, true) => TemplateUsage::EnumManyWordHelp,
        }
    }

    /// Help arguments: `[min, max, choices]`.
    ///
    /// The choice list ends with the no-preference phrase for optional
    /// fields and the current-choice shortcut when a default exists.
    pub fn help_args(&self, default: Option<&Value>) -> Vec<HelpArg> {
        let mut descriptions = self.value_descriptions();
        let mut max = self.max_ordinal;
        if self.no_preference {
            descriptions.push(self.phrases.canonical_no_preference().to_string());
            if default.is_none() {
                max -= 1;
            }
        }
        if default.is_some() {
            descriptions.push(self.phrases.current_choice_shortcut());
        }

        let mut args = if self.allow_numbers {
            vec![HelpArg::Integer(1), HelpArg::Integer(max as i64)]
        } else {
            vec![HelpArg::Missing, HelpArg::Missing]
        };
        args.push(HelpArg::Text(build_list(
            &descriptions,
            &self.phrases.choice_separator,
            &self.phrases.choice_last_separator,
        )));
        args
    }

    /// Renders help through the configured template renderer.
    pub fn help(&self, default: Option<&Value>) -> String {
        self.renderer
            .render(self.help_usage(), &self.help_args(default))
    }

    fn find(&self, value: &Value) -> Option<&EnumValue> {
        let name = value.as_choice()?;
        self.values.iter().find(|v| v.value == name)
    }
}
