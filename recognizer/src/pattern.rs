//! Compilation of surface terms into a single alternation pattern.
//!
//! Each logical value owns one [`TermPattern`]. Terms are split into
//! word-like terms, which must match on word boundaries, and symbolic terms
//! (emoji, punctuation), which match anywhere. The compiled pattern has the
//! shape
//!
//! ```text
//! (?i)(?P<tm_word>\b(?:longest)\b|…|\b(?:shortest)\b|\b(?P<tm_ordinal>3)\b)|(?P<tm_symbol>…)
//! ```
//!
//! Exactly one of `tm_word` / `tm_symbol` participates in a match. Named
//! groups keep author fragments that contain their own capturing groups from
//! shifting group numbers.
//!
//! Terms written by a field author are pattern fragments. Text generated
//! from value names, descriptions and phrase lists is [`TermSyntax::Literal`]:
//! it is escaped, always lands in the word group, and only gets a boundary
//! on a side that ends in a word character.

use std::sync::LazyLock;

use regex::{Captures, Regex};
use thiserror::Error;
use tracing::warn;

const WORD_GROUP: &str = "tm_word";
const ORDINAL_GROUP: &str = "tm_ordinal";
const SYMBOL_GROUP: &str = "tm_symbol";

/// Never matches: a position cannot be both a word boundary and not one.
pub const UNMATCHABLE: &str = r"\b\B";

static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("static regex must compile"));
static WORD_START: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:\w|\()").expect("static regex must compile"));
static WORD_END: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:\w|\)|[?*+]|\{\d+(?:,\d*)?\})$").expect("static regex must compile")
});

/// A surface term that is not valid pattern syntax.
#[derive(Debug, Error)]
#[error("invalid term {term:?}: {source}")]
pub struct TermError {
    /// The term as the author wrote it.
    pub term: String,
    #[source]
    pub source: regex::Error,
}

/// How a [`PatternBuilder`] reads its terms.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TermSyntax {
    /// Terms are pattern fragments.
    #[default]
    Pattern,
    /// Terms are plain text matched as written.
    Literal,
}

/// Shortcut appended to the word alternation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shortcut {
    /// 1-based ordinal typed as digits.
    Ordinal(usize),
    /// The literal `c`, meaning "keep the current choice".
    CurrentChoice,
}

/// Which part of a [`TermPattern`] produced a hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitKind {
    /// A word-like surface term.
    Word,
    /// The ordinal or `c` shortcut.
    Shortcut,
    /// A symbolic surface term.
    Symbol,
}

/// One occurrence of a [`TermPattern`] in the input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PatternHit {
    /// Byte offset of the hit
    pub start: usize,
    /// Length of the hit in bytes
    pub length: usize,
    /// Length-ratio confidence for word hits, 1.0 otherwise
    pub confidence: f64,
    pub kind: HitKind,
}

/// Builds a [`TermPattern`] from the surface terms of one logical value.
///
/// # Examples
///
/// ```
/// use field_recognizer::pattern::{HitKind, PatternBuilder};
///
/// let pattern = PatternBuilder::new(["red", "reddish"]).with_ordinal(2).build().unwrap();
/// let hits: Vec<_> = pattern.hits("reddish or 2").collect();
///
/// assert_eq!(hits.len(), 2);
/// assert_eq!((hits[0].start, hits[0].length), (0, 7));
/// assert_eq!(hits[0].confidence, 1.0);
/// assert_eq!(hits[1].kind, HitKind::Shortcut);
/// ```
#[derive(Debug, Clone, Default)]
pub struct PatternBuilder {
    terms: Vec<String>,
    syntax: TermSyntax,
    shortcut: Option<Shortcut>,
}

impl PatternBuilder {
    pub fn new<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            terms: terms.into_iter().map(Into::into).collect(),
            syntax: TermSyntax::Pattern,
            shortcut: None,
        }
    }

    /// Builder over plain-text terms.
    ///
    /// # Examples
    ///
    /// ```
    /// use field_recognizer::pattern::PatternBuilder;
    ///
    /// let pattern = PatternBuilder::literal(["C++"]).build().unwrap();
    /// assert_eq!(pattern.hits("c++").count(), 1);
    /// assert_eq!(pattern.hits("CCC").count(), 0);
    /// ```
    pub fn literal<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            syntax: TermSyntax::Literal,
            ..Self::new(terms)
        }
    }

    /// Appends the ordinal `n` as an alternative inside the word group.
    pub fn with_ordinal(mut self, n: usize) -> Self {
        self.shortcut = Some(Shortcut::Ordinal(n));
        self
    }

    /// Appends the literal `c` as an alternative inside the word group.
    pub fn with_current_choice_shortcut(mut self) -> Self {
        self.shortcut = Some(Shortcut::CurrentChoice);
        self
    }

    /// Compiles the alternation.
    ///
    /// # Errors
    ///
    /// Returns [`TermError`] naming the first term that is not valid
    /// pattern syntax.
    pub fn build(&self) -> Result<TermPattern, TermError> {
        let mut ordered: Vec<&str> = self.terms.iter().map(String::as_str).collect();
        ordered.sort_by_key(|term| std::cmp::Reverse(term.chars().count()));

        let reference_length = ordered
            .first()
            .map_or(0, |term| term.chars().count())
            .max(1);

        let mut words = Vec::new();
        let mut symbols = Vec::new();
        for term in &ordered {
            let (fragment, word) = self.fragment(term);
            if word {
                words.push(fragment);
            } else {
                symbols.push(fragment);
            }
        }

        match self.shortcut {
            Some(Shortcut::Ordinal(n)) => words.push(format!(r"\b(?P<{ORDINAL_GROUP}>{n})\b")),
            Some(Shortcut::CurrentChoice) => words.push(format!(r"\b(?P<{ORDINAL_GROUP}>c)\b")),
            None => {}
        }

        let word_body = if words.is_empty() {
            UNMATCHABLE.to_string()
        } else {
            words.join("|")
        };
        let symbol_body = if symbols.is_empty() {
            UNMATCHABLE.to_string()
        } else {
            symbols.join("|")
        };
        let source = format!(
            r"(?i)(?P<{WORD_GROUP}>{word_body})|(?P<{SYMBOL_GROUP}>{symbol_body})"
        );

        match Regex::new(&source) {
            Ok(regex) => Ok(TermPattern {
                regex,
                reference_length,
            }),
            Err(source) => Err(self.locate_error(source)),
        }
    }

    /// Alternative for one term and whether it belongs to the word group.
    fn fragment(&self, term: &str) -> (String, bool) {
        match self.syntax {
            TermSyntax::Literal => (literal_fragment(term), true),
            TermSyntax::Pattern => {
                let normalized = normalize_term(term);
                if is_word_like(&normalized) {
                    (format!(r"\b(?:{normalized})\b"), true)
                } else {
                    (format!("(?:{normalized})"), false)
                }
            }
        }
    }

    /// Finds the term responsible for a failed compilation.
    fn locate_error(&self, combined: regex::Error) -> TermError {
        for term in &self.terms {
            if let Err(source) = Regex::new(&self.fragment(term).0) {
                return TermError {
                    term: term.clone(),
                    source,
                };
            }
        }
        TermError {
            term: self.terms.join("|"),
            source: combined,
        }
    }
}

/// A compiled alternation plus the reference length used for confidence.
#[derive(Debug, Clone)]
pub struct TermPattern {
    regex: Regex,
    reference_length: usize,
}

impl TermPattern {
    /// Character length of the longest surface term (at least 1).
    pub fn reference_length(&self) -> usize {
        self.reference_length
    }

    /// Lazily yields every non-overlapping hit in `input`, left to right.
    pub fn hits<'a>(&'a self, input: &'a str) -> impl Iterator<Item = PatternHit> + 'a {
        self.regex
            .captures_iter(input)
            .filter_map(move |caps| self.classify(&caps))
    }

    fn classify(&self, caps: &Captures<'_>) -> Option<PatternHit> {
        if let Some(word) = caps.name(WORD_GROUP) {
            let (kind, confidence) = if caps.name(ORDINAL_GROUP).is_some() {
                (HitKind::Shortcut, 1.0)
            } else {
                let matched = word.as_str().chars().count() as f64;
                (
                    HitKind::Word,
                    (matched / self.reference_length as f64).min(1.0),
                )
            };
            return Some(PatternHit {
                start: word.start(),
                length: word.len(),
                confidence,
                kind,
            });
        }
        caps.name(SYMBOL_GROUP).map(|symbol| PatternHit {
            start: symbol.start(),
            length: symbol.len(),
            confidence: 1.0,
            kind: HitKind::Symbol,
        })
    }
}

/// Trims a term and lets internal whitespace runs match any whitespace.
///
/// An empty term becomes [`UNMATCHABLE`] so it can never match everything.
pub fn normalize_term(term: &str) -> String {
    let trimmed = term.trim();
    if trimmed.is_empty() {
        warn!("Empty surface term replaced with unmatchable placeholder");
        return UNMATCHABLE.to_string();
    }
    WHITESPACE_RUN
        .replace_all(trimmed, regex::NoExpand(r"\s+"))
        .into_owned()
}

/// Escapes plain text, with a boundary on each side that ends in a word
/// character.
pub fn literal_fragment(term: &str) -> String {
    let trimmed = term.trim();
    let normalized = normalize_term(&regex::escape(trimmed));
    if trimmed.is_empty() {
        return normalized;
    }
    let lead = if trimmed.starts_with(is_word_char) { r"\b" } else { "" };
    let trail = if trimmed.ends_with(is_word_char) { r"\b" } else { "" };
    format!("{lead}(?:{normalized}){trail}")
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Returns `true` if a normalized term must match on word boundaries.
pub fn is_word_like(normalized: &str) -> bool {
    WORD_START.is_match(normalized) && WORD_END.is_match(normalized)
}
