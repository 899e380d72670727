//! Process-wide phrase configuration for recognizers.
//!
//! Defines the YAML-serializable phrase sets ("yes", "no", "no preference",
//! "current choice"), list separators, number and date formatting, and help
//! template overrides. The first phrase of each list is the canonical display
//! phrase.
//!
//! # Example YAML
//!
//! ```yaml
//! yes: [yes, y, sure, ok]
//! no: [no, n, nope]
//! no_preference: [No Preference, none, I don't care]
//! current_choice: [Current Choice, current]
//! choice_separator: ", "
//! choice_last_separator: " or "
//! date_time_format: "%Y-%m-%d %H:%M"
//! number:
//!   decimal_separator: "."
//!   group_separator: ","
//! templates:
//!   bool_help: "Answer yes or no{{#if current}}, {{current}}{{/if}}."
//! ```

use std::collections::BTreeMap;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::help::TemplateUsage;

/// Culture-specific number formatting.
///
/// # Examples
///
/// ```
/// use field_recognizer::NumberFormat;
///
/// let german = NumberFormat { decimal_separator: ',', group_separator: Some('.') };
/// assert_eq!(german.parse_real("1.234,5"), Some(1234.5));
/// assert_eq!(german.parse_integer("1.000"), Some(1000));
/// assert_eq!(german.format_real(2.5), "2,5");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NumberFormat {
    /// Separator between integer and fractional digits.
    pub decimal_separator: char,
    /// Thousands separator, ignored when parsing.
    pub group_separator: Option<char>,
}

impl Default for NumberFormat {
    fn default() -> Self {
        Self {
            decimal_separator: '.',
            group_separator: Some(','),
        }
    }
}

impl NumberFormat {
    /// Parses a whole number, ignoring group separators.
    pub fn parse_integer(&self, text: &str) -> Option<i64> {
        self.strip_groups(text).parse().ok()
    }

    /// Parses a finite floating-point number.
    pub fn parse_real(&self, text: &str) -> Option<f64> {
        let mut normalized = self.strip_groups(text);
        if self.decimal_separator != '.' {
            normalized = normalized.replace(self.decimal_separator, ".");
        }
        normalized.parse::<f64>().ok().filter(|x| x.is_finite())
    }

    /// Formats a real with the configured decimal separator.
    pub fn format_real(&self, value: f64) -> String {
        let text = value.to_string();
        if self.decimal_separator == '.' {
            text
        } else {
            text.replace('.', &self.decimal_separator.to_string())
        }
    }

    fn strip_groups(&self, text: &str) -> String {
        match self.group_separator {
            Some(sep) if sep != self.decimal_separator => text.replace(sep, ""),
            _ => text.to_string(),
        }
    }
}

/// Phrase sets, separators and templates shared by every recognizer.
///
/// Missing keys in a YAML file fall back to the English defaults.
///
/// # Examples
///
/// ```
/// use field_recognizer::PhraseConfig;
///
/// let phrases = PhraseConfig::default();
/// assert_eq!(phrases.canonical_no_preference(), "No Preference");
/// assert!(phrases.yes.iter().any(|p| p == "y"));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PhraseConfig {
    /// Phrases meaning "yes".
    pub yes: Vec<String>,
    /// Phrases meaning "no".
    pub no: Vec<String>,
    /// Phrases meaning "leave this field unset".
    pub no_preference: Vec<String>,
    /// Phrases meaning "keep the current value".
    pub current_choice: Vec<String>,
    /// Separator between listed choices.
    pub choice_separator: String,
    /// Separator before the last listed choice.
    pub choice_last_separator: String,
    /// chrono format used to describe date/time values.
    pub date_time_format: String,
    /// Number parsing and display.
    pub number: NumberFormat,
    /// Handlebars help template overrides, keyed by usage.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub templates: BTreeMap<TemplateUsage, String>,
}

impl Default for PhraseConfig {
    fn default() -> Self {
        Self {
            yes: to_strings(&["yes", "y", "sure", "ok", "yep", "yeah"]),
            no: to_strings(&["no", "n", "nope", "nah"]),
            no_preference: to_strings(&["No Preference", "none", "I don't care"]),
            current_choice: to_strings(&["Current Choice", "current"]),
            choice_separator: ", ".to_string(),
            choice_last_separator: " or ".to_string(),
            date_time_format: "%Y-%m-%d %H:%M".to_string(),
            number: NumberFormat::default(),
            templates: BTreeMap::new(),
        }
    }
}

impl PhraseConfig {
    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`IoError`](crate::RecognizerError::IoError) if the file cannot
    /// be read, or [`YamlError`](crate::RecognizerError::YamlError) if
    /// parsing fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let reader = BufReader::new(file);
        let config = serde_yaml::from_reader(reader)?;
        Ok(config)
    }

    /// Saves the configuration as YAML.
    ///
    /// # Errors
    ///
    /// Returns [`IoError`](crate::RecognizerError::IoError) if the file cannot
    /// be written, or [`YamlError`](crate::RecognizerError::YamlError) if
    /// serialization fails.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = BufWriter::new(file);
        serde_yaml::to_writer(writer, self)?;
        Ok(())
    }

    pub fn canonical_yes(&self) -> &str {
        first_or(&self.yes, "yes")
    }

    pub fn canonical_no(&self) -> &str {
        first_or(&self.no, "no")
    }

    pub fn canonical_no_preference(&self) -> &str {
        first_or(&self.no_preference, "No Preference")
    }

    pub fn canonical_current_choice(&self) -> &str {
        first_or(&self.current_choice, "Current Choice")
    }

    /// Display form of the current-choice shortcut, e.g. `Current Choice or 'c'`.
    pub fn current_choice_shortcut(&self) -> String {
        format!("{} or 'c'", self.canonical_current_choice())
    }
}

/// Lowercased, trimmed copies of `phrases` for exact comparison.
pub(crate) fn normalized(phrases: &[String]) -> Vec<String> {
    phrases
        .iter()
        .map(|p| p.trim().to_lowercase())
        .filter(|p| !p.is_empty())
        .collect()
}

fn first_or<'a>(phrases: &'a [String], fallback: &'a str) -> &'a str {
    phrases.first().map_or(fallback, String::as_str)
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
