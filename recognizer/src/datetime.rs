//! Date/time phrase parser boundary.
//!
//! Natural-language date parsing is an external collaborator. Recognizers
//! call [`DateTimeParser::parse`] once per attempt and treat `None` as "no
//! match".

use chrono::{NaiveDate, NaiveDateTime};

/// Resolves a phrase to a point in time.
pub trait DateTimeParser: Send + Sync {
    fn parse(&self, text: &str) -> Option<NaiveDateTime>;
}

impl<F> DateTimeParser for F
where
    F: Fn(&str) -> Option<NaiveDateTime> + Send + Sync,
{
    fn parse(&self, text: &str) -> Option<NaiveDateTime> {
        self(text)
    }
}

/// Parser that tries a fixed list of chrono format strings.
///
/// Date-only formats resolve to midnight.
///
/// # Examples
///
/// ```
/// use field_recognizer::{DateTimeParser, FormatDateTimeParser};
///
/// let parser = FormatDateTimeParser::default();
/// let dt = parser.parse("2024-03-01 14:30").unwrap();
/// assert_eq!(dt.to_string(), "2024-03-01 14:30:00");
/// assert!(parser.parse("next tuesday").is_none());
/// ```
#[derive(Debug, Clone)]
pub struct FormatDateTimeParser {
    date_time_formats: Vec<String>,
    date_formats: Vec<String>,
}

impl Default for FormatDateTimeParser {
    fn default() -> Self {
        Self {
            date_time_formats: [
                "%Y-%m-%d %H:%M",
                "%Y-%m-%d %H:%M:%S",
                "%Y-%m-%dT%H:%M",
                "%Y-%m-%dT%H:%M:%S",
                "%m/%d/%Y %H:%M",
                "%m/%d/%Y %I:%M %p",
            ]
            .iter()
            .map(|f| f.to_string())
            .collect(),
            date_formats: ["%Y-%m-%d", "%m/%d/%Y", "%B %d, %Y", "%b %d, %Y", "%d %B %Y"]
                .iter()
                .map(|f| f.to_string())
                .collect(),
        }
    }
}

impl FormatDateTimeParser {
    /// Creates a parser from explicit format lists.
    pub fn new(date_time_formats: Vec<String>, date_formats: Vec<String>) -> Self {
        Self {
            date_time_formats,
            date_formats,
        }
    }
}

impl DateTimeParser for FormatDateTimeParser {
    fn parse(&self, text: &str) -> Option<NaiveDateTime> {
        let text = text.trim();
        self.date_time_formats
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
            .or_else(|| {
                self.date_formats.iter().find_map(|format| {
                    NaiveDate::parse_from_str(text, format)
                        .ok()
                        .and_then(|date| date.and_hms_opt(0, 0, 0))
                })
            })
    }
}
