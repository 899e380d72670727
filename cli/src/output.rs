//! Rendering of match results for the terminal.

use field_recognizer_core::{TermMatch, Value};
use serde::Serialize;

/// Output format for match results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Json,
    Yaml,
    Table,
}

/// One candidate, with the matched slice of the input.
#[derive(Debug, Serialize)]
pub struct MatchRow {
    pub start: usize,
    pub length: usize,
    pub text: String,
    pub confidence: f64,
    /// Kind of `value`; absent for no preference and field mentions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<&'static str>,
    pub value: Option<Value>,
}

impl MatchRow {
    pub fn new(m: &TermMatch, input: &str) -> Self {
        Self {
            start: m.start,
            length: m.length,
            text: m.text(input).unwrap_or_default().to_string(),
            confidence: m.confidence,
            kind: m.value.as_ref().map(Value::kind_label),
            value: m.value.clone(),
        }
    }
}

/// Everything `match` reports for one input.
#[derive(Debug, Serialize)]
pub struct MatchReport {
    pub field: String,
    pub input: String,
    /// Candidates in production order
    pub matches: Vec<MatchRow>,
    /// Index into `matches` of the best candidate
    #[serde(skip_serializing_if = "Option::is_none")]
    pub best: Option<usize>,
    /// Spans naming the field itself
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub mentions: Vec<MatchRow>,
}

/// Formats a match report in the requested output format.
pub fn format_report(report: &MatchReport, format: OutputFormat) -> Result<String, String> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(report)
            .map_err(|e| format!("JSON serialization failed: {e}")),
        OutputFormat::Yaml => {
            serde_yaml::to_string(report).map_err(|e| format!("YAML serialization failed: {e}"))
        }
        OutputFormat::Table => Ok(report_to_table(report)),
    }
}

fn report_to_table(report: &MatchReport) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "Field: {}  Input: {:?}  Candidates: {}\n",
        report.field,
        report.input,
        report.matches.len()
    ));

    if report.matches.is_empty() {
        out.push_str("  (no match)\n");
    } else {
        let width = report
            .matches
            .iter()
            .map(|row| row.text.chars().count())
            .max()
            .unwrap_or(4)
            .max(4);

        out.push_str(&format!(
            "\n    {:>5} {:>5}  {:<width$}  {:>10}  {:<9}  VALUE\n",
            "START", "LEN", "TEXT", "CONFIDENCE", "KIND"
        ));
        for (index, row) in report.matches.iter().enumerate() {
            let marker = if report.best == Some(index) { '*' } else { ' ' };
            out.push_str(&format!(
                "  {marker} {:>5} {:>5}  {:<width$}  {:>9.0}%  {:<9}  {}\n",
                row.start,
                row.length,
                row.text,
                row.confidence * 100.0,
                row.kind.unwrap_or("-"),
                describe(row.value.as_ref()),
            ));
        }
    }

    if !report.mentions.is_empty() {
        out.push_str("\nField mentions:\n");
        for row in &report.mentions {
            out.push_str(&format!("  {:>5} {:>5}  {}\n", row.start, row.length, row.text));
        }
    }

    out
}

fn describe(value: Option<&Value>) -> String {
    match value {
        Some(value) => value.to_string(),
        None => "(no preference)".to_string(),
    }
}
