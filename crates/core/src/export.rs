//! Inbox export formats.

use std::str::FromStr;

use uuid::Uuid;

use crate::error::CoreError;
use crate::types::Timestamp;

/// Download filename for CSV exports.
pub const CSV_FILENAME: &str = "saythanks-inbox.csv";

/// Content type for CSV exports.
pub const CSV_CONTENT_TYPE: &str = "text/csv; charset=utf-8";

/// Column header row for CSV exports.
pub const CSV_HEADER: &str = "id,body,byline,archived,created_at";

/// Supported export formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
}

impl ExportFormat {
    pub fn filename(self) -> &'static str {
        match self {
            ExportFormat::Csv => CSV_FILENAME,
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            ExportFormat::Csv => CSV_CONTENT_TYPE,
        }
    }
}

impl FromStr for ExportFormat {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            other => Err(CoreError::Validation(format!(
                "Unsupported export format '{other}'. Must be one of: csv"
            ))),
        }
    }
}

/// A single note as it appears in an export.
#[derive(Debug, Clone)]
pub struct ExportNote<'a> {
    pub id: Uuid,
    pub body: &'a str,
    pub byline: &'a str,
    pub archived: bool,
    pub created_at: Timestamp,
}

/// Escape a value for CSV: wrap in quotes if it contains a comma, quote or
/// line break.
fn csv_escape(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Build a CSV document from a list of notes.
///
/// The first line is [`CSV_HEADER`]; every line, including the last, is
/// terminated by `\n`.
pub fn build_csv(notes: &[ExportNote<'_>]) -> String {
    let mut out = String::with_capacity(CSV_HEADER.len() + 1 + notes.len() * 64);
    out.push_str(CSV_HEADER);
    out.push('\n');

    for note in notes {
        let row = [
            note.id.to_string(),
            csv_escape(note.body),
            csv_escape(note.byline),
            note.archived.to_string(),
            note.created_at.to_rfc3339(),
        ];
        out.push_str(&row.join(","));
        out.push('\n');
    }

    out
}
