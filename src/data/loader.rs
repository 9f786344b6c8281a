// ============================================================
// Layer 4 — JSONL Loader
// ============================================================
// Reads a newline-delimited JSON training file into Records.
//
// File format (one JSON object per line):
//   {"text": "first document"}
//   {"text": "second document", "source": "blog"}
//
// Parsing rules:
//   - Blank lines are skipped (trailing newline, editor padding)
//   - A leading byte order mark on the first line is ignored
//   - Every other line must be a JSON object
//   - The object must carry the text field as a non-empty string
//   - All remaining keys are kept as passthrough columns
//
// The file is read line by line through a BufReader, so only the
// parsed records are held in memory, never the raw file.
//
// A bad line is a hard error that names the line number. We
// never skip a record: silently dropping one would shift every
// following record out of line with any metadata kept by the
// caller.

use anyhow::{Context, Result};
use serde_json::Value;
use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::PathBuf,
};

use crate::domain::error::FormatError;
use crate::domain::record::Record;
use crate::domain::traits::RecordSource;

/// Loads records from a single .jsonl file.
/// Implements the RecordSource trait from Layer 3.
pub struct JsonlLoader {
    /// Path to the .jsonl file
    path: PathBuf,

    /// Name of the field holding the training text
    text_field: String,
}

impl JsonlLoader {
    /// Create a loader for `path`, reading text from `text_field`
    pub fn new(path: impl Into<PathBuf>, text_field: impl Into<String>) -> Self {
        Self {
            path:       path.into(),
            text_field: text_field.into(),
        }
    }
}

impl RecordSource for JsonlLoader {
    fn load_all(&self) -> Result<Vec<Record>> {
        let file = File::open(&self.path)
            .with_context(|| format!("Cannot read dataset '{}'", self.path.display()))?;

        let records = read_jsonl(BufReader::new(file), &self.text_field)
            .with_context(|| format!("Malformed dataset '{}'", self.path.display()))?;

        tracing::info!(
            "Loaded {} records from '{}'",
            records.len(),
            self.path.display()
        );
        Ok(records)
    }
}

/// Parse JSONL from a buffered reader. Stops at the first bad line.
pub fn read_jsonl<R: BufRead>(reader: R, text_field: &str) -> Result<Vec<Record>> {
    let mut records = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line_no = idx + 1;
        // lines() already strips "\n" and "\r\n"
        let raw = line.with_context(|| format!("Cannot read line {line_no}"))?;

        let mut line = raw.as_str();
        if line_no == 1 {
            line = line.strip_prefix('\u{FEFF}').unwrap_or(line);
        }
        if line.trim().is_empty() {
            continue;
        }
        records.push(parse_line(line, line_no, text_field)?);
    }
    Ok(records)
}

/// Parse one non-blank line into a Record.
///
/// `line_no` is 1-based and only used for error messages.
pub fn parse_line(line: &str, line_no: usize, text_field: &str) -> Result<Record, FormatError> {
    let value: Value = serde_json::from_str(line).map_err(|e| FormatError::InvalidJson {
        line:    line_no,
        message: e.to_string(),
    })?;

    let Value::Object(mut obj) = value else {
        return Err(FormatError::NotAnObject { line: line_no });
    };

    // shift_remove keeps the remaining columns in file order
    let text = match obj.shift_remove(text_field) {
        None => {
            return Err(FormatError::MissingField {
                line:  line_no,
                field: text_field.to_string(),
            })
        }
        Some(Value::String(s)) => s,
        Some(_) => {
            return Err(FormatError::FieldNotString {
                line:  line_no,
                field: text_field.to_string(),
            })
        }
    };

    if text.is_empty() {
        return Err(FormatError::EmptyText { line: line_no });
    }

    Ok(Record { text, extra: obj })
}
