// ============================================================
// Layer 3 — Domain Errors
// ============================================================
// Every failure the formatting stage can signal to its caller.
// None of these are transient: each one is a configuration or
// data bug, so callers propagate them instead of retrying.
//
// Line numbers are 1-based and refer to the JSONL input file.

use thiserror::Error;

/// Errors raised while loading or formatting training records.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum FormatError {
    /// The terminator supplied by the tokenizer (or the user) was empty.
    #[error("terminator token must not be empty")]
    EmptyTerminator,

    /// A record did not carry the configured text field.
    #[error("line {line}: record has no '{field}' field")]
    MissingField {
        /// Line of the offending record
        line: usize,
        /// Name of the expected text field
        field: String,
    },

    /// The text field exists but holds a number, array, null, ...
    #[error("line {line}: field '{field}' is not a string")]
    FieldNotString {
        /// Line of the offending record
        line: usize,
        /// Name of the expected text field
        field: String,
    },

    /// The text field is an empty string.
    #[error("line {line}: text field is empty")]
    EmptyText {
        /// Line of the offending record
        line: usize,
    },

    /// The line parsed as JSON but is not an object.
    #[error("line {line}: expected a JSON object")]
    NotAnObject {
        /// Line of the offending record
        line: usize,
    },

    /// The line is not valid JSON.
    #[error("line {line}: invalid JSON: {message}")]
    InvalidJson {
        /// Line of the offending record
        line: usize,
        /// serde_json's description of the problem
        message: String,
    },

    /// Batched formatting was asked to use chunks of zero records.
    #[error("batch size must be greater than zero")]
    InvalidBatchSize,

    /// Parallel formatting was asked to run on zero workers.
    #[error("number of worker threads must be greater than zero")]
    InvalidWorkerCount,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_field_message_names_line_and_field() {
        let e = FormatError::MissingField { line: 3, field: "text".into() };
        assert_eq!(e.to_string(), "line 3: record has no 'text' field");
    }

    #[test]
    fn test_empty_terminator_message() {
        assert_eq!(
            FormatError::EmptyTerminator.to_string(),
            "terminator token must not be empty"
        );
    }
}
