// ============================================================
// Layer 3 — Record Domain Type
// ============================================================
// One line of a JSONL training file.
//
// Only the text field matters to the formatting stage, but a
// dataset usually carries other columns too (source url, title,
// ...). Those are kept untouched in `extra` so the output file
// has the same columns as the input, in the same order.
//
// Example input line:
//   {"text": "Hello world", "source": "blog"}
// becomes
//   Record { text: "Hello world", extra: {"source": "blog"} }

use serde_json::{Map, Value};

/// A training record: the text to train on plus passthrough columns.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record {
    /// The training string (the configured text field)
    pub text: String,

    /// Every other key of the JSON object, in file order
    pub extra: Map<String, Value>,
}

impl Record {
    /// Build a record with only a text field.
    ///
    /// Example:
    ///   let r = Record::new("Hello world");
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text:  text.into(),
            extra: Map::new(),
        }
    }

    /// Attach a passthrough column (builder style, used mostly by tests)
    pub fn with_extra(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    /// Same record with `text` replaced, extra columns cloned
    pub fn with_text(&self, text: String) -> Self {
        Self {
            text,
            extra: self.extra.clone(),
        }
    }

    /// Convert back into a JSON object, text field first.
    ///
    /// If `extra` happens to contain a key equal to `text_field`
    /// the text value wins.
    pub fn to_json(&self, text_field: &str) -> Value {
        let mut obj = Map::with_capacity(self.extra.len() + 1);
        obj.insert(text_field.to_string(), Value::String(self.text.clone()));
        for (k, v) in &self.extra {
            if k != text_field {
                obj.insert(k.clone(), v.clone());
            }
        }
        Value::Object(obj)
    }
}
