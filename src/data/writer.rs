// ============================================================
// Layer 4 — JSONL Writer
// ============================================================
// Writes formatted records back out as newline-delimited JSON,
// ready for a trainer that reads the text field by name.
//
// One compact object per line, text field first, then the
// passthrough columns in their original order:
//   {"text":"Hello world</s>","source":"blog"}
//
// The file is written through a BufWriter and flushed before
// returning, so a successful write_all means the whole file is
// on disk.

use anyhow::{Context, Result};
use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::PathBuf,
};

use crate::domain::record::Record;
use crate::domain::traits::RecordSink;

pub struct JsonlWriter {
    path:       PathBuf,
    text_field: String,
}

impl JsonlWriter {
    pub fn new(path: impl Into<PathBuf>, text_field: impl Into<String>) -> Self {
        Self {
            path:       path.into(),
            text_field: text_field.into(),
        }
    }
}

impl RecordSink for JsonlWriter {
    fn write_all(&self, records: &[Record]) -> Result<usize> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Cannot create directory '{}'", parent.display()))?;
            }
        }

        let file = File::create(&self.path)
            .with_context(|| format!("Cannot create '{}'", self.path.display()))?;
        let mut out = BufWriter::new(file);

        for record in records {
            serde_json::to_writer(&mut out, &record.to_json(&self.text_field))?;
            out.write_all(b"\n")?;
        }
        out.flush()
            .with_context(|| format!("Cannot flush '{}'", self.path.display()))?;

        tracing::info!("Wrote {} records to '{}'", records.len(), self.path.display());
        Ok(records.len())
    }
}
