// ============================================================
// Layer 6 — Run Report Logger
// ============================================================
// Records one CSV row per formatting run so a dataset's history
// (how many records, how many were already terminated, which
// terminator) can be checked later without re-reading the data.
//
// Columns:
//   input, output, terminator, records, appended,
//   already_terminated, batch_size, num_proc
//
// Example:
//   input,output,terminator,records,appended,already_terminated,batch_size,num_proc
//   train.jsonl,out/train.jsonl,</s>,1200,1200,0,1000,8
//
// A second run over `out/train.jsonl` would log appended = 0 and
// already_terminated = 1200.

use anyhow::Result;
use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
};

use serde::Serialize;

const HEADER: &str = "input,output,terminator,records,appended,already_terminated,batch_size,num_proc";

/// Summary of one formatting run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub input:              String,
    pub output:             String,
    pub terminator:         String,
    pub records:            usize,
    pub appended:           usize,
    pub already_terminated: usize,
    pub batch_size:         usize,
    pub num_proc:           usize,
}

impl RunReport {
    /// True if this run changed no record (idempotent re-run)
    pub fn is_noop(&self) -> bool {
        self.appended == 0
    }
}

/// Quote a CSV field if it contains a delimiter, quote or newline
fn csv_field(s: &str) -> String {
    if s.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

/// Appends RunReports to a CSV file.
pub struct RunReportLogger {
    csv_path: PathBuf,
}

impl RunReportLogger {
    /// Create a logger; writes the header if the file is new.
    pub fn new(csv_path: impl Into<PathBuf>) -> Result<Self> {
        let csv_path = csv_path.into();

        if let Some(parent) = csv_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        if !csv_path.exists() {
            let mut f = fs::File::create(&csv_path)?;
            writeln!(f, "{HEADER}")?;
            tracing::debug!("Created run report CSV: '{}'", csv_path.display());
        }

        Ok(Self { csv_path })
    }

    /// Append one row
    pub fn log(&self, r: &RunReport) -> Result<()> {
        let mut f = OpenOptions::new().append(true).open(&self.csv_path)?;

        writeln!(
            f,
            "{},{},{},{},{},{},{},{}",
            csv_field(&r.input),
            csv_field(&r.output),
            csv_field(&r.terminator),
            r.records,
            r.appended,
            r.already_terminated,
            r.batch_size,
            r.num_proc,
        )?;

        tracing::debug!(
            "Logged run: {} records, {} appended, {} already terminated",
            r.records,
            r.appended,
            r.already_terminated,
        );
        Ok(())
    }

    pub fn csv_path(&self) -> &Path {
        &self.csv_path
    }
}
