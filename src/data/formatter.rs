// ============================================================
// Layer 4 — Record Formatter
// ============================================================
// Appends the end-of-sequence terminator to every training text
// so the model learns where a document stops.
//
// Example with terminator "</s>":
//   "Hello world"      → "Hello world</s>"
//   "Hello world</s>"  → "Hello world</s>"   (already terminated)
//
// The append is idempotent: a text that already ends with the
// terminator is returned unchanged. Re-running the stage over
// its own output (a re-executed notebook cell, a second pass of
// the CLI) therefore never produces "...</s></s>".
//
// The formatter is pure. It owns nothing but the terminator, so
// it is Send + Sync and every entry point below returns exactly
// the same output for the same input:
//
//   format_batch     → whole slice at once
//   format_parallel  → rayon worker pool
//
// (Chunked formatting over a burn Dataset lives in batcher.rs.)
// Worker count is never visible in the result.

use rayon::prelude::*;

use crate::domain::error::FormatError;
use crate::domain::record::Record;
use crate::domain::terminator::TerminatorToken;

/// True if `text` already ends with the terminator
pub fn is_terminated(text: &str, terminator: &TerminatorToken) -> bool {
    text.ends_with(terminator.as_str())
}

/// Appends a terminator to record texts.
#[derive(Debug, Clone)]
pub struct Formatter {
    terminator: TerminatorToken,
}

impl Formatter {
    /// Create a formatter for the given terminator
    pub fn new(terminator: TerminatorToken) -> Self {
        Self { terminator }
    }

    /// The terminator this formatter appends
    pub fn terminator(&self) -> &TerminatorToken {
        &self.terminator
    }

    /// Append the terminator to `text` unless it is already there.
    pub fn format_text(&self, text: &str) -> String {
        if is_terminated(text, &self.terminator) {
            return text.to_string();
        }
        let mut out = String::with_capacity(text.len() + self.terminator.as_str().len());
        out.push_str(text);
        out.push_str(self.terminator.as_str());
        out
    }

    /// Format one record, keeping its passthrough columns
    pub fn format_record(&self, record: &Record) -> Record {
        record.with_text(self.format_text(&record.text))
    }

    /// Format a whole slice of records, preserving order and length
    pub fn format_batch(&self, records: &[Record]) -> Vec<Record> {
        records.iter().map(|r| self.format_record(r)).collect()
    }

    /// Format on a dedicated pool of `num_proc` threads.
    ///
    /// `par_iter().map().collect()` on a slice is index-preserving,
    /// so the output order matches the input regardless of how the
    /// work was scheduled.
    pub fn format_parallel(
        &self,
        records:  &[Record],
        num_proc: usize,
    ) -> Result<Vec<Record>, FormatError> {
        if num_proc == 0 {
            return Err(FormatError::InvalidWorkerCount);
        }
        if num_proc == 1 {
            return Ok(self.format_batch(records));
        }

        match rayon::ThreadPoolBuilder::new().num_threads(num_proc).build() {
            Ok(pool) => Ok(pool.install(|| {
                records.par_iter().map(|r| self.format_record(r)).collect()
            })),
            Err(e) => {
                // Same result either way, only slower
                tracing::warn!("Cannot start {} worker threads ({}), formatting sequentially", num_proc, e);
                Ok(self.format_batch(records))
            }
        }
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn formatter(t: &str) -> Formatter {
        Formatter::new(TerminatorToken::new(t).unwrap())
    }

    fn sample(n: usize) -> Vec<Record> {
        (0..n).map(|i| Record::new(format!("doc {i}"))).collect()
    }

    #[test]
    fn test_appends_terminator() {
        assert_eq!(formatter("</s>").format_text("Hello world"), "Hello world</s>");
    }

    #[test]
    fn test_leaves_rest_of_text_untouched() {
        let f    = formatter("<eos>");
        let text = "  tabs\tand\nnewlines  ";
        let out  = f.format_text(text);
        assert_eq!(&out[..text.len()], text);
        assert_eq!(&out[text.len()..], "<eos>");
    }

    #[test]
    fn test_is_idempotent() {
        let f    = formatter("</s>");
        let once = f.format_text("Hello world");
        assert_eq!(f.format_text(&once), once);
    }

    #[test]
    fn test_terminator_in_the_middle_still_appends() {
        let f = formatter("</s>");
        assert_eq!(f.format_text("a</s>b"), "a</s>b</s>");
    }

    #[test]
    fn test_partial_terminator_suffix_still_appends() {
        let f = formatter("</s>");
        assert_eq!(f.format_text("a</s"), "a</s</s>");
    }

    #[test]
    fn test_record_sequence_example() {
        let f   = formatter("<eos>");
        let out = f.format_batch(&[Record::new("a"), Record::new("b")]);
        assert_eq!(out, vec![Record::new("a<eos>"), Record::new("b<eos>")]);
    }

    #[test]
    fn test_record_keeps_extra_columns() {
        let f   = formatter("</s>");
        let rec = Record::new("a").with_extra("source", json!("blog"));
        let out = f.format_record(&rec);
        assert_eq!(out.text, "a</s>");
        assert_eq!(out.extra.get("source"), Some(&json!("blog")));
    }

    #[test]
    fn test_preserves_order_and_length() {
        let f    = formatter("</s>");
        let recs = sample(25);
        let out  = f.format_batch(&recs);
        assert_eq!(out.len(), recs.len());
        for (i, r) in out.iter().enumerate() {
            assert_eq!(r.text, format!("doc {i}</s>"));
        }
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let f    = formatter("</s>");
        let recs = sample(1000);
        let seq  = f.format_batch(&recs);
        for workers in [1, 2, 8] {
            assert_eq!(f.format_parallel(&recs, workers).unwrap(), seq);
        }
    }

    #[test]
    fn test_zero_workers_is_rejected() {
        let f = formatter("</s>");
        assert_eq!(f.format_parallel(&sample(3), 0), Err(FormatError::InvalidWorkerCount));
    }

    #[test]
    fn test_empty_input() {
        let f = formatter("</s>");
        assert!(f.format_batch(&[]).is_empty());
        assert!(f.format_parallel(&[], 4).unwrap().is_empty());
    }
}
