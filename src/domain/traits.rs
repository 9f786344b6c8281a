// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The formatting stage talks to its collaborators only through
// these traits:
//
//   RecordSource     → where raw records come from (JSONL loader)
//   RecordSink       → where formatted records go   (JSONL writer)
//   TerminatorSource → who supplies the terminator  (tokenizer dir,
//                                                    or a literal)
//
// The application layer only sees these traits, so a test can
// swap any of them for an in-memory version.

use anyhow::Result;

use crate::domain::record::Record;
use crate::domain::terminator::TerminatorToken;

// ─── RecordSource ─────────────────────────────────────────────────────────────
/// Any component that can produce an ordered sequence of records.
///
/// Implementations:
///   - JsonlLoader → reads a newline-delimited JSON file
pub trait RecordSource {
    /// Load every record, in order. A malformed record is an error,
    /// never silently dropped.
    fn load_all(&self) -> Result<Vec<Record>>;
}

// ─── RecordSink ───────────────────────────────────────────────────────────────
/// Any component that can persist formatted records.
///
/// Implementations:
///   - JsonlWriter → writes a newline-delimited JSON file
pub trait RecordSink {
    /// Write every record, in order. Returns how many were written.
    fn write_all(&self, records: &[Record]) -> Result<usize>;
}

// ─── TerminatorSource ─────────────────────────────────────────────────────────
/// Any component that can supply the end-of-sequence terminator.
///
/// Implementations:
///   - TokenizerStore   → reads eos_token from a model directory
///   - TerminatorToken  → a literal given on the command line
pub trait TerminatorSource {
    /// Resolve the terminator. Must fail rather than return an empty one.
    fn terminator(&self) -> Result<TerminatorToken>;
}

impl TerminatorSource for TerminatorToken {
    fn terminator(&self) -> Result<TerminatorToken> {
        Ok(self.clone())
    }
}
