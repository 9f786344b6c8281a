// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// Everything between a raw .jsonl file and a trainer-ready one.
//
// The pipeline flows in this order:
//
//   train.jsonl
//       │
//       ▼
//   JsonlLoader       → parses lines into Records (fails on bad lines)
//       │
//       ▼
//   RecordDataset     → implements burn's Dataset trait
//       │
//       ▼
//   RecordBatcher     → formats one mini-batch at a time
//   (or Formatter::format_parallel on a rayon pool)
//       │
//       ▼
//   JsonlWriter       → writes formatted records back to disk
//
// Each module is responsible for exactly one step.

/// Reads newline-delimited JSON into Records
pub mod loader;

/// Appends the terminator token (idempotently)
pub mod formatter;

/// burn Dataset / Mapper adapters for Records
pub mod dataset;

/// burn Batcher for chunked formatting
pub mod batcher;

/// Writes Records as newline-delimited JSON
pub mod writer;
