// ============================================================
// Layer 4 — Record Batcher
// ============================================================
// Implements burn's Batcher trait so the formatting stage can
// run one mini-batch at a time, the way a batched dataset map
// does in a Python training notebook.
//
// How batched formatting works here:
//   Input:  a Dataset<Record> of N records, a batch size B
//   Steps:  take records [0..B), [B..2B), ... in order
//           hand each chunk to RecordBatcher::batch()
//           append the formatted chunk to the output
//   Output: Vec of N formatted records, same order
//
// Each record is formatted independently of its neighbours, so
// B changes how much work happens per step and nothing else:
// B = 1 and B = N give identical output.

use burn::data::{dataloader::batcher::Batcher, dataset::Dataset};

use crate::data::formatter::Formatter;
use crate::domain::error::FormatError;
use crate::domain::record::Record;

// ─── FormattedBatch ───────────────────────────────────────────────────────────
/// One mini-batch of training-ready records.
#[derive(Debug, Clone, PartialEq)]
pub struct FormattedBatch {
    /// Formatted records, in the order they were batched
    pub records: Vec<Record>,
}

// ─── RecordBatcher ────────────────────────────────────────────────────────────
#[derive(Debug, Clone)]
pub struct RecordBatcher {
    formatter: Formatter,
}

impl RecordBatcher {
    pub fn new(formatter: Formatter) -> Self {
        Self { formatter }
    }
}

// burn's DataLoader calls .batch(items) with each mini-batch
impl Batcher<Record, FormattedBatch> for RecordBatcher {
    fn batch(&self, items: Vec<Record>) -> FormattedBatch {
        FormattedBatch {
            records: self.formatter.format_batch(&items),
        }
    }
}

/// Format every record of `dataset` in chunks of `batch_size`.
pub fn format_batched<D>(
    dataset:    &D,
    batcher:    &RecordBatcher,
    batch_size: usize,
) -> Result<Vec<Record>, FormatError>
where
    D: Dataset<Record>,
{
    if batch_size == 0 {
        return Err(FormatError::InvalidBatchSize);
    }

    let total   = dataset.len();
    let mut out = Vec::with_capacity(total);
    let mut start = 0usize;

    while start < total {
        let end   = (start + batch_size).min(total);
        let items: Vec<Record> = (start..end).filter_map(|i| dataset.get(i)).collect();

        let batch = batcher.batch(items);
        tracing::trace!("Formatted records {}..{} ({} in batch)", start, end, batch.records.len());
        out.extend(batch.records);

        start = end;
    }

    Ok(out)
}
