// ============================================================
// Layer 4 — Record Dataset
// ============================================================
// Exposes loaded records through burn's Dataset trait so they
// can be handed to burn's data tooling (MapperDataset, DataLoader)
// the same way any other dataset is.
//
//   RecordDataset      → the raw records, in file order
//   RecordMapper       → burn Mapper that formats one record
//   formatted_view()   → MapperDataset that formats lazily on get()
//
// The lazy view is what `inspect` uses to show "record 0 after
// formatting" without formatting the whole file.

use burn::data::dataset::{
    transform::{Mapper, MapperDataset},
    Dataset,
};

use crate::data::formatter::Formatter;
use crate::domain::record::Record;

pub struct RecordDataset {
    records: Vec<Record>,
}

impl RecordDataset {
    pub fn new(records: Vec<Record>) -> Self { Self { records } }

    /// Borrow every record as a slice (for the parallel formatter)
    pub fn records(&self) -> &[Record] { &self.records }
}

impl Dataset<Record> for RecordDataset {
    fn get(&self, index: usize) -> Option<Record> {
        self.records.get(index).cloned()
    }

    fn len(&self) -> usize {
        self.records.len()
    }
}

/// burn Mapper applying the formatting stage to one record.
#[derive(Debug, Clone)]
pub struct RecordMapper {
    formatter: Formatter,
}

impl RecordMapper {
    pub fn new(formatter: Formatter) -> Self { Self { formatter } }
}

impl Mapper<Record, Record> for RecordMapper {
    fn map(&self, item: &Record) -> Record {
        self.formatter.format_record(item)
    }
}

/// A dataset that formats each record when it is read.
pub fn formatted_view<D>(dataset: D, formatter: Formatter) -> impl Dataset<Record>
where
    D: Dataset<Record>,
{
    MapperDataset::<D, RecordMapper, Record>::new(dataset, RecordMapper::new(formatter))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::terminator::TerminatorToken;

    fn formatter() -> Formatter {
        Formatter::new(TerminatorToken::new("</s>").unwrap())
    }

    #[test]
    fn test_dataset_get_and_len() {
        let ds = RecordDataset::new(vec![Record::new("a"), Record::new("b")]);
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.get(1), Some(Record::new("b")));
        assert_eq!(ds.get(2), None);
    }

    #[test]
    fn test_formatted_view_formats_on_read() {
        let ds   = RecordDataset::new(vec![Record::new("a"), Record::new("b")]);
        let view = formatted_view(ds, formatter());
        assert_eq!(view.len(), 2);
        assert_eq!(view.get(0), Some(Record::new("a</s>")));
        assert_eq!(view.get(1), Some(Record::new("b</s>")));
    }

    #[test]
    fn test_formatted_view_of_formatted_view_is_unchanged() {
        let ds    = RecordDataset::new(vec![Record::new("a")]);
        let twice = formatted_view(formatted_view(ds, formatter()), formatter());
        assert_eq!(twice.get(0), Some(Record::new("a</s>")));
    }
}
