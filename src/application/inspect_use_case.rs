// ============================================================
// Layer 2 — InspectUseCase
// ============================================================
// Looks at a JSONL dataset without writing anything:
//
//   - how many records it has
//   - which columns appear (first-seen order, text field first)
//   - what the first record looks like
//   - what the first record looks like after formatting
//   - how many records already end with the terminator
//
// The formatted preview goes through a burn MapperDataset, so
// only record 0 is formatted.

use anyhow::Result;
use burn::data::dataset::Dataset;
use serde::Serialize;
use serde_json::Value;

use crate::application::run_config::DatasetConfig;
use crate::application::format_use_case::resolve_terminator;
use crate::data::{
    dataset::{formatted_view, RecordDataset},
    formatter::{is_terminated, Formatter},
    loader::JsonlLoader,
};
use crate::domain::record::Record;
use crate::domain::traits::RecordSource;

/// What `inspect` found.
#[derive(Debug, Clone, Serialize)]
pub struct InspectSummary {
    pub records:            usize,
    pub columns:            Vec<String>,
    pub first:              Option<Value>,
    pub first_formatted:    Option<Value>,
    pub terminator:         Option<String>,
    pub already_terminated: Option<usize>,
}

/// Column names across all records, text field first
pub fn column_names(records: &[Record], text_field: &str) -> Vec<String> {
    let mut columns = vec![text_field.to_string()];
    for record in records {
        for key in record.extra.keys() {
            if !columns.iter().any(|c| c == key) {
                columns.push(key.clone());
            }
        }
    }
    columns
}

pub struct InspectUseCase {
    config: DatasetConfig,
}

impl InspectUseCase {
    pub fn new(config: DatasetConfig) -> Self {
        Self { config }
    }

    pub fn execute(&self) -> Result<InspectSummary> {
        let cfg     = &self.config;
        let records = JsonlLoader::new(&cfg.train_file, &cfg.text_field).load_all()?;
        let columns = column_names(&records, &cfg.text_field);
        let first   = records.first().map(|r| r.to_json(&cfg.text_field));

        // The terminator is optional here: without one we only describe the data
        let terminator = if cfg.eos_token.is_some() || cfg.tokenizer_dir.is_some() {
            Some(resolve_terminator(cfg)?)
        } else {
            None
        };

        let already_terminated = terminator
            .as_ref()
            .map(|t| records.iter().filter(|r| is_terminated(&r.text, t)).count());

        let total = records.len();
        let first_formatted = match &terminator {
            Some(t) => {
                let view = formatted_view(RecordDataset::new(records), Formatter::new(t.clone()));
                view.get(0).map(|r| r.to_json(&cfg.text_field))
            }
            None => None,
        };

        tracing::info!("Inspected {} records, columns {:?}", total, columns);

        Ok(InspectSummary {
            records: total,
            columns,
            first,
            first_formatted,
            terminator: terminator.map(|t| t.to_string()),
            already_terminated,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;

    #[test]
    fn test_column_names_in_first_seen_order() {
        let recs = vec![
            Record::new("a").with_extra("source", json!("x")),
            Record::new("b").with_extra("id", json!(1)).with_extra("source", json!("y")),
        ];
        assert_eq!(column_names(&recs, "text"), vec!["text", "source", "id"]);
    }

    #[test]
    fn test_inspect_with_terminator() {
        let dir   = tempfile::tempdir().unwrap();
        let input = dir.path().join("train.jsonl");
        fs::write(&input, "{\"text\":\"Hello world\"}\n{\"text\":\"done</s>\"}\n").unwrap();

        let cfg = DatasetConfig {
            train_file: input,
            eos_token:  Some("</s>".into()),
            ..DatasetConfig::default()
        };
        let s = InspectUseCase::new(cfg).execute().unwrap();

        assert_eq!(s.records, 2);
        assert_eq!(s.columns, vec!["text"]);
        assert_eq!(s.first, Some(json!({"text": "Hello world"})));
        assert_eq!(s.first_formatted, Some(json!({"text": "Hello world</s>"})));
        assert_eq!(s.already_terminated, Some(1));
    }

    #[test]
    fn test_inspect_without_terminator() {
        let dir   = tempfile::tempdir().unwrap();
        let input = dir.path().join("train.jsonl");
        fs::write(&input, "{\"text\":\"a\",\"url\":\"u\"}\n").unwrap();

        let cfg = DatasetConfig { train_file: input, ..DatasetConfig::default() };
        let s   = InspectUseCase::new(cfg).execute().unwrap();

        assert_eq!(s.columns, vec!["text", "url"]);
        assert!(s.first_formatted.is_none());
        assert!(s.already_terminated.is_none());
    }

    #[test]
    fn test_inspect_empty_file() {
        let dir   = tempfile::tempdir().unwrap();
        let input = dir.path().join("train.jsonl");
        fs::write(&input, "").unwrap();

        let cfg = DatasetConfig {
            train_file: input,
            eos_token:  Some("</s>".into()),
            ..DatasetConfig::default()
        };
        let s = InspectUseCase::new(cfg).execute().unwrap();
        assert_eq!(s.records, 0);
        assert!(s.first.is_none());
        assert!(s.first_formatted.is_none());
    }
}
