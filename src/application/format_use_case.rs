// ============================================================
// Layer 2 — FormatUseCase
// ============================================================
// Orchestrates one formatting run in order:
//
//   Step 1: Validate the run config
//   Step 2: Resolve the terminator      (literal or tokenizer dir)
//   Step 3: Load the JSONL records      (Layer 4 - data)
//   Step 4: Format them                 (batched, or rayon pool)
//   Step 5: Read dataset_info.json      (Layer 6 - infra, optional)
//   Step 6: Write the output JSONL      (Layer 4 - data)
//   Step 7: Register in dataset_info    (Layer 6 - infra, optional)
//   Step 8: Append the run report       (Layer 6 - infra, optional)
//
// The record count is checked after formatting: output[i] must
// correspond to input[i] for every i, so the lengths must match.
// Every step that can fail on bad input runs before Step 6, so a
// failed run leaves no output file behind.

use anyhow::{bail, ensure, Context, Result};
use std::path::PathBuf;

use crate::application::run_config::{DatasetConfig, RunConfig};
use crate::data::{
    batcher::{format_batched, RecordBatcher},
    dataset::RecordDataset,
    formatter::{is_terminated, Formatter},
    loader::JsonlLoader,
    writer::JsonlWriter,
};
use crate::domain::record::Record;
use crate::domain::terminator::TerminatorToken;
use crate::domain::traits::{RecordSink, RecordSource, TerminatorSource};
use crate::infra::{
    dataset_info::DatasetInfo,
    run_report::{RunReport, RunReportLogger},
    tokenizer_store::TokenizerStore,
};

/// Pick the terminator source a dataset config asks for.
///
/// A literal `eos_token` wins over `tokenizer_dir`; having neither
/// is a configuration error.
pub fn resolve_terminator(cfg: &DatasetConfig) -> Result<TerminatorToken> {
    let source: Box<dyn TerminatorSource> = match (&cfg.eos_token, &cfg.tokenizer_dir) {
        (Some(token), _) => Box::new(TerminatorToken::new(token.as_str())?),
        (None, Some(dir)) => Box::new(TokenizerStore::new(dir)),
        (None, None) => bail!("No terminator configured: pass --eos-token or --tokenizer-dir"),
    };
    source.terminator()
}

/// Format `records` the way the dataset config asks.
///
/// num_proc > 1 runs on a rayon pool; otherwise records go through
/// the burn batcher `batch_size` at a time. Both give the same output.
pub fn format_records(
    records:   Vec<Record>,
    formatter: &Formatter,
    cfg:       &DatasetConfig,
) -> Result<Vec<Record>> {
    let dataset = RecordDataset::new(records);

    let formatted = if cfg.num_proc > 1 {
        tracing::debug!("Formatting on {} worker threads", cfg.num_proc);
        formatter.format_parallel(dataset.records(), cfg.num_proc)?
    } else {
        tracing::debug!("Formatting in batches of {}", cfg.batch_size);
        let batcher = RecordBatcher::new(formatter.clone());
        format_batched(&dataset, &batcher, cfg.batch_size)?
    };

    ensure!(
        formatted.len() == dataset.records().len(),
        "Formatting changed the record count ({} in, {} out)",
        dataset.records().len(),
        formatted.len()
    );
    Ok(formatted)
}

// ─── FormatUseCase ────────────────────────────────────────────────────────────
pub struct FormatUseCase {
    config: RunConfig,

    /// Where the formatted JSONL goes
    output: PathBuf,

    /// Register the output in dataset_info.json under this name
    dataset_name: Option<String>,

    /// Append a row to this CSV after the run
    report_csv: Option<PathBuf>,
}

impl FormatUseCase {
    pub fn new(config: RunConfig, output: impl Into<PathBuf>) -> Self {
        Self {
            config,
            output:       output.into(),
            dataset_name: None,
            report_csv:   None,
        }
    }

    pub fn with_dataset_name(mut self, name: Option<String>) -> Self {
        self.dataset_name = name;
        self
    }

    pub fn with_report_csv(mut self, path: Option<PathBuf>) -> Self {
        self.report_csv = path;
        self
    }

    /// Execute the run end to end and return its summary
    pub fn execute(&self) -> Result<RunReport> {
        let cfg = &self.config.dataset;

        // ── Step 1: Validate ──────────────────────────────────────────────────
        self.config.validate()?;

        // ── Step 2: Terminator ────────────────────────────────────────────────
        let terminator = resolve_terminator(cfg)?;
        tracing::info!("Using terminator {:?}", terminator.as_str());
        let formatter = Formatter::new(terminator);

        // ── Step 3: Load ──────────────────────────────────────────────────────
        let loader  = JsonlLoader::new(&cfg.train_file, &cfg.text_field);
        let records = loader.load_all()?;
        let already_terminated = records
            .iter()
            .filter(|r| is_terminated(&r.text, formatter.terminator()))
            .count();
        if already_terminated > 0 {
            tracing::warn!(
                "{} of {} records already end with the terminator and are left as-is",
                already_terminated,
                records.len()
            );
        }

        // ── Step 4: Format ────────────────────────────────────────────────────
        let total     = records.len();
        let formatted = format_records(records, &formatter, cfg)?;

        // ── Step 5: dataset_info.json ─────────────────────────────────────────
        let registration = match &self.dataset_name {
            Some(name) => {
                let dir = self
                    .output
                    .parent()
                    .map(PathBuf::from)
                    .unwrap_or_default();
                let file_name = self
                    .output
                    .file_name()
                    .and_then(|n| n.to_str())
                    .context("Output path has no UTF-8 file name")?;
                let mut info = DatasetInfo::load(&dir)?;
                info.register(name, file_name, &cfg.text_field)?;
                Some(info)
            }
            None => None,
        };

        // ── Step 6: Write ─────────────────────────────────────────────────────
        let writer = JsonlWriter::new(&self.output, &cfg.text_field);
        writer.write_all(&formatted)?;

        // ── Step 7: Register ──────────────────────────────────────────────────
        if let Some(info) = &registration {
            info.save()?;
        }

        // ── Step 8: Report ────────────────────────────────────────────────────
        let report = RunReport {
            input:              cfg.train_file.display().to_string(),
            output:             self.output.display().to_string(),
            terminator:         formatter.terminator().to_string(),
            records:            total,
            appended:           total - already_terminated,
            already_terminated,
            batch_size:         cfg.batch_size,
            num_proc:           cfg.num_proc,
        };
        if let Some(path) = &self.report_csv {
            RunReportLogger::new(path)?.log(&report)?;
        }

        Ok(report)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::FormatError;
    use std::fs;
    use std::path::Path;

    fn config(input: &Path, eos: &str) -> RunConfig {
        let mut cfg = RunConfig::default();
        cfg.dataset.train_file = input.to_path_buf();
        cfg.dataset.eos_token  = Some(eos.to_string());
        cfg
    }

    #[test]
    fn test_formats_file_end_to_end() {
        let dir    = tempfile::tempdir().unwrap();
        let input  = dir.path().join("train.jsonl");
        let output = dir.path().join("out").join("train.jsonl");
        fs::write(&input, "{\"text\":\"a\"}\n{\"text\":\"b\",\"id\":2}\n").unwrap();

        let report = FormatUseCase::new(config(&input, "<eos>"), &output).execute().unwrap();

        assert_eq!(report.records, 2);
        assert_eq!(report.appended, 2);
        assert_eq!(
            fs::read_to_string(&output).unwrap(),
            "{\"text\":\"a<eos>\"}\n{\"text\":\"b<eos>\",\"id\":2}\n"
        );
    }

    #[test]
    fn test_second_run_is_a_noop() {
        let dir    = tempfile::tempdir().unwrap();
        let input  = dir.path().join("train.jsonl");
        let once   = dir.path().join("once.jsonl");
        let twice  = dir.path().join("twice.jsonl");
        fs::write(&input, "{\"text\":\"Hello world\"}\n").unwrap();

        FormatUseCase::new(config(&input, "</s>"), &once).execute().unwrap();
        let report = FormatUseCase::new(config(&once, "</s>"), &twice).execute().unwrap();

        assert!(report.is_noop());
        assert_eq!(report.already_terminated, 1);
        assert_eq!(fs::read_to_string(&once).unwrap(), fs::read_to_string(&twice).unwrap());
        assert_eq!(fs::read_to_string(&twice).unwrap(), "{\"text\":\"Hello world</s>\"}\n");
    }

    #[test]
    fn test_parallel_and_batched_runs_agree() {
        let dir   = tempfile::tempdir().unwrap();
        let input = dir.path().join("train.jsonl");
        let body: String = (0..200).map(|i| format!("{{\"text\":\"doc {i}\"}}\n")).collect();
        fs::write(&input, body).unwrap();

        let mut seq = config(&input, "</s>");
        seq.dataset.num_proc   = 1;
        seq.dataset.batch_size = 7;
        let mut par = config(&input, "</s>");
        par.dataset.num_proc = 4;

        let a = dir.path().join("a.jsonl");
        let b = dir.path().join("b.jsonl");
        FormatUseCase::new(seq, &a).execute().unwrap();
        FormatUseCase::new(par, &b).execute().unwrap();
        assert_eq!(fs::read_to_string(a).unwrap(), fs::read_to_string(b).unwrap());
    }

    #[test]
    fn test_missing_text_field_aborts_without_output() {
        let dir    = tempfile::tempdir().unwrap();
        let input  = dir.path().join("train.jsonl");
        let output = dir.path().join("out.jsonl");
        fs::write(&input, "{\"text\":\"a\"}\n{\"prompt\":\"a\"}\n").unwrap();

        let err = FormatUseCase::new(config(&input, "</s>"), &output).execute().unwrap_err();
        assert_eq!(
            err.downcast_ref::<FormatError>(),
            Some(&FormatError::MissingField { line: 2, field: "text".into() })
        );
        assert!(!output.exists());
    }

    #[test]
    fn test_no_terminator_configured_is_an_error() {
        let mut cfg = RunConfig::default();
        cfg.dataset.eos_token     = None;
        cfg.dataset.tokenizer_dir = None;
        assert!(resolve_terminator(&cfg.dataset).is_err());
    }

    #[test]
    fn test_literal_terminator_wins_over_tokenizer_dir() {
        let mut cfg = RunConfig::default();
        cfg.dataset.eos_token     = Some("<eos>".into());
        cfg.dataset.tokenizer_dir = Some(PathBuf::from("/does/not/exist"));
        assert_eq!(resolve_terminator(&cfg.dataset).unwrap().as_str(), "<eos>");
    }

    #[test]
    fn test_empty_literal_terminator_fails_fast() {
        let dir    = tempfile::tempdir().unwrap();
        let input  = dir.path().join("train.jsonl");
        let output = dir.path().join("out.jsonl");
        fs::write(&input, "{\"text\":\"a\"}\n").unwrap();

        let err = FormatUseCase::new(config(&input, ""), &output).execute().unwrap_err();
        assert_eq!(err.downcast_ref::<FormatError>(), Some(&FormatError::EmptyTerminator));
        assert!(!output.exists());
    }

    #[test]
    fn test_malformed_dataset_info_aborts_before_writing() {
        let dir    = tempfile::tempdir().unwrap();
        let input  = dir.path().join("train.jsonl");
        let output = dir.path().join("data").join("formatted.jsonl");
        let csv    = dir.path().join("runs.csv");
        fs::write(&input, "{\"text\":\"a\"}\n").unwrap();
        fs::create_dir_all(dir.path().join("data")).unwrap();
        fs::write(dir.path().join("data").join("dataset_info.json"), "{not json").unwrap();

        let result = FormatUseCase::new(config(&input, "</s>"), &output)
            .with_dataset_name(Some("blog".into()))
            .with_report_csv(Some(csv.clone()))
            .execute();

        assert!(result.is_err());
        assert!(!output.exists());
        assert!(!csv.exists());
        assert_eq!(
            fs::read_to_string(dir.path().join("data").join("dataset_info.json")).unwrap(),
            "{not json"
        );
    }

    #[test]
    fn test_registers_dataset_and_logs_report() {
        let dir    = tempfile::tempdir().unwrap();
        let input  = dir.path().join("train.jsonl");
        let output = dir.path().join("data").join("formatted.jsonl");
        let csv    = dir.path().join("runs.csv");
        fs::write(&input, "{\"text\":\"a\"}\n").unwrap();

        FormatUseCase::new(config(&input, "</s>"), &output)
            .with_dataset_name(Some("blog".into()))
            .with_report_csv(Some(csv.clone()))
            .execute()
            .unwrap();

        let info: serde_json::Value = serde_json::from_str(
            &fs::read_to_string(dir.path().join("data").join("dataset_info.json")).unwrap(),
        )
        .unwrap();
        assert_eq!(info["blog"]["file_name"], "formatted.jsonl");
        assert_eq!(fs::read_to_string(csv).unwrap().lines().count(), 2);
    }
}
