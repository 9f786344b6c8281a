// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Defines the subcommands and their flags:
//
//   format       — append the terminator to every record
//   inspect      — describe a dataset without writing anything
//   init-config  — write a default run_config.json
//
// Dataset flags are shared by `format` and `inspect` and act as
// overrides: values start from --config (or the defaults) and
// any flag given on the command line replaces them.

use anyhow::Result;
use clap::{Args, Subcommand};
use std::path::PathBuf;

use crate::application::run_config::{DatasetConfig, RunConfig};
use crate::infra::config_store::ConfigStore;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Append the end-of-sequence terminator to every record of a JSONL file
    Format(FormatArgs),

    /// Show record count, columns and the first record of a JSONL file
    Inspect(InspectArgs),

    /// Write a run configuration with the default recipe values
    InitConfig(InitConfigArgs),
}

/// Flags that describe where the dataset is and how to format it.
#[derive(Args, Debug, Default)]
pub struct DatasetArgs {
    /// Run configuration JSON (see `init-config`)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Input .jsonl file, one JSON object per line
    #[arg(long)]
    pub input: Option<PathBuf>,

    /// Field holding the training text
    #[arg(long)]
    pub text_field: Option<String>,

    /// Literal terminator to append, e.g. "</s>"
    #[arg(long)]
    pub eos_token: Option<String>,

    /// Model directory with tokenizer_config.json (and tokenizer.json)
    #[arg(long)]
    pub tokenizer_dir: Option<PathBuf>,
}

impl DatasetArgs {
    /// Load --config (or defaults) and apply the flag overrides
    pub fn resolve(&self) -> Result<RunConfig> {
        let mut cfg = match &self.config {
            Some(path) => ConfigStore::new(path).load()?,
            None => RunConfig::default(),
        };
        self.apply(&mut cfg.dataset);
        Ok(cfg)
    }

    fn apply(&self, d: &mut DatasetConfig) {
        if let Some(input) = &self.input {
            d.train_file = input.clone();
        }
        if let Some(field) = &self.text_field {
            d.text_field = field.clone();
        }
        if let Some(token) = &self.eos_token {
            d.eos_token = Some(token.clone());
        }
        if let Some(dir) = &self.tokenizer_dir {
            d.tokenizer_dir = Some(dir.clone());
        }
    }
}

#[derive(Args, Debug)]
pub struct FormatArgs {
    #[command(flatten)]
    pub dataset: DatasetArgs,

    /// Where to write the formatted .jsonl
    #[arg(long)]
    pub output: PathBuf,

    /// Records formatted per batch
    #[arg(long)]
    pub batch_size: Option<usize>,

    /// Worker threads (1 = single-threaded, batched)
    #[arg(long)]
    pub num_proc: Option<usize>,

    /// Register the output in dataset_info.json under this name
    #[arg(long)]
    pub dataset_info: Option<String>,

    /// Append a summary row to this CSV file
    #[arg(long)]
    pub report_csv: Option<PathBuf>,

    /// Print the run summary as JSON
    #[arg(long)]
    pub json: bool,
}

impl FormatArgs {
    pub fn resolve(&self) -> Result<RunConfig> {
        let mut cfg = self.dataset.resolve()?;
        if let Some(n) = self.batch_size {
            cfg.dataset.batch_size = n;
        }
        if let Some(n) = self.num_proc {
            cfg.dataset.num_proc = n;
        }
        Ok(cfg)
    }
}

#[derive(Args, Debug)]
pub struct InspectArgs {
    #[command(flatten)]
    pub dataset: DatasetArgs,

    /// Print the summary as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct InitConfigArgs {
    /// Where to write the config
    #[arg(long, default_value = "run_config.json")]
    pub output: PathBuf,

    /// Base model identifier
    #[arg(long)]
    pub model_name: Option<String>,

    /// Random seed shared by every stage
    #[arg(long)]
    pub seed: Option<u64>,

    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,
}

impl From<&InitConfigArgs> for RunConfig {
    fn from(a: &InitConfigArgs) -> Self {
        let mut cfg = RunConfig::default();
        if let Some(name) = &a.model_name {
            cfg.model.model_name = name.clone();
        }
        if let Some(seed) = a.seed {
            cfg.seed = seed;
        }
        cfg
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_defaults() {
        let args = FormatArgs {
            dataset: DatasetArgs {
                input:      Some(PathBuf::from("in.jsonl")),
                eos_token:  Some("</s>".into()),
                text_field: Some("content".into()),
                ..DatasetArgs::default()
            },
            output:       PathBuf::from("out.jsonl"),
            batch_size:   Some(16),
            num_proc:     None,
            dataset_info: None,
            report_csv:   None,
            json:         false,
        };
        let cfg = args.resolve().unwrap();
        assert_eq!(cfg.dataset.train_file, PathBuf::from("in.jsonl"));
        assert_eq!(cfg.dataset.eos_token.as_deref(), Some("</s>"));
        assert_eq!(cfg.dataset.text_field, "content");
        assert_eq!(cfg.dataset.batch_size, 16);
        assert_eq!(cfg.dataset.num_proc, 8);
    }

    #[test]
    fn test_flags_override_config_file() {
        let dir  = tempfile::tempdir().unwrap();
        let path = dir.path().join("run_config.json");
        let mut base = RunConfig::default();
        base.dataset.eos_token = Some("<eos>".into());
        base.dataset.text_field = "body".into();
        ConfigStore::new(&path).save(&base).unwrap();

        let args = DatasetArgs {
            config:    Some(path),
            eos_token: Some("</s>".into()),
            ..DatasetArgs::default()
        };
        let cfg = args.resolve().unwrap();
        assert_eq!(cfg.dataset.eos_token.as_deref(), Some("</s>"));
        assert_eq!(cfg.dataset.text_field, "body");
    }

    #[test]
    fn test_init_config_args_into_run_config() {
        let args = InitConfigArgs {
            output:     PathBuf::from("x.json"),
            model_name: Some("unsloth/Llama-3.2-1B-Instruct-bnb-4bit".into()),
            seed:       None,
            force:      false,
        };
        let cfg = RunConfig::from(&args);
        assert_eq!(cfg.model.model_name, "unsloth/Llama-3.2-1B-Instruct-bnb-4bit");
        assert_eq!(cfg.seed, 3407);
    }
}
