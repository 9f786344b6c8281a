// ============================================================
// Layer 2 — Run Configuration
// ============================================================
// Everything a fine-tuning run needs to know, in one explicit,
// serialisable struct, instead of values scattered across
// notebook cells and shared through process-wide globals.
//
// Sections:
//   model    → which base model, sequence length, quantization
//   lora     → adapter rank / alpha / dropout / target modules
//   training → trainer hyperparameters
//   dataset  → where the JSONL lives and how to format it
//   export   → checkpoint quantization for the serving runtime
//   seed     → one seed for every stage
//
// Only the `dataset` section drives code in this crate. The
// other sections describe the run for the external trainer and
// exporter, and are validated and persisted alongside it.
//
// Defaults are the values used by the SmolLM2-135M recipe.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::domain::error::FormatError;

// ─── Model ────────────────────────────────────────────────────────────────────
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuantizationMode {
    /// Full-precision weights
    #[serde(rename = "none")]
    None,
    /// bitsandbytes 4-bit
    #[serde(rename = "bnb_4bit")]
    Bnb4Bit,
    /// bitsandbytes 8-bit
    #[serde(rename = "bnb_8bit")]
    Bnb8Bit,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub model_name:     String,
    pub max_seq_length: usize,
    pub quantization:   QuantizationMode,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            model_name:     "unsloth/SmolLM2-135M-bnb-4bit".to_string(),
            max_seq_length: 2048,
            quantization:   QuantizationMode::Bnb4Bit,
        }
    }
}

// ─── LoRA ─────────────────────────────────────────────────────────────────────
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoraConfig {
    pub rank:                   usize,
    pub alpha:                  f64,
    pub dropout:                f64,
    pub bias:                   String,
    pub use_rslora:             bool,
    pub gradient_checkpointing: String,
    pub target_modules:         Vec<String>,
}

impl Default for LoraConfig {
    fn default() -> Self {
        Self {
            rank:                   128,
            alpha:                  64.0,
            dropout:                0.0,
            bias:                   "none".to_string(),
            use_rslora:             true,
            gradient_checkpointing: "unsloth".to_string(),
            target_modules: [
                "q_proj", "k_proj", "v_proj", "o_proj",
                "gate_proj", "up_proj", "down_proj",
                "lm_head", "embed_tokens",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        }
    }
}

// ─── Training ─────────────────────────────────────────────────────────────────
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    pub per_device_train_batch_size: usize,
    pub gradient_accumulation_steps: usize,
    pub warmup_ratio:                f64,
    pub num_train_epochs:            usize,
    pub learning_rate:               f64,
    pub embedding_learning_rate:     f64,
    pub optim:                       String,
    pub weight_decay:                f64,
    pub lr_scheduler_type:           String,
    pub output_dir:                  String,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            per_device_train_batch_size: 2,
            gradient_accumulation_steps: 8,
            warmup_ratio:                0.1,
            num_train_epochs:            3,
            learning_rate:               5e-5,
            embedding_learning_rate:     5e-6,
            optim:                       "adamw_8bit".to_string(),
            weight_decay:                0.0,
            lr_scheduler_type:           "cosine".to_string(),
            output_dir:                  "outputs".to_string(),
        }
    }
}

// ─── Dataset ──────────────────────────────────────────────────────────────────
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    /// Input .jsonl file
    pub train_file: PathBuf,

    /// Name of the field holding the training text
    pub text_field: String,

    /// Literal terminator; wins over `tokenizer_dir`
    pub eos_token: Option<String>,

    /// Model directory holding tokenizer_config.json
    pub tokenizer_dir: Option<PathBuf>,

    /// Records formatted per batch
    pub batch_size: usize,

    /// Worker threads; 1 means batched, single-threaded formatting
    pub num_proc: usize,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            train_file:    PathBuf::from("train.jsonl"),
            text_field:    "text".to_string(),
            eos_token:     None,
            tokenizer_dir: None,
            batch_size:    1000,
            num_proc:      8,
        }
    }
}

// ─── Export ───────────────────────────────────────────────────────────────────
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub quantization_method: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self { quantization_method: "q4_k_m".to_string() }
    }
}

// ─── RunConfig ────────────────────────────────────────────────────────────────
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub model:    ModelConfig,
    pub lora:     LoraConfig,
    pub training: TrainingConfig,
    pub dataset:  DatasetConfig,
    pub export:   ExportConfig,
    pub seed:     u64,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            model:    ModelConfig::default(),
            lora:     LoraConfig::default(),
            training: TrainingConfig::default(),
            dataset:  DatasetConfig::default(),
            export:   ExportConfig::default(),
            seed:     3407,
        }
    }
}

impl RunConfig {
    /// Reject values no trainer could run with.
    pub fn validate(&self) -> Result<()> {
        let d = &self.dataset;
        if d.text_field.is_empty() {
            bail!("dataset.text_field must not be empty");
        }
        if d.batch_size == 0 {
            bail!("dataset.batch_size must be greater than zero");
        }
        if d.num_proc == 0 {
            bail!("dataset.num_proc must be greater than zero");
        }
        if matches!(&d.eos_token, Some(t) if t.is_empty()) {
            return Err(FormatError::EmptyTerminator)
                .context("dataset.eos_token must not be empty");
        }

        if self.model.max_seq_length == 0 {
            bail!("model.max_seq_length must be greater than zero");
        }

        let l = &self.lora;
        if l.rank == 0 {
            bail!("lora.rank must be greater than zero");
        }
        if l.alpha <= 0.0 {
            bail!("lora.alpha must be positive (got {})", l.alpha);
        }
        if !(0.0..1.0).contains(&l.dropout) {
            bail!("lora.dropout must be in [0, 1) (got {})", l.dropout);
        }

        let t = &self.training;
        if !(0.0..1.0).contains(&t.warmup_ratio) {
            bail!("training.warmup_ratio must be in [0, 1) (got {})", t.warmup_ratio);
        }
        if t.learning_rate <= 0.0 || t.embedding_learning_rate <= 0.0 {
            bail!("training learning rates must be positive");
        }
        if t.per_device_train_batch_size == 0 || t.gradient_accumulation_steps == 0 {
            bail!("training batch size and accumulation steps must be greater than zero");
        }

        Ok(())
    }

    /// Effective number of records per optimizer step
    pub fn effective_batch_size(&self) -> usize {
        self.training.per_device_train_batch_size * self.training.gradient_accumulation_steps
    }
}
