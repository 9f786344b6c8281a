// ============================================================
// Layer 6 — Tokenizer Store
// ============================================================
// Resolves the end-of-sequence terminator from a Hugging Face
// model directory, the way a training notebook reads
// `tokenizer.eos_token`.
//
// Files consulted inside the directory:
//   tokenizer_config.json → "eos_token" (a string, or an object
//                           {"content": "...", ...} as written by
//                           newer transformers versions)
//   tokenizer.json        → optional; when present the EOS token
//                           must exist in its vocabulary, otherwise
//                           the model would see it as plain text
//
// Only the terminator string leaves this module. Nothing here is
// ever tokenised.

use anyhow::{anyhow, Context, Result};
use serde_json::Value;
use std::{fs, path::PathBuf};
use tokenizers::Tokenizer;

use crate::domain::error::FormatError;
use crate::domain::terminator::TerminatorToken;
use crate::domain::traits::TerminatorSource;

pub struct TokenizerStore {
    dir: PathBuf,
}

impl TokenizerStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Read the raw eos_token entry from tokenizer_config.json
    fn read_eos_token(&self) -> Result<String> {
        let path = self.dir.join("tokenizer_config.json");
        let json = fs::read_to_string(&path)
            .with_context(|| format!("Cannot read tokenizer config '{}'", path.display()))?;
        let config: Value = serde_json::from_str(&json)
            .with_context(|| format!("Invalid JSON in '{}'", path.display()))?;

        eos_from_config(&config).ok_or_else(|| {
            anyhow!(FormatError::EmptyTerminator)
                .context(format!("No eos_token in '{}'", path.display()))
        })
    }

    /// Load tokenizer.json, if the directory has one
    fn load_tokenizer(&self) -> Result<Option<Tokenizer>> {
        let path = self.dir.join("tokenizer.json");
        if !path.exists() {
            return Ok(None);
        }
        let tokenizer = Tokenizer::from_file(&path)
            .map_err(|e| anyhow!("Cannot load tokenizer from '{}': {}", path.display(), e))?;
        Ok(Some(tokenizer))
    }
}

impl TerminatorSource for TokenizerStore {
    fn terminator(&self) -> Result<TerminatorToken> {
        let eos = self.read_eos_token()?;
        let terminator = TerminatorToken::new(eos)
            .with_context(|| format!("Empty eos_token in '{}'", self.dir.display()))?;

        match self.load_tokenizer()? {
            Some(tokenizer) => {
                let id = tokenizer.token_to_id(terminator.as_str()).ok_or_else(|| {
                    anyhow!(
                        "eos_token '{}' is not in the vocabulary of '{}'",
                        terminator,
                        self.dir.join("tokenizer.json").display()
                    )
                })?;
                tracing::info!("Resolved terminator '{}' (id {})", terminator, id);
            }
            None => {
                tracing::warn!(
                    "No tokenizer.json in '{}', using eos_token '{}' unchecked",
                    self.dir.display(),
                    terminator
                );
            }
        }

        Ok(terminator)
    }
}

/// Extract eos_token from a parsed tokenizer_config.json.
///
/// Returns None when the key is absent, null, or not a usable string.
/// An empty string is returned as-is; TerminatorToken rejects it.
fn eos_from_config(config: &Value) -> Option<String> {
    match config.get("eos_token")? {
        Value::String(s) => Some(s.clone()),
        Value::Object(obj) => obj.get("content")?.as_str().map(str::to_string),
        _ => None,
    }
}
