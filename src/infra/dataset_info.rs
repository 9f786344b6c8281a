// ============================================================
// Layer 6 — LLaMA-Factory Dataset Registration
// ============================================================
// LLaMA-Factory finds local datasets through a dataset_info.json
// in its data directory:
//
//   {
//     "my_dataset": {
//       "file_name": "train.jsonl",
//       "columns": { "prompt": "text" }
//     }
//   }
//
// "columns.prompt" names the field that holds the training text.
// An existing file is merged: other datasets registered in it
// are kept, an entry with the same name is replaced.
//
// load() and save() are separate so a caller can reject a broken
// file before it writes any of its own output.

use anyhow::{bail, Context, Result};
use serde_json::{json, Map, Value};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// An in-memory dataset_info.json, read before anything is written.
pub struct DatasetInfo {
    path:    PathBuf,
    entries: Map<String, Value>,
}

impl DatasetInfo {
    /// Read `<dir>/dataset_info.json`, or start empty if it does not exist.
    pub fn load(dir: &Path) -> Result<Self> {
        let path = dir.join("dataset_info.json");
        let entries = if path.exists() {
            let raw = fs::read_to_string(&path)
                .with_context(|| format!("Cannot read '{}'", path.display()))?;
            serde_json::from_str(&raw)
                .with_context(|| format!("'{}' is not a JSON object", path.display()))?
        } else {
            Map::new()
        };
        Ok(Self { path, entries })
    }

    /// Add or replace dataset `name`
    pub fn register(&mut self, name: &str, file_name: &str, text_field: &str) -> Result<()> {
        if name.is_empty() {
            bail!("dataset name must not be empty");
        }
        self.entries.insert(
            name.to_string(),
            json!({
                "file_name": file_name,
                "columns": { "prompt": text_field },
            }),
        );
        Ok(())
    }

    pub fn save(&self) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() {
                fs::create_dir_all(dir)
                    .with_context(|| format!("Cannot create '{}'", dir.display()))?;
            }
        }
        fs::write(&self.path, serde_json::to_string_pretty(&self.entries)?)
            .with_context(|| format!("Cannot write '{}'", self.path.display()))?;

        tracing::info!("Updated '{}' ({} datasets)", self.path.display(), self.entries.len());
        Ok(())
    }
}
