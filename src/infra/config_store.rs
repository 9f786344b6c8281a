// ============================================================
// Layer 6 — Config Store
// ============================================================
// Saves and restores a RunConfig as pretty-printed JSON.
//
// Why persist the config?
//   The trainer, the exporter and this formatter all run at
//   different times. Writing the config once and reading it
//   back in every stage keeps them on the same model, the
//   same seed and the same text field.
//
// File layout:
//   <path>              ← e.g. run_config.json

use anyhow::{Context, Result};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::application::run_config::RunConfig;

pub struct ConfigStore {
    /// Path of the JSON file
    path: PathBuf,
}

impl ConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write `cfg` to disk, creating parent directories.
    /// Refuses an invalid config so a broken file is never produced.
    pub fn save(&self, cfg: &RunConfig) -> Result<()> {
        cfg.validate()?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Cannot create directory '{}'", parent.display()))?;
            }
        }

        let json = serde_json::to_string_pretty(cfg)?;
        fs::write(&self.path, json)
            .with_context(|| format!("Cannot write config to '{}'", self.path.display()))?;

        tracing::debug!("Saved run config to '{}'", self.path.display());
        Ok(())
    }

    /// Read and validate a config. Missing keys take their defaults.
    pub fn load(&self) -> Result<RunConfig> {
        let json = fs::read_to_string(&self.path).with_context(|| {
            format!(
                "Cannot read config from '{}'. \
                 Run 'init-config' to create one.",
                self.path.display()
            )
        })?;

        let cfg: RunConfig = serde_json::from_str(&json)
            .with_context(|| format!("Invalid config '{}'", self.path.display()))?;
        cfg.validate()
            .with_context(|| format!("Invalid config '{}'", self.path.display()))?;

        tracing::debug!("Loaded run config from '{}'", self.path.display());
        Ok(cfg)
    }
}
