//! File-based watermark store.
//! Keeps the last check time between audit sessions as a small JSON file.
//! Only written when the caller decides a run should advance the watermark.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use motash_core::{MotashError, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
struct WatermarkFile {
    last_check: DateTime<Utc>,
}

pub struct WatermarkStore {
    path: PathBuf,
}

impl WatermarkStore {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }

    /// Load the stored watermark. Missing or unreadable files mean "never checked".
    pub fn load(&self) -> Option<DateTime<Utc>> {
        if !self.path.exists() {
            return None;
        }
        match std::fs::read_to_string(&self.path) {
            Ok(json) => match serde_json::from_str::<WatermarkFile>(&json) {
                Ok(file) => Some(file.last_check),
                Err(e) => {
                    tracing::warn!("⚠️ Failed to parse {}: {e}", self.path.display());
                    None
                }
            },
            Err(e) => {
                tracing::warn!("⚠️ Failed to read {}: {e}", self.path.display());
                None
            }
        }
    }

    /// Persist a new watermark.
    pub fn save(&self, last_check: DateTime<Utc>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| MotashError::State(format!("Create {}: {e}", parent.display())))?;
        }
        let json = serde_json::to_string_pretty(&WatermarkFile { last_check })?;
        std::fs::write(&self.path, json)
            .map_err(|e| MotashError::State(format!("Write {}: {e}", self.path.display())))?;
        tracing::debug!("💾 Watermark {last_check} saved to {}", self.path.display());
        Ok(())
    }
}
