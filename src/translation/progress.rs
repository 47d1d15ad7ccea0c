/*!
 * Durable translation progress tracking.
 *
 * The progress record is the resume point for interrupted runs: it is
 * loaded when the orchestrator starts and overwritten atomically after
 * every chunk outcome, so a crash loses at most the in-flight chunk.
 */

use anyhow::{anyhow, Context, Result};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Completed/failed chunk-id bookkeeping.
///
/// `completed` only grows; an id is removed from `failed` the moment the
/// chunk succeeds on a later attempt or run.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TranslationProgress {
    /// Ids of chunks with a persisted accepted or degraded result
    #[serde(default)]
    pub completed: BTreeSet<String>,

    /// Ids of chunks that produced no usable result
    #[serde(default)]
    pub failed: BTreeSet<String>,
}

impl TranslationProgress {
    /// Record a successful outcome for a chunk id
    pub fn mark_completed(&mut self, id: &str) {
        self.completed.insert(id.to_string());
        self.failed.remove(id);
    }

    /// Record that a chunk produced no usable result
    pub fn mark_failed(&mut self, id: &str) {
        if !self.completed.contains(id) {
            self.failed.insert(id.to_string());
        }
    }

    /// Whether a chunk is already done from this or a prior run
    pub fn is_completed(&self, id: &str) -> bool {
        self.completed.contains(id)
    }
}

/// Loads and persists the progress record as a JSON file
#[derive(Debug, Clone)]
pub struct ProgressStore {
    path: PathBuf,
}

impl ProgressStore {
    /// Create a store backed by the given file path
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the progress record.
    ///
    /// A missing or unreadable file yields a fresh record; a half-written
    /// file from a crash must not block a new run.
    pub fn load(&self) -> TranslationProgress {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(progress) => progress,
                Err(e) => {
                    warn!(
                        "Progress file {:?} is not valid JSON ({}), starting fresh",
                        self.path, e
                    );
                    TranslationProgress::default()
                }
            },
            Err(_) => {
                debug!("No progress file at {:?}, starting fresh", self.path);
                TranslationProgress::default()
            }
        }
    }

    /// Persist the progress record with an atomic overwrite.
    ///
    /// Written to a temp file in the same directory and renamed into place
    /// so readers never observe a partial record.
    pub fn save(&self, progress: &TranslationProgress) -> Result<()> {
        let parent = self
            .path
            .parent()
            .ok_or_else(|| anyhow!("Progress path {:?} has no parent directory", self.path))?;
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {:?}", parent))?;

        let content = serde_json::to_string_pretty(progress)?;
        let temp = NamedTempFile::new_in(parent)
            .with_context(|| format!("Failed to create temp file in {:?}", parent))?;
        std::fs::write(temp.path(), content)
            .with_context(|| format!("Failed to write progress to {:?}", temp.path()))?;
        temp.persist(&self.path)
            .map_err(|e| anyhow!("Failed to replace progress file {:?}: {}", self.path, e))?;

        Ok(())
    }
}
