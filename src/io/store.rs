//! File-backed key-value persistence.
//!
//! The engine's storage contract is deliberately tiny: string values under
//! string keys, one key each for the forest, the UI fold-state, and the
//! log collection. Keys map to JSON files in the data directory. Saves are
//! best-effort and atomic (write-then-rename); loads fall back to defaults
//! on anything missing or corrupt, since every key is independently
//! recoverable.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::io::state::FoldState;
use crate::model::log::LogEntry;
use crate::model::node::Forest;

pub const FOREST_KEY: &str = "threads";
pub const FOLD_STATE_KEY: &str = "ui";
pub const LOGS_KEY: &str = "logs";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("cannot write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("cannot encode value: {0}")]
    Encode(#[from] serde_json::Error),
}

pub struct Store {
    dir: PathBuf,
}

impl Store {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Store { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    /// Raw read. Missing or unreadable values are `None`.
    pub fn get(&self, key: &str) -> Option<String> {
        fs::read_to_string(self.path_for(key)).ok()
    }

    /// Raw write, atomic via a temp file in the same directory.
    pub fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let path = self.path_for(key);
        fs::create_dir_all(&self.dir).map_err(|source| StoreError::Write {
            path: self.dir.clone(),
            source,
        })?;
        let mut tmp = tempfile::NamedTempFile::new_in(&self.dir)
            .map_err(|source| StoreError::Write { path: path.clone(), source })?;
        tmp.write_all(value.as_bytes())
            .map_err(|source| StoreError::Write { path: path.clone(), source })?;
        tmp.persist(&path)
            .map_err(|e| StoreError::Write { path, source: e.error })?;
        Ok(())
    }

    // -----------------------------------------------------------------
    // Typed wrappers
    // -----------------------------------------------------------------

    pub fn load_forest(&self) -> Forest {
        self.load_or_default(FOREST_KEY)
    }

    pub fn save_forest(&self, forest: &Forest) -> Result<(), StoreError> {
        self.save(FOREST_KEY, forest)
    }

    pub fn load_fold_state(&self) -> FoldState {
        self.load_or_default(FOLD_STATE_KEY)
    }

    pub fn save_fold_state(&self, state: &FoldState) -> Result<(), StoreError> {
        self.save(FOLD_STATE_KEY, state)
    }

    pub fn load_logs(&self) -> Vec<LogEntry> {
        self.load_or_default(LOGS_KEY)
    }

    pub fn save_logs(&self, logs: &[LogEntry]) -> Result<(), StoreError> {
        self.save(LOGS_KEY, &logs)
    }

    fn load_or_default<T: serde::de::DeserializeOwned + Default>(&self, key: &str) -> T {
        let Some(raw) = self.get(key) else {
            return T::default();
        };
        match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!(key, %err, "stored value is corrupt, starting from default");
                T::default()
            }
        }
    }

    fn save<T: serde::Serialize>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let raw = serde_json::to_string_pretty(value)?;
        self.set(key, &raw)
    }
}
