//! Persistent history storage.
//!
//! Storage is a plain string key/value store (the same shape as browser
//! `localStorage`). History lives under a single key as a JSON array
//! snapshot. Durability is a convenience: read and write failures are logged
//! and swallowed, never surfaced to the user.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use super::{AnalysisRecord, History};

/// Storage key holding the serialized history snapshot.
pub const HISTORY_KEY: &str = "sentimentHistory";

// ---------------------------------------------------------------------------
// Key/value collaborator
// ---------------------------------------------------------------------------

/// String key/value storage backend.
pub trait KeyValueStore {
    /// Read the value under `key`, `Ok(None)` if it was never written.
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// File-backed store: one `<key>.json` file per key inside a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file backing `key`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Ok(Some(content))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("failed to create {}", self.dir.display()))?;
        let path = self.path_for(key);
        fs::write(&path, value).with_context(|| format!("failed to write {}", path.display()))
    }
}

/// In-memory store. `fail_reads` / `fail_writes` simulate a broken backend.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
    pub fail_reads: bool,
    pub fail_writes: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raw(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        if self.fail_reads {
            anyhow::bail!("storage read unavailable");
        }
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        if self.fail_writes {
            anyhow::bail!("storage quota exceeded");
        }
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// History store
// ---------------------------------------------------------------------------

/// Loads and saves [`History`] snapshots on top of a [`KeyValueStore`].
#[derive(Debug)]
pub struct HistoryStore<S> {
    backend: S,
    capacity: usize,
}

impl<S: KeyValueStore> HistoryStore<S> {
    pub fn new(backend: S, capacity: usize) -> Self {
        Self { backend, capacity }
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut S {
        &mut self.backend
    }

    /// Load the persisted history.
    ///
    /// Returns an empty history when nothing is stored or the snapshot can't
    /// be read or decoded.
    pub fn load(&self) -> History {
        match self.try_load() {
            Ok(history) => history,
            Err(e) => {
                tracing::warn!("could not load history: {e:#}");
                History::with_capacity(self.capacity)
            }
        }
    }

    /// Persist `history`. Failures are logged and otherwise ignored.
    pub fn save(&mut self, history: &History) {
        if let Err(e) = self.try_save(history) {
            tracing::warn!("could not save history: {e:#}");
        }
    }

    fn try_load(&self) -> Result<History> {
        let Some(raw) = self.backend.get(HISTORY_KEY)? else {
            return Ok(History::with_capacity(self.capacity));
        };
        let records: Vec<AnalysisRecord> =
            serde_json::from_str(&raw).context("history snapshot is not valid JSON")?;
        tracing::debug!(records = records.len(), "loaded history snapshot");
        Ok(History::from_records(records, self.capacity))
    }

    fn try_save(&mut self, history: &History) -> Result<()> {
        let json =
            serde_json::to_string(history.records()).context("failed to serialize history")?;
        self.backend.set(HISTORY_KEY, &json)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
