//! Progress persistence.
//!
//! `ProgressStore` keeps one JSON snapshot in a single named slot of a
//! key-value backend. Persistence is best-effort: backend failures are logged
//! and swallowed, and unreadable snapshots are treated as absent.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer, Serialize};

use crate::model::AnswerMap;

/// Default slot name.
pub const DEFAULT_STORAGE_KEY: &str = "quiz_progress";

/// Serialized projection of an in-progress session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressSnapshot {
    #[serde(
        default,
        rename = "userAnswers",
        deserialize_with = "null_as_default"
    )]
    pub answers: AnswerMap,
    #[serde(default, deserialize_with = "null_as_default")]
    pub current_index: usize,
    #[serde(default, deserialize_with = "null_as_default")]
    pub elapsed_seconds: u64,
    #[serde(default, rename = "isStarted", deserialize_with = "null_as_default")]
    pub started: bool,
}

/// Missing and `null` fields both mean "use the default".
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A storage medium with string keys and string values.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any existing value.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove `key`. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<()>;
}

/// In-memory backend. Can be told to fail, to exercise the best-effort paths.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    entries: Mutex<HashMap<String, String>>,
    failing: AtomicBool,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent operation fail (or succeed again).
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::Relaxed);
    }

    /// Raw value under `key`, bypassing the failure switch.
    pub fn raw(&self, key: &str) -> Option<String> {
        self.lock().get(key).cloned()
    }

    /// Write a raw value under `key`, bypassing the failure switch.
    pub fn put_raw(&self, key: &str, value: &str) {
        self.lock().insert(key.to_string(), value.to_string());
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn check(&self) -> Result<()> {
        if self.failing.load(Ordering::Relaxed) {
            anyhow::bail!("storage unavailable");
        }
        Ok(())
    }
}

impl KeyValueStore for MemoryBackend {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.check()?;
        Ok(self.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.check()?;
        self.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.check()?;
        self.lock().remove(key);
        Ok(())
    }
}

/// Backend that keeps each key as `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileBackend {
    dir: PathBuf,
}

impl FileBackend {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path of the file holding `key`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStore for FileBackend {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        match std::fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("failed to read {}", path.display())),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("failed to create {}", self.dir.display()))?;
        let path = self.path_for(key);
        // Write-then-rename so a crash never leaves a half-written snapshot.
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, value).with_context(|| format!("failed to write {}", tmp.display()))?;
        std::fs::rename(&tmp, &path)
            .with_context(|| format!("failed to replace {}", path.display()))?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.path_for(key);
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_context(|| format!("failed to remove {}", path.display())),
        }
    }
}

/// Best-effort save/load/clear of a single `ProgressSnapshot`.
#[derive(Clone)]
pub struct ProgressStore {
    backend: Arc<dyn KeyValueStore>,
    key: String,
}

impl ProgressStore {
    pub fn new(backend: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            backend,
            key: key.into(),
        }
    }

    /// Persist `snapshot`. Failures are logged and otherwise ignored.
    pub fn save(&self, snapshot: &ProgressSnapshot) {
        let result = serde_json::to_string(snapshot)
            .context("failed to serialize progress")
            .and_then(|json| self.backend.set(&self.key, &json));
        if let Err(e) = result {
            tracing::warn!(key = %self.key, "could not save progress: {e:#}");
        }
    }

    /// Read the stored snapshot. Missing, unreadable, or malformed data all
    /// yield `None`.
    pub fn load(&self) -> Option<ProgressSnapshot> {
        let raw = match self.backend.get(&self.key) {
            Ok(raw) => raw?,
            Err(e) => {
                tracing::warn!(key = %self.key, "could not read progress: {e:#}");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                tracing::warn!(key = %self.key, "discarding malformed progress: {e}");
                None
            }
        }
    }

    /// Remove the stored snapshot. Idempotent; failures are logged.
    pub fn clear(&self) {
        if let Err(e) = self.backend.remove(&self.key) {
            tracing::warn!(key = %self.key, "could not clear progress: {e:#}");
        }
    }

    /// Whether a usable snapshot is stored.
    pub fn exists(&self) -> bool {
        self.load().is_some()
    }
}

impl std::fmt::Debug for ProgressStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProgressStore")
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}
