//! quizkit configuration.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::store::{FileBackend, ProgressStore, DEFAULT_STORAGE_KEY};

/// Top-level quizkit configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizConfig {
    /// Name of the slot that holds saved progress.
    #[serde(default = "default_storage_key")]
    pub storage_key: String,
    /// Directory for the file-backed progress store.
    #[serde(default = "default_state_dir")]
    pub state_dir: PathBuf,
    /// Ask for confirmation before submitting.
    #[serde(default = "default_true")]
    pub confirm_submit: bool,
}

fn default_storage_key() -> String {
    DEFAULT_STORAGE_KEY.to_string()
}
fn default_state_dir() -> PathBuf {
    PathBuf::from("./.quizkit")
}
fn default_true() -> bool {
    true
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            storage_key: default_storage_key(),
            state_dir: default_state_dir(),
            confirm_submit: true,
        }
    }
}

impl QuizConfig {
    /// A progress store in `state_dir` under `storage_key`.
    pub fn progress_store(&self) -> ProgressStore {
        ProgressStore::new(
            Arc::new(FileBackend::new(&self.state_dir)),
            self.storage_key.clone(),
        )
    }
}

/// Load config from an explicit path, or search the default locations.
///
/// Search order without an explicit path:
/// 1. `quizkit.toml` in the current directory
/// 2. `~/.config/quizkit/config.toml`
///
/// Environment variable overrides: `QUIZKIT_STATE_DIR`, `QUIZKIT_STORAGE_KEY`.
pub fn load_config_from(path: Option<&Path>) -> Result<QuizConfig> {
    let config_path = match path {
        Some(p) if p.exists() => Some(p.to_path_buf()),
        Some(p) => anyhow::bail!("config file not found: {}", p.display()),
        None => {
            let local = PathBuf::from("quizkit.toml");
            if local.exists() {
                Some(local)
            } else {
                dirs_path()
                    .map(|home| home.join("config.toml"))
                    .filter(|global| global.exists())
            }
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            parse_config(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => QuizConfig::default(),
    };

    if let Ok(dir) = std::env::var("QUIZKIT_STATE_DIR") {
        config.state_dir = PathBuf::from(dir);
    }
    if let Ok(key) = std::env::var("QUIZKIT_STORAGE_KEY") {
        config.storage_key = key;
    }

    anyhow::ensure!(
        !config.storage_key.trim().is_empty(),
        "storage_key must not be empty"
    );

    Ok(config)
}

/// Parse a TOML config string.
pub fn parse_config(content: &str) -> Result<QuizConfig> {
    Ok(toml::from_str(content)?)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("quizkit"))
}
