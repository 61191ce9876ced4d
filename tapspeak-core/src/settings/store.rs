//! Durable storage for the serialized settings record. A single document;
//! loss on storage clear is acceptable.

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

pub trait SettingsStore: Send + Sync {
    /// Returns the stored document, or `None` if nothing has been saved.
    fn load(&self) -> Result<Option<String>>;

    fn save(&self, contents: &str) -> Result<()>;
}

/// File-backed store at `~/.tapspeak/settings.json` (or a custom path).
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir().context("Failed to get home directory")?;
        Ok(home.join(".tapspeak").join("settings.json"))
    }
}

impl SettingsStore for FileStore {
    fn load(&self) -> Result<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read settings from {:?}", self.path))?;
        Ok(Some(contents))
    }

    fn save(&self, contents: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {parent:?}"))?;
        }
        fs::write(&self.path, contents)
            .with_context(|| format!("Failed to write settings to {:?}", self.path))
    }
}

/// In-memory store for tests and embedding.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Option<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_contents(contents: &str) -> Self {
        Self {
            inner: Mutex::new(Some(contents.to_string())),
        }
    }
}

impl SettingsStore for MemoryStore {
    fn load(&self) -> Result<Option<String>> {
        Ok(self.inner.lock().unwrap().clone())
    }

    fn save(&self, contents: &str) -> Result<()> {
        *self.inner.lock().unwrap() = Some(contents.to_string());
        Ok(())
    }
}
