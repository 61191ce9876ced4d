use anyhow::{Context, Result};
use std::sync::{Arc, Mutex};
use tracing::warn;

use crate::settings::config::Settings;
use crate::settings::store::{FileStore, SettingsStore};
use crate::text::segment::DelimiterMode;
use crate::tts::types::ProviderKind;

/// Session-wide settings handle. One shared instance; reads hand out an
/// immutable snapshot and every explicit update immediately re-persists the
/// full record through the injected store.
#[derive(Clone)]
pub struct SettingsManager {
    store: Arc<dyn SettingsStore>,
    inner: Arc<Mutex<Settings>>,
}

impl SettingsManager {
    /// Settings backed by the default file location.
    pub fn new() -> Result<Self> {
        let path = FileStore::default_path()?;
        Ok(Self::with_store(Arc::new(FileStore::new(path))))
    }

    pub fn with_store(store: Arc<dyn SettingsStore>) -> Self {
        let loaded = Self::load_or_default(store.as_ref());
        Self {
            store,
            inner: Arc::new(Mutex::new(loaded)),
        }
    }

    /// Loads the stored record merged over defaults. Missing keys keep their
    /// defaults; absent or corrupt data falls back wholesale without raising.
    fn load_or_default(store: &dyn SettingsStore) -> Settings {
        match store.load() {
            Ok(Some(contents)) => match serde_json::from_str(&contents) {
                Ok(settings) => settings,
                Err(e) => {
                    warn!(error = %e, "stored settings are corrupt, using defaults");
                    Settings::default()
                }
            },
            Ok(None) => Settings::default(),
            Err(e) => {
                warn!(error = %e, "failed to load settings, using defaults");
                Settings::default()
            }
        }
    }

    /// Immutable snapshot of the current settings.
    pub fn settings(&self) -> Settings {
        self.inner.lock().unwrap().clone()
    }

    fn update<F>(&self, updater: F) -> Result<()>
    where
        F: FnOnce(&mut Settings),
    {
        let mut guard = self.inner.lock().unwrap();
        updater(&mut guard);
        let contents =
            serde_json::to_string_pretty(&*guard).context("Failed to serialize settings")?;
        self.store.save(&contents)
    }

    pub fn set_api_key(&self, kind: ProviderKind, key: String) -> Result<()> {
        self.update(|settings| settings.api_keys.set(kind, key))
    }

    pub fn set_active_provider(&self, kind: ProviderKind) -> Result<()> {
        self.update(|settings| settings.active_provider = kind)
    }

    pub fn set_voice(&self, kind: ProviderKind, voice_id: String) -> Result<()> {
        self.update(|settings| settings.voice_settings.set(kind, voice_id))
    }

    pub fn set_split_delimiter(&self, mode: DelimiterMode) -> Result<()> {
        self.update(|settings| settings.split_delimiter = mode)
    }
}
