//! Settings persistence

use super::kv::KvStorage;
use crate::{Result, models::Settings};
use std::path::PathBuf;
use std::sync::Mutex;

/// Storage key holding the settings record
pub const SETTINGS_KEY: &str = "readiness-settings";

/// Durable get/set of the settings record
pub trait SettingsStore: Send + Sync {
    /// The stored record, or `None` if nothing has been saved yet
    fn load(&self) -> Result<Option<Settings>>;

    /// Overwrite the stored record
    fn save(&self, settings: &Settings) -> Result<()>;
}

/// Current settings, all checks enabled when nothing is stored
pub fn get_settings(store: &dyn SettingsStore) -> Result<Settings> {
    Ok(store.load()?.unwrap_or_default())
}

/// Replace the stored settings wholesale and echo them back
pub fn save_settings(store: &dyn SettingsStore, settings: Settings) -> Result<Settings> {
    store.save(&settings)?;
    Ok(settings)
}

/// Settings kept under [`SETTINGS_KEY`] in a key-value JSON file
pub struct FileSettingsStore {
    storage: KvStorage,
}

impl FileSettingsStore {
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            storage: KvStorage::in_dir(data_dir),
        }
    }
}

impl SettingsStore for FileSettingsStore {
    fn load(&self) -> Result<Option<Settings>> {
        match self.storage.get(SETTINGS_KEY)? {
            Some(value) if !value.is_null() => Ok(Some(serde_json::from_value(value)?)),
            _ => Ok(None),
        }
    }

    fn save(&self, settings: &Settings) -> Result<()> {
        self.storage.set(SETTINGS_KEY, serde_json::to_value(settings)?)
    }
}

#[derive(Default)]
pub struct MemorySettingsStore {
    settings: Mutex<Option<Settings>>,
}

impl MemorySettingsStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SettingsStore for MemorySettingsStore {
    fn load(&self) -> Result<Option<Settings>> {
        Ok(*self.settings.lock().unwrap_or_else(|e| e.into_inner()))
    }

    fn save(&self, settings: &Settings) -> Result<()> {
        *self.settings.lock().unwrap_or_else(|e| e.into_inner()) = Some(*settings);
        Ok(())
    }
}
