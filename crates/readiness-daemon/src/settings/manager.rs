//! Settings manager

use std::path::PathBuf;
use std::sync::Arc;

use crate::event_manager::EventManager;
use crate::events::SettingsEvent;
use readiness_core::{
    Result as CoreResult,
    models::Settings,
    storage::{FileSettingsStore, SettingsStore, get_settings, init_data_dir, save_settings},
};

#[derive(Debug, thiserror::Error)]
pub enum SettingsManagerError {
    #[error("Storage error: {0}")]
    Storage(#[from] readiness_core::Error),
}

pub type Result<T> = std::result::Result<T, SettingsManagerError>;

/// Reads and writes the readiness settings record.
///
/// Settings are read from the store on every call; nothing is cached.
pub struct SettingsManager {
    store: Arc<dyn SettingsStore>,
    event_manager: Arc<EventManager>,
}

impl SettingsManager {
    /// Manager over `storage.json` in the platform data directory
    pub fn new(event_manager: Arc<EventManager>) -> CoreResult<Self> {
        Ok(Self::with_dir(init_data_dir()?, event_manager))
    }

    pub fn with_dir(data_dir: PathBuf, event_manager: Arc<EventManager>) -> Self {
        Self::with_store(Arc::new(FileSettingsStore::new(data_dir)), event_manager)
    }

    pub fn with_store(store: Arc<dyn SettingsStore>, event_manager: Arc<EventManager>) -> Self {
        Self {
            store,
            event_manager,
        }
    }

    pub async fn get(&self) -> Result<Settings> {
        Ok(get_settings(self.store.as_ref())?)
    }

    pub async fn save(&self, settings: Settings) -> Result<Settings> {
        let saved = save_settings(self.store.as_ref(), settings)?;
        tracing::info!(enabled = saved.enabled_count(), "Readiness settings saved");
        self.event_manager.emit_settings(SettingsEvent::saved(saved));
        Ok(saved)
    }
}
