//! Configuration manager

use std::path::PathBuf;

use readiness_core::{
    Result,
    models::Config,
    storage::{ConfigStorage, init_config_dir},
};

/// Holds the configuration loaded at startup
pub struct ConfigManager {
    config: Config,
}

impl ConfigManager {
    /// Manager over the platform config directory
    pub fn new() -> Result<Self> {
        Self::with_dir(init_config_dir()?)
    }

    pub fn with_dir(config_dir: PathBuf) -> Result<Self> {
        // Load or create default config
        let config = ConfigStorage::new(config_dir).load()?;
        Ok(Self { config })
    }

    pub fn get(&self) -> Config {
        self.config.clone()
    }
}
