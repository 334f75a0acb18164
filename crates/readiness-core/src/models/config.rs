//! Application configuration

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub version: String,
    pub daemon: DaemonConfig,
    #[serde(default)]
    pub jira: JiraConfig,
    #[serde(default)]
    pub analysis: AnalysisConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DaemonConfig {
    pub socket_path: String,
    pub log_level: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct JiraConfig {
    pub base_url: Option<String>,
    pub email: Option<String>,
}

/// Chat-completion endpoint settings. The API key is not part of the config;
/// it comes from the process environment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalysisConfig {
    pub endpoint: String,
    pub model: String,
    pub temperature: f32,
    pub timeout_secs: u64,
}

impl Config {
    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.daemon.validate()?;
        self.jira.validate()?;
        self.analysis.validate()?;
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: "1.0.0".to_string(),
            daemon: DaemonConfig::default(),
            jira: JiraConfig::default(),
            analysis: AnalysisConfig::default(),
        }
    }
}

impl DaemonConfig {
    /// Validate daemon configuration
    pub fn validate(&self) -> Result<()> {
        if self.socket_path.trim().is_empty() {
            return Err(Error::Validation("Socket path cannot be empty".to_string()));
        }

        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.log_level.as_str()) {
            return Err(Error::Validation(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.log_level,
                valid_log_levels.join(", ")
            )));
        }

        Ok(())
    }
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            socket_path: "/tmp/readiness.sock".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl JiraConfig {
    /// Validate Jira configuration
    pub fn validate(&self) -> Result<()> {
        if let Some(ref url) = self.base_url {
            validate_http_url("Jira base URL", url)?;
        }

        if let Some(ref email) = self.email
            && email.trim().is_empty()
        {
            return Err(Error::Validation("Jira email cannot be empty".to_string()));
        }

        Ok(())
    }
}

impl AnalysisConfig {
    /// Validate analysis endpoint configuration
    pub fn validate(&self) -> Result<()> {
        validate_http_url("Analysis endpoint", &self.endpoint)?;

        if self.model.trim().is_empty() {
            return Err(Error::Validation("Model cannot be empty".to_string()));
        }

        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(Error::Validation(format!(
                "Temperature {} out of range (0.0 - 2.0)",
                self.temperature
            )));
        }

        const MAX_TIMEOUT: u64 = 300;
        if self.timeout_secs == 0 || self.timeout_secs > MAX_TIMEOUT {
            return Err(Error::Validation(format!(
                "Timeout must be between 1 and {} seconds",
                MAX_TIMEOUT
            )));
        }

        Ok(())
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.openai.com/v1/chat/completions".to_string(),
            model: "gpt-4o-mini".to_string(),
            temperature: 0.2,
            timeout_secs: 30,
        }
    }
}

fn validate_http_url(what: &str, url: &str) -> Result<()> {
    let url = url.trim();
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(Error::Validation(format!(
            "{} must start with http:// or https://",
            what
        )));
    }
    Ok(())
}
