//! API handlers

pub mod config;
pub mod issue;
pub mod settings;

use serde_json::Value;
use std::sync::Arc;
use tokio::sync::broadcast;

use crate::config::ConfigManager;
use crate::event_manager::EventManager;
use crate::events::DaemonEvent;
use crate::settings::{SettingsManager, SettingsManagerError};
use readiness_analysis::AnalysisClient;
use readiness_core::IssueSource;
use readiness_core::models::{
    AnalysisRequest, AnalysisResult, Assignment, PanelSnapshot, Settings,
};

/// API error
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Method not found: {0}")]
    MethodNotFound(String),

    #[error("Invalid params: {0}")]
    InvalidParams(String),

    #[error("Settings error: {0}")]
    Settings(#[from] SettingsManagerError),

    #[error("Issue error: {0}")]
    Issue(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ApiError>;

/// Routes requests to the settings, issue, and config handlers
pub struct ApiHandler<S> {
    event_manager: Arc<EventManager>,
    settings_manager: Arc<SettingsManager>,
    config_manager: Arc<ConfigManager>,
    issue_source: Arc<S>,
    analysis_client: Arc<AnalysisClient>,
}

impl<S: IssueSource> ApiHandler<S> {
    pub fn new(
        event_manager: Arc<EventManager>,
        settings_manager: Arc<SettingsManager>,
        config_manager: Arc<ConfigManager>,
        issue_source: Arc<S>,
        analysis_client: Arc<AnalysisClient>,
    ) -> Self {
        Self {
            event_manager,
            settings_manager,
            config_manager,
            issue_source,
            analysis_client,
        }
    }

    pub async fn handle(&self, method: &str, params: Option<Value>) -> Result<Value> {
        match method {
            // Settings methods
            "settings.get" => settings::get(&self.settings_manager, params).await,
            "settings.save" => settings::save(&self.settings_manager, params).await,

            // Issue methods
            "issue.evaluate" => {
                issue::evaluate(&self.settings_manager, self.issue_source.as_ref(), params).await
            }
            "issue.analyze" => issue::analyze(&self.analysis_client, params).await,
            "issue.assign_self" => {
                issue::assign_self(self.issue_source.as_ref(), &self.event_manager, params).await
            }

            // Config methods
            "config.get" => config::get(&self.config_manager, params).await,

            // Unknown method
            _ => Err(ApiError::MethodNotFound(method.to_string())),
        }
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<DaemonEvent> {
        self.event_manager.subscribe()
    }

    // --- Typed access for in-process callers ---

    pub async fn get_settings(&self) -> Result<Settings> {
        Ok(self.settings_manager.get().await?)
    }

    pub async fn save_settings(&self, settings: Settings) -> Result<Settings> {
        Ok(self.settings_manager.save(settings).await?)
    }

    pub async fn refresh(&self, issue_id: &str) -> Result<PanelSnapshot> {
        issue::refresh(&self.settings_manager, self.issue_source.as_ref(), issue_id).await
    }

    pub async fn analyze_issue(&self, request: &AnalysisRequest) -> AnalysisResult {
        self.analysis_client.analyze(request).await
    }

    pub async fn assign_to_self(&self, issue_id: &str) -> Result<Assignment> {
        issue::assign_to_self(self.issue_source.as_ref(), &self.event_manager, issue_id).await
    }
}
