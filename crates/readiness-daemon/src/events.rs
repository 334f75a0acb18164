use chrono::{DateTime, Utc};
use readiness_core::models::Settings;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "category", rename_all = "snake_case")]
pub enum DaemonEvent {
    Settings(SettingsEvent),
    Issue(IssueEvent),
}

impl DaemonEvent {
    /// JSON-RPC notification method for this event
    pub fn method(&self) -> &'static str {
        match self {
            DaemonEvent::Settings(_) => "settings.event",
            DaemonEvent::Issue(_) => "issue.event",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettingsEvent {
    pub settings: Settings,
    pub timestamp: DateTime<Utc>,
}

impl SettingsEvent {
    pub fn saved(settings: Settings) -> Self {
        Self {
            settings,
            timestamp: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssueEvent {
    #[serde(flatten)]
    pub event_type: IssueEventType,
    pub issue_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum IssueEventType {
    Assigned { account_id: String },
}

impl IssueEvent {
    pub fn assigned(issue_id: String, account_id: String) -> Self {
        Self {
            event_type: IssueEventType::Assigned { account_id },
            issue_id,
            timestamp: Utc::now(),
        }
    }
}
