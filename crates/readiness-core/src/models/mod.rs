pub mod analysis;
pub mod config;
pub mod issue;
pub mod report;
pub mod settings;

pub use analysis::{AnalysisFailure, AnalysisRequest, AnalysisResult, Assessment};
pub use config::{AnalysisConfig, Config, DaemonConfig, JiraConfig};
pub use issue::{Assignee, CurrentUser, IssueFields, Priority};
pub use report::{
    Assignment, CheckKind, CheckStatus, FixAction, PanelSnapshot, PanelStatus, ReadinessReport,
    RuleResult,
};
pub use settings::Settings;
