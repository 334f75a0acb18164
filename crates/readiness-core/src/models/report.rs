//! Rule results and the derived readiness report

use super::analysis::AnalysisRequest;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The four fixed readiness checks, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CheckKind {
    Description,
    Assignee,
    Priority,
    Labels,
}

impl CheckKind {
    pub const ALL: [CheckKind; 4] = [
        CheckKind::Description,
        CheckKind::Assignee,
        CheckKind::Priority,
        CheckKind::Labels,
    ];

    /// Critical checks block the start of work regardless of the score
    pub fn is_critical(self) -> bool {
        matches!(self, CheckKind::Description | CheckKind::Assignee)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CheckKind::Description => "Description",
            CheckKind::Assignee => "Assignee",
            CheckKind::Priority => "Priority",
            CheckKind::Labels => "Labels",
        }
    }
}

impl fmt::Display for CheckKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Quick action the panel can offer on a failing check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FixAction {
    AssignMe,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RuleResult {
    pub name: CheckKind,
    pub is_ready: bool,
    pub is_critical: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fix_action: Option<FixAction>,
}

/// Per-row status shown next to a check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CheckStatus {
    Ok,
    Critical,
    Warning,
}

impl RuleResult {
    pub fn status(&self) -> CheckStatus {
        if self.is_ready {
            CheckStatus::Ok
        } else if self.is_critical {
            CheckStatus::Critical
        } else {
            CheckStatus::Warning
        }
    }

    /// The fix to offer, only while the check is failing
    pub fn pending_fix(&self) -> Option<FixAction> {
        if self.is_ready { None } else { self.fix_action }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReadinessReport {
    pub checks: Vec<RuleResult>,
    pub score: f64,
    pub has_critical_error: bool,
}

/// Overall panel state. The critical flag outranks the score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PanelStatus {
    Ready,
    Blocked,
    Warning,
}

impl ReadinessReport {
    pub fn passed_count(&self) -> usize {
        self.checks.iter().filter(|c| c.is_ready).count()
    }

    /// Score as a rounded percentage
    pub fn percent(&self) -> u8 {
        (self.score * 100.0).round().clamp(0.0, 100.0) as u8
    }

    pub fn status(&self) -> PanelStatus {
        if self.score >= 1.0 {
            PanelStatus::Ready
        } else if self.has_critical_error {
            PanelStatus::Blocked
        } else {
            PanelStatus::Warning
        }
    }
}

/// Result of one panel refresh
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PanelSnapshot {
    pub issue_id: String,
    pub report: ReadinessReport,
    pub analysis_request: AnalysisRequest,
    pub fetched_at: DateTime<Utc>,
}

/// Outcome of assigning an issue to the acting user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub issue_id: String,
    pub account_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(name: CheckKind, is_ready: bool) -> RuleResult {
        RuleResult {
            name,
            is_ready,
            is_critical: name.is_critical(),
            message: String::new(),
            fix_action: None,
        }
    }

    #[test]
    fn test_check_status() {
        assert_eq!(result(CheckKind::Assignee, true).status(), CheckStatus::Ok);
        assert_eq!(
            result(CheckKind::Assignee, false).status(),
            CheckStatus::Critical
        );
        assert_eq!(
            result(CheckKind::Labels, false).status(),
            CheckStatus::Warning
        );
    }

    #[test]
    fn test_pending_fix_only_when_failing() {
        let mut check = result(CheckKind::Assignee, false);
        check.fix_action = Some(FixAction::AssignMe);
        assert_eq!(check.pending_fix(), Some(FixAction::AssignMe));

        check.is_ready = true;
        assert_eq!(check.pending_fix(), None);
    }

    #[test]
    fn test_panel_status_prefers_critical_flag() {
        let report = ReadinessReport {
            checks: vec![
                result(CheckKind::Description, true),
                result(CheckKind::Assignee, false),
                result(CheckKind::Priority, true),
                result(CheckKind::Labels, true),
            ],
            score: 0.75,
            has_critical_error: true,
        };
        assert_eq!(report.status(), PanelStatus::Blocked);
        assert_eq!(report.percent(), 75);
        assert_eq!(report.passed_count(), 3);

        let warning = ReadinessReport {
            has_critical_error: false,
            ..report.clone()
        };
        assert_eq!(warning.status(), PanelStatus::Warning);

        let ready = ReadinessReport {
            checks: Vec::new(),
            score: 1.0,
            has_critical_error: false,
        };
        assert_eq!(ready.status(), PanelStatus::Ready);
    }

    #[test]
    fn test_percent_rounds() {
        let report = ReadinessReport {
            checks: Vec::new(),
            score: 2.0 / 3.0,
            has_critical_error: false,
        };
        assert_eq!(report.percent(), 67);
    }

    #[test]
    fn test_assignment_uses_camel_case() {
        let assignment = Assignment {
            issue_id: "10001".to_string(),
            account_id: "acc-1".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&assignment).unwrap(),
            serde_json::json!({ "issueId": "10001", "accountId": "acc-1" })
        );
    }
}
