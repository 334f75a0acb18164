//! Text rendering of the readiness panel

use crossterm::style::{Color, Stylize};
use readiness_client::Notification;
use readiness_core::models::{
    AnalysisResult, CheckStatus, FixAction, PanelSnapshot, PanelStatus, RuleResult, Settings,
};
use std::fmt::Write;

const BAR_WIDTH: usize = 20;

/// Renders panel pieces to strings; colors are optional so output can be piped
pub struct Renderer {
    color: bool,
}

impl Renderer {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    fn paint(&self, text: &str, color: Color) -> String {
        if self.color {
            text.with(color).bold().to_string()
        } else {
            text.to_string()
        }
    }

    fn status_color(status: PanelStatus) -> Color {
        match status {
            PanelStatus::Ready => Color::Green,
            PanelStatus::Blocked => Color::Red,
            PanelStatus::Warning => Color::Yellow,
        }
    }

    pub fn snapshot(&self, snapshot: &PanelSnapshot) -> String {
        let report = &snapshot.report;
        let status = report.status();
        let color = Self::status_color(status);
        let label = match status {
            PanelStatus::Ready => "READY",
            PanelStatus::Blocked => "BLOCKED",
            PanelStatus::Warning => "WARNING",
        };

        let mut out = String::new();
        let _ = writeln!(
            out,
            "Issue {} (fetched {})",
            snapshot.issue_id,
            snapshot.fetched_at.format("%Y-%m-%d %H:%M:%S UTC")
        );
        let _ = writeln!(
            out,
            "Score: {}%  {}",
            report.percent(),
            self.paint(label, color)
        );
        let _ = writeln!(out, "{}", self.paint(&progress_bar(report.score), color));

        if report.has_critical_error {
            let _ = writeln!(
                out,
                "{}",
                self.paint(
                    "Task is not ready: fix the critical errors before starting work.",
                    Color::Red
                )
            );
        }

        if report.checks.is_empty() {
            let _ = writeln!(out, "No checks enabled.");
            return out;
        }

        let _ = writeln!(out, "{:<10}{:<13}DETAILS", "STATUS", "RULE");
        for check in &report.checks {
            out.push_str(&self.check_row(check));
            out.push('\n');
        }
        out
    }

    fn check_row(&self, check: &RuleResult) -> String {
        let (label, color) = match check.status() {
            CheckStatus::Ok => ("OK", Color::Green),
            CheckStatus::Critical => ("CRITICAL", Color::Red),
            CheckStatus::Warning => ("WARNING", Color::Yellow),
        };

        // Pad before painting so escape codes do not skew the columns
        let mut row = format!(
            "{}{:<13}{}",
            self.paint(&format!("{:<10}", label), color),
            check.name.as_str(),
            check.message
        );
        if let Some(FixAction::AssignMe) = check.pending_fix() {
            row.push_str("  (fix: assign-me)");
        }
        row
    }

    pub fn analysis(&self, result: &AnalysisResult) -> String {
        let Some(assessment) = result.as_assessment() else {
            let message = result.error().unwrap_or("Analysis failed");
            return format!("{}\n", self.paint(message, Color::Red));
        };

        let mut out = String::new();
        match assessment.score() {
            Some(score) => {
                let _ = writeln!(out, "AI score: {}/100", score);
            }
            None => {
                let _ = writeln!(out, "AI score: n/a");
            }
        }
        if let Some(analysis) = assessment.analysis() {
            let _ = writeln!(out, "{}", analysis);
        }

        let missing = assessment.missing();
        if !missing.is_empty() {
            let _ = writeln!(out, "Missing:");
            for item in missing {
                let _ = writeln!(out, "  - {}", item);
            }
        }

        let questions = assessment.questions();
        if !questions.is_empty() {
            let _ = writeln!(out, "Questions:");
            for (i, question) in questions.iter().enumerate() {
                let _ = writeln!(out, "  {}. {}", i + 1, question);
            }
        }
        out
    }

    pub fn settings(&self, settings: &Settings) -> String {
        let rows = [
            ("description", "Require a description", settings.check_description),
            ("assignee", "Require an assignee", settings.check_assignee),
            ("priority", "Require a priority", settings.check_priority),
            ("labels", "Require labels", settings.check_labels),
        ];

        rows.iter()
            .map(|(flag, label, enabled)| {
                let mark = if *enabled { "x" } else { " " };
                format!("[{}] {:<24}(--{})\n", mark, label, flag)
            })
            .collect()
    }

    pub fn notification(&self, notification: &Notification) -> String {
        let params = &notification.params;
        match notification.method.as_str() {
            "settings.event" => {
                let enabled = ["checkDescription", "checkAssignee", "checkPriority", "checkLabels"]
                    .iter()
                    .filter(|key| params["settings"][**key].as_bool().unwrap_or(true))
                    .count();
                format!("settings saved: {} of 4 checks enabled", enabled)
            }
            "issue.event" => format!(
                "issue {} {} to {}",
                params["issue_id"].as_str().unwrap_or("?"),
                params["type"].as_str().unwrap_or("updated"),
                params["account_id"].as_str().unwrap_or("?")
            ),
            other => format!("{}: {}", other, params),
        }
    }
}

fn progress_bar(score: f64) -> String {
    let filled = ((score.clamp(0.0, 1.0) * BAR_WIDTH as f64).round()) as usize;
    format!("[{}{}]", "#".repeat(filled), "-".repeat(BAR_WIDTH - filled))
}

#[cfg(test)]
mod tests {
    use super::*;
    use readiness_core::models::{
        AnalysisRequest, Assignee, CheckKind, IssueFields, ReadinessReport,
    };
    use serde_json::json;

    fn snapshot(fields: &IssueFields, settings: &Settings) -> PanelSnapshot {
        PanelSnapshot {
            issue_id: "10001".to_string(),
            report: readiness_core::evaluate(fields, settings),
            analysis_request: AnalysisRequest::from(fields),
            fetched_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn test_blocked_panel() {
        let fields = IssueFields {
            summary: "Blank".to_string(),
            ..IssueFields::default()
        };
        let out = Renderer::new(false).snapshot(&snapshot(&fields, &Settings::default()));

        assert!(out.contains("Score: 0%  BLOCKED"));
        assert!(out.contains("[--------------------]"));
        assert!(out.contains("Task is not ready"));
        assert!(out.contains("CRITICAL  Assignee     critical: unassigned  (fix: assign-me)"));
        assert!(out.contains("WARNING   Labels       consider adding labels"));
        assert!(!out.contains("Labels       consider adding labels  (fix"));
    }

    #[test]
    fn test_warning_panel_has_no_banner() {
        let fields = IssueFields {
            summary: "Half".to_string(),
            description: Some(json!("text")),
            assignee: Some(Assignee {
                display_name: "Ada".to_string(),
            }),
            ..IssueFields::default()
        };
        let out = Renderer::new(false).snapshot(&snapshot(&fields, &Settings::default()));

        assert!(out.contains("Score: 50%  WARNING"));
        assert!(out.contains("[##########----------]"));
        assert!(!out.contains("Task is not ready"));
        assert!(out.contains("OK        Assignee     Ada\n"));
    }

    #[test]
    fn test_no_checks_is_ready() {
        let fields = IssueFields::default();
        let out = Renderer::new(false).snapshot(&snapshot(&fields, &Settings::none()));

        assert!(out.contains("Score: 100%  READY"));
        assert!(out.contains("No checks enabled."));
    }

    #[test]
    fn test_fix_hint_hidden_once_ready() {
        let check = RuleResult {
            name: CheckKind::Assignee,
            is_ready: true,
            is_critical: true,
            message: "Ada".to_string(),
            fix_action: Some(FixAction::AssignMe),
        };
        let report = ReadinessReport {
            checks: vec![check],
            score: 1.0,
            has_critical_error: false,
        };
        let renderer = Renderer::new(false);
        assert!(!renderer.check_row(&report.checks[0]).contains("fix:"));
    }

    #[test]
    fn test_analysis_rendering_tolerates_missing_keys() {
        let renderer = Renderer::new(false);

        let full = AnalysisResult::assessment(70, "Mostly clear.", &["acceptance criteria"], &["Who signs off?"]);
        let out = renderer.analysis(&full);
        assert!(out.contains("AI score: 70/100"));
        assert!(out.contains("  - acceptance criteria"));
        assert!(out.contains("  1. Who signs off?"));

        let partial: AnalysisResult = serde_json::from_value(json!({
            "outcome": "success",
            "result": { "analysis": "Only text." }
        }))
        .unwrap();
        let out = renderer.analysis(&partial);
        assert!(out.contains("AI score: n/a"));
        assert!(out.contains("Only text."));
        assert!(!out.contains("Missing:"));

        let failed = AnalysisResult::failure("AI request failed. Try again later.");
        assert_eq!(renderer.analysis(&failed), "AI request failed. Try again later.\n");
    }

    #[test]
    fn test_settings_rendering() {
        let settings = Settings {
            check_labels: false,
            ..Settings::default()
        };
        let out = Renderer::new(false).settings(&settings);
        assert!(out.contains("[x] Require a description"));
        assert!(out.contains("[ ] Require labels"));
    }

    #[test]
    fn test_notification_rendering() {
        let renderer = Renderer::new(false);
        let notification = Notification {
            jsonrpc: "2.0".to_string(),
            method: "issue.event".to_string(),
            params: json!({ "type": "assigned", "issue_id": "10001", "account_id": "acc-1" }),
        };
        assert_eq!(
            renderer.notification(&notification),
            "issue 10001 assigned to acc-1"
        );
    }

    #[test]
    fn test_progress_bar_bounds() {
        assert_eq!(progress_bar(1.0), format!("[{}]", "#".repeat(BAR_WIDTH)));
        assert_eq!(progress_bar(0.75), format!("[{}{}]", "#".repeat(15), "-".repeat(5)));
    }
}
