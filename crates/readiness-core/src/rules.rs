//! Readiness rule engine: fixed field checks and the aggregate score.
//! Pure computation; no I/O.

use crate::models::{CheckKind, FixAction, IssueFields, ReadinessReport, RuleResult, Settings};

/// Priority name Jira uses for "not set"
const UNDEFINED_PRIORITY: &str = "Undefined";

/// Evaluate the enabled checks against an issue snapshot.
///
/// Checks appear in fixed order (Description, Assignee, Priority, Labels),
/// restricted to the enabled ones. With no checks enabled the score is 1.
pub fn evaluate(fields: &IssueFields, settings: &Settings) -> ReadinessReport {
    let checks: Vec<RuleResult> = CheckKind::ALL
        .into_iter()
        .filter(|kind| is_enabled(*kind, settings))
        .map(|kind| check(kind, fields))
        .collect();

    let passed = checks.iter().filter(|c| c.is_ready).count();
    let total = checks.len();
    let score = if total == 0 {
        1.0
    } else {
        passed as f64 / total as f64
    };
    let has_critical_error = checks.iter().any(|c| c.is_critical && !c.is_ready);

    ReadinessReport {
        checks,
        score,
        has_critical_error,
    }
}

fn is_enabled(kind: CheckKind, settings: &Settings) -> bool {
    match kind {
        CheckKind::Description => settings.check_description,
        CheckKind::Assignee => settings.check_assignee,
        CheckKind::Priority => settings.check_priority,
        CheckKind::Labels => settings.check_labels,
    }
}

fn check(kind: CheckKind, fields: &IssueFields) -> RuleResult {
    let (is_ready, message) = match kind {
        CheckKind::Description => {
            let ready = fields.has_description();
            let msg = if ready {
                "filled in"
            } else {
                "critical: missing description"
            };
            (ready, msg.to_string())
        }
        CheckKind::Assignee => match &fields.assignee {
            Some(assignee) => (true, assignee.display_name.clone()),
            None => (false, "critical: unassigned".to_string()),
        },
        CheckKind::Priority => match &fields.priority {
            Some(priority) if priority.name != UNDEFINED_PRIORITY => (true, priority.name.clone()),
            _ => (false, "set a priority".to_string()),
        },
        CheckKind::Labels => {
            if fields.labels.is_empty() {
                (false, "consider adding labels".to_string())
            } else {
                (true, "has labels".to_string())
            }
        }
    };

    let fix_action = match kind {
        CheckKind::Assignee => Some(FixAction::AssignMe),
        _ => None,
    };

    RuleResult {
        name: kind,
        is_ready,
        is_critical: kind.is_critical(),
        message,
        fix_action,
    }
}
