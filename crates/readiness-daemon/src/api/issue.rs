use chrono::Utc;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

use super::{ApiError, Result};
use crate::event_manager::EventManager;
use crate::events::IssueEvent;
use crate::settings::SettingsManager;
use readiness_analysis::AnalysisClient;
use readiness_core::IssueSource;
use readiness_core::models::{AnalysisRequest, AnalysisResult, Assignment, PanelSnapshot};

#[derive(Debug, Deserialize)]
struct IssueParams {
    issue_id: String,
}

fn issue_params(params: Option<Value>) -> Result<IssueParams> {
    let params: IssueParams = serde_json::from_value(
        params.ok_or_else(|| ApiError::InvalidParams("Missing params".to_string()))?,
    )
    .map_err(|e| ApiError::InvalidParams(e.to_string()))?;

    if params.issue_id.trim().is_empty() {
        return Err(ApiError::InvalidParams("issue_id is empty".to_string()));
    }
    Ok(params)
}

/// Load settings, fetch a fresh snapshot of the issue, and evaluate it
pub async fn refresh<S: IssueSource>(
    settings: &SettingsManager,
    source: &S,
    issue_id: &str,
) -> Result<PanelSnapshot> {
    let settings = settings.get().await?;

    let fields = source.fetch_issue(issue_id).await.map_err(|e| {
        tracing::error!("Failed to fetch issue {}: {}", issue_id, e);
        ApiError::Issue(e.to_string())
    })?;

    let report = readiness_core::evaluate(&fields, &settings);
    tracing::debug!(
        issue_id,
        score = report.score,
        critical = report.has_critical_error,
        "Issue evaluated"
    );

    Ok(PanelSnapshot {
        issue_id: issue_id.to_string(),
        analysis_request: AnalysisRequest::from(&fields),
        report,
        fetched_at: Utc::now(),
    })
}

/// Assign the issue to the user the source acts for
pub async fn assign_to_self<S: IssueSource>(
    source: &S,
    events: &EventManager,
    issue_id: &str,
) -> Result<Assignment> {
    let user = source.current_user().await.map_err(|e| {
        tracing::error!("Failed to resolve current user: {}", e);
        ApiError::Issue(e.to_string())
    })?;

    source
        .assign_issue(issue_id, &user.account_id)
        .await
        .map_err(|e| {
            tracing::error!("Failed to assign {} to {}: {}", issue_id, user.account_id, e);
            ApiError::Issue(e.to_string())
        })?;

    tracing::info!("Issue {} assigned to {}", issue_id, user.account_id);
    events.emit_issue(IssueEvent::assigned(
        issue_id.to_string(),
        user.account_id.clone(),
    ));

    Ok(Assignment {
        issue_id: issue_id.to_string(),
        account_id: user.account_id,
    })
}

pub async fn evaluate<S: IssueSource>(
    settings: &Arc<SettingsManager>,
    source: &S,
    params: Option<Value>,
) -> Result<Value> {
    let params = issue_params(params)?;
    let snapshot = refresh(settings, source, &params.issue_id).await?;
    Ok(serde_json::to_value(&snapshot)?)
}

/// Params are the `{summary, description, type}` payload
pub async fn analyze(client: &Arc<AnalysisClient>, params: Option<Value>) -> Result<Value> {
    let request: AnalysisRequest = serde_json::from_value(
        params.ok_or_else(|| ApiError::InvalidParams("Missing params".to_string()))?,
    )
    .map_err(|e| ApiError::InvalidParams(e.to_string()))?;

    let result: AnalysisResult = client.analyze(&request).await;
    Ok(serde_json::to_value(&result)?)
}

pub async fn assign_self<S: IssueSource>(
    source: &S,
    events: &Arc<EventManager>,
    params: Option<Value>,
) -> Result<Value> {
    let params = issue_params(params)?;
    let assignment = assign_to_self(source, events, &params.issue_id).await?;
    Ok(serde_json::to_value(&assignment)?)
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use crate::events::{DaemonEvent, IssueEventType};
    use readiness_core::models::{Assignee, IssueFields, Priority};
    use readiness_core::source::MemoryIssueSource;
    use serde_json::json;

    fn complete_issue() -> IssueFields {
        IssueFields {
            summary: "Ship it".to_string(),
            description: Some(json!("Everything is written down")),
            assignee: Some(Assignee {
                display_name: "Ada".to_string(),
            }),
            priority: Some(Priority {
                name: "High".to_string(),
            }),
            labels: vec!["backend".to_string()],
            issue_type: "Story".to_string(),
        }
    }

    #[tokio::test]
    async fn test_evaluate_complete_issue() {
        let fixture = fixture();
        fixture.source.insert("10001", complete_issue());

        let result = fixture
            .handler
            .handle("issue.evaluate", Some(json!({ "issue_id": "10001" })))
            .await
            .unwrap();

        assert_eq!(result["issueId"], "10001");
        assert_eq!(result["report"]["score"], 1.0);
        assert_eq!(result["report"]["hasCriticalError"], false);
        assert_eq!(result["analysisRequest"]["summary"], "Ship it");
        assert_eq!(result["analysisRequest"]["type"], "Story");
    }

    #[tokio::test]
    async fn test_evaluate_respects_saved_settings() {
        let fixture = fixture();
        fixture.source.insert("10001", blank_issue());
        fixture
            .handler
            .handle(
                "settings.save",
                Some(json!({
                    "checkDescription": false,
                    "checkAssignee": false,
                    "checkPriority": true,
                    "checkLabels": false,
                })),
            )
            .await
            .unwrap();

        let snapshot = fixture.handler.refresh("10001").await.unwrap();
        assert_eq!(snapshot.report.checks.len(), 1);
        assert_eq!(snapshot.report.checks[0].message, "set a priority");
        assert_eq!(snapshot.report.score, 0.0);
        assert!(!snapshot.report.has_critical_error);
    }

    #[tokio::test]
    async fn test_evaluate_missing_issue_fails_loudly() {
        let fixture = fixture();
        let err = fixture
            .handler
            .handle("issue.evaluate", Some(json!({ "issue_id": "404" })))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Issue(_)));
    }

    #[tokio::test]
    async fn test_evaluate_rejects_bad_params() {
        let fixture = fixture();
        for params in [None, Some(json!({})), Some(json!({ "issue_id": "  " }))] {
            let err = fixture
                .handler
                .handle("issue.evaluate", params)
                .await
                .unwrap_err();
            assert!(matches!(err, ApiError::InvalidParams(_)));
        }
    }

    #[tokio::test]
    async fn test_assign_self_emits_event() {
        let fixture = fixture();
        fixture.source.insert("10001", blank_issue());
        let mut events = fixture.handler.subscribe_events();

        let result = fixture
            .handler
            .handle("issue.assign_self", Some(json!({ "issue_id": "10001" })))
            .await
            .unwrap();
        assert_eq!(result, json!({ "issueId": "10001", "accountId": "acc-42" }));

        match events.recv().await.unwrap() {
            DaemonEvent::Issue(event) => {
                assert_eq!(event.issue_id, "10001");
                let IssueEventType::Assigned { account_id } = event.event_type;
                assert_eq!(account_id, "acc-42");
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_assign_self_failure_is_surfaced() {
        let analysis = AnalysisClient::new(&Default::default(), None).unwrap();
        let fixture = fixture_with(
            MemoryIssueSource::new(user()).rejecting_assignments(),
            analysis,
        );
        fixture.source.insert("10001", blank_issue());
        let mut events = fixture.handler.subscribe_events();

        let err = fixture
            .handler
            .handle("issue.assign_self", Some(json!({ "issue_id": "10001" })))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Issue(_)));
        assert!(events.try_recv().is_err());

        let snapshot = fixture.handler.refresh("10001").await.unwrap();
        assert!(!snapshot.report.checks[1].is_ready);
    }

    #[tokio::test]
    async fn test_analyze_without_description_short_circuits() {
        let fixture = fixture();
        let result = fixture
            .handler
            .handle(
                "issue.analyze",
                Some(json!({ "summary": "Blank", "description": null, "type": "Task" })),
            )
            .await
            .unwrap();

        assert_eq!(result["outcome"], "success");
        assert_eq!(result["result"]["score"], 0);
        assert_eq!(result["result"]["analysis"], "The task has no description.");
    }

    #[tokio::test]
    async fn test_analyze_without_credential_reports_error() {
        let fixture = fixture();
        let result = fixture
            .handler
            .handle(
                "issue.analyze",
                Some(json!({ "summary": "S", "description": "Some text", "type": "Bug" })),
            )
            .await
            .unwrap();

        assert_eq!(result["outcome"], "failure");
        assert!(result["result"]["error"].as_str().unwrap().contains("OPENAI_API_KEY"));
    }
}
