//! Jira API types

use readiness_core::models::{Assignee, CurrentUser, IssueFields, Priority};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JiraIssue {
    pub id: String,
    pub key: String,
    pub fields: JiraFields,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JiraFields {
    #[serde(default)]
    pub summary: String,
    /// Plain text on API v2, Atlassian Document Format on v3
    #[serde(default)]
    pub description: Option<Value>,
    #[serde(default)]
    pub assignee: Option<JiraUser>,
    #[serde(default)]
    pub priority: Option<JiraPriority>,
    #[serde(default)]
    pub labels: Option<Vec<String>>,
    #[serde(default)]
    pub issuetype: Option<JiraIssueType>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JiraUser {
    pub account_id: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JiraPriority {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JiraIssueType {
    pub name: String,
}

/// Body of `PUT /issue/{id}/assignee`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssigneeUpdate<'a> {
    pub account_id: &'a str,
}

impl From<JiraFields> for IssueFields {
    fn from(fields: JiraFields) -> Self {
        Self {
            summary: fields.summary,
            description: fields.description.filter(|d| !d.is_null()),
            assignee: fields.assignee.map(|user| Assignee {
                display_name: user.display_name.unwrap_or(user.account_id),
            }),
            priority: fields.priority.map(|p| Priority { name: p.name }),
            labels: fields.labels.unwrap_or_default(),
            issue_type: fields.issuetype.map(|t| t.name).unwrap_or_default(),
        }
    }
}

impl From<JiraUser> for CurrentUser {
    fn from(user: JiraUser) -> Self {
        Self {
            account_id: user.account_id,
            display_name: user.display_name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_issue_fields_conversion() {
        let issue: JiraIssue = serde_json::from_value(json!({
            "id": "10001",
            "key": "PAY-7",
            "fields": {
                "summary": "Refund flow",
                "description": null,
                "assignee": { "accountId": "abc", "displayName": "Lin" },
                "priority": { "name": "Undefined" },
                "labels": [],
                "issuetype": { "name": "Bug" },
                "status": { "name": "To Do" }
            }
        }))
        .unwrap();

        let fields = IssueFields::from(issue.fields);
        assert_eq!(fields.summary, "Refund flow");
        assert!(fields.description.is_none());
        assert_eq!(fields.assignee.unwrap().display_name, "Lin");
        assert_eq!(fields.priority.unwrap().name, "Undefined");
        assert!(fields.labels.is_empty());
        assert_eq!(fields.issue_type, "Bug");
    }

    #[test]
    fn test_sparse_fields() {
        let fields: JiraFields = serde_json::from_value(json!({ "summary": "x" })).unwrap();
        let fields = IssueFields::from(fields);
        assert!(fields.assignee.is_none());
        assert!(fields.priority.is_none());
        assert!(fields.labels.is_empty());
        assert_eq!(fields.issue_type, "");
    }

    #[test]
    fn test_assignee_update_body() {
        let body = serde_json::to_value(AssigneeUpdate { account_id: "abc" }).unwrap();
        assert_eq!(body, json!({ "accountId": "abc" }));
    }
}
