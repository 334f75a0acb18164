//! Issue snapshot as seen by the readiness checks

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Point-in-time snapshot of the fields the checks read.
///
/// `description` is kept as raw JSON: the upstream field may be plain text or
/// structured rich-text content.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct IssueFields {
    pub summary: String,
    #[serde(default)]
    pub description: Option<Value>,
    #[serde(default)]
    pub assignee: Option<Assignee>,
    #[serde(default)]
    pub priority: Option<Priority>,
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(rename = "type", default)]
    pub issue_type: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Assignee {
    pub display_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Priority {
    pub name: String,
}

/// The user the panel is acting for
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CurrentUser {
    pub account_id: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

impl IssueFields {
    /// True when the description field carries a value
    pub fn has_description(&self) -> bool {
        self.description.as_ref().is_some_and(|d| !d.is_null())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_null_description_is_absent() {
        let fields: IssueFields = serde_json::from_value(json!({
            "summary": "Login page",
            "description": null,
            "type": "Story",
        }))
        .unwrap();

        assert!(fields.description.is_none());
        assert!(!fields.has_description());
        assert!(fields.labels.is_empty());
        assert_eq!(fields.issue_type, "Story");
    }

    #[test]
    fn test_structured_description_is_kept() {
        let fields: IssueFields = serde_json::from_value(json!({
            "summary": "Login page",
            "description": { "type": "doc", "version": 1, "content": [] },
            "assignee": { "displayName": "Ada" },
            "priority": { "name": "High" },
            "labels": ["auth"],
            "type": "Bug",
        }))
        .unwrap();

        assert!(fields.has_description());
        assert_eq!(fields.assignee.unwrap().display_name, "Ada");
        assert_eq!(fields.priority.unwrap().name, "High");
    }
}
