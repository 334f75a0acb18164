//! Analysis request and result types

use super::issue::IssueFields;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Issue fields sent for a description assessment
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AnalysisRequest {
    pub summary: String,
    #[serde(default)]
    pub description: Option<Value>,
    #[serde(rename = "type", default)]
    pub issue_type: String,
}

impl From<&IssueFields> for AnalysisRequest {
    fn from(fields: &IssueFields) -> Self {
        Self {
            summary: fields.summary.clone(),
            description: fields.description.clone(),
            issue_type: fields.issue_type.clone(),
        }
    }
}

/// Failure variant, carrying only a user-facing message
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AnalysisFailure {
    pub error: String,
}

/// Success variant: the JSON object produced by the model, passed through as-is.
///
/// No schema is enforced, so every accessor tolerates absent or mistyped keys.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct Assessment(Map<String, Value>);

impl Assessment {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    pub fn score(&self) -> Option<i64> {
        self.0.get("score").and_then(Value::as_i64)
    }

    pub fn analysis(&self) -> Option<&str> {
        self.0.get("analysis").and_then(Value::as_str)
    }

    pub fn missing(&self) -> Vec<&str> {
        self.string_list("missing")
    }

    pub fn questions(&self) -> Vec<&str> {
        self.string_list("questions")
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    fn string_list(&self, key: &str) -> Vec<&str> {
        self.0
            .get(key)
            .and_then(Value::as_array)
            .map(|items| items.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }
}

/// Outcome of a description assessment.
///
/// Tagged on the wire as `{"outcome": "success" | "failure", "result": ...}` so a model
/// reply that happens to carry an `error` key still reads back as a success.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "outcome", content = "result", rename_all = "lowercase")]
pub enum AnalysisResult {
    Success(Assessment),
    Failure(AnalysisFailure),
}

impl AnalysisResult {
    pub fn failure(message: impl Into<String>) -> Self {
        Self::Failure(AnalysisFailure {
            error: message.into(),
        })
    }

    /// Build a success record from the four well-known fields
    pub fn assessment(score: i64, analysis: &str, missing: &[&str], questions: &[&str]) -> Self {
        let mut fields = Map::new();
        fields.insert("score".to_string(), Value::from(score));
        fields.insert("analysis".to_string(), Value::from(analysis));
        fields.insert("missing".to_string(), Value::from(missing.to_vec()));
        fields.insert("questions".to_string(), Value::from(questions.to_vec()));
        Self::Success(Assessment(fields))
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failure(_))
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failure(failure) => Some(&failure.error),
            Self::Success(_) => None,
        }
    }

    pub fn as_assessment(&self) -> Option<&Assessment> {
        match self {
            Self::Success(assessment) => Some(assessment),
            Self::Failure(_) => None,
        }
    }
}
