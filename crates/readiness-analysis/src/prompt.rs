//! Prompt construction and description normalization

use readiness_core::models::{AnalysisRequest, AnalysisResult};
use serde_json::Value;

pub const SYSTEM_INSTRUCTION: &str =
    "You are a strict assistant. Reply with pure JSON only: no markdown, no commentary.";

/// Description as prompt text. Structured content is serialized to JSON.
/// `None` when the field is absent.
pub fn normalize_description(description: Option<&Value>) -> Option<String> {
    match description? {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        structured => Some(structured.to_string()),
    }
}

/// Fixed records returned without calling the model
pub fn short_circuit(description: Option<&str>) -> Option<AnalysisResult> {
    match description {
        None => Some(AnalysisResult::assessment(
            0,
            "The task has no description.",
            &["full task description"],
            &["what is this task about?"],
        )),
        Some(text) if text.trim().is_empty() => Some(AnalysisResult::assessment(
            0,
            "The description is empty.",
            &["task description"],
            &["fill in the task details"],
        )),
        Some(_) => None,
    }
}

/// User prompt asking for a QA-lead style assessment as a JSON object
pub fn build_prompt(request: &AnalysisRequest, description: &str) -> String {
    format!(
        "Act as an experienced QA lead reviewing a Jira issue before work starts.\n\
         \n\
         Issue type: {issue_type}\n\
         Summary: {summary}\n\
         Description:\n\
         {description}\n\
         \n\
         Judge whether the description is clear and complete enough for a developer to start.\n\
         Return strictly a JSON object with these fields:\n\
         - \"score\": integer from 0 to 100\n\
         - \"analysis\": short assessment, one or two sentences\n\
         - \"missing\": array of strings naming what is missing\n\
         - \"questions\": array of 3 questions to ask the author\n\
         Do not write anything outside the JSON object.",
        issue_type = request.issue_type,
        summary = request.summary,
        description = description,
    )
}
