//! Best-effort JSON extraction from model output

use crate::error::ParseError;
use serde_json::{Map, Value};

/// Strip surrounding markdown code fences (optionally tagged `json`) and
/// parse what is left as a JSON object.
pub fn extract_json(text: &str) -> Result<Map<String, Value>, ParseError> {
    let body = strip_fences(text);
    if body.is_empty() {
        return Err(ParseError::Empty);
    }

    match serde_json::from_str(body)? {
        Value::Object(fields) => Ok(fields),
        _ => Err(ParseError::NotAnObject),
    }
}

fn strip_fences(text: &str) -> &str {
    let mut body = text.trim();

    if let Some(rest) = body.strip_prefix("```") {
        body = rest;
        if body.get(..4).is_some_and(|tag| tag.eq_ignore_ascii_case("json")) {
            body = &body[4..];
        }
    }

    if let Some(rest) = body.trim_end().strip_suffix("```") {
        body = rest;
    }

    body.trim()
}
