//! JSON-RPC 2.0 frames as the daemon reads and writes them
//!
//! Requests are only ever parsed, responses and notifications only ever written,
//! so each type derives just the direction it travels in.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::api::ApiError;
use crate::events::DaemonEvent;

const VERSION: &str = "2.0";

/// Error codes the daemon answers with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    ParseError,
    InvalidRequest,
    MethodNotFound,
    InvalidParams,
    /// Failures from settings storage or the issue source
    Server,
}

impl ErrorCode {
    pub fn code(self) -> i32 {
        match self {
            ErrorCode::ParseError => -32700,
            ErrorCode::InvalidRequest => -32600,
            ErrorCode::MethodNotFound => -32601,
            ErrorCode::InvalidParams => -32602,
            ErrorCode::Server => -32000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RequestId {
    Number(i64),
    String(String),
    Null,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Request {
    pub jsonrpc: String,
    pub method: String,
    #[serde(default)]
    pub params: Option<Value>,
    pub id: RequestId,
}

impl Request {
    pub fn parse(line: &str) -> Result<Self, JsonRpcError> {
        let request: Request = serde_json::from_str(line.trim())
            .map_err(|e| JsonRpcError::new(ErrorCode::ParseError, e.to_string()))?;

        if request.jsonrpc != VERSION {
            return Err(JsonRpcError::new(
                ErrorCode::InvalidRequest,
                format!("Unsupported JSON-RPC version: {}", request.jsonrpc),
            ));
        }
        Ok(request)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
}

impl JsonRpcError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code: code.code(),
            message: message.into(),
        }
    }
}

impl From<&ApiError> for JsonRpcError {
    fn from(error: &ApiError) -> Self {
        match error {
            ApiError::MethodNotFound(_) => Self::new(ErrorCode::MethodNotFound, error.to_string()),
            ApiError::InvalidParams(message) => Self::new(ErrorCode::InvalidParams, message.clone()),
            _ => Self::new(ErrorCode::Server, error.to_string()),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Response {
    pub jsonrpc: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
    pub id: RequestId,
}

impl Response {
    pub fn success(result: Value, id: RequestId) -> Self {
        Self {
            jsonrpc: VERSION,
            result: Some(result),
            error: None,
            id,
        }
    }

    pub fn error(error: JsonRpcError, id: RequestId) -> Self {
        Self {
            jsonrpc: VERSION,
            result: None,
            error: Some(error),
            id,
        }
    }
}

/// Daemon event pushed to a connected client
#[derive(Debug, Clone, Serialize)]
pub struct Notification {
    pub jsonrpc: &'static str,
    pub method: &'static str,
    pub params: Value,
}

impl Notification {
    /// Params are the event body without the internal `category` tag
    pub fn from_event(event: &DaemonEvent) -> serde_json::Result<Self> {
        let params = match event {
            DaemonEvent::Settings(e) => serde_json::to_value(e)?,
            DaemonEvent::Issue(e) => serde_json::to_value(e)?,
        };
        Ok(Self {
            jsonrpc: VERSION,
            method: event.method(),
            params,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{IssueEvent, SettingsEvent};
    use readiness_core::models::Settings;
    use serde_json::json;

    #[test]
    fn test_parse_request() {
        let request =
            Request::parse(r#"{"jsonrpc":"2.0","method":"settings.get","id":"a"}"#).unwrap();
        assert_eq!(request.method, "settings.get");
        assert!(request.params.is_none());
        assert_eq!(request.id, RequestId::String("a".to_string()));
    }

    #[test]
    fn test_parse_rejects_garbage_and_old_versions() {
        assert_eq!(Request::parse("{not json").unwrap_err().code, -32700);

        let err = Request::parse(r#"{"jsonrpc":"1.0","method":"settings.get","id":1}"#)
            .unwrap_err();
        assert_eq!(err.code, -32600);
    }

    #[test]
    fn test_error_codes_from_api_errors() {
        let not_found = JsonRpcError::from(&ApiError::MethodNotFound("x.y".to_string()));
        assert_eq!(not_found.code, -32601);
        assert_eq!(not_found.message, "Method not found: x.y");

        let invalid = JsonRpcError::from(&ApiError::InvalidParams("bad".to_string()));
        assert_eq!(invalid.code, -32602);
        assert_eq!(invalid.message, "bad");

        let issue = JsonRpcError::from(&ApiError::Issue("Issue not found: 1".to_string()));
        assert_eq!(issue.code, -32000);
        assert_eq!(issue.message, "Issue error: Issue not found: 1");
    }

    #[test]
    fn test_error_response_omits_result() {
        let response = Response::error(
            JsonRpcError::new(ErrorCode::ParseError, "eof"),
            RequestId::Null,
        );
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({ "jsonrpc": "2.0", "error": { "code": -32700, "message": "eof" }, "id": null })
        );
    }

    #[test]
    fn test_notifications_from_events() {
        let settings = DaemonEvent::Settings(SettingsEvent::saved(Settings::none()));
        let notification = Notification::from_event(&settings).unwrap();
        assert_eq!(notification.method, "settings.event");
        assert_eq!(notification.params["settings"]["checkLabels"], false);
        assert!(notification.params.get("category").is_none());

        let issue = DaemonEvent::Issue(IssueEvent::assigned(
            "10001".to_string(),
            "acc-1".to_string(),
        ));
        let value = serde_json::to_value(Notification::from_event(&issue).unwrap()).unwrap();
        assert_eq!(value["method"], "issue.event");
        assert_eq!(value["params"]["type"], "assigned");
        assert!(value.get("id").is_none());
    }
}
