//! JSON-RPC 2.0 wire types as seen from the client side

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Request {
    jsonrpc: String,
    pub method: String,
    pub params: Option<Value>,
    pub id: RequestId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Response {
    jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ResponseError>,
    pub id: RequestId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseError {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

/// Server push message; carries no id
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub jsonrpc: String,
    pub method: String,
    pub params: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum RequestId {
    String(String),
    Number(i64),
    Null,
}

impl Request {
    pub fn new(method: impl Into<String>, params: Option<Value>, id: RequestId) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            method: method.into(),
            params,
            id,
        }
    }
}

impl Response {
    /// The result value, or the error object turned into an `anyhow` error
    pub fn into_result(self) -> anyhow::Result<Value> {
        if let Some(error) = self.error {
            anyhow::bail!("RPC error {}: {}", error.code, error.message);
        }
        Ok(self.result.unwrap_or(Value::Null))
    }
}

/// A line from the daemon on a persistent connection
#[derive(Debug)]
pub(crate) enum Incoming {
    Notification(Notification),
    Response(Response),
}

impl Incoming {
    /// Notifications have a method and no id; anything else with an id is a response
    pub(crate) fn parse(line: &str) -> Option<Self> {
        if let Ok(notification) = serde_json::from_str::<Notification>(line) {
            return Some(Incoming::Notification(notification));
        }
        serde_json::from_str::<Response>(line)
            .ok()
            .map(Incoming::Response)
    }
}
