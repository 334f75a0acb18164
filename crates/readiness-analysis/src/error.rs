//! Error types for the analysis client

use thiserror::Error;

/// Failure to read a JSON object out of model output
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("model reply is empty")]
    Empty,

    #[error("model reply is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("model reply is JSON but not an object")]
    NotAnObject,
}

/// Transport and protocol failures. Logged, never returned to callers of `analyze`.
#[derive(Error, Debug)]
pub enum RequestError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("endpoint returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("response has no message content")]
    NoContent,

    #[error("malformed reply: {0}")]
    Parse(#[from] ParseError),
}
