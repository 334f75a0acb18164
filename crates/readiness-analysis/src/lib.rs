//! Readiness Analysis
//!
//! LLM-backed assessment of an issue description via a chat-completion endpoint.

pub mod client;
pub mod error;
pub mod extract;
pub mod prompt;
pub mod types;

pub use client::{API_KEY_ENV, AnalysisClient};
pub use error::{ParseError, RequestError};
pub use extract::extract_json;
