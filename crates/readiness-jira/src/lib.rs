//! Readiness Jira Integration
//!
//! Issue source backed by the Jira Cloud REST API.

pub mod auth;
pub mod client;
pub mod error;
pub mod types;

pub use auth::JiraAuth;
pub use client::JiraClient;
pub use error::{Error, Result};
pub use types::*;
