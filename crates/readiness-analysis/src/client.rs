//! Chat-completion client for description assessments

use crate::error::{ParseError, RequestError};
use crate::extract::extract_json;
use crate::prompt::{SYSTEM_INSTRUCTION, build_prompt, normalize_description, short_circuit};
use crate::types::{ChatMessage, ChatRequest, ChatResponse};
use readiness_core::models::{AnalysisConfig, AnalysisRequest, AnalysisResult, Assessment};
use serde_json::{Map, Value};
use std::time::Duration;

/// Environment variable holding the bearer credential
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

const MISSING_KEY_MESSAGE: &str =
    "AI analysis is not configured: set OPENAI_API_KEY in the daemon environment and restart it.";

const REQUEST_FAILED_MESSAGE: &str = "AI request failed. Try again later.";

pub struct AnalysisClient {
    http: reqwest::Client,
    endpoint: String,
    model: String,
    temperature: f32,
    api_key: Option<String>,
}

impl AnalysisClient {
    pub fn new(config: &AnalysisConfig, api_key: Option<String>) -> reqwest::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            endpoint: config.endpoint.clone(),
            model: config.model.clone(),
            temperature: config.temperature,
            api_key: api_key.filter(|key| !key.trim().is_empty()),
        })
    }

    /// Client with the credential taken from [`API_KEY_ENV`]
    pub fn from_env(config: &AnalysisConfig) -> reqwest::Result<Self> {
        Self::new(config, std::env::var(API_KEY_ENV).ok())
    }

    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }

    /// Assess the issue description.
    ///
    /// Never fails: a missing or blank description yields a fixed record without
    /// a network call, and every transport or parse failure collapses to a
    /// generic `{error}` result whose detail is only logged.
    pub async fn analyze(&self, request: &AnalysisRequest) -> AnalysisResult {
        let description = normalize_description(request.description.as_ref());
        if let Some(result) = short_circuit(description.as_deref()) {
            tracing::debug!("Skipping analysis: description missing or blank");
            return result;
        }

        let Some(api_key) = self.api_key.as_deref() else {
            tracing::warn!("Analysis requested but {} is not set", API_KEY_ENV);
            return AnalysisResult::failure(MISSING_KEY_MESSAGE);
        };

        let prompt = build_prompt(request, description.as_deref().unwrap_or_default());
        match self.complete(api_key, &prompt).await {
            Ok(fields) => AnalysisResult::Success(Assessment::new(fields)),
            Err(e) => {
                tracing::error!(error = %e, endpoint = %self.endpoint, "Analysis request failed");
                AnalysisResult::failure(REQUEST_FAILED_MESSAGE)
            }
        }
    }

    async fn complete(
        &self,
        api_key: &str,
        prompt: &str,
    ) -> Result<Map<String, Value>, RequestError> {
        let body = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_INSTRUCTION,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: self.temperature,
        };

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(RequestError::Status { status, body: text });
        }

        let reply: ChatResponse = serde_json::from_str(&text).map_err(ParseError::from)?;
        let content = reply.first_content().ok_or(RequestError::NoContent)?;
        tracing::debug!(chars = content.len(), "Received analysis reply");

        Ok(extract_json(&content)?)
    }
}
