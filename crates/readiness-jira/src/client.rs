//! Jira REST client

use crate::auth::JiraAuth;
use crate::types::{AssigneeUpdate, JiraIssue, JiraUser};
use crate::{Error, Result};
use readiness_core::IssueSource;
use readiness_core::models::{CurrentUser, IssueFields};
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use std::time::Duration;

/// Fields the readiness checks read
const ISSUE_FIELDS: &str = "summary,description,assignee,priority,labels,issuetype";

pub struct JiraClient {
    http: reqwest::Client,
    base_url: String,
    auth_header: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JiraErrorBody {
    #[serde(default)]
    error_messages: Vec<String>,
}

impl JiraClient {
    pub fn new(base_url: &str, auth: &JiraAuth) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            auth_header: auth.to_basic_auth(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET /rest/api/3/issue/{id}`
    pub async fn get_issue(&self, issue_id: &str) -> Result<JiraIssue> {
        let url = self.url(&format!("issue/{}", checked_issue_id(issue_id)?));
        let request = self.http.get(url).query(&[("fields", ISSUE_FIELDS)]);
        let response = self.send(request, issue_id).await?;
        Ok(response.json().await?)
    }

    /// `GET /rest/api/3/myself`
    pub async fn myself(&self) -> Result<JiraUser> {
        let response = self.send(self.http.get(self.url("myself")), "myself").await?;
        Ok(response.json().await?)
    }

    /// `PUT /rest/api/3/issue/{id}/assignee`
    pub async fn assign(&self, issue_id: &str, account_id: &str) -> Result<()> {
        let url = self.url(&format!("issue/{}/assignee", checked_issue_id(issue_id)?));
        let request = self.http.put(url).json(&AssigneeUpdate { account_id });
        self.send(request, issue_id).await?;
        Ok(())
    }

    fn url(&self, path: &str) -> String {
        format!("{}/rest/api/3/{}", self.base_url, path)
    }

    async fn send(&self, request: RequestBuilder, what: &str) -> Result<Response> {
        let response = request
            .header(AUTHORIZATION, &self.auth_header)
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        tracing::warn!(status = status.as_u16(), "Jira request for {} failed", what);

        match status {
            StatusCode::NOT_FOUND => Err(Error::NotFound(what.to_string())),
            StatusCode::UNAUTHORIZED => Err(Error::Auth(error_message(&body))),
            _ => Err(Error::Api {
                status: status.as_u16(),
                message: error_message(&body),
            }),
        }
    }
}

fn error_message(body: &str) -> String {
    match serde_json::from_str::<JiraErrorBody>(body) {
        Ok(parsed) if !parsed.error_messages.is_empty() => parsed.error_messages.join("; "),
        _ => body.trim().to_string(),
    }
}

impl IssueSource for JiraClient {
    type Error = Error;

    async fn fetch_issue(&self, issue_id: &str) -> Result<IssueFields> {
        let issue = self.get_issue(issue_id).await?;
        tracing::debug!("Fetched {} ({})", issue.key, issue.id);
        Ok(issue.fields.into())
    }

    async fn current_user(&self) -> Result<CurrentUser> {
        Ok(self.myself().await?.into())
    }

    async fn assign_issue(&self, issue_id: &str, account_id: &str) -> Result<()> {
        self.assign(issue_id, account_id).await
    }
}

/// Issue ids and keys go into the URL path, so only `[A-Za-z0-9_-]` is accepted
fn checked_issue_id(issue_id: &str) -> Result<&str> {
    let valid = !issue_id.is_empty()
        && issue_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(issue_id)
    } else {
        Err(Error::InvalidIssueId(issue_id.to_string()))
    }
}
