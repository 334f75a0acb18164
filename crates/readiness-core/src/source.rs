//! Issue data provider interface

use crate::models::{Assignee, CurrentUser, IssueFields};
use std::collections::HashMap;
use std::future::Future;
use std::sync::Mutex;

/// Source of truth for issue fields, the current user, and assignee changes.
pub trait IssueSource: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Fetch a fresh snapshot of the issue's fields
    fn fetch_issue(
        &self,
        issue_id: &str,
    ) -> impl Future<Output = Result<IssueFields, Self::Error>> + Send;

    /// Identity of the user the panel acts for
    fn current_user(&self) -> impl Future<Output = Result<CurrentUser, Self::Error>> + Send;

    /// Set the issue's assignee
    fn assign_issue(
        &self,
        issue_id: &str,
        account_id: &str,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send;
}

#[derive(Debug, thiserror::Error)]
pub enum MemorySourceError {
    #[error("Issue not found: {0}")]
    NotFound(String),

    #[error("Assignment rejected for {0}")]
    AssignRejected(String),
}

/// In-memory issue source, used in tests and demos
pub struct MemoryIssueSource {
    user: CurrentUser,
    issues: Mutex<HashMap<String, IssueFields>>,
    reject_assign: bool,
}

impl MemoryIssueSource {
    pub fn new(user: CurrentUser) -> Self {
        Self {
            user,
            issues: Mutex::new(HashMap::new()),
            reject_assign: false,
        }
    }

    /// Make every assignment fail
    pub fn rejecting_assignments(mut self) -> Self {
        self.reject_assign = true;
        self
    }

    pub fn insert(&self, issue_id: impl Into<String>, fields: IssueFields) {
        self.lock().insert(issue_id.into(), fields);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, IssueFields>> {
        self.issues.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl IssueSource for MemoryIssueSource {
    type Error = MemorySourceError;

    async fn fetch_issue(&self, issue_id: &str) -> Result<IssueFields, Self::Error> {
        self.lock()
            .get(issue_id)
            .cloned()
            .ok_or_else(|| MemorySourceError::NotFound(issue_id.to_string()))
    }

    async fn current_user(&self) -> Result<CurrentUser, Self::Error> {
        Ok(self.user.clone())
    }

    async fn assign_issue(&self, issue_id: &str, account_id: &str) -> Result<(), Self::Error> {
        if self.reject_assign {
            return Err(MemorySourceError::AssignRejected(issue_id.to_string()));
        }

        let mut issues = self.lock();
        let fields = issues
            .get_mut(issue_id)
            .ok_or_else(|| MemorySourceError::NotFound(issue_id.to_string()))?;

        let display_name = if account_id == self.user.account_id {
            self.user
                .display_name
                .clone()
                .unwrap_or_else(|| account_id.to_string())
        } else {
            account_id.to_string()
        };
        fields.assignee = Some(Assignee { display_name });
        Ok(())
    }
}
