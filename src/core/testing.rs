//! In-memory doubles for the GitHub and trigger ports.

use crate::core::{GitHubApi, Project, SyncFields, TriggerApi};
use crate::domain::remote::{
    GitHubComment, GitHubHook, GitHubIssue, GitHubIssueType, GitHubLabel, GitHubMilestone,
    GitHubOrganization, GitHubRepository, GitHubUser, HookRequest, Trigger, TriggerCategory,
};
use crate::utils::error::{PluginError, Result};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;

pub fn sample_project() -> Project {
    Project {
        id: "api".to_string(),
        project: "acme/10".to_string(),
        display_name: "api".to_string(),
        parent_id: "acme".to_string(),
    }
}

fn status(code: u16) -> PluginError {
    PluginError::GitHubStatusError {
        status: code,
        body: format!("{{\"message\":\"status {}\"}}", code),
    }
}

#[derive(Clone, Default)]
pub struct FakeGitHub {
    pub calls: Arc<Mutex<Vec<String>>>,
    pub bodies: Arc<Mutex<Vec<serde_json::Value>>>,
    pub issue_types: Option<Vec<GitHubIssueType>>,
    pub login: Option<String>,
    pub fail_writes: Option<u16>,
}

impl FakeGitHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_writes(code: u16) -> Self {
        Self {
            fail_writes: Some(code),
            ..Self::default()
        }
    }

    async fn record(&self, call: String, body: Option<serde_json::Value>) -> Result<()> {
        self.calls.lock().await.push(call);
        if let Some(body) = body {
            self.bodies.lock().await.push(body);
        }
        Ok(())
    }

    fn check_write(&self) -> Result<()> {
        match self.fail_writes {
            Some(code) => Err(status(code)),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl GitHubApi for FakeGitHub {
    async fn current_user(&self) -> Result<GitHubUser> {
        self.record("current_user".to_string(), None).await?;
        Ok(GitHubUser {
            id: 42,
            login: self.login.clone().unwrap_or_else(|| "sync-bot".to_string()),
        })
    }

    async fn list_organizations(&self) -> Result<Vec<GitHubOrganization>> {
        Ok(vec![GitHubOrganization {
            id: 1,
            login: "acme".to_string(),
            description: None,
        }])
    }

    async fn list_repositories(&self, _org: &str) -> Result<Vec<GitHubRepository>> {
        Ok(vec![
            GitHubRepository {
                id: 10,
                name: "api".to_string(),
                full_name: "acme/api".to_string(),
                private: false,
                has_issues: true,
            },
            GitHubRepository {
                id: 11,
                name: "web".to_string(),
                full_name: "acme/web".to_string(),
                private: true,
                has_issues: true,
            },
        ])
    }

    async fn list_milestones(&self, _owner: &str, _repo: &str) -> Result<Vec<GitHubMilestone>> {
        Ok(vec![GitHubMilestone {
            id: 900,
            number: 3,
            title: "v1.0".to_string(),
            state: "open".to_string(),
        }])
    }

    async fn list_labels(&self, _owner: &str, _repo: &str) -> Result<Vec<GitHubLabel>> {
        Ok(vec![
            GitHubLabel {
                id: 1,
                name: "bug".to_string(),
            },
            GitHubLabel {
                id: 2,
                name: "enhancement".to_string(),
            },
        ])
    }

    async fn list_issue_types(&self, _org: &str) -> Result<Vec<GitHubIssueType>> {
        self.issue_types.clone().ok_or_else(|| status(404))
    }

    async fn create_hook(
        &self,
        owner: &str,
        repo: &str,
        hook: &HookRequest,
    ) -> Result<GitHubHook> {
        self.check_write()?;
        self.record(
            format!("create_hook {}/{}", owner, repo),
            Some(serde_json::to_value(hook)?),
        )
        .await?;
        let count = self.calls.lock().await.len() as u64;
        Ok(GitHubHook {
            id: 100 + count,
            name: hook.name.clone(),
            active: hook.active,
            events: hook.events.clone(),
        })
    }

    async fn create_issue(
        &self,
        owner: &str,
        repo: &str,
        fields: &SyncFields,
    ) -> Result<GitHubIssue> {
        self.check_write()?;
        self.record(
            format!("create_issue {}/{}", owner, repo),
            Some(serde_json::Value::Object(fields.clone())),
        )
        .await?;
        Ok(GitHubIssue {
            id: 5000,
            number: 17,
            title: "created".to_string(),
            html_url: format!("https://github.com/{}/{}/issues/17", owner, repo),
            state: "open".to_string(),
        })
    }

    async fn update_issue(
        &self,
        owner: &str,
        repo: &str,
        number: &str,
        fields: &SyncFields,
    ) -> Result<GitHubIssue> {
        self.check_write()?;
        self.record(
            format!("update_issue {}/{}#{}", owner, repo, number),
            Some(serde_json::Value::Object(fields.clone())),
        )
        .await?;
        Ok(GitHubIssue {
            id: 5000,
            number: number.parse().unwrap_or_default(),
            title: "updated".to_string(),
            html_url: String::new(),
            state: "open".to_string(),
        })
    }

    async fn create_comment(
        &self,
        owner: &str,
        repo: &str,
        number: &str,
        body: &str,
    ) -> Result<GitHubComment> {
        self.check_write()?;
        self.record(
            format!("create_comment {}/{}#{}", owner, repo, number),
            Some(serde_json::json!({ "body": body })),
        )
        .await?;
        Ok(GitHubComment {
            id: 1,
            body: body.to_string(),
        })
    }
}

#[derive(Clone, Default)]
pub struct FakeTriggers {
    pub categories: Vec<TriggerCategory>,
    pub triggers: Vec<Trigger>,
    pub created: Arc<Mutex<Vec<serde_json::Value>>>,
    pub updated: Arc<Mutex<Vec<(String, serde_json::Value)>>>,
}

#[async_trait]
impl TriggerApi for FakeTriggers {
    async fn list_trigger_categories(&self) -> Result<Vec<TriggerCategory>> {
        Ok(self.categories.clone())
    }

    async fn create_trigger_category(
        &self,
        payload: &serde_json::Value,
    ) -> Result<TriggerCategory> {
        self.created.lock().await.push(payload.clone());
        Ok(TriggerCategory {
            id: "cat-new".to_string(),
            name: payload["trigger_category"]["name"]
                .as_str()
                .unwrap_or_default()
                .to_string(),
        })
    }

    async fn list_triggers(&self) -> Result<Vec<Trigger>> {
        Ok(self.triggers.clone())
    }

    async fn create_trigger(&self, payload: &serde_json::Value) -> Result<Trigger> {
        self.created.lock().await.push(payload.clone());
        Ok(serde_json::from_value(serde_json::json!({
            "id": "t-new",
            "title": payload["trigger"]["title"],
        }))?)
    }

    async fn update_trigger(&self, id: &str, payload: &serde_json::Value) -> Result<Trigger> {
        self.updated
            .lock()
            .await
            .push((id.to_string(), payload.clone()));
        Ok(serde_json::from_value(serde_json::json!({
            "id": id,
            "title": payload["trigger"]["title"],
        }))?)
    }
}
