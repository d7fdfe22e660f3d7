use crate::adapters::http::{build_client, join_url, send_json};
use crate::core::{ConfigProvider, GitHubApi, SyncFields};
use crate::domain::remote::{
    GitHubComment, GitHubHook, GitHubIssue, GitHubIssueType, GitHubLabel, GitHubMilestone,
    GitHubOrganization, GitHubRepository, GitHubUser, HookRequest,
};
use crate::utils::error::Result;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::Client;
use serde::de::DeserializeOwned;

const API_VERSION: &str = "2022-11-28";
const PER_PAGE: usize = 100;

/// REST client for one GitHub (or GitHub Enterprise) instance.
#[derive(Debug, Clone)]
pub struct GitHubClient {
    client: Client,
    api_url: String,
}

impl GitHubClient {
    pub fn connect<C: ConfigProvider + ?Sized>(config: &C) -> Result<Self> {
        url::Url::parse(config.api_url())?;

        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert("X-GitHub-Api-Version", HeaderValue::from_static(API_VERSION));

        let client = build_client(config, "instance.token", config.token(), headers)?;
        tracing::debug!("GitHub client ready for {}", config.api_url());

        Ok(Self {
            client,
            api_url: config.api_url().to_string(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        join_url(&self.api_url, path)
    }

    /// Follows `page` until GitHub returns a short page.
    async fn get_paged<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>> {
        let url = self.endpoint(path);
        let mut items = Vec::new();
        let mut page = 1u32;

        loop {
            let request = self.client.get(&url).query(&[
                ("per_page", PER_PAGE.to_string()),
                ("page", page.to_string()),
            ]);
            let batch: Vec<T> = send_json(request).await?;
            let count = batch.len();
            items.extend(batch);

            if count < PER_PAGE {
                break;
            }
            page += 1;
        }

        tracing::debug!("Fetched {} items from {}", items.len(), path);
        Ok(items)
    }
}

#[async_trait]
impl GitHubApi for GitHubClient {
    async fn current_user(&self) -> Result<GitHubUser> {
        send_json(self.client.get(self.endpoint("/user"))).await
    }

    async fn list_organizations(&self) -> Result<Vec<GitHubOrganization>> {
        self.get_paged("/user/orgs").await
    }

    async fn list_repositories(&self, org: &str) -> Result<Vec<GitHubRepository>> {
        self.get_paged(&format!("/orgs/{}/repos", org)).await
    }

    async fn list_milestones(&self, owner: &str, repo: &str) -> Result<Vec<GitHubMilestone>> {
        self.get_paged(&format!("/repos/{}/{}/milestones", owner, repo))
            .await
    }

    async fn list_labels(&self, owner: &str, repo: &str) -> Result<Vec<GitHubLabel>> {
        self.get_paged(&format!("/repos/{}/{}/labels", owner, repo))
            .await
    }

    async fn list_issue_types(&self, org: &str) -> Result<Vec<GitHubIssueType>> {
        send_json(
            self.client
                .get(self.endpoint(&format!("/orgs/{}/issue-types", org))),
        )
        .await
    }

    async fn create_hook(
        &self,
        owner: &str,
        repo: &str,
        hook: &HookRequest,
    ) -> Result<GitHubHook> {
        let url = self.endpoint(&format!("/repos/{}/{}/hooks", owner, repo));
        send_json(self.client.post(url).json(hook)).await
    }

    async fn create_issue(
        &self,
        owner: &str,
        repo: &str,
        fields: &SyncFields,
    ) -> Result<GitHubIssue> {
        let url = self.endpoint(&format!("/repos/{}/{}/issues", owner, repo));
        send_json(self.client.post(url).json(fields)).await
    }

    async fn update_issue(
        &self,
        owner: &str,
        repo: &str,
        number: &str,
        fields: &SyncFields,
    ) -> Result<GitHubIssue> {
        let url = self.endpoint(&format!("/repos/{}/{}/issues/{}", owner, repo, number));
        send_json(self.client.patch(url).json(fields)).await
    }

    async fn create_comment(
        &self,
        owner: &str,
        repo: &str,
        number: &str,
        body: &str,
    ) -> Result<GitHubComment> {
        let url = self.endpoint(&format!(
            "/repos/{}/{}/issues/{}/comments",
            owner, repo, number
        ));
        send_json(
            self.client
                .post(url)
                .json(&serde_json::json!({ "body": body })),
        )
        .await
    }
}
