use crate::core::mapping::{DEFAULT_ASSET_ID, DEFAULT_ASSET_NAME};
use crate::core::{Asset, AssetCatalog, GitHubApi, Organization, Project};
use crate::utils::error::{PluginError, Result};
use async_trait::async_trait;

pub const CONNECTION_ERROR: &str =
    "Unknown error connecting to GitHub plugin integration system.";

/// Organizations, repositories and work-item types visible to the sync user.
pub struct GitHubAssets<'a, A: GitHubApi> {
    api: &'a A,
    sync_user: String,
}

impl<'a, A: GitHubApi> GitHubAssets<'a, A> {
    pub fn new(api: &'a A, sync_user: impl Into<String>) -> Self {
        Self {
            api,
            sync_user: sync_user.into(),
        }
    }
}

pub fn default_asset() -> Asset {
    Asset {
        id: DEFAULT_ASSET_ID.to_string(),
        asset: DEFAULT_ASSET_ID.to_string(),
        display_name: DEFAULT_ASSET_NAME.to_string(),
    }
}

#[async_trait]
impl<'a, A: GitHubApi> AssetCatalog for GitHubAssets<'a, A> {
    async fn fetch_org(&self) -> Result<Vec<Organization>> {
        let orgs = self.api.list_organizations().await?;
        Ok(orgs
            .into_iter()
            .map(|org| Organization {
                id: org.id.to_string(),
                organization: org.login.clone(),
                display_name: org.login,
            })
            .collect())
    }

    fn fetch_sync_user(&self) -> &str {
        &self.sync_user
    }

    async fn fetch_projects(&self, org: &Organization) -> Result<Vec<Project>> {
        let org_name = &org.display_name;
        let repos = self.api.list_repositories(org_name).await?;

        let projects: Vec<Project> = repos
            .into_iter()
            .filter(|repo| {
                if !repo.has_issues {
                    tracing::debug!("Skipping {}: issues are disabled", repo.name);
                }
                repo.has_issues
            })
            .map(|repo| Project {
                id: repo.name.clone(),
                project: format!("{}/{}", org_name, repo.id),
                display_name: repo.name,
                parent_id: org_name.clone(),
            })
            .collect();

        tracing::info!("Found {} projects in {}", projects.len(), org_name);
        Ok(projects)
    }

    async fn fetch_assets(&self, org: &Organization) -> Result<Vec<Asset>> {
        let mut assets = vec![default_asset()];

        match self.api.list_issue_types(&org.display_name).await {
            Ok(types) => {
                assets.extend(
                    types
                        .into_iter()
                        .filter(|t| t.is_enabled.unwrap_or(true))
                        .map(|t| Asset {
                            id: t.id.to_string(),
                            asset: t.name.to_lowercase(),
                            display_name: t.name,
                        }),
                );
            }
            Err(e) if e.is_not_found() => {
                tracing::debug!("{} has no issue types, using the default asset", org.display_name);
            }
            Err(e) => return Err(e),
        }

        Ok(assets)
    }

    async fn test_connection(&self) -> Result<String> {
        let user = self
            .api
            .current_user()
            .await
            .map_err(|e| PluginError::sanitized(CONNECTION_ERROR, e))?;

        if !self.sync_user.is_empty() && !user.login.eq_ignore_ascii_case(&self.sync_user) {
            return Err(PluginError::sanitized(
                CONNECTION_ERROR,
                format!(
                    "token belongs to '{}' but the sync user is '{}'",
                    user.login, self.sync_user
                ),
            ));
        }

        tracing::info!("Connected to GitHub as {}", user.login);
        Ok(user.login)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::testing::FakeGitHub;
    use crate::domain::remote::GitHubIssueType;

    fn acme() -> Organization {
        Organization {
            id: "1".to_string(),
            organization: "acme".to_string(),
            display_name: "acme".to_string(),
        }
    }

    #[tokio::test]
    async fn test_fetch_org_uses_login_for_names() {
        let api = FakeGitHub::new();
        let orgs = GitHubAssets::new(&api, "sync-bot").fetch_org().await.unwrap();

        assert_eq!(orgs, vec![acme()]);
    }

    #[tokio::test]
    async fn test_fetch_projects_shape() {
        let api = FakeGitHub::new();
        let projects = GitHubAssets::new(&api, "sync-bot")
            .fetch_projects(&acme())
            .await
            .unwrap();

        assert_eq!(projects.len(), 2);
        assert_eq!(projects[0].id, "api");
        assert_eq!(projects[0].project, "acme/10");
        assert_eq!(projects[0].display_name, "api");
        assert_eq!(projects[0].parent_id, "acme");
    }

    #[tokio::test]
    async fn test_fetch_assets_without_issue_types() {
        let api = FakeGitHub::new();
        let assets = GitHubAssets::new(&api, "sync-bot")
            .fetch_assets(&acme())
            .await
            .unwrap();

        assert_eq!(assets, vec![default_asset()]);
    }

    #[tokio::test]
    async fn test_fetch_assets_includes_enabled_issue_types() {
        let mut api = FakeGitHub::new();
        api.issue_types = Some(vec![
            GitHubIssueType {
                id: 7,
                name: "Bug".to_string(),
                description: None,
                is_enabled: Some(true),
            },
            GitHubIssueType {
                id: 8,
                name: "Epic".to_string(),
                description: None,
                is_enabled: Some(false),
            },
        ]);

        let assets = GitHubAssets::new(&api, "sync-bot")
            .fetch_assets(&acme())
            .await
            .unwrap();

        assert_eq!(assets.len(), 2);
        assert_eq!(assets[1].id, "7");
        assert_eq!(assets[1].asset, "bug");
        assert_eq!(assets[1].display_name, "Bug");
    }

    #[tokio::test]
    async fn test_connection_checks_sync_user() {
        let api = FakeGitHub::new();
        let assets = GitHubAssets::new(&api, "Sync-Bot");
        assert_eq!(assets.test_connection().await.unwrap(), "sync-bot");
        assert_eq!(assets.fetch_sync_user(), "Sync-Bot");

        let other = GitHubAssets::new(&api, "someone-else");
        let err = other.test_connection().await.unwrap_err();
        assert_eq!(err.user_friendly_message(), CONNECTION_ERROR);
        assert!(err.to_string().contains("someone-else"));
    }
}
