use crate::adapters::GitHubClient;
use crate::core::mapping::{DEFAULT_ASSET_ID, SKIPPED_OUTBOUND_FIELDS};
use crate::core::{
    Asset, ConfigProvider, GitHubApi, OutboundField, OutboundSync, Project, SyncFields, SyncInfo,
    XrefObject,
};
use crate::utils::error::{PluginError, Result};
use async_trait::async_trait;
use serde_json::Value;

/// Pushes host changes to one repository. `workitem_id` is the issue
/// number and is required for updates and comments.
pub struct GitHubOutbound<'a, A: GitHubApi> {
    api: &'a A,
    project: &'a Project,
    asset: &'a Asset,
    instance_url: String,
    workitem_id: Option<String>,
}

impl<'a, A: GitHubApi> GitHubOutbound<'a, A> {
    pub fn new(
        api: &'a A,
        project: &'a Project,
        asset: &'a Asset,
        instance_url: impl Into<String>,
    ) -> Self {
        Self {
            api,
            project,
            asset,
            instance_url: instance_url.into(),
            workitem_id: None,
        }
    }

    pub fn with_workitem(mut self, workitem_id: impl Into<String>) -> Self {
        self.workitem_id = Some(workitem_id.into());
        self
    }

    pub fn connect<C: ConfigProvider + ?Sized>(config: &C) -> Result<GitHubClient> {
        GitHubClient::connect(config).map_err(|e| {
            PluginError::outbound(format!(
                "Connection to GitHub plugin failed.  Error is [{}].",
                e
            ))
        })
    }

    fn workitem_id(&self) -> Result<&str> {
        self.workitem_id.as_deref().ok_or_else(|| {
            PluginError::outbound(format!(
                "No GitHub issue is linked to this {} in {}",
                self.asset.display_name,
                self.project.full_name()
            ))
        })
    }

    fn xref(&self, number: u64, synced_fields: &SyncFields) -> XrefObject {
        let relative_url = format!(
            "/{}/{}/issues/{}",
            self.project.owner(),
            self.project.repo(),
            number
        );
        let absolute_url = format!("{}{}", self.instance_url.trim_end_matches('/'), relative_url);

        XrefObject {
            id: number.to_string(),
            display_id: number.to_string(),
            relative_url,
            absolute_url,
            sync_info: SyncInfo {
                project: self.project.full_name(),
                issuetype: self.asset.asset.clone(),
                synced_fields: synced_fields.clone(),
            },
        }
    }
}

#[async_trait]
impl<'a, A: GitHubApi> OutboundSync for GitHubOutbound<'a, A> {
    fn transform_fields(&self, fields: &[OutboundField]) -> SyncFields {
        let mut sync_fields = SyncFields::new();

        for field in fields {
            if SKIPPED_OUTBOUND_FIELDS.contains(&field.name.as_str()) {
                continue;
            }
            sync_fields.insert(field.name.to_lowercase(), field.value.clone());
        }

        // plain issues carry no type; typed assets map onto an org issue type
        if self.asset.asset != DEFAULT_ASSET_ID {
            sync_fields.insert(
                "type".to_string(),
                Value::String(self.asset.display_name.clone()),
            );
        }

        sync_fields
    }

    async fn create(&self, sync_fields: &SyncFields) -> Result<XrefObject> {
        let issue = self
            .api
            .create_issue(self.project.owner(), self.project.repo(), sync_fields)
            .await
            .map_err(|e| {
                PluginError::outbound(format!(
                    "Unable to create [{}] in GitHub. Error is [{}].\n Trying to sync fields \n[{}]\n.",
                    self.asset.display_name,
                    e,
                    Value::Object(sync_fields.clone())
                ))
            })?;

        tracing::info!(
            "Created {}#{} as {}",
            self.project.full_name(),
            issue.number,
            self.asset.display_name
        );
        Ok(self.xref(issue.number, sync_fields))
    }

    async fn update(&self, sync_fields: &SyncFields) -> Result<()> {
        let number = self.workitem_id()?;

        self.api
            .update_issue(self.project.owner(), self.project.repo(), number, sync_fields)
            .await
            .map_err(|e| {
                PluginError::outbound(format!(
                    "Unable to update [{}] {} in GitHub. Error is [{}].\n Trying to sync fields \n[{}]\n.",
                    self.asset.display_name,
                    number,
                    e,
                    Value::Object(sync_fields.clone())
                ))
            })?;

        tracing::info!("Updated {}#{}", self.project.full_name(), number);
        Ok(())
    }

    async fn comment_create(&self, comment: &str) -> Result<()> {
        let number = self.workitem_id()?;

        self.api
            .create_comment(self.project.owner(), self.project.repo(), number, comment)
            .await
            .map_err(|e| {
                PluginError::outbound(format!(
                    "Unable to sync comment. Error is [{}]. The comment is [{}]",
                    e, comment
                ))
            })?;

        tracing::debug!("Commented on {}#{}", self.project.full_name(), number);
        Ok(())
    }
}
