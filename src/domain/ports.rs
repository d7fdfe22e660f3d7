use crate::domain::model::{
    Asset, EventCategory, EventType, FieldAttributes, FieldTypeInfo, InboundEvent, Organization,
    OutboundField, Project, RegisteredHook, SyncFields, XrefObject,
};
use crate::domain::remote::{
    GitHubComment, GitHubHook, GitHubIssue, GitHubIssueType, GitHubLabel, GitHubMilestone,
    GitHubOrganization, GitHubRepository, GitHubUser, HookRequest, Trigger, TriggerCategory,
};
use crate::utils::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Connection settings of one GitHub instance.
pub trait ConfigProvider: Send + Sync {
    /// Browser-facing base, used for absolute issue links.
    fn instance_url(&self) -> &str;
    fn api_url(&self) -> &str;
    fn token(&self) -> &str;
    fn sync_user(&self) -> &str;
    fn timeout_seconds(&self) -> u64;
    fn user_agent(&self) -> &str;
}

#[async_trait]
pub trait GitHubApi: Send + Sync {
    async fn current_user(&self) -> Result<GitHubUser>;
    async fn list_organizations(&self) -> Result<Vec<GitHubOrganization>>;
    async fn list_repositories(&self, org: &str) -> Result<Vec<GitHubRepository>>;
    async fn list_milestones(&self, owner: &str, repo: &str) -> Result<Vec<GitHubMilestone>>;
    async fn list_labels(&self, owner: &str, repo: &str) -> Result<Vec<GitHubLabel>>;
    async fn list_issue_types(&self, org: &str) -> Result<Vec<GitHubIssueType>>;
    async fn create_hook(&self, owner: &str, repo: &str, hook: &HookRequest)
        -> Result<GitHubHook>;
    async fn create_issue(&self, owner: &str, repo: &str, fields: &SyncFields)
        -> Result<GitHubIssue>;
    async fn update_issue(
        &self,
        owner: &str,
        repo: &str,
        number: &str,
        fields: &SyncFields,
    ) -> Result<GitHubIssue>;
    async fn create_comment(
        &self,
        owner: &str,
        repo: &str,
        number: &str,
        body: &str,
    ) -> Result<GitHubComment>;
}

#[async_trait]
pub trait TriggerApi: Send + Sync {
    async fn list_trigger_categories(&self) -> Result<Vec<TriggerCategory>>;
    async fn create_trigger_category(&self, payload: &serde_json::Value)
        -> Result<TriggerCategory>;
    async fn list_triggers(&self) -> Result<Vec<Trigger>>;
    async fn create_trigger(&self, payload: &serde_json::Value) -> Result<Trigger>;
    async fn update_trigger(&self, id: &str, payload: &serde_json::Value) -> Result<Trigger>;
}

// Plugin contract. The host drives a sync through these.

#[async_trait]
pub trait FieldDescriptor: Send + Sync {
    fn is_required_field(&self) -> bool;
    fn is_disabled_field(&self) -> bool;
    fn is_custom_field(&self) -> bool;
    fn is_readonly_field(&self) -> bool;
    fn fetch_name(&self) -> &str;
    fn fetch_display_name(&self) -> &str;
    fn is_multivalue_field(&self) -> bool;
    async fn fetch_fieldtype_info(&self) -> Result<FieldTypeInfo>;
}

#[async_trait]
pub trait FieldSource: Send + Sync {
    async fn fetch_fields(&self) -> Result<Vec<FieldAttributes>>;
}

#[async_trait]
pub trait AssetCatalog: Send + Sync {
    async fn fetch_org(&self) -> Result<Vec<Organization>>;
    fn fetch_sync_user(&self) -> &str;
    async fn fetch_projects(&self, org: &Organization) -> Result<Vec<Project>>;
    async fn fetch_assets(&self, org: &Organization) -> Result<Vec<Asset>>;
    /// Returns the authenticated login.
    async fn test_connection(&self) -> Result<String>;
}

#[async_trait]
pub trait WebhookRegistrar: Send + Sync {
    async fn create_webhook(
        &self,
        webhook_name: &str,
        webhook_url: &str,
        webhook_description: &str,
        project_id: &str,
    ) -> Result<Vec<RegisteredHook>>;
}

pub trait PayloadInspector {
    fn fetch_project(&self, event: &InboundEvent) -> String;
    fn fetch_asset(&self, event: &InboundEvent) -> String;
    fn is_cyclic_event(&self, event: &InboundEvent, sync_user: &str) -> bool;
}

pub trait SyncEvent {
    fn fetch_event_type(&self) -> Result<EventType>;
    fn fetch_workitem_id(&self) -> &str;
    fn fetch_workitem_display_id(&self) -> &str;
    fn fetch_workitem_url(&self) -> String;
    fn fetch_revision(&self) -> &str;
    fn fetch_timestamp(&self) -> Result<DateTime<Utc>>;
}

pub trait InboundSync {
    fn fetch_event_category(&self) -> Result<Vec<EventCategory>>;
    fn fetch_comment(&self) -> String;
}

#[async_trait]
pub trait OutboundSync: Send + Sync {
    fn transform_fields(&self, fields: &[OutboundField]) -> SyncFields;
    async fn create(&self, sync_fields: &SyncFields) -> Result<XrefObject>;
    async fn update(&self, sync_fields: &SyncFields) -> Result<()>;
    async fn comment_create(&self, comment: &str) -> Result<()>;
}
