use crate::config::toml_config::WebhookSettings;
use crate::core::triggers::TriggerRegistrar;
use crate::core::{GitHubApi, Project, RegisteredHook, TriggerApi, WebhookRegistrar};
use crate::domain::remote::{HookConfig, HookRequest};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Registers the sync webhook on every selected repository, then the
/// trigger rules pointing at it when a trigger service is attached.
pub struct GitHubWebhook<'a, A: GitHubApi, T: TriggerApi> {
    api: &'a A,
    projects: &'a [Project],
    settings: WebhookSettings,
    triggers: Option<TriggerRegistrar<'a, T>>,
}

impl<'a, A: GitHubApi, T: TriggerApi> GitHubWebhook<'a, A, T> {
    pub fn new(api: &'a A, projects: &'a [Project], settings: WebhookSettings) -> Self {
        Self {
            api,
            projects,
            settings,
            triggers: None,
        }
    }

    pub fn with_triggers(mut self, registrar: TriggerRegistrar<'a, T>) -> Self {
        self.triggers = Some(registrar);
        self
    }

    fn hook_request(&self, webhook_url: &str) -> HookRequest {
        HookRequest {
            // GitHub only accepts "web" for repository hooks
            name: "web".to_string(),
            active: self.settings.active,
            events: self.settings.events.clone(),
            config: HookConfig {
                url: Some(webhook_url.to_string()),
                content_type: Some("json".to_string()),
                insecure_ssl: Some(if self.settings.insecure_ssl { "1" } else { "0" }.to_string()),
            },
        }
    }
}

#[async_trait]
impl<'a, A: GitHubApi, T: TriggerApi> WebhookRegistrar for GitHubWebhook<'a, A, T> {
    async fn create_webhook(
        &self,
        webhook_name: &str,
        webhook_url: &str,
        webhook_description: &str,
        project_id: &str,
    ) -> Result<Vec<RegisteredHook>> {
        tracing::info!(
            "Registering webhook '{}' ({}) for {} on {} repositories",
            webhook_name,
            webhook_description,
            project_id,
            self.projects.len()
        );

        if self.projects.is_empty() {
            tracing::warn!("No projects selected, nothing to register");
            return Ok(Vec::new());
        }

        let request = self.hook_request(webhook_url);
        let mut registered = Vec::with_capacity(self.projects.len());

        for project in self.projects {
            let hook = self
                .api
                .create_hook(project.owner(), project.repo(), &request)
                .await?;
            tracing::info!("Created hook {} on {}", hook.id, project.full_name());
            registered.push(RegisteredHook {
                project: project.full_name(),
                hook_id: hook.id,
            });
        }

        if let (Some(registrar), Some(first)) = (&self.triggers, registered.first()) {
            let category_id = registrar.create_trigger_categories().await?;
            registrar
                .create_triggers(&first.hook_id.to_string(), &category_id)
                .await?;
        }

        Ok(registered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::mapping::{TICKET_TRIGGERS, TRIGGER_CATEGORY_NAME};
    use crate::core::testing::{sample_project, FakeGitHub, FakeTriggers};

    fn projects() -> Vec<Project> {
        let mut web = sample_project();
        web.id = "web".to_string();
        web.display_name = "web".to_string();
        vec![sample_project(), web]
    }

    #[tokio::test]
    async fn test_hook_created_per_project() {
        let api = FakeGitHub::new();
        let projects = projects();
        let webhook: GitHubWebhook<'_, _, FakeTriggers> =
            GitHubWebhook::new(&api, &projects, WebhookSettings::default());

        let hooks = webhook
            .create_webhook("sync", "https://sync.example.com/hook", "desc", "p1")
            .await
            .unwrap();

        assert_eq!(hooks.len(), 2);
        assert_eq!(hooks[0].project, "acme/api");
        assert_eq!(hooks[1].project, "acme/web");

        let calls = api.calls.lock().await;
        assert_eq!(*calls, vec!["create_hook acme/api", "create_hook acme/web"]);

        let bodies = api.bodies.lock().await;
        assert_eq!(
            bodies[0],
            serde_json::json!({
                "name": "web",
                "active": true,
                "events": ["issues", "issue_comment"],
                "config": {
                    "url": "https://sync.example.com/hook",
                    "content_type": "json",
                    "insecure_ssl": "0"
                }
            })
        );
    }

    #[tokio::test]
    async fn test_triggers_registered_after_hooks() {
        let api = FakeGitHub::new();
        let triggers = FakeTriggers::default();
        let projects = vec![sample_project()];
        let webhook = GitHubWebhook::new(&api, &projects, WebhookSettings::default())
            .with_triggers(TriggerRegistrar::new(&triggers, TRIGGER_CATEGORY_NAME));

        let hooks = webhook
            .create_webhook("sync", "https://sync.example.com/hook", "", "p1")
            .await
            .unwrap();

        let created = triggers.created.lock().await;
        // category plus one trigger per definition
        assert_eq!(created.len(), 1 + TICKET_TRIGGERS.len());
        assert_eq!(
            created[1]["trigger"]["actions"][0]["value"][0],
            hooks[0].hook_id.to_string()
        );
    }

    #[tokio::test]
    async fn test_hook_failure_propagates() {
        let api = FakeGitHub::failing_writes(422);
        let projects = vec![sample_project()];
        let webhook: GitHubWebhook<'_, _, FakeTriggers> =
            GitHubWebhook::new(&api, &projects, WebhookSettings::default());

        let err = webhook
            .create_webhook("sync", "https://sync.example.com/hook", "", "p1")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("422"));
    }
}
