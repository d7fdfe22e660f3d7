use crate::core::mapping::{TriggerDefinition, TICKET_TRIGGERS};
use crate::core::TriggerApi;
use crate::domain::remote::Trigger;
use crate::utils::error::Result;
use serde_json::{json, Value};

/// Renders the notification body a trigger posts to the sync webhook.
/// Placeholders are expanded by the automation service, not here.
pub fn notification_template(action: &str) -> String {
    let template = json!({
        "action": action,
        "ticket": {
            "id": "{{ticket.id}}",
            "external_id": "{{ticket.external_id}}",
            "title": "{{ticket.title}}",
            "type": "{{ticket.ticket_type}}",
            "status": "{{ticket.status}}",
            "url": "{{ticket.url}}",
            "description": "{{ticket.description}}",
            "created_at_with_timestamp": "{{ticket.created_at_with_timestamp}}",
            "created_at_with_time": "{{ticket.created_at_with_time}}",
            "updated_at_with_time": "{{ticket.updated_at_with_time}}",
            "updated_at_with_timestamp": "{{ticket.updated_at_with_timestamp}}",
            "due_date": "{{ticket.due_date}}",
            "priority": "{{ticket.priority}}",
            "source": "{{ticket.via}}",
            "tags": "{{ticket.tags}}",
            "latest_comment_html": "{{ticket.latest_comment_html}}",
            "latest_public_comment_html": "{{ticket.latest_public_comment_html}}",
            "requester": {
                "name": "{{ticket.requester.name}}",
                "email": "{{ticket.requester.email}}",
                "external_id": "{{ticket.requester.external_id}}"
            },
            "assignee": {
                "name": "{{ticket.assignee.name}}",
                "email": "{{ticket.assignee.email}}"
            },
            "organization": {
                "name": "{{ticket.organization.name}}",
                "external_id": "{{ticket.organization.external_id}}"
            }
        },
        "user": {
            "id": "{{current_user.id}}",
            "external_id": "{{current_user.external_id}}",
            "name": "{{current_user.name}}",
            "email": "{{current_user.email}}"
        }
    });

    serde_json::to_string_pretty(&template).unwrap_or_else(|_| template.to_string())
}

fn notification_action(webhook_id: &str, action: &str) -> Value {
    json!({
        "field": "notification_webhook",
        "value": [webhook_id, notification_template(action)],
    })
}

/// Keeps the sync triggers and their category present on the automation side.
pub struct TriggerRegistrar<'a, T: TriggerApi> {
    api: &'a T,
    category_name: String,
}

impl<'a, T: TriggerApi> TriggerRegistrar<'a, T> {
    pub fn new(api: &'a T, category_name: impl Into<String>) -> Self {
        Self {
            api,
            category_name: category_name.into(),
        }
    }

    /// Returns the id of the sync category, creating it when missing.
    pub async fn create_trigger_categories(&self) -> Result<String> {
        let existing = self.api.list_trigger_categories().await?;

        if let Some(category) = existing.iter().find(|c| c.name == self.category_name) {
            tracing::debug!("Trigger category '{}' exists ({})", category.name, category.id);
            return Ok(category.id.clone());
        }

        let payload = json!({
            "trigger_category": {
                "name": self.category_name,
                "position": 0
            }
        });
        let created = self.api.create_trigger_category(&payload).await?;
        tracing::info!("Created trigger category '{}' ({})", created.name, created.id);
        Ok(created.id)
    }

    pub async fn create_triggers(&self, webhook_id: &str, category_id: &str) -> Result<Vec<Trigger>> {
        self.create_ticket_trigger(webhook_id, category_id).await
    }

    /// Upserts one trigger per definition, matched by title.
    pub async fn create_ticket_trigger(
        &self,
        webhook_id: &str,
        category_id: &str,
    ) -> Result<Vec<Trigger>> {
        let existing = self.api.list_triggers().await?;
        let mut saved = Vec::with_capacity(TICKET_TRIGGERS.len());

        for definition in TICKET_TRIGGERS {
            let current = existing.iter().find(|t| {
                let title = if t.raw_title.is_empty() {
                    &t.title
                } else {
                    &t.raw_title
                };
                title == definition.title
            });

            let trigger = match current {
                Some(current) => {
                    let payload = update_payload(definition, current, webhook_id, category_id);
                    tracing::info!("Updating trigger '{}' ({})", definition.title, current.id);
                    self.api.update_trigger(&current.id, &payload).await?
                }
                None => {
                    let payload = create_payload(definition, webhook_id, category_id);
                    tracing::info!("Creating trigger '{}'", definition.title);
                    self.api.create_trigger(&payload).await?
                }
            };
            saved.push(trigger);
        }

        Ok(saved)
    }
}

fn update_payload(
    definition: &TriggerDefinition,
    current: &Trigger,
    webhook_id: &str,
    category_id: &str,
) -> Value {
    let mut actions = vec![notification_action(webhook_id, definition.webhook_type)];
    actions.extend(current.actions.iter().cloned());

    json!({
        "trigger": {
            "title": definition.title,
            "actions": actions,
            "conditions": current.conditions,
            "category_id": category_id,
        }
    })
}

fn create_payload(definition: &TriggerDefinition, webhook_id: &str, category_id: &str) -> Value {
    json!({
        "trigger": {
            "title": definition.title,
            "actions": [notification_action(webhook_id, definition.webhook_type)],
            "conditions": {
                "any": [{
                    "field": "update_type",
                    "operator": "is",
                    "value": definition.conditions_value,
                }]
            },
            "category_id": category_id,
        }
    })
}
