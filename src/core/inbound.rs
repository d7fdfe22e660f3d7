//! Inbound deliveries: parsing webhook bodies into an [`InboundEvent`] and
//! deriving the sync event the host acts on.

use crate::adapters::GitHubClient;
use crate::core::mapping::{self, COMMENT_CREATED};
use crate::core::{
    ConfigProvider, EventCategory, EventType, InboundEvent, InboundSync, PayloadInspector,
    SyncEvent,
};
use crate::domain::model::{EventSource, EventUser, TicketSnapshot};
use crate::utils::error::{PluginError, Result};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

const NO_PROJECT: &str = "no_project";
const COMMENT_SEPARATOR: &str = "----------------------------------------------\n\n";
const ATTACHMENT_MARKER: &str = "Attachment(s):";

#[derive(Deserialize)]
struct TriggerNotification {
    action: String,
    ticket: TicketSnapshot,
    user: EventUser,
}

#[derive(Deserialize)]
struct NativeIssueType {
    name: String,
}

#[derive(Deserialize)]
struct NativeIssue {
    number: u64,
    #[serde(default)]
    html_url: String,
    #[serde(default)]
    title: String,
    updated_at: String,
    #[serde(rename = "type", default)]
    issue_type: Option<NativeIssueType>,
}

#[derive(Deserialize)]
struct NativeUser {
    id: u64,
    login: String,
}

#[derive(Deserialize)]
struct NativeComment {
    #[serde(default)]
    body: String,
    updated_at: String,
}

#[derive(Deserialize)]
struct NativeRepository {
    full_name: String,
}

#[derive(Deserialize)]
struct NativeDelivery {
    action: String,
    issue: NativeIssue,
    sender: NativeUser,
    #[serde(default)]
    comment: Option<NativeComment>,
    #[serde(default)]
    repository: Option<NativeRepository>,
}

/// Parses a webhook body. `github_event` is the `X-GitHub-Event` header of
/// native deliveries; without it the event is inferred from the body.
pub fn parse_event(github_event: Option<&str>, body: &[u8]) -> Result<InboundEvent> {
    let value: Value = serde_json::from_slice(body)
        .map_err(|e| PluginError::payload(format!("Invalid webhook JSON: {}", e)))?;

    if value.get("ticket").map(Value::is_object).unwrap_or(false) {
        return parse_trigger_notification(value);
    }

    let event = match github_event {
        Some(event) => event.to_string(),
        None if value.get("comment").is_some() && value.get("issue").is_some() => {
            "issue_comment".to_string()
        }
        None if value.get("issue").is_some() => "issues".to_string(),
        None => {
            return Err(PluginError::payload(
                "Unsupported webhook payload: no ticket or issue found",
            ))
        }
    };

    parse_native_delivery(&event, value)
}

fn parse_trigger_notification(value: Value) -> Result<InboundEvent> {
    let notification: TriggerNotification = serde_json::from_value(value)
        .map_err(|e| PluginError::payload(format!("Malformed trigger notification: {}", e)))?;

    Ok(InboundEvent {
        action: notification.action,
        ticket: notification.ticket,
        user: notification.user,
        repository: None,
        source: EventSource::Trigger,
    })
}

fn parse_native_delivery(event: &str, value: Value) -> Result<InboundEvent> {
    if event != "issues" && event != "issue_comment" {
        return Err(PluginError::payload(format!(
            "Unsupported event type [{}]",
            event
        )));
    }

    let delivery: NativeDelivery = serde_json::from_value(value)
        .map_err(|e| PluginError::payload(format!("Malformed {} delivery: {}", event, e)))?;

    let action = mapping::canonical_action(event, &delivery.action)
        .map(str::to_string)
        .unwrap_or_else(|| format!("{}.{}", event, delivery.action));

    let issue = delivery.issue;
    let comment = delivery.comment;
    let revision = comment
        .as_ref()
        .map(|c| c.updated_at.clone())
        .unwrap_or(issue.updated_at);
    let comment_body = comment.map(|c| c.body);

    Ok(InboundEvent {
        action,
        ticket: TicketSnapshot {
            id: issue.number.to_string(),
            url: issue.html_url,
            kind: issue
                .issue_type
                .map(|t| t.name)
                .unwrap_or_else(|| mapping::DEFAULT_ASSET_NAME.to_string()),
            title: issue.title,
            updated_at_with_timestamp: revision,
            updated_at_with_time: None,
            latest_comment_html: comment_body.clone(),
            latest_public_comment_html: comment_body,
        },
        user: EventUser {
            id: delivery.sender.id.to_string(),
            login: Some(delivery.sender.login),
        },
        repository: delivery.repository.map(|r| r.full_name),
        source: EventSource::Native,
    })
}

/// Parses the timestamps found in deliveries: RFC 3339 first, then a
/// couple of zone-less forms read as UTC.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Ok(parsed.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M:%S %z"] {
        if let Ok(parsed) = DateTime::parse_from_str(raw, format) {
            return Ok(parsed.with_timezone(&Utc));
        }
        if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(parsed.and_utc());
        }
    }

    Err(PluginError::payload(format!("Invalid timestamp [{}]", raw)))
}

/// Drops scheme and host: `https://github.com/acme/api/issues/3` becomes
/// `acme/api/issues/3`.
fn relative_path(url: &str) -> String {
    let without_scheme = url.split_once("://").map(|(_, rest)| rest).unwrap_or(url);
    without_scheme
        .split_once('/')
        .map(|(_, path)| path.to_string())
        .unwrap_or_default()
}

pub struct GitHubPayload;

impl PayloadInspector for GitHubPayload {
    fn fetch_project(&self, event: &InboundEvent) -> String {
        event
            .repository
            .clone()
            .unwrap_or_else(|| NO_PROJECT.to_string())
    }

    fn fetch_asset(&self, event: &InboundEvent) -> String {
        event.ticket.kind.to_lowercase()
    }

    fn is_cyclic_event(&self, event: &InboundEvent, sync_user: &str) -> bool {
        event.user.id == sync_user
            || event
                .user
                .login
                .as_deref()
                .map(|login| login.eq_ignore_ascii_case(sync_user))
                .unwrap_or(false)
    }
}

pub struct GitHubEvent<'a> {
    event: &'a InboundEvent,
}

impl<'a> GitHubEvent<'a> {
    pub fn new(event: &'a InboundEvent) -> Self {
        Self { event }
    }
}

impl<'a> SyncEvent for GitHubEvent<'a> {
    fn fetch_event_type(&self) -> Result<EventType> {
        mapping::event_type_for(&self.event.action).ok_or_else(|| {
            PluginError::payload(format!("Unsupported event type [{}]", self.event.action))
        })
    }

    fn fetch_workitem_id(&self) -> &str {
        &self.event.ticket.id
    }

    fn fetch_workitem_display_id(&self) -> &str {
        &self.event.ticket.id
    }

    fn fetch_workitem_url(&self) -> String {
        relative_path(&self.event.ticket.url)
    }

    fn fetch_revision(&self) -> &str {
        &self.event.ticket.updated_at_with_timestamp
    }

    fn fetch_timestamp(&self) -> Result<DateTime<Utc>> {
        parse_timestamp(&self.event.ticket.updated_at_with_timestamp)
    }
}

pub struct GitHubInbound<'a> {
    event: &'a InboundEvent,
}

impl<'a> GitHubInbound<'a> {
    pub fn new(event: &'a InboundEvent) -> Self {
        Self { event }
    }

    pub fn connect<C: ConfigProvider + ?Sized>(config: &C) -> Result<GitHubClient> {
        GitHubClient::connect(config).map_err(|e| {
            PluginError::inbound(format!(
                "Connection to GitHub plugin failed.  Error is [{}].",
                e
            ))
        })
    }

    /// The automation service renders `updated_at_with_time` as
    /// "March 4, 2024 at 09:15" and stamps comments with "Mar 4, 2024, 09:15";
    /// a match means the update was the comment.
    pub fn is_comment_updated(
        updated_at_with_time: &str,
        latest_public_comment_html: &str,
    ) -> Result<bool> {
        let updated = NaiveDateTime::parse_from_str(updated_at_with_time.trim(), "%B %d, %Y at %H:%M")
            .map_err(|e| {
                PluginError::payload(format!(
                    "Invalid updated_at_with_time [{}]: {}",
                    updated_at_with_time, e
                ))
            })?;
        let pattern = updated.format("%b %-d, %Y, %H:%M").to_string();
        Ok(latest_public_comment_html.contains(&pattern))
    }

    fn comment_updated(&self) -> Result<bool> {
        let ticket = &self.event.ticket;
        match self.event.source {
            EventSource::Native => Ok(self.event.action == COMMENT_CREATED),
            EventSource::Trigger => match (
                ticket.updated_at_with_time.as_deref(),
                ticket.latest_public_comment_html.as_deref(),
            ) {
                (Some(time), Some(html)) => Self::is_comment_updated(time, html),
                _ => Ok(false),
            },
        }
    }
}

impl<'a> InboundSync for GitHubInbound<'a> {
    fn fetch_event_category(&self) -> Result<Vec<EventCategory>> {
        let mut categories = Vec::new();

        if mapping::is_ticket_action(&self.event.action) {
            categories.push(EventCategory::Workitem);
        }

        if self.comment_updated()? {
            categories.push(EventCategory::Comment);

            let has_attachment = self
                .event
                .ticket
                .latest_comment_html
                .as_deref()
                .map(|html| html.contains(ATTACHMENT_MARKER))
                .unwrap_or(false);
            if has_attachment {
                categories.push(EventCategory::Attachment);
            }
        }

        Ok(categories)
    }

    fn fetch_comment(&self) -> String {
        match &self.event.ticket.latest_comment_html {
            Some(data) => {
                let data = data.replace(COMMENT_SEPARATOR, "");
                data.split("Attachment(s):\n")
                    .next()
                    .unwrap_or_default()
                    .to_string()
            }
            None => String::new(),
        }
    }
}

/// Everything the host derives from one delivery.
#[derive(Debug, Clone, Serialize)]
pub struct EventSummary {
    pub event_type: EventType,
    pub categories: Vec<EventCategory>,
    pub project: String,
    pub asset: String,
    pub workitem_id: String,
    pub workitem_url: String,
    pub revision: String,
    pub timestamp: DateTime<Utc>,
    pub cyclic: bool,
    pub comment: String,
}

pub fn summarize(event: &InboundEvent, sync_user: &str) -> Result<EventSummary> {
    let payload = GitHubPayload;
    let sync_event = GitHubEvent::new(event);
    let inbound = GitHubInbound::new(event);

    Ok(EventSummary {
        event_type: sync_event.fetch_event_type()?,
        categories: inbound.fetch_event_category()?,
        project: payload.fetch_project(event),
        asset: payload.fetch_asset(event),
        workitem_id: sync_event.fetch_workitem_id().to_string(),
        workitem_url: sync_event.fetch_workitem_url(),
        revision: sync_event.fetch_revision().to_string(),
        timestamp: sync_event.fetch_timestamp()?,
        cyclic: payload.is_cyclic_event(event, sync_user),
        comment: inbound.fetch_comment(),
    })
}
