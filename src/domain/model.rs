use serde::{Deserialize, Serialize};
use std::fmt;

pub type SyncFields = serde_json::Map<String, serde_json::Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    TextArea,
    List,
    Date,
    Integer,
    Decimal,
    Boolean,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldDisplayIcon {
    Text,
    TextArea,
    Dropdown,
    Date,
    Number,
    Checkbox,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldValue {
    pub id: String,
    pub value: String,
    pub display_value: String,
}

impl FieldValue {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        let label = label.into();
        Self {
            id: id.into(),
            value: label.clone(),
            display_value: label,
        }
    }
}

/// Field-type document handed to the host. `value_type` and `values`
/// are either both present or both absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldTypeInfo {
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_type: Option<FieldType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub values: Option<Vec<FieldValue>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_icon: Option<FieldDisplayIcon>,
}

impl FieldTypeInfo {
    pub fn scalar(field_type: FieldType, icon: FieldDisplayIcon) -> Self {
        Self {
            field_type,
            value_type: None,
            values: None,
            display_icon: Some(icon),
        }
    }

    pub fn list(values: Vec<FieldValue>, value_type: FieldType) -> Self {
        Self {
            field_type: FieldType::List,
            value_type: Some(value_type),
            values: Some(values),
            display_icon: Some(FieldDisplayIcon::Dropdown),
        }
    }
}

/// GitHub-side description of one issue field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldAttributes {
    pub raw_title: String,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub required: bool,
    #[serde(rename = "IsMultivalue")]
    pub multivalue: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_field_options: Option<Vec<FieldValue>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
    pub id: String,
    pub organization: String,
    pub display_name: String,
}

/// A repository as the host sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub project: String,
    pub display_name: String,
    pub parent_id: String,
}

impl Project {
    pub fn owner(&self) -> &str {
        &self.parent_id
    }

    pub fn repo(&self) -> &str {
        &self.display_name
    }

    pub fn full_name(&self) -> String {
        format!("{}/{}", self.parent_id, self.display_name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    pub id: String,
    pub asset: String,
    pub display_name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventType {
    Create,
    Update,
    Delete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventCategory {
    Workitem,
    Comment,
    Attachment,
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutboundField {
    pub name: String,
    pub value: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncInfo {
    pub project: String,
    pub issuetype: String,
    pub synced_fields: SyncFields,
}

/// Links a host-side work item to the GitHub issue it was synced to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct XrefObject {
    pub id: String,
    pub display_id: String,
    pub relative_url: String,
    pub absolute_url: String,
    pub sync_info: SyncInfo,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisteredHook {
    pub project: String,
    pub hook_id: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventSource {
    /// Notification rendered from a registered trigger template.
    Trigger,
    /// Delivery sent by a GitHub repository webhook.
    Native,
}

/// The ticket as seen in an inbound delivery. Field names follow the
/// trigger notification template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TicketSnapshot {
    #[serde(deserialize_with = "crate::domain::remote::string_or_number")]
    pub id: String,
    #[serde(default)]
    pub url: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub title: String,
    pub updated_at_with_timestamp: String,
    #[serde(default)]
    pub updated_at_with_time: Option<String>,
    #[serde(default)]
    pub latest_comment_html: Option<String>,
    #[serde(default)]
    pub latest_public_comment_html: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventUser {
    #[serde(deserialize_with = "crate::domain::remote::string_or_number")]
    pub id: String,
    #[serde(default, alias = "name")]
    pub login: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InboundEvent {
    /// Canonical action (`ticket_created`, ...), or `event.action` for a
    /// native delivery with no canonical counterpart.
    pub action: String,
    pub ticket: TicketSnapshot,
    pub user: EventUser,
    pub repository: Option<String>,
    pub source: EventSource,
}
