//! Static lookup tables: GitHub field kinds to host field types, the
//! issue field catalog, webhook actions to sync event types, and the
//! trigger rules registered alongside webhooks.

use crate::domain::model::{EventType, FieldDisplayIcon, FieldType, FieldValue};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    TextArea,
    Checkbox,
    Date,
    Integer,
    Decimal,
    Regexp,
    PartialCreditCard,
    MultiSelect,
    Tagger,
    Lookup,
    Relation,
}

impl FieldKind {
    pub const ALL: [FieldKind; 12] = [
        FieldKind::Text,
        FieldKind::TextArea,
        FieldKind::Checkbox,
        FieldKind::Date,
        FieldKind::Integer,
        FieldKind::Decimal,
        FieldKind::Regexp,
        FieldKind::PartialCreditCard,
        FieldKind::MultiSelect,
        FieldKind::Tagger,
        FieldKind::Lookup,
        FieldKind::Relation,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKind::Text => "text",
            FieldKind::TextArea => "textarea",
            FieldKind::Checkbox => "checkbox",
            FieldKind::Date => "date",
            FieldKind::Integer => "integer",
            FieldKind::Decimal => "decimal",
            FieldKind::Regexp => "regexp",
            FieldKind::PartialCreditCard => "partialcreditcard",
            FieldKind::MultiSelect => "multiselect",
            FieldKind::Tagger => "tagger",
            FieldKind::Lookup => "lookup",
            FieldKind::Relation => "relation",
        }
    }

    /// Case-insensitive, so `"Relation"` and `"relation"` both resolve.
    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(raw.trim()))
    }

    pub fn host_type(&self) -> (FieldType, FieldDisplayIcon) {
        match self {
            FieldKind::Text | FieldKind::Regexp | FieldKind::PartialCreditCard => {
                (FieldType::Text, FieldDisplayIcon::Text)
            }
            FieldKind::TextArea => (FieldType::TextArea, FieldDisplayIcon::TextArea),
            FieldKind::Checkbox => (FieldType::Boolean, FieldDisplayIcon::Checkbox),
            FieldKind::Date => (FieldType::Date, FieldDisplayIcon::Date),
            FieldKind::Integer => (FieldType::Integer, FieldDisplayIcon::Number),
            FieldKind::Decimal => (FieldType::Decimal, FieldDisplayIcon::Number),
            FieldKind::MultiSelect | FieldKind::Tagger | FieldKind::Lookup | FieldKind::Relation => {
                (FieldType::List, FieldDisplayIcon::Dropdown)
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct IssueFieldSpec {
    pub raw_title: &'static str,
    pub title: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub multivalue: bool,
}

pub const LABELS_FIELD: &str = "labels";
pub const STATE_FIELD: &str = "state";

pub static ISSUE_FIELDS: &[IssueFieldSpec] = &[
    IssueFieldSpec {
        raw_title: "title",
        title: "Title",
        kind: FieldKind::Text,
        required: true,
        multivalue: false,
    },
    IssueFieldSpec {
        raw_title: "body",
        title: "Description",
        kind: FieldKind::TextArea,
        required: false,
        multivalue: false,
    },
    IssueFieldSpec {
        raw_title: STATE_FIELD,
        title: "State",
        kind: FieldKind::Lookup,
        required: false,
        multivalue: false,
    },
    IssueFieldSpec {
        raw_title: "assignees",
        title: "Assignees",
        kind: FieldKind::Text,
        required: false,
        multivalue: true,
    },
    IssueFieldSpec {
        raw_title: LABELS_FIELD,
        title: "Labels",
        kind: FieldKind::MultiSelect,
        required: false,
        multivalue: true,
    },
    IssueFieldSpec {
        raw_title: "milestone",
        title: "Milestone",
        kind: FieldKind::Relation,
        required: false,
        multivalue: false,
    },
];

pub fn state_options() -> Vec<FieldValue> {
    vec![
        FieldValue::new("open", "Open"),
        FieldValue::new("closed", "Closed"),
    ]
}

/// Host fields that are never pushed to GitHub.
pub static SKIPPED_OUTBOUND_FIELDS: &[&str] = &["Assignee"];

pub const DEFAULT_ASSET_ID: &str = "issue";
pub const DEFAULT_ASSET_NAME: &str = "Issue";

pub const TICKET_CREATED: &str = "ticket_created";
pub const TICKET_UPDATED: &str = "ticket_updated";
pub const TICKET_DELETED: &str = "ticket_deleted";
pub const COMMENT_CREATED: &str = "comment_created";

pub static ACTION_EVENT_TYPES: &[(&str, EventType)] = &[
    (TICKET_CREATED, EventType::Create),
    (TICKET_DELETED, EventType::Delete),
    (TICKET_UPDATED, EventType::Update),
    (COMMENT_CREATED, EventType::Update),
];

/// `(X-GitHub-Event, action)` of native deliveries and their canonical action.
pub static NATIVE_ACTIONS: &[(&str, &str, &str)] = &[
    ("issues", "opened", TICKET_CREATED),
    ("issues", "deleted", TICKET_DELETED),
    ("issues", "edited", TICKET_UPDATED),
    ("issues", "closed", TICKET_UPDATED),
    ("issues", "reopened", TICKET_UPDATED),
    ("issues", "labeled", TICKET_UPDATED),
    ("issues", "unlabeled", TICKET_UPDATED),
    ("issues", "assigned", TICKET_UPDATED),
    ("issues", "unassigned", TICKET_UPDATED),
    ("issues", "milestoned", TICKET_UPDATED),
    ("issues", "demilestoned", TICKET_UPDATED),
    ("issue_comment", "created", COMMENT_CREATED),
    ("issue_comment", "edited", COMMENT_CREATED),
];

pub fn event_type_for(action: &str) -> Option<EventType> {
    ACTION_EVENT_TYPES
        .iter()
        .find(|(name, _)| *name == action)
        .map(|(_, event_type)| *event_type)
}

pub fn canonical_action(event: &str, action: &str) -> Option<&'static str> {
    NATIVE_ACTIONS
        .iter()
        .find(|(e, a, _)| *e == event && *a == action)
        .map(|(_, _, canonical)| *canonical)
}

pub fn is_ticket_action(action: &str) -> bool {
    matches!(action, TICKET_CREATED | TICKET_UPDATED | TICKET_DELETED)
}

pub const TRIGGER_CATEGORY_NAME: &str = "Ticket Sync";

#[derive(Debug, Clone, Copy)]
pub struct TriggerDefinition {
    pub title: &'static str,
    pub webhook_type: &'static str,
    pub conditions_value: &'static str,
}

pub static TICKET_TRIGGERS: &[TriggerDefinition] = &[
    TriggerDefinition {
        title: "Ticket Sync: ticket created",
        webhook_type: TICKET_CREATED,
        conditions_value: "Create",
    },
    TriggerDefinition {
        title: "Ticket Sync: ticket updated",
        webhook_type: TICKET_UPDATED,
        conditions_value: "Change",
    },
];
