pub mod assets;
pub mod fields;
pub mod inbound;
pub mod mapping;
pub mod outbound;
pub mod triggers;
pub mod webhook;

#[cfg(test)]
pub(crate) mod testing;

pub use crate::domain::model::{
    Asset, EventCategory, EventType, FieldAttributes, FieldTypeInfo, FieldValue, InboundEvent,
    Organization, OutboundField, Project, RegisteredHook, SyncFields, SyncInfo, XrefObject,
};
pub use crate::domain::ports::{
    AssetCatalog, ConfigProvider, FieldDescriptor, FieldSource, GitHubApi, InboundSync,
    OutboundSync, PayloadInspector, SyncEvent, TriggerApi, WebhookRegistrar,
};
pub use crate::utils::error::Result;
