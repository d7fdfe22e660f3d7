// Adapters layer: concrete implementations for external systems.

pub mod github;
mod http;
pub mod triggers;

pub use github::GitHubClient;
pub use triggers::TriggerClient;
