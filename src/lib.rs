pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{GitHubClient, TriggerClient};
pub use config::toml_config::PluginConfig;
pub use utils::error::{PluginError, Result};
