use crate::core::ConfigProvider;
use crate::utils::error::{PluginError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_INSTANCE_URL: &str = "https://github.com";
pub const DEFAULT_API_URL: &str = "https://api.github.com";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;
pub const DEFAULT_USER_AGENT: &str = "github-sync-plugin/0.1";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PluginConfig {
    pub instance: InstanceConfig,
    pub http: Option<HttpConfig>,
    pub webhook: Option<WebhookConfig>,
    pub triggers: Option<TriggerConfig>,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstanceConfig {
    pub url: Option<String>,
    pub api_url: Option<String>,
    pub token: String,
    pub username: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    pub timeout_seconds: Option<u64>,
    pub user_agent: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookConfig {
    pub events: Option<Vec<String>>,
    pub active: Option<bool>,
    pub insecure_ssl: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriggerConfig {
    pub enabled: bool,
    pub api_url: Option<String>,
    /// Bearer token of the automation service. Supports `${VAR}`.
    pub token: Option<String>,
    pub category_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: Option<String>,
    pub format: Option<String>,
}

/// Resolved webhook registration settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookSettings {
    pub events: Vec<String>,
    pub active: bool,
    pub insecure_ssl: bool,
}

impl Default for WebhookSettings {
    fn default() -> Self {
        Self {
            events: vec!["issues".to_string(), "issue_comment".to_string()],
            active: true,
            insecure_ssl: false,
        }
    }
}

impl PluginConfig {
    /// Loads and parses a TOML config file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(PluginError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| PluginError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unset variables stay as written.
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| PluginError::ConfigValidationError {
            field: "environment".to_string(),
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_url("instance.url", self.instance_url())?;
        validation::validate_url("instance.api_url", self.api_url())?;
        validation::validate_non_empty_string("instance.token", &self.instance.token)?;
        validation::validate_non_empty_string("instance.username", &self.instance.username)?;

        ensure_substituted("instance.token", &self.instance.token)?;

        validation::validate_positive_number("http.timeout_seconds", self.timeout_seconds(), 1)?;

        if let Some(webhook) = &self.webhook {
            if let Some(events) = &webhook.events {
                if events.is_empty() {
                    return Err(PluginError::InvalidConfigValueError {
                        field: "webhook.events".to_string(),
                        value: "[]".to_string(),
                        reason: "At least one event is required".to_string(),
                    });
                }
            }
        }

        if let Some(triggers) = &self.triggers {
            if triggers.enabled {
                let api_url = validation::validate_required_field("triggers.api_url", &triggers.api_url)?;
                validation::validate_url("triggers.api_url", api_url)?;
                let token = validation::validate_required_field("triggers.token", &triggers.token)?;
                validation::validate_non_empty_string("triggers.token", token)?;
                ensure_substituted("triggers.token", token)?;
            }
        }

        if let Some(format) = self.logging.as_ref().and_then(|l| l.format.as_deref()) {
            validation::validate_one_of("logging.format", format, &["compact", "json"])?;
        }

        Ok(())
    }

    pub fn webhook_settings(&self) -> WebhookSettings {
        let defaults = WebhookSettings::default();
        match &self.webhook {
            Some(webhook) => WebhookSettings {
                events: webhook.events.clone().unwrap_or(defaults.events),
                active: webhook.active.unwrap_or(defaults.active),
                insecure_ssl: webhook.insecure_ssl.unwrap_or(defaults.insecure_ssl),
            },
            None => defaults,
        }
    }

    /// Trigger registration settings when enabled.
    pub fn trigger_settings(&self) -> Option<&TriggerConfig> {
        self.triggers.as_ref().filter(|t| t.enabled)
    }

    pub fn log_level(&self) -> Option<&str> {
        self.logging.as_ref().and_then(|l| l.level.as_deref())
    }

    pub fn json_logging(&self) -> bool {
        self.logging
            .as_ref()
            .and_then(|l| l.format.as_deref())
            .map(|f| f == "json")
            .unwrap_or(false)
    }
}

/// A `${VAR}` left after substitution means the variable was unset.
fn ensure_substituted(field: &str, value: &str) -> Result<()> {
    if value.starts_with("${") {
        return Err(PluginError::ConfigValidationError {
            field: field.to_string(),
            message: format!(
                "environment variable {} is not set",
                value.trim_start_matches("${").trim_end_matches('}')
            ),
        });
    }
    Ok(())
}

impl ConfigProvider for PluginConfig {
    fn instance_url(&self) -> &str {
        self.instance.url.as_deref().unwrap_or(DEFAULT_INSTANCE_URL)
    }

    fn api_url(&self) -> &str {
        self.instance.api_url.as_deref().unwrap_or(DEFAULT_API_URL)
    }

    fn token(&self) -> &str {
        &self.instance.token
    }

    fn sync_user(&self) -> &str {
        &self.instance.username
    }

    fn timeout_seconds(&self) -> u64 {
        self.http
            .as_ref()
            .and_then(|h| h.timeout_seconds)
            .unwrap_or(DEFAULT_TIMEOUT_SECONDS)
    }

    fn user_agent(&self) -> &str {
        self.http
            .as_ref()
            .and_then(|h| h.user_agent.as_deref())
            .unwrap_or(DEFAULT_USER_AGENT)
    }
}

impl Validate for PluginConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
