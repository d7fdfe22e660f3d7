use thiserror::Error;

#[derive(Error, Debug)]
pub enum PluginError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("GitHub responded with status {status}: {body}")]
    GitHubStatusError { status: u16, body: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("{message} ({detail})")]
    SanitizedError { message: String, detail: String },

    #[error("Payload error: {message}")]
    PayloadError { message: String },

    #[error("Unsupported field type [{kind}] for field [{field}]")]
    UnsupportedFieldType { field: String, kind: String },

    #[error("Inbound error: {message}")]
    InboundError { message: String },

    #[error("Outbound error: {message}")]
    OutboundError { message: String },

    #[error("Configuration error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Remote,
    Payload,
    Sync,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl PluginError {
    pub fn sanitized(message: impl Into<String>, detail: impl ToString) -> Self {
        Self::SanitizedError {
            message: message.into(),
            detail: detail.to_string(),
        }
    }

    pub fn payload(message: impl Into<String>) -> Self {
        Self::PayloadError {
            message: message.into(),
        }
    }

    pub fn inbound(message: impl Into<String>) -> Self {
        Self::InboundError {
            message: message.into(),
        }
    }

    pub fn outbound(message: impl Into<String>) -> Self {
        Self::OutboundError {
            message: message.into(),
        }
    }

    /// True for a remote 404, which some listing endpoints use to say
    /// "feature not available here".
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::GitHubStatusError { status: 404, .. })
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ApiError(_) | Self::UrlError(_) => ErrorCategory::Network,
            Self::GitHubStatusError { .. } | Self::SanitizedError { .. } => ErrorCategory::Remote,
            Self::PayloadError { .. }
            | Self::UnsupportedFieldType { .. }
            | Self::SerializationError(_) => ErrorCategory::Payload,
            Self::InboundError { .. } | Self::OutboundError { .. } => ErrorCategory::Sync,
            Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => ErrorCategory::Configuration,
            Self::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::ApiError(_) => ErrorSeverity::Medium,
            Self::GitHubStatusError { status, .. } if *status == 429 || *status >= 500 => {
                ErrorSeverity::Medium
            }
            Self::GitHubStatusError { .. }
            | Self::SanitizedError { .. }
            | Self::PayloadError { .. }
            | Self::UnsupportedFieldType { .. }
            | Self::InboundError { .. }
            | Self::OutboundError { .. }
            | Self::SerializationError(_)
            | Self::UrlError(_) => ErrorSeverity::High,
            Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. }
            | Self::IoError(_) => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::ApiError(_) => "Check network connectivity to the GitHub API and retry",
            Self::GitHubStatusError { status: 401, .. } => {
                "The token was rejected; generate a new personal access token"
            }
            Self::GitHubStatusError { status: 403, .. } => {
                "The token lacks a required scope (repo, admin:repo_hook, read:org) or hit a rate limit"
            }
            Self::GitHubStatusError { status: 404, .. } => {
                "Check the organization and repository names and that the token can see them"
            }
            Self::GitHubStatusError { status: 422, .. } => {
                "GitHub rejected the request body; review the synced field values"
            }
            Self::GitHubStatusError { .. } => "Retry later; GitHub returned an unexpected status",
            Self::SanitizedError { .. } => "Verify the instance url, token and username",
            Self::PayloadError { .. } | Self::SerializationError(_) => {
                "Inspect the webhook payload; it does not match a supported event shape"
            }
            Self::UnsupportedFieldType { .. } => {
                "The field uses a type this plugin cannot map; exclude it from the sync"
            }
            Self::InboundError { .. } | Self::OutboundError { .. } => {
                "Review the sync details in the log and retry the sync"
            }
            Self::UrlError(_) => "Fix the configured URL",
            Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => "Fix the configuration file and run again",
            Self::IoError(_) => "Check that the file exists and is readable",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::SanitizedError { message, .. } => message.clone(),
            Self::GitHubStatusError { status, .. } => {
                format!("GitHub rejected the request (HTTP {})", status)
            }
            Self::MissingConfigError { field } => {
                format!("Configuration value '{}' is required", field)
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, PluginError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitized_error_hides_detail_from_users() {
        let err = PluginError::sanitized("Unknown error connecting", "token expired");
        assert_eq!(err.user_friendly_message(), "Unknown error connecting");
        assert!(err.to_string().contains("token expired"));
        assert_eq!(err.category(), ErrorCategory::Remote);
    }

    #[test]
    fn test_status_severity() {
        let throttled = PluginError::GitHubStatusError {
            status: 429,
            body: String::new(),
        };
        let rejected = PluginError::GitHubStatusError {
            status: 422,
            body: String::new(),
        };
        assert_eq!(throttled.severity(), ErrorSeverity::Medium);
        assert_eq!(rejected.severity(), ErrorSeverity::High);
        assert!(!rejected.is_not_found());
    }

    #[test]
    fn test_config_errors_are_critical() {
        let err = PluginError::MissingConfigError {
            field: "instance.token".to_string(),
        };
        assert_eq!(err.severity(), ErrorSeverity::Critical);
        assert_eq!(err.category(), ErrorCategory::Configuration);
    }
}
