use clap::Subcommand;

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Authenticate with the configured token
    TestConnection,

    /// List organizations visible to the sync user
    Orgs,

    /// List an organization's repositories
    Projects {
        #[arg(long)]
        org: String,
    },

    /// List syncable work-item types of an organization
    Assets {
        #[arg(long)]
        org: String,
    },

    /// Describe the issue fields of a repository
    Fields {
        #[arg(long)]
        org: String,
        #[arg(long)]
        repo: String,
    },

    /// Register the sync webhook on repositories
    RegisterWebhook {
        #[arg(long)]
        org: String,
        #[arg(long, value_delimiter = ',', required = true)]
        repos: Vec<String>,
        #[arg(long)]
        url: String,
        #[arg(long, default_value = "ticket-sync")]
        name: String,
        #[arg(long, default_value = "")]
        description: String,
    },

    /// Parse a webhook delivery and print the sync event derived from it
    Classify {
        /// JSON body of the delivery
        #[arg(long)]
        payload: String,
        /// Value of the X-GitHub-Event header, for native deliveries
        #[arg(long)]
        event: Option<String>,
    },

    /// Create an issue from `name=value` field pairs
    CreateIssue {
        #[arg(long)]
        org: String,
        #[arg(long)]
        repo: String,
        #[arg(long = "field", value_parser = parse_field)]
        fields: Vec<(String, String)>,
    },

    /// Add a comment to an issue
    Comment {
        #[arg(long)]
        org: String,
        #[arg(long)]
        repo: String,
        #[arg(long)]
        issue: String,
        #[arg(long)]
        body: String,
    },
}

fn parse_field(raw: &str) -> std::result::Result<(String, String), String> {
    raw.split_once('=')
        .map(|(name, value)| (name.trim().to_string(), value.to_string()))
        .filter(|(name, _)| !name.is_empty())
        .ok_or_else(|| format!("expected name=value, got '{}'", raw))
}
